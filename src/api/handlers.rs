//! Caption service request handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use tracing::{error, info, warn};

use super::server::AppState;
use crate::fetcher::{FetchError, FetchFailure};
use crate::transcript::Transcript;

const MISSING_ID_MSG: &str = "Video ID is required";
const EMPTY_TRANSCRIPT_MSG: &str =
    "Transcript not available. It may be auto-generated or restricted by YouTube.";
const NOT_FOUND_MSG: &str =
    "Transcript not found. It may be auto-generated or restricted by YouTube.";
const ACCESS_DENIED_MSG: &str = "YouTube API denied access. Video may have restrictions.";
const UPSTREAM_MSG: &str = "Could not fetch transcript. Possible API limit reached.";

/// Query parameters for the transcript endpoint
#[derive(Debug, Deserialize)]
pub struct TranscriptQuery {
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
}

/// Health check handler
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "yt-transcript-rust",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Transcript endpoint handler
///
/// `GET /transcript?videoId=<id>`: validates the identifier, delegates to the
/// caption source, and maps every outcome to a status code with an `{error}`
/// body. Raw upstream error text is logged, never returned to the client.
pub async fn get_transcript(
    State(state): State<AppState>,
    Query(params): Query<TranscriptQuery>,
) -> Response {
    let video_id = match params.video_id.as_deref() {
        Some(id) if !id.is_empty() => id,
        _ => return error_response(StatusCode::BAD_REQUEST, MISSING_ID_MSG),
    };

    info!("🎬 Fetching transcript for video ID: {}", video_id);

    match state.source.fetch(video_id).await {
        Ok(entries) if entries.is_empty() => {
            info!("Transcript may be auto-generated or unavailable: {}", video_id);
            error_response(StatusCode::NOT_FOUND, EMPTY_TRANSCRIPT_MSG)
        }
        Ok(entries) => (StatusCode::OK, Json(Transcript::from_entries(entries))).into_response(),
        Err(e) => {
            error!("Error fetching transcript for {}: {}", video_id, e);
            map_fetch_error(&e)
        }
    }
}

/// Map a typed fetch failure onto the response contract
fn map_fetch_error(error: &FetchError) -> Response {
    match error.category() {
        FetchFailure::NotFound => error_response(StatusCode::NOT_FOUND, NOT_FOUND_MSG),
        FetchFailure::AccessDenied => error_response(StatusCode::FORBIDDEN, ACCESS_DENIED_MSG),
        FetchFailure::Unknown => {
            warn!("Unclassified upstream failure: {}", error);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, UPSTREAM_MSG)
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::CaptionSource;
    use crate::transcript::TranscriptEntry;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Caption source with a canned outcome, counting invocations
    struct MockSource {
        outcome: fn() -> Result<Vec<TranscriptEntry>, FetchError>,
        calls: AtomicUsize,
    }

    impl MockSource {
        fn new(outcome: fn() -> Result<Vec<TranscriptEntry>, FetchError>) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl CaptionSource for MockSource {
        async fn fetch(&self, _video_id: &str) -> Result<Vec<TranscriptEntry>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.outcome)()
        }
    }

    async fn call(
        source: Arc<MockSource>,
        video_id: Option<&str>,
    ) -> (StatusCode, serde_json::Value) {
        let state = AppState {
            source: source.clone(),
        };
        let query = TranscriptQuery {
            video_id: video_id.map(str::to_string),
        };
        let response = get_transcript(State(state), Query(query)).await;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn test_missing_video_id_is_400_without_fetch() {
        let source = MockSource::new(|| Ok(vec![]));
        let (status, body) = call(source.clone(), None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Video ID is required");
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_video_id_is_400_without_fetch() {
        let source = MockSource::new(|| Ok(vec![]));
        let (status, body) = call(source.clone(), Some("")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Video ID is required");
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_success_returns_entries_in_order() {
        let source = MockSource::new(|| {
            Ok(vec![
                TranscriptEntry::new("first", 0.0, 1.0),
                TranscriptEntry::new("second", 1.0, 1.0),
            ])
        });
        let (status, body) = call(source, Some("abc123")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["text"], "first");
        assert_eq!(body[1]["text"], "second");
    }

    #[tokio::test]
    async fn test_empty_result_is_404_with_availability_message() {
        let source = MockSource::new(|| Ok(vec![]));
        let (status, body) = call(source, Some("abc123")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body["error"],
            "Transcript not available. It may be auto-generated or restricted by YouTube."
        );
    }

    #[tokio::test]
    async fn test_not_found_failure_is_404() {
        let source = MockSource::new(|| Err(FetchError::NotFound));
        let (status, body) = call(source, Some("abc123")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body["error"],
            "Transcript not found. It may be auto-generated or restricted by YouTube."
        );
    }

    #[tokio::test]
    async fn test_access_denied_failure_is_403() {
        let source = MockSource::new(|| Err(FetchError::AccessDenied));
        let (status, body) = call(source, Some("abc123")).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "YouTube API denied access. Video may have restrictions.");
    }

    #[tokio::test]
    async fn test_upstream_message_with_404_maps_to_404() {
        let source = MockSource::new(|| {
            Err(FetchError::Upstream("Request failed with status code 404".to_string()))
        });
        let (status, _) = call(source, Some("abc123")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_failure_is_500() {
        let source = MockSource::new(|| Err(FetchError::Upstream("rate limited".to_string())));
        let (status, body) = call(source, Some("abc123")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Could not fetch transcript. Possible API limit reached.");
    }
}
