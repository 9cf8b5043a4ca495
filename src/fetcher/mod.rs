/// Caption retrieval module
///
/// Defines the caption-source seam the service delegates to, plus the typed
/// failure the HTTP layer maps onto status codes. The production source
/// scrapes YouTube directly; tests substitute mock implementations.

pub mod youtube;

pub use youtube::YoutubeCaptionSource;

use async_trait::async_trait;
use thiserror::Error;

use crate::transcript::TranscriptEntry;

/// Failure retrieving a caption track
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transcript not found")]
    NotFound,

    #[error("access denied by YouTube")]
    AccessDenied,

    #[error("upstream error: {0}")]
    Upstream(String),
}

/// HTTP-facing failure category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailure {
    NotFound,
    AccessDenied,
    Unknown,
}

impl FetchError {
    /// Collapse this failure into its HTTP-facing category.
    ///
    /// Upstream messages are still sniffed for an embedded "404"/"403" so the
    /// mapping matches the legacy string-based classification.
    pub fn category(&self) -> FetchFailure {
        match self {
            FetchError::NotFound => FetchFailure::NotFound,
            FetchError::AccessDenied => FetchFailure::AccessDenied,
            FetchError::Upstream(msg) if msg.contains("404") => FetchFailure::NotFound,
            FetchError::Upstream(msg) if msg.contains("403") => FetchFailure::AccessDenied,
            FetchError::Upstream(_) => FetchFailure::Unknown,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Upstream(err.to_string())
    }
}

/// Source of caption tracks for a video identifier
///
/// Returns the entries in playback order; an empty vector means the video was
/// reachable but exposes no captions.
#[async_trait]
pub trait CaptionSource: Send + Sync {
    async fn fetch(&self, video_id: &str) -> Result<Vec<TranscriptEntry>, FetchError>;
}
