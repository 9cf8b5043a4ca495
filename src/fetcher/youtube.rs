/// YouTube caption scraper
///
/// Retrieves the caption track list from the watch page's embedded player
/// response, then fetches and parses the timedtext XML for the selected
/// language.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{CaptionSource, FetchError};
use crate::config::FetcherConfig;
use crate::transcript::TranscriptEntry;

const WATCH_URL: &str = "https://www.youtube.com/watch";
const CAPTION_TRACKS_MARKER: &str = "\"captionTracks\":";

/// One caption track from the player response
#[derive(Debug, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode")]
    language_code: Option<String>,
}

/// Production caption source scraping YouTube directly
#[derive(Clone)]
pub struct YoutubeCaptionSource {
    client: Client,
    language: String,
    text_re: Regex,
}

impl YoutubeCaptionSource {
    /// Create a new caption source from fetcher settings
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()?;

        let text_re = Regex::new(
            r#"(?s)<text start="([\d.]+)" dur="([\d.]+)"[^>]*>(.*?)</text>"#,
        )
        .map_err(|e| anyhow!("invalid timedtext pattern: {}", e))?;

        Ok(Self {
            client,
            language: config.language.clone(),
            text_re,
        })
    }

    /// Map a non-success YouTube status onto the typed failure
    fn status_error(status: StatusCode) -> FetchError {
        match status {
            StatusCode::NOT_FOUND => FetchError::NotFound,
            StatusCode::FORBIDDEN => FetchError::AccessDenied,
            other => FetchError::Upstream(format!("YouTube returned status {}", other)),
        }
    }

    /// Extract the caption track list from the watch page HTML
    fn extract_tracks(page: &str) -> Result<Vec<CaptionTrack>, FetchError> {
        let start = match page.find(CAPTION_TRACKS_MARKER) {
            Some(pos) => pos + CAPTION_TRACKS_MARKER.len(),
            // No captionTracks block at all: video exists but has no captions
            None => return Ok(Vec::new()),
        };

        let tail = &page[start..];
        let raw = json_array_at(tail)
            .ok_or_else(|| FetchError::Upstream("malformed caption track list".to_string()))?;

        let tracks: Vec<CaptionTrack> = serde_json::from_str(raw)
            .map_err(|e| FetchError::Upstream(format!("caption track parse error: {}", e)))?;

        Ok(tracks)
    }

    /// Pick the track for the configured language, falling back to the first
    fn select_track<'a>(&self, tracks: &'a [CaptionTrack]) -> Option<&'a CaptionTrack> {
        tracks
            .iter()
            .find(|t| t.language_code.as_deref() == Some(self.language.as_str()))
            .or_else(|| tracks.first())
    }

    /// Parse timedtext XML into ordered transcript entries
    fn parse_timedtext(&self, xml: &str) -> Vec<TranscriptEntry> {
        self.text_re
            .captures_iter(xml)
            .filter_map(|caps| {
                let start: f64 = caps.get(1)?.as_str().parse().ok()?;
                let duration: f64 = caps.get(2)?.as_str().parse().ok()?;
                let text = decode_entities(caps.get(3)?.as_str());
                Some(TranscriptEntry::new(text, start, duration))
            })
            .collect()
    }
}

#[async_trait]
impl CaptionSource for YoutubeCaptionSource {
    async fn fetch(&self, video_id: &str) -> Result<Vec<TranscriptEntry>, FetchError> {
        let watch_url = format!("{}?v={}", WATCH_URL, urlencoding::encode(video_id));
        debug!("Fetching watch page: {}", watch_url);

        let response = self.client.get(&watch_url).send().await?;
        if !response.status().is_success() {
            warn!("Watch page request for {} failed: {}", video_id, response.status());
            return Err(Self::status_error(response.status()));
        }

        let page = response.text().await?;
        let tracks = Self::extract_tracks(&page)?;
        if tracks.is_empty() {
            info!("No caption tracks listed for video: {}", video_id);
            return Ok(Vec::new());
        }

        let track = match self.select_track(&tracks) {
            Some(track) => track,
            None => return Ok(Vec::new()),
        };
        debug!(
            "Selected caption track (language {:?}) for {}",
            track.language_code, video_id
        );

        let response = self.client.get(&track.base_url).send().await?;
        if !response.status().is_success() {
            warn!("Timedtext request for {} failed: {}", video_id, response.status());
            return Err(Self::status_error(response.status()));
        }

        let xml = response.text().await?;
        let entries = self.parse_timedtext(&xml);
        info!("📝 Parsed {} caption lines for video: {}", entries.len(), video_id);

        Ok(entries)
    }
}

/// Slice the complete JSON array starting at the head of `s`.
///
/// Tracks are embedded in a larger script blob, so the closing bracket has to
/// be found by nesting depth rather than a plain search. String contents and
/// escapes are skipped.
fn json_array_at(s: &str) -> Option<&str> {
    if !s.starts_with('[') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in s.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '[' | '{' => depth += 1,
            ']' | '}' => {
                // Stray closers in malformed input fall through to the
                // serde parse error downstream
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&s[..=i]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Decode the entity escapes YouTube uses in timedtext payloads
fn decode_entities(text: &str) -> String {
    text.replace("&amp;#39;", "'")
        .replace("&amp;quot;", "\"")
        .replace("&amp;", "&")
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> YoutubeCaptionSource {
        YoutubeCaptionSource::new(&FetcherConfig::default()).unwrap()
    }

    #[test]
    fn test_parse_timedtext_entries() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<transcript>
<text start="0.12" dur="1.5">Hello there</text>
<text start="1.62" dur="2.0" w="1">second &amp;#39;line&amp;#39;</text>
</transcript>"#;

        let entries = source().parse_timedtext(xml);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "Hello there");
        assert_eq!(entries[0].start, 0.12);
        assert_eq!(entries[0].duration, 1.5);
        assert_eq!(entries[1].text, "second 'line'");
    }

    #[test]
    fn test_parse_timedtext_preserves_order() {
        let xml = r#"<text start="5.0" dur="1.0">late</text><text start="0.0" dur="1.0">early</text>"#;
        let entries = source().parse_timedtext(xml);
        assert_eq!(entries[0].text, "late");
        assert_eq!(entries[1].text, "early");
    }

    #[test]
    fn test_extract_tracks_missing_marker_means_no_captions() {
        let tracks = YoutubeCaptionSource::extract_tracks("<html>no captions here</html>").unwrap();
        assert!(tracks.is_empty());
    }

    #[test]
    fn test_extract_tracks_parses_list() {
        let page = r#"..."captionTracks":[{"baseUrl":"https://example.com/timedtext?v=x&lang=en","languageCode":"en"}],"other":1..."#;
        let tracks = YoutubeCaptionSource::extract_tracks(page).unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].language_code.as_deref(), Some("en"));
        assert!(tracks[0].base_url.contains("&lang=en"));
    }

    #[test]
    fn test_select_track_prefers_configured_language() {
        let tracks = vec![
            CaptionTrack {
                base_url: "https://example.com/fr".to_string(),
                language_code: Some("fr".to_string()),
            },
            CaptionTrack {
                base_url: "https://example.com/en".to_string(),
                language_code: Some("en".to_string()),
            },
        ];
        let picked = source().select_track(&tracks).unwrap();
        assert_eq!(picked.language_code.as_deref(), Some("en"));
    }

    #[test]
    fn test_select_track_falls_back_to_first() {
        let tracks = vec![CaptionTrack {
            base_url: "https://example.com/de".to_string(),
            language_code: Some("de".to_string()),
        }];
        let picked = source().select_track(&tracks).unwrap();
        assert_eq!(picked.language_code.as_deref(), Some("de"));
    }

    #[test]
    fn test_json_array_at_handles_nesting() {
        let s = r#"[{"name":{"runs":[{"text":"English"}]},"languageCode":"en","baseUrl":"u"}],"rest":true"#;
        let raw = json_array_at(s).unwrap();
        assert!(raw.ends_with("}]"));
        assert!(!raw.contains("rest"));
    }

    #[test]
    fn test_json_array_at_skips_brackets_in_strings() {
        let s = r#"[{"baseUrl":"https://example.com/a]b"}] tail"#;
        let raw = json_array_at(s).unwrap();
        let tracks: Vec<CaptionTrack> = serde_json::from_str(raw).unwrap();
        assert_eq!(tracks[0].base_url, "https://example.com/a]b");
    }

    #[test]
    fn test_extract_tracks_with_nested_name_runs() {
        let page = r#"..."captionTracks":[{"baseUrl":"https://example.com/t","name":{"runs":[{"text":"English"}]},"languageCode":"en"}],"audioTracks":[]..."#;
        let tracks = YoutubeCaptionSource::extract_tracks(page).unwrap();
        assert_eq!(tracks.len(), 1);
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &amp; b"), "a & b");
        assert_eq!(decode_entities("it&amp;#39;s"), "it's");
        assert_eq!(decode_entities(" trimmed "), "trimmed");
    }
}
