//! Transcript client session
//!
//! Orchestrates fetch, search, export, read-aloud, and history for one
//! transcript at a time. The presentation layer (CLI or UI) reads session
//! state through the getters and drives it through the operations; every
//! failure ends up as a response-shaped state update, never a panic.

use anyhow::{anyhow, Result};
use reqwest::Client;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::export;
use crate::history::{HistoryEntry, HistoryStore};
use crate::speech::SpeechSynthesizer;
use crate::transcript::{Transcript, TranscriptEntry};

const EMPTY_ID_MSG: &str = "Please enter a YouTube Video ID.";
const FETCH_FAILED_MSG: &str = "Failed to fetch transcript. Please check the video ID and try again.";
const NO_TRANSCRIPT_MSG: &str = "No transcript available to download.";

/// One interactive transcript session
pub struct TranscriptSession {
    base_url: String,
    client: Client,
    history_store: HistoryStore,
    speech: Box<dyn SpeechSynthesizer>,

    video_id: String,
    transcript: Transcript,
    error: Option<String>,
    language: String,
    dark_mode: bool,
    search_term: String,
    history: Vec<HistoryEntry>,
    fetch_seq: u64,
}

impl TranscriptSession {
    /// Create a session against a caption service, loading persisted history
    pub async fn new(
        base_url: impl Into<String>,
        history_store: HistoryStore,
        speech: Box<dyn SpeechSynthesizer>,
    ) -> Self {
        let history = history_store.load().await;

        Self {
            base_url: base_url.into(),
            client: Client::new(),
            history_store,
            speech,
            video_id: String::new(),
            transcript: Transcript::new(),
            error: None,
            language: "en".to_string(),
            dark_mode: false,
            search_term: String::new(),
            history,
            fetch_seq: 0,
        }
    }

    // State accessors for the presentation layer

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn set_video_id(&mut self, video_id: impl Into<String>) {
        self.video_id = video_id.into();
    }

    /// Caption language preference; display-only, not sent to the server
    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = language.into();
    }

    pub fn set_dark_mode(&mut self, enabled: bool) {
        self.dark_mode = enabled;
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Entries matching the current search term, in playback order
    pub fn visible_entries(&self) -> Vec<&TranscriptEntry> {
        self.transcript.search(&self.search_term)
    }

    /// Fetch the transcript for the current video identifier.
    ///
    /// Clears prior state first. On success the result replaces the current
    /// transcript and lands in history; every failure collapses to one
    /// generic user-facing message. Overlapping invocations resolve
    /// last-writer-wins via the sequence token.
    pub async fn fetch_transcript(&mut self) {
        self.error = None;
        self.transcript = Transcript::new();

        if self.video_id.is_empty() {
            self.error = Some(EMPTY_ID_MSG.to_string());
            return;
        }

        self.fetch_seq += 1;
        let seq = self.fetch_seq;
        info!("🎬 Requesting transcript for video ID: {}", self.video_id);

        let result = self.request_transcript().await;
        self.apply_fetch_result(seq, result).await;
    }

    async fn request_transcript(&self) -> Result<Transcript> {
        let url = format!(
            "{}/transcript?videoId={}",
            self.base_url,
            urlencoding::encode(&self.video_id)
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!("caption service returned {}", response.status()));
        }

        Ok(response.json::<Transcript>().await?)
    }

    /// Apply a finished fetch unless a newer one has been issued since
    async fn apply_fetch_result(&mut self, seq: u64, result: Result<Transcript>) {
        if seq != self.fetch_seq {
            debug!("Discarding superseded fetch result (seq {})", seq);
            return;
        }

        match result {
            Ok(transcript) => {
                let entry = HistoryEntry::new(self.video_id.clone(), transcript.clone());
                self.transcript = transcript;

                let updated = self
                    .history_store
                    .append(std::mem::take(&mut self.history), entry);
                if let Err(e) = self.history_store.persist(&updated).await {
                    warn!("Failed to persist history: {}", e);
                }
                self.history = updated;
            }
            Err(e) => {
                warn!("Transcript fetch failed: {}", e);
                self.error = Some(FETCH_FAILED_MSG.to_string());
            }
        }
    }

    /// Save the current transcript as plain text
    pub async fn download_txt(&mut self, path: &Path) -> Result<()> {
        if self.transcript.is_empty() {
            self.error = Some(NO_TRANSCRIPT_MSG.to_string());
            return Ok(());
        }

        export::write_txt(&self.transcript, path).await
    }

    /// Save the current transcript as a PDF document
    pub async fn download_pdf(&mut self, path: &Path) -> Result<()> {
        if self.transcript.is_empty() {
            self.error = Some(NO_TRANSCRIPT_MSG.to_string());
            return Ok(());
        }

        export::write_pdf(&self.transcript, path)
    }

    /// Read the joined transcript aloud through the speech collaborator
    pub async fn speak(&mut self) -> Result<()> {
        let text = self.transcript.join_text();
        self.speech.speak(&text).await
    }

    /// Cancel all pending and playing speech
    pub async fn stop_speech(&mut self) -> Result<()> {
        self.speech.cancel().await
    }
}
