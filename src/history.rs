/// Fetch history persistence
///
/// Bounded, most-recent-first log of successful fetches, stored as a JSON
/// file across sessions. The store is passed explicitly so callers and tests
/// can substitute their own location; only a successful fetch appends, and
/// the oldest entry is evicted past the cap.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::transcript::Transcript;

/// Maximum number of retained history entries
pub const MAX_HISTORY_ENTRIES: usize = 5;

/// One past successful fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Video identifier that was fetched
    #[serde(rename = "videoId")]
    pub video_id: String,
    /// Transcript returned for that fetch
    pub transcript: Transcript,
    /// Fetch time, epoch seconds
    #[serde(default)]
    pub fetched_at: i64,
}

impl HistoryEntry {
    pub fn new(video_id: impl Into<String>, transcript: Transcript) -> Self {
        Self {
            video_id: video_id.into(),
            transcript,
            fetched_at: chrono::Utc::now().timestamp(),
        }
    }
}

/// Manages the persisted history file
#[derive(Debug, Clone)]
pub struct HistoryStore {
    /// History file path
    path: PathBuf,
    /// Maximum retained entries
    max_entries: usize,
}

impl HistoryStore {
    /// Create a store with the default entry cap
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            max_entries: MAX_HISTORY_ENTRIES,
        }
    }

    pub fn with_max_entries(path: PathBuf, max_entries: usize) -> Self {
        Self { path, max_entries }
    }

    /// Load the persisted history, empty on missing or malformed content
    pub async fn load(&self) -> Vec<HistoryEntry> {
        if !self.path.exists() {
            debug!("No history file at {}", self.path.display());
            return Vec::new();
        }

        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => match serde_json::from_str::<Vec<HistoryEntry>>(&content) {
                Ok(mut entries) => {
                    // A file written by a differently-configured run may hold
                    // more than the cap; the bound holds from load onward
                    entries.truncate(self.max_entries);
                    info!("📚 Loaded {} history entries from {}", entries.len(), self.path.display());
                    entries
                }
                Err(e) => {
                    warn!("Malformed history file {}: {}", self.path.display(), e);
                    Vec::new()
                }
            },
            Err(e) => {
                warn!("Failed to read history file {}: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    /// Prepend an entry, evicting the oldest past the cap
    pub fn append(&self, mut entries: Vec<HistoryEntry>, entry: HistoryEntry) -> Vec<HistoryEntry> {
        entries.insert(0, entry);
        entries.truncate(self.max_entries);
        entries
    }

    /// Write the full history list back to disk
    pub async fn persist(&self, entries: &[HistoryEntry]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let json_content = serde_json::to_string_pretty(entries)?;
        tokio::fs::write(&self.path, json_content).await?;
        debug!("💾 Persisted {} history entries to {}", entries.len(), self.path.display());

        Ok(())
    }
}
