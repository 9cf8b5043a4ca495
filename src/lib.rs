/// YouTube Transcript Fetcher - Rust Implementation
///
/// Caption service and client session for fetching YouTube caption tracks,
/// with search filtering, TXT/PDF export, read-aloud, and a bounded history
/// of recent fetches.

pub mod api;
pub mod client;
pub mod config;
pub mod export;
pub mod fetcher;
pub mod history;
pub mod speech;
pub mod transcript;

// Re-export main types for easy access
pub use crate::api::ApiServer;
pub use crate::client::TranscriptSession;
pub use crate::config::Config;
pub use crate::fetcher::{CaptionSource, FetchError, FetchFailure, YoutubeCaptionSource};
pub use crate::history::{HistoryEntry, HistoryStore};
pub use crate::speech::{CommandSpeech, SpeechSynthesizer};
pub use crate::transcript::{Transcript, TranscriptEntry};
