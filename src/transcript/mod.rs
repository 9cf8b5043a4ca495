/// Transcript data model
///
/// A transcript is the ordered sequence of timed caption lines returned by
/// YouTube for one video. Order is playback order and is preserved through
/// display, search, export, and speech.

use serde::{Deserialize, Serialize};

pub mod search;

pub use search::filter_entries;

/// One timed caption line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Spoken text for this line
    pub text: String,
    /// Start offset in seconds from the beginning of the video
    pub start: f64,
    /// Duration of the line in seconds
    pub duration: f64,
}

impl TranscriptEntry {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }
}

/// Ordered caption lines for one video
///
/// Serializes transparently as a JSON array, which is also the wire format of
/// the `/transcript` endpoint. The empty transcript is a valid state meaning
/// "fetched but no captions".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn from_entries(entries: Vec<TranscriptEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Concatenate all entry texts with single spaces, order preserved
    pub fn join_text(&self) -> String {
        self.entries
            .iter()
            .map(|entry| entry.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Entries whose text contains `term` case-insensitively, original order
    ///
    /// Does not mutate the transcript; an empty term matches every entry.
    pub fn search(&self, term: &str) -> Vec<&TranscriptEntry> {
        filter_entries(&self.entries, term)
    }
}

impl IntoIterator for Transcript {
    type Item = TranscriptEntry;
    type IntoIter = std::vec::IntoIter<TranscriptEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Transcript {
        Transcript::from_entries(vec![
            TranscriptEntry::new("Foo bar", 0.0, 1.5),
            TranscriptEntry::new("baz", 1.5, 2.0),
        ])
    }

    #[test]
    fn test_join_text_single_spaces() {
        let transcript = Transcript::from_entries(vec![
            TranscriptEntry::new("a", 0.0, 1.0),
            TranscriptEntry::new("b", 1.0, 1.0),
            TranscriptEntry::new("c", 2.0, 1.0),
        ]);
        assert_eq!(transcript.join_text(), "a b c");
    }

    #[test]
    fn test_join_text_empty() {
        assert_eq!(Transcript::new().join_text(), "");
    }

    #[test]
    fn test_search_case_insensitive() {
        let transcript = sample();
        let hits = transcript.search("foo");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text, "Foo bar");
    }

    #[test]
    fn test_search_empty_term_matches_all() {
        let transcript = sample();
        assert_eq!(transcript.search("").len(), 2);
    }

    #[test]
    fn test_search_preserves_order() {
        let transcript = Transcript::from_entries(vec![
            TranscriptEntry::new("alpha one", 0.0, 1.0),
            TranscriptEntry::new("beta", 1.0, 1.0),
            TranscriptEntry::new("alpha two", 2.0, 1.0),
        ]);
        let hits = transcript.search("alpha");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].text, "alpha one");
        assert_eq!(hits[1].text, "alpha two");
    }

    #[test]
    fn test_wire_format_is_raw_array() {
        let transcript = Transcript::from_entries(vec![TranscriptEntry::new("Hi", 0.0, 1.0)]);
        let json = serde_json::to_string(&transcript).unwrap();
        assert_eq!(json, r#"[{"text":"Hi","start":0.0,"duration":1.0}]"#);

        let parsed: Transcript = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, transcript);
    }
}
