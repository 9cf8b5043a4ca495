/// Case-insensitive substring filtering over caption lines
///
/// Recomputed on demand by the client; never mutates the stored transcript,
/// so repeated calls with the same inputs give the same result.

use super::TranscriptEntry;

/// Return the entries whose text contains `term`, ignoring case
pub fn filter_entries<'a>(entries: &'a [TranscriptEntry], term: &str) -> Vec<&'a TranscriptEntry> {
    if term.is_empty() {
        return entries.iter().collect();
    }

    let needle = term.to_lowercase();
    entries
        .iter()
        .filter(|entry| entry.text.to_lowercase().contains(&needle))
        .collect()
}
