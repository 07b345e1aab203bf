//! Persisted bookkeeping the Sync Engine uses to decide what has changed.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-file record of the last indexed content hash and chunk ids it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSyncRecord {
    /// Content hash of the file as of the last successful index.
    pub content_hash: String,
    /// Ids of the chunks currently stored for this file.
    pub chunk_ids: Vec<String>,
    /// When this file was last indexed.
    pub indexed_at: DateTime<Utc>,
}

/// The full set of bookkeeping the Sync Engine persists between runs.
///
/// Keyed by file path so an unchanged file's `content_hash` short-circuits
/// re-parsing, re-chunking and re-embedding it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncState {
    /// Per-file sync bookkeeping, keyed by path relative to the codebase root.
    pub files: HashMap<String, FileSyncRecord>,
    /// When the most recent sync run completed.
    pub last_synced_at: Option<DateTime<Utc>>,
}

impl SyncState {
    /// An empty state, as used before the first sync run.
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` if `path` is recorded with exactly `content_hash`.
    pub fn is_unchanged(&self, path: &str, content_hash: &str) -> bool {
        self.files
            .get(path)
            .is_some_and(|record| record.content_hash == content_hash)
    }

    /// Chunk ids previously recorded for `path`, used to compute deletions
    /// when a file is removed or its chunk set shrinks on re-index.
    pub fn chunk_ids_for(&self, path: &str) -> &[String] {
        self.files
            .get(path)
            .map(|record| record.chunk_ids.as_slice())
            .unwrap_or(&[])
    }

    /// Records `path` as freshly indexed, replacing any prior record.
    pub fn record(
        &mut self,
        path: impl Into<String>,
        content_hash: impl Into<String>,
        chunk_ids: Vec<String>,
        indexed_at: DateTime<Utc>,
    ) {
        self.files.insert(
            path.into(),
            FileSyncRecord {
                content_hash: content_hash.into(),
                chunk_ids,
                indexed_at,
            },
        );
    }

    /// Removes `path`'s record, returning its previously-recorded chunk ids
    /// so the caller can delete them from the vector and graph stores.
    pub fn remove(&mut self, path: &str) -> Vec<String> {
        self.files
            .remove(path)
            .map(|record| record.chunk_ids)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecorded_file_is_not_unchanged() {
        let state = SyncState::new();
        assert!(!state.is_unchanged("src/lib.rs", "abc"));
    }

    #[test]
    fn matching_hash_short_circuits() {
        let mut state = SyncState::new();
        state.record("src/lib.rs", "abc", vec!["c1".into()], Utc::now());
        assert!(state.is_unchanged("src/lib.rs", "abc"));
        assert!(!state.is_unchanged("src/lib.rs", "def"));
    }

    #[test]
    fn remove_returns_prior_chunk_ids() {
        let mut state = SyncState::new();
        state.record("src/lib.rs", "abc", vec!["c1".into(), "c2".into()], Utc::now());
        let removed = state.remove("src/lib.rs");
        assert_eq!(removed, vec!["c1".to_string(), "c2".to_string()]);
        assert!(state.chunk_ids_for("src/lib.rs").is_empty());
    }
}
