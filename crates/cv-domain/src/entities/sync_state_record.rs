//! The single-record-per-repo sync summary surfaced to callers.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Summary counters produced after a sync run, one record per repo/workspace.
///
/// Distinct from [`crate::value_objects::SyncState`], which is the Sync
/// Engine's internal per-file bookkeeping; this is the externally-reported
/// rollup named in the data model (`lastCommitSynced`, counts, histogram).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SyncStateRecord {
    /// Commit the graph/vector indexes are synced up to, if known.
    pub last_commit_synced: Option<String>,
    /// When this sync run completed.
    pub last_sync_at: Option<DateTime<Utc>>,
    /// Number of files currently indexed.
    pub file_count: usize,
    /// Number of symbols currently indexed.
    pub symbol_count: usize,
    /// Number of graph edges currently indexed.
    pub edge_count: usize,
    /// Number of vectors currently indexed.
    pub vector_count: usize,
    /// File count per detected language.
    pub language_histogram: HashMap<String, usize>,
}
