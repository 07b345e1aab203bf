//! Sync Engine contract.

use async_trait::async_trait;

use crate::entities::SyncStateRecord;
use crate::error::Result;

/// One per-file parse failure recorded during a sync run.
#[derive(Debug, Clone)]
pub struct SyncFileError {
 /// Path that failed to parse, relative to the codebase root.
 pub path: String,
 /// One-line human-readable reason.
 pub reason: String,
}

/// Outcome of a single sync run.
#[derive(Debug, Clone)]
pub struct SyncReport {
 /// Updated summary record, persisted by the implementation.
 pub state: SyncStateRecord,
 /// Per-file failures; never aborts the run.
 pub errors: Vec<SyncFileError>,
}

/// Orchestrates full and incremental repository synchronization.
#[async_trait]
pub trait IndexingServiceInterface: Send + Sync {
 /// Walks the whole repository, parsing and (re-)indexing every file.
 ///
 /// If `clear_first` is set, the graph and vector writers are asked to
 /// clear all owned data before the walk begins.
 async fn full_sync(&self, clear_first: bool) -> Result<SyncReport>;

 /// Syncs only the files git reports changed since the last recorded
 /// commit, falling back to a full sync if no prior sync state exists.
 async fn incremental_sync(&self) -> Result<SyncReport>;

 /// Currently persisted summary record, if a sync has ever completed.
 async fn current_state(&self) -> Result<Option<SyncStateRecord>>;
}
