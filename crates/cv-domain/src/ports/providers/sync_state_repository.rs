//! Sync bookkeeping persistence: the per-file `SyncState` the engine
//! diffs against, alongside the externally-reported `SyncStateRecord`
//! summary it derives each run. A single logical record per repo/workspace.

use async_trait::async_trait;

use crate::entities::SyncStateRecord;
use crate::error::Result;
use crate::value_objects::SyncState;

/// Durable storage for the Sync Engine's bookkeeping.
#[async_trait]
pub trait SyncStateRepository: Send + Sync {
 /// Loads the persisted per-file state, or an empty one if no sync has
 /// ever run.
 async fn load_state(&self) -> Result<SyncState>;

 /// Persists `state`, atomically replacing any prior record.
 async fn save_state(&self, state: &SyncState) -> Result<()>;

 /// Loads the persisted summary record, if a sync has ever completed.
 async fn load_record(&self) -> Result<Option<SyncStateRecord>>;

 /// Persists `record`, atomically replacing any prior record.
 async fn save_record(&self, record: &SyncStateRecord) -> Result<()>;
}
