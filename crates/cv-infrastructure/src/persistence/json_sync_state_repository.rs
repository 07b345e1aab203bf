//! `SyncStateRepository` over `.cv/sync-state.json` and
//! `.cv/sync-record.json`, using the same atomic write-temp+rename
//! convention as [`crate::persistence::JsonSessionRepository`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use cv_domain::entities::SyncStateRecord;
use cv_domain::error::{Error, Result};
use cv_domain::ports::SyncStateRepository;
use cv_domain::value_objects::SyncState;

/// Persists [`SyncState`] and [`SyncStateRecord`] as sibling JSON files.
pub struct JsonSyncStateRepository {
 state_path: PathBuf,
 record_path: PathBuf,
}

impl JsonSyncStateRepository {
 /// Builds a repository writing `state_path` and `record_path`
 /// (typically `CvLayout::sync_state_file()` / `sync_record_file()`).
 pub fn new(state_path: impl Into<PathBuf>, record_path: impl Into<PathBuf>) -> Self {
 Self {
 state_path: state_path.into(),
 record_path: record_path.into(),
 }
 }

 fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
 let tmp = path.with_extension("json.tmp");
 std::fs::write(&tmp, bytes).map_err(|e| Error::io(tmp.display().to_string(), e))?;
 std::fs::rename(&tmp, path).map_err(|e| Error::io(path.display().to_string(), e))
 }

 fn read_optional<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
 match std::fs::read(path) {
 Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
 Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
 Err(e) => Err(Error::io(path.display().to_string(), e)),
 }
 }
}

#[async_trait]
impl SyncStateRepository for JsonSyncStateRepository {
 async fn load_state(&self) -> Result<SyncState> {
 Ok(Self::read_optional(&self.state_path)?.unwrap_or_default())
 }

 async fn save_state(&self, state: &SyncState) -> Result<()> {
 let bytes = serde_json::to_vec_pretty(state)?;
 Self::write_atomic(&self.state_path, &bytes)
 }

 async fn load_record(&self) -> Result<Option<SyncStateRecord>> {
 Self::read_optional(&self.record_path)
 }

 async fn save_record(&self, record: &SyncStateRecord) -> Result<()> {
 let bytes = serde_json::to_vec_pretty(record)?;
 Self::write_atomic(&self.record_path, &bytes)
 }
}

#[cfg(test)]
mod tests {
 use super::*;
 use chrono::Utc;

 fn repo(dir: &std::path::Path) -> JsonSyncStateRepository {
 JsonSyncStateRepository::new(dir.join("sync-state.json"), dir.join("sync-record.json"))
 }

 #[tokio::test]
 async fn load_state_defaults_when_absent() {
 let dir = tempfile::tempdir().unwrap();
 let repo = repo(dir.path());
 let state = repo.load_state().await.unwrap();
 assert!(state.files.is_empty());
 }

 #[tokio::test]
 async fn load_record_is_none_when_absent() {
 let dir = tempfile::tempdir().unwrap();
 let repo = repo(dir.path());
 assert!(repo.load_record().await.unwrap().is_none());
 }

 #[tokio::test]
 async fn save_then_load_state_round_trips() {
 let dir = tempfile::tempdir().unwrap();
 let repo = repo(dir.path());
 let mut state = SyncState::new();
 state.record("src/lib.rs", "abc", vec!["c1".to_string()], Utc::now());

 repo.save_state(&state).await.unwrap();
 let loaded = repo.load_state().await.unwrap();
 assert!(loaded.is_unchanged("src/lib.rs", "abc"));
 }

 #[tokio::test]
 async fn save_then_load_record_round_trips() {
 let dir = tempfile::tempdir().unwrap();
 let repo = repo(dir.path());
 let record = SyncStateRecord {
 last_commit_synced: Some("abc123".to_string()),
 file_count: 5,
..Default::default()
 };

 repo.save_record(&record).await.unwrap();
 let loaded = repo.load_record().await.unwrap().unwrap();
 assert_eq!(loaded.file_count, 5);
 assert_eq!(loaded.last_commit_synced.as_deref(), Some("abc123"));
 }
}
