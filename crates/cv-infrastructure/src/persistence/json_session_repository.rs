//! `SessionRepository` over `.cv/sessions/<sessionId>.json`: write to
//! a sibling temp file, then rename over the target so a reader never
//! observes a half-written session.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use cv_domain::entities::CodeSession;
use cv_domain::error::{Error, Result};
use cv_domain::ports::SessionRepository;
use cv_domain::value_objects::SessionId;

/// Persists `CodeSession`s as one JSON file per session under `sessions_dir`.
pub struct JsonSessionRepository {
 sessions_dir: PathBuf,
}

impl JsonSessionRepository {
 /// Builds a repository rooted at `sessions_dir` (typically
 /// `CvLayout::sessions_dir()`). Does not create the directory; call
 /// [`CvLayout::ensure_dirs`](crate::config::CvLayout::ensure_dirs) first.
 pub fn new(sessions_dir: impl Into<PathBuf>) -> Self {
 Self {
 sessions_dir: sessions_dir.into(),
 }
 }

 fn path_for(&self, id: SessionId) -> PathBuf {
 self.sessions_dir.join(format!("{id}.json"))
 }

 fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
 let tmp = path.with_extension("json.tmp");
 std::fs::write(&tmp, bytes).map_err(|e| Error::io(tmp.display().to_string(), e))?;
 std::fs::rename(&tmp, path).map_err(|e| Error::io(path.display().to_string(), e))
 }
}

#[async_trait]
impl SessionRepository for JsonSessionRepository {
 async fn save(&self, session: &CodeSession) -> Result<()> {
 let path = self.path_for(session.id);
 let bytes = serde_json::to_vec_pretty(session)?;
 Self::write_atomic(&path, &bytes)
 }

 async fn load(&self, id: SessionId) -> Result<CodeSession> {
 let path = self.path_for(id);
 let bytes = std::fs::read(&path).map_err(|e| Error::io(path.display().to_string(), e))?;
 Ok(serde_json::from_slice(&bytes)?)
 }

 async fn list(&self) -> Result<Vec<CodeSession>> {
 let mut sessions = Vec::new();
 let entries = match std::fs::read_dir(&self.sessions_dir) {
 Ok(entries) => entries,
 Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(sessions),
 Err(e) => return Err(Error::io(self.sessions_dir.display().to_string(), e)),
 };
 for entry in entries {
 let entry = entry.map_err(|e| Error::io(self.sessions_dir.display().to_string(), e))?;
 let path = entry.path();
 if path.extension().is_some_and(|ext| ext == "json") {
 let bytes = std::fs::read(&path).map_err(|e| Error::io(path.display().to_string(), e))?;
 sessions.push(serde_json::from_slice(&bytes)?);
 }
 }
 sessions.sort_by(|a: &CodeSession, b: &CodeSession| b.updated_at.cmp(&a.updated_at));
 Ok(sessions)
 }

 async fn delete(&self, id: SessionId) -> Result<()> {
 let path = self.path_for(id);
 match std::fs::remove_file(&path) {
 Ok(()) => Ok(()),
 Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
 Err(e) => Err(Error::io(path.display().to_string(), e)),
 }
 }
}

#[cfg(test)]
mod tests {
 use super::*;
 use chrono::Utc;

 #[tokio::test]
 async fn save_then_load_round_trips() {
 let dir = tempfile::tempdir().unwrap();
 let repo = JsonSessionRepository::new(dir.path());
 let session = CodeSession::new(Some("main".to_string()), None, 1000, Utc::now());
 let id = session.id;

 repo.save(&session).await.unwrap();
 let loaded = repo.load(id).await.unwrap();
 assert_eq!(loaded.id, id);
 assert_eq!(loaded.branch.as_deref(), Some("main"));
 }

 #[tokio::test]
 async fn load_missing_session_errors() {
 let dir = tempfile::tempdir().unwrap();
 let repo = JsonSessionRepository::new(dir.path());
 let result = repo.load(SessionId::new()).await;
 assert!(result.is_err());
 }

 #[tokio::test]
 async fn list_sorts_by_updated_at_descending() {
 let dir = tempfile::tempdir().unwrap();
 let repo = JsonSessionRepository::new(dir.path());
 let mut first = CodeSession::new(None, None, 1000, Utc::now());
 first.updated_at = Utc::now() - chrono::Duration::seconds(60);
 let second = CodeSession::new(None, None, 1000, Utc::now());

 repo.save(&first).await.unwrap();
 repo.save(&second).await.unwrap();

 let listed = repo.list().await.unwrap();
 assert_eq!(listed.len(), 2);
 assert_eq!(listed[0].id, second.id);
 }

 #[tokio::test]
 async fn delete_is_idempotent() {
 let dir = tempfile::tempdir().unwrap();
 let repo = JsonSessionRepository::new(dir.path());
 let id = SessionId::new();
 repo.delete(id).await.unwrap();
 repo.delete(id).await.unwrap();
 }
}
