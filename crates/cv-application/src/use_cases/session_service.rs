//! Session Store: the business rules a turn drives, layered over a
//! [`SessionRepository`] that only knows how to load/save/list/delete.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use cv_domain::entities::{CodeMessage, CodeSession};
use cv_domain::error::{Error, Result};
use cv_domain::ports::services::SessionServiceInterface;
use cv_domain::ports::SessionRepository;
use cv_domain::value_objects::{Edit, EditId, EditResult, EditStatus, SessionId};

/// Drives session mutations and delegates storage to a [`SessionRepository`].
pub struct SessionServiceImpl {
 repository: Arc<dyn SessionRepository>,
}

impl SessionServiceImpl {
 /// Builds a service over `repository`.
 pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
 Self { repository }
 }

 async fn persist(&self, session: &mut CodeSession) -> Result<()> {
 session.updated_at = Utc::now();
 self.repository.save(session).await
 }
}

#[async_trait]
impl SessionServiceInterface for SessionServiceImpl {
 async fn create_session(
 &self,
 branch: Option<String>,
 commit_at_start: Option<String>,
 token_limit: usize,
 ) -> Result<CodeSession> {
 let session = CodeSession::new(branch, commit_at_start, token_limit, Utc::now());
 self.repository.save(&session).await?;
 Ok(session)
 }

 async fn resume_session(&self, id: SessionId) -> Result<CodeSession> {
 self.repository.load(id).await
 }

 async fn list_sessions(&self) -> Result<Vec<CodeSession>> {
 self.repository.list().await
 }

 async fn delete_session(&self, id: SessionId) -> Result<()> {
 self.repository.delete(id).await
 }

 async fn add_message(&self, session: &mut CodeSession, message: CodeMessage) -> Result<()> {
 session.messages.push(message);
 self.persist(session).await
 }

 async fn add_pending_edits(&self, session: &mut CodeSession, edits: Vec<Edit>) -> Result<()> {
 session.pending_edits.extend(edits);
 self.persist(session).await
 }

 async fn mark_edit_applied(
 &self,
 session: &mut CodeSession,
 edit_id: EditId,
 result: &EditResult,
 ) -> Result<()> {
 let position = session
.pending_edits
.iter()
.position(|e| e.id == edit_id)
.ok_or_else(|| Error::not_found(format!("pending edit {edit_id}")))?;
 let mut edit = session.pending_edits.remove(position);
 edit.status = result.status;
 let file = edit.file.clone();
 session.applied_edits.push(edit);

 // `Edit` carries no backup path of its own (data model keeps
 // that on `EditResult`); stash it here so undo can find it later
 // without the session schema needing a parallel EditResult list.
 if let Some(backup_path) = &result.backup_path {
 let backups = session
.metadata
.entry("editBackups".to_string())
.or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
 if let serde_json::Value::Object(map) = backups {
 map.insert(edit_id.to_string(), serde_json::Value::String(backup_path.clone()));
 }
 }

 let files_modified = session
.metadata
.entry("filesModified".to_string())
.or_insert_with(|| serde_json::Value::Array(Vec::new()));
 if let serde_json::Value::Array(files) = files_modified {
 let already_present = files.iter().any(|f| f.as_str() == Some(file.as_str()));
 if !already_present {
 files.push(serde_json::Value::String(file));
 }
 }

 let total_edits = session
.metadata
.entry("totalEdits".to_string())
.or_insert_with(|| serde_json::Value::Number(0.into()));
 let next = total_edits.as_u64().unwrap_or(0) + 1;
 *total_edits = serde_json::Value::Number(next.into());

 self.persist(session).await
 }

 async fn pop_applied_edit(&self, session: &mut CodeSession) -> Result<Option<Edit>> {
 let edit = session.applied_edits.pop();
 if edit.is_some() {
 self.persist(session).await?;
 }
 Ok(edit)
 }

 async fn clear_messages(&self, session: &mut CodeSession) -> Result<()> {
 session.messages.clear();
 self.persist(session).await
 }

 async fn clear_pending_edits(&self, session: &mut CodeSession) -> Result<()> {
 session.pending_edits.clear();
 self.persist(session).await
 }

 async fn update_token_count(&self, session: &mut CodeSession, token_count: usize) -> Result<()> {
 session.active_context.token_count = token_count;
 self.persist(session).await
 }
}

#[cfg(test)]
mod tests {
 use super::*;
 use cv_domain::value_objects::EditType;
 use std::sync::Mutex;

 #[derive(Default)]
 struct InMemoryRepository {
 sessions: Mutex<std::collections::HashMap<SessionId, CodeSession>>,
 }

 #[async_trait]
 impl SessionRepository for InMemoryRepository {
 async fn save(&self, session: &CodeSession) -> Result<()> {
 self.sessions.lock().unwrap().insert(session.id, session.clone());
 Ok(())
 }

 async fn load(&self, id: SessionId) -> Result<CodeSession> {
 self.sessions
.lock()
.unwrap()
.get(&id)
.cloned()
.ok_or_else(|| Error::not_found(format!("session {id}")))
 }

 async fn list(&self) -> Result<Vec<CodeSession>> {
 let mut sessions: Vec<_> = self.sessions.lock().unwrap().values().cloned().collect();
 sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
 Ok(sessions)
 }

 async fn delete(&self, id: SessionId) -> Result<()> {
 self.sessions.lock().unwrap().remove(&id);
 Ok(())
 }
 }

 fn service() -> SessionServiceImpl {
 SessionServiceImpl::new(Arc::new(InMemoryRepository::default()))
 }

 #[tokio::test]
 async fn mark_edit_applied_moves_pending_to_applied_and_tracks_metadata() {
 let svc = service();
 let mut session = svc.create_session(None, None, 1000).await.unwrap();
 let edit = Edit::new("src/a.rs", EditType::Delete);
 let edit_id = edit.id;
 svc.add_pending_edits(&mut session, vec![edit]).await.unwrap();

 let result = EditResult {
 edit_id,
 status: EditStatus::Applied,
 backup_path: Some("backup".to_string()),
 error: None,
 };
 svc.mark_edit_applied(&mut session, edit_id, &result).await.unwrap();

 assert!(session.pending_edits.is_empty());
 assert_eq!(session.applied_edits.len(), 1);
 assert_eq!(session.applied_edits[0].status, EditStatus::Applied);
 assert_eq!(
 session.metadata.get("totalEdits").and_then(|v| v.as_u64()),
 Some(1)
 );
 let files: Vec<_> = session.metadata["filesModified"]
.as_array()
.unwrap()
.iter()
.map(|v| v.as_str().unwrap())
.collect();
 assert_eq!(files, vec!["src/a.rs"]);
 }

 #[tokio::test]
 async fn pop_applied_edit_returns_most_recent() {
 let svc = service();
 let mut session = svc.create_session(None, None, 1000).await.unwrap();
 let first = Edit::new("a.rs", EditType::Delete);
 let second = Edit::new("b.rs", EditType::Delete);
 session.applied_edits.push(first);
 session.applied_edits.push(second.clone());

 let popped = svc.pop_applied_edit(&mut session).await.unwrap();
 assert_eq!(popped.unwrap().id, second.id);
 assert_eq!(session.applied_edits.len(), 1);
 }

 #[tokio::test]
 async fn list_sessions_sorted_by_updated_at_desc() {
 let svc = service();
 let first = svc.create_session(None, None, 1000).await.unwrap();
 let mut second = svc.create_session(None, None, 1000).await.unwrap();
 svc.add_message(
 &mut second,
 CodeMessage::new(cv_domain::entities::MessageRole::User, "hi", Utc::now()),
 )
.await
.unwrap();

 let listed = svc.list_sessions().await.unwrap();
 assert_eq!(listed[0].id, second.id);
 assert_eq!(listed[1].id, first.id);
 }
}
