//! Session Store contract.

use async_trait::async_trait;

use crate::entities::{CodeMessage, CodeSession};
use crate::error::Result;
use crate::value_objects::{Edit, EditId, EditResult, SessionId};

/// Durable per-session persistence and the mutations driven by a turn.
#[async_trait]
pub trait SessionServiceInterface: Send + Sync {
 /// Creates and persists a fresh session.
 async fn create_session(
 &self,
 branch: Option<String>,
 commit_at_start: Option<String>,
 token_limit: usize,
 ) -> Result<CodeSession>;

 /// Loads a previously persisted session.
 async fn resume_session(&self, id: SessionId) -> Result<CodeSession>;

 /// Lists sessions sorted by `updated_at` descending. Skips any session
 /// file that fails to parse rather than failing the whole listing.
 async fn list_sessions(&self) -> Result<Vec<CodeSession>>;

 /// Deletes a persisted session.
 async fn delete_session(&self, id: SessionId) -> Result<()>;

 /// Appends a message, persisting the session.
 async fn add_message(&self, session: &mut CodeSession, message: CodeMessage) -> Result<()>;

 /// Appends edits to `pending_edits`, persisting the session.
 async fn add_pending_edits(&self, session: &mut CodeSession, edits: Vec<Edit>) -> Result<()>;

 /// Moves an edit from `pending_edits` to `applied_edits`, records the
 /// touched file in `metadata.filesModified`, increments `totalEdits`.
 async fn mark_edit_applied(
 &self,
 session: &mut CodeSession,
 edit_id: EditId,
 result: &EditResult,
 ) -> Result<()>;

 /// Pops and returns the most recently applied edit, for undo.
 async fn pop_applied_edit(&self, session: &mut CodeSession) -> Result<Option<Edit>>;

 /// Clears all messages, persisting the session.
 async fn clear_messages(&self, session: &mut CodeSession) -> Result<()>;

 /// Clears all pending edits, persisting the session.
 async fn clear_pending_edits(&self, session: &mut CodeSession) -> Result<()>;

 /// Updates `active_context.token_count`, persisting the session.
 async fn update_token_count(&self, session: &mut CodeSession, token_count: usize) -> Result<()>;
}
