//! Assistant Orchestrator: drives one turn end to end — context
//! build, LLM stream, edit extraction, session update — and the
//! approve/apply/undo flows a caller drives afterward.

use std::sync::Arc;

use chrono::Utc;
use futures::StreamExt;
use tokio_util::sync::CancellationToken;

use cv_domain::constants::sync::HISTORY_MESSAGE_COUNT;
use cv_domain::entities::{CodeMessage, CodeSession, MessageRole};
use cv_domain::error::{Error, Result};
use cv_domain::ports::services::{ContextServiceInterface, EditParserInterface, FileOperationsInterface, SessionServiceInterface};
use cv_domain::ports::{ChatMessage, ChatProvider, ChatRole, StreamToken};
use cv_domain::value_objects::{ContextOptions, ContextSnapshot, Edit, EditId, EditResult, EditStatus};

const SYSTEM_PROMPT: &str = "You are a coding assistant. When proposing file changes, emit one \
fenced code block per file. Label the fence with the file's path. For an existing file, use one \
or more `<<<<<<< SEARCH` / `=======` / `>>>>>>> REPLACE` blocks containing exact, verbatim text to \
match. For a new file, put the full file content in the fence body. For a delete, put a single \
`<<<<<<< DELETE` / `>>>>>>> DELETE` pair in the body. For a rename, label the fence `old -> new`.";

/// Outcome of running one turn.
pub struct TurnOutcome {
 /// The assistant's full, assembled response text.
 pub response: String,
 /// Edits parsed out of the response, already appended to the session's
 /// pending edits.
 pub edits: Vec<Edit>,
 /// Context snapshot built for this turn.
 pub context_snapshot: ContextSnapshot,
}

/// Drives a turn and the approve/apply/undo flows that follow it.
///
/// Depends on the chat provider directly (not behind a nullable-capability
/// guard): the orchestrator has no meaningful degraded mode without a model
/// to talk to, unlike the Context Engine's graph/vector collaborators.
pub struct AssistantOrchestrator {
 context_service: Arc<dyn ContextServiceInterface>,
 chat_provider: Arc<tokio::sync::Mutex<Box<dyn ChatProvider>>>,
 edit_parser: Arc<dyn EditParserInterface>,
 file_operations: Arc<dyn FileOperationsInterface>,
 session_service: Arc<dyn SessionServiceInterface>,
}

impl AssistantOrchestrator {
 /// Wires one turn's collaborators together.
 pub fn new(
 context_service: Arc<dyn ContextServiceInterface>,
 chat_provider: Arc<tokio::sync::Mutex<Box<dyn ChatProvider>>>,
 edit_parser: Arc<dyn EditParserInterface>,
 file_operations: Arc<dyn FileOperationsInterface>,
 session_service: Arc<dyn SessionServiceInterface>,
 ) -> Self {
 Self {
 context_service,
 chat_provider,
 edit_parser,
 file_operations,
 session_service,
 }
 }

 /// Runs one turn: builds context, streams a completion, extracts edits,
 /// and updates `session` in place. `on_token` is called once per
 /// streamed fragment, for a caller that wants to forward tokens live.
 pub async fn run_turn(
 &self,
 session: &mut CodeSession,
 user_message: String,
 token_limit: usize,
 cancellation: CancellationToken,
 mut on_token: impl FnMut(&str),
 ) -> Result<TurnOutcome> {
 let options = ContextOptions::new(user_message.clone(), token_limit);
 let context_snapshot = self
.context_service
.build_context(&session.active_context, &options)
.await?;

 let system_prompt = format!("{SYSTEM_PROMPT}\n\n{}", self.context_service.format_for_prompt(&context_snapshot));

 let mut messages = vec![ChatMessage::new(ChatRole::System, system_prompt)];
 for message in session.messages.iter().rev().take(HISTORY_MESSAGE_COUNT).rev() {
 let role = match message.role {
 MessageRole::User => ChatRole::User,
 MessageRole::Assistant => ChatRole::Assistant,
 MessageRole::System => ChatRole::System,
 };
 messages.push(ChatMessage::new(role, message.content.clone()));
 }
 messages.push(ChatMessage::new(ChatRole::User, user_message.clone()));

 let mut stream = {
 let chat = self.chat_provider.lock().await;
 chat.chat_stream(messages, cancellation.clone()).await?
 };

 let mut response = String::new();
 while let Some(item) = stream.next().await {
 if cancellation.is_cancelled() {
 return Err(Error::Cancelled);
 }
 match item? {
 StreamToken::Token(fragment) => {
 on_token(&fragment);
 response.push_str(&fragment);
 }
 StreamToken::Complete(full) => {
 response = full;
 break;
 }
 }
 }

 if cancellation.is_cancelled() {
 return Err(Error::Cancelled);
 }

 let now = Utc::now();
 let mut user_msg = CodeMessage::new(MessageRole::User, user_message, now);
 user_msg.context_snapshot = Some(context_snapshot.clone());
 self.session_service.add_message(session, user_msg).await?;

 let assistant_message_id = cv_domain::value_objects::MessageId::new();
 let edits = self.edit_parser.parse_response(&response, assistant_message_id);

 let mut assistant_msg = CodeMessage::new(MessageRole::Assistant, response.clone(), now);
 assistant_msg.id = assistant_message_id;
 assistant_msg.extracted_edits = Some(edits.iter().map(|e| e.id).collect());
 self.session_service.add_message(session, assistant_msg).await?;
 self.session_service
.add_pending_edits(session, edits.clone())
.await?;

 Ok(TurnOutcome {
 response,
 edits,
 context_snapshot,
 })
 }

 /// Flips a pending edit's status to `approved`.
 pub fn approve_edit(session: &mut CodeSession, edit_id: EditId) -> Result<()> {
 let edit = session
.pending_edits
.iter_mut()
.find(|e| e.id == edit_id)
.ok_or_else(|| Error::not_found(format!("pending edit {edit_id}")))?;
 edit.status = EditStatus::Approved;
 Ok(())
 }

 /// Approves every pending edit.
 pub fn approve_all_edits(session: &mut CodeSession) {
 for edit in &mut session.pending_edits {
 edit.status = EditStatus::Approved;
 }
 }

 /// Applies every approved pending edit (or every pending edit, if
 /// `auto_approve` is set). Each success moves the edit to
 /// `applied_edits`; each failure leaves it in `pending_edits` with
 /// `status = failed`.
 pub async fn apply_edits(&self, session: &mut CodeSession, auto_approve: bool) -> Result<Vec<EditResult>> {
 let targets: Vec<Edit> = session
.pending_edits
.iter()
.filter(|e| auto_approve || e.status == EditStatus::Approved)
.cloned()
.collect();

 let mut results = Vec::new();
 for edit in targets {
 let result = self.file_operations.apply_edit(&edit).await?;
 if result.status == EditStatus::Applied {
 self.session_service
.mark_edit_applied(session, edit.id, &result)
.await?;
 } else if let Some(pending) = session.pending_edits.iter_mut().find(|e| e.id == edit.id) {
 pending.status = EditStatus::Failed;
 }
 results.push(result);
 }
 Ok(results)
 }

 /// Pops the most recently applied edit and reverts it on disk, using
 /// the backup path `mark_edit_applied` stashed in session metadata.
 pub async fn undo_last_edit(&self, session: &mut CodeSession) -> Result<Option<Edit>> {
 let Some(last_edit_id) = session.applied_edits.last().map(|e| e.id) else {
 return Ok(None);
 };
 let backup_path = session
.metadata
.get("editBackups")
.and_then(|v| v.as_object())
.and_then(|map| map.get(&last_edit_id.to_string()))
.and_then(|v| v.as_str())
.map(str::to_string);

 let Some(edit) = self.session_service.pop_applied_edit(session).await? else {
 return Ok(None);
 };

 if let Some(map) = session.metadata.get_mut("editBackups").and_then(|v| v.as_object_mut()) {
 map.remove(&edit.id.to_string());
 }

 let result = EditResult {
 edit_id: edit.id,
 status: edit.status,
 backup_path,
 error: None,
 };
 self.file_operations.revert_edit(&edit, &result).await?;
 Ok(Some(edit))
 }
}

#[cfg(test)]
mod tests {
 use super::*;

 #[test]
 fn approve_edit_flips_status() {
 let mut session = CodeSession::new(None, None, 1000, Utc::now());
 let edit = Edit::new("src/a.rs", cv_domain::value_objects::EditType::Delete);
 let edit_id = edit.id;
 session.pending_edits.push(edit);

 AssistantOrchestrator::approve_edit(&mut session, edit_id).unwrap();
 assert_eq!(session.pending_edits[0].status, EditStatus::Approved);
 }

 #[test]
 fn approve_all_edits_flips_every_pending_edit() {
 let mut session = CodeSession::new(None, None, 1000, Utc::now());
 session.pending_edits.push(Edit::new("a.rs", cv_domain::value_objects::EditType::Delete));
 session.pending_edits.push(Edit::new("b.rs", cv_domain::value_objects::EditType::Delete));

 AssistantOrchestrator::approve_all_edits(&mut session);
 assert!(session.pending_edits.iter().all(|e| e.status == EditStatus::Approved));
 }

 #[test]
 fn approve_edit_errors_on_unknown_id() {
 let mut session = CodeSession::new(None, None, 1000, Utc::now());
 let result = AssistantOrchestrator::approve_edit(&mut session, EditId::new());
 assert!(result.is_err());
 }

 use async_trait::async_trait;
 use cv_domain::entities::ActiveContext;
 use cv_domain::ports::services::{EditParserInterface, FileOperationsInterface, SessionServiceInterface};
 use cv_domain::ports::SessionRepository;
 use cv_domain::value_objects::{EditType, SessionId};
 use futures::stream::{self, BoxStream};
 use std::collections::HashMap;
 use std::sync::Mutex as StdMutex;

 struct FakeContextService;

 #[async_trait]
 impl ContextServiceInterface for FakeContextService {
 async fn build_context(&self, _active_context: &ActiveContext, _options: &ContextOptions) -> Result<ContextSnapshot> {
 Ok(ContextSnapshot::empty())
 }

 fn format_for_prompt(&self, _snapshot: &ContextSnapshot) -> String {
 "no relevant code found".to_string()
 }
 }

 struct FakeChatProvider {
 response: String,
 }

 #[async_trait]
 impl ChatProvider for FakeChatProvider {
 async fn chat_stream(
 &self,
 _messages: Vec<ChatMessage>,
 _token: CancellationToken,
 ) -> Result<BoxStream<'static, Result<StreamToken>>> {
 let token = StreamToken::Complete(self.response.clone());
 Ok(Box::pin(stream::iter(vec![Ok(token)])))
 }

 fn model(&self) -> &str {
 "fake-model"
 }

 fn set_model(&mut self, _model: String) {}
 }

 struct FakeEditParser;

 impl EditParserInterface for FakeEditParser {
 fn parse_response(&self, response: &str, _source_message: cv_domain::value_objects::MessageId) -> Vec<Edit> {
 if response.contains("```") {
 vec![Edit::new("src/a.rs", EditType::Delete)]
 } else {
 Vec::new()
 }
 }

 fn render_diff(&self, _edit: &Edit, _current_content: Option<&str>) -> String {
 String::new()
 }
 }

 #[derive(Default)]
 struct FakeFileOperations {
 backup_path: Option<String>,
 }

 #[async_trait]
 impl FileOperationsInterface for FakeFileOperations {
 async fn apply_edit(&self, edit: &Edit) -> Result<EditResult> {
 Ok(EditResult {
 edit_id: edit.id,
 status: EditStatus::Applied,
 backup_path: self.backup_path.clone(),
 error: None,
 })
 }

 async fn revert_edit(&self, _edit: &Edit, _result: &EditResult) -> Result<()> {
 Ok(())
 }

 async fn cleanup_backups(&self, _retention_days: u64) -> Result<usize> {
 Ok(0)
 }
 }

 #[derive(Default)]
 struct InMemorySessionRepository {
 sessions: StdMutex<HashMap<SessionId, CodeSession>>,
 }

 #[async_trait]
 impl SessionRepository for InMemorySessionRepository {
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
 Ok(self.sessions.lock().unwrap().values().cloned().collect())
 }

 async fn delete(&self, id: SessionId) -> Result<()> {
 self.sessions.lock().unwrap().remove(&id);
 Ok(())
 }
 }

 fn orchestrator(response: &str, backup_path: Option<String>) -> AssistantOrchestrator {
 AssistantOrchestrator::new(
 Arc::new(FakeContextService),
 Arc::new(tokio::sync::Mutex::new(Box::new(FakeChatProvider {
 response: response.to_string(),
 }) as Box<dyn ChatProvider>)),
 Arc::new(FakeEditParser),
 Arc::new(FakeFileOperations { backup_path }),
 Arc::new(crate::use_cases::session_service::SessionServiceImpl::new(Arc::new(
 InMemorySessionRepository::default(),
 ))),
 )
 }

 #[tokio::test]
 async fn run_turn_parses_edits_and_records_messages() {
 let orchestrator = orchestrator("here is a fix\n```src/a.rs\nfn a() {}\n```", None);
 let mut session = CodeSession::new(None, None, 1000, Utc::now());

 let outcome = orchestrator
.run_turn(&mut session, "fix the bug".to_string(), 1000, CancellationToken::new(), |_| {})
.await
.unwrap();

 assert_eq!(outcome.edits.len(), 1);
 assert_eq!(session.messages.len(), 2);
 assert_eq!(session.pending_edits.len(), 1);
 }

 #[tokio::test]
 async fn run_turn_with_no_edits_leaves_pending_empty() {
 let orchestrator = orchestrator("just a plain answer, no code", None);
 let mut session = CodeSession::new(None, None, 1000, Utc::now());

 let outcome = orchestrator
.run_turn(&mut session, "explain something".to_string(), 1000, CancellationToken::new(), |_| {})
.await
.unwrap();

 assert!(outcome.edits.is_empty());
 assert!(session.pending_edits.is_empty());
 }

 #[tokio::test]
 async fn run_turn_returns_cancelled_when_token_already_cancelled() {
 let orchestrator = orchestrator("anything", None);
 let mut session = CodeSession::new(None, None, 1000, Utc::now());
 let token = CancellationToken::new();
 token.cancel();

 let result = orchestrator
.run_turn(&mut session, "hello".to_string(), 1000, token, |_| {})
.await;

 assert!(matches!(result, Err(Error::Cancelled)));
 assert!(session.messages.is_empty());
 }

 #[tokio::test]
 async fn apply_edits_moves_approved_edit_to_applied() {
 let orchestrator = orchestrator("unused", Some("backup/path".to_string()));
 let mut session = CodeSession::new(None, None, 1000, Utc::now());
 let edit = Edit::new("src/a.rs", EditType::Delete);
 let edit_id = edit.id;
 session.pending_edits.push(edit);
 AssistantOrchestrator::approve_edit(&mut session, edit_id).unwrap();

 let results = orchestrator.apply_edits(&mut session, false).await.unwrap();

 assert_eq!(results.len(), 1);
 assert!(session.pending_edits.is_empty());
 assert_eq!(session.applied_edits.len(), 1);
 assert_eq!(
 session.metadata["editBackups"][edit_id.to_string()].as_str(),
 Some("backup/path")
 );
 }

 #[tokio::test]
 async fn undo_last_edit_reverts_using_stashed_backup_path() {
 let orchestrator = orchestrator("unused", Some("backup/path".to_string()));
 let mut session = CodeSession::new(None, None, 1000, Utc::now());
 let edit = Edit::new("src/a.rs", EditType::Delete);
 let edit_id = edit.id;
 session.pending_edits.push(edit);
 AssistantOrchestrator::approve_all_edits(&mut session);
 orchestrator.apply_edits(&mut session, false).await.unwrap();

 let undone = orchestrator.undo_last_edit(&mut session).await.unwrap();

 assert_eq!(undone.unwrap().id, edit_id);
 assert!(session.applied_edits.is_empty());
 assert!(!session.metadata["editBackups"].as_object().unwrap().contains_key(&edit_id.to_string()));
 }

 #[tokio::test]
 async fn undo_last_edit_is_none_when_nothing_applied() {
 let orchestrator = orchestrator("unused", None);
 let mut session = CodeSession::new(None, None, 1000, Utc::now());
 let undone = orchestrator.undo_last_edit(&mut session).await.unwrap();
 assert!(undone.is_none());
 }
}
