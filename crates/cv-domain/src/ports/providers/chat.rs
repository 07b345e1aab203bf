//! Chat/completion provider contract: streaming, cancellable turns.

use async_trait::async_trait;
use futures::stream::BoxStream;
use tokio_util::sync::CancellationToken;

use crate::error::Result;

/// Who authored a [`ChatMessage`] in a request sent to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
 System,
 User,
 Assistant,
}

/// A single message in a chat completion request.
#[derive(Debug, Clone)]
pub struct ChatMessage {
 pub role: ChatRole,
 pub content: String,
}

impl ChatMessage {
 pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
 Self {
 role,
 content: content.into(),
 }
 }
}

/// A single unit from a streaming chat response.
#[derive(Debug, Clone)]
pub enum StreamToken {
 /// A fragment of assistant text.
 Token(String),
 /// The stream completed; carries the full assembled text.
 Complete(String),
}

/// `chatStream(messages, system, callbacks) -> finalText`.
///
/// Modeled as a cancellable stream rather than a callback-based API: the
/// orchestrator is the stream's sole consumer, and dropping the stream (or
/// cancelling `token`) is how a turn is aborted mid-response.
#[async_trait]
pub trait ChatProvider: Send + Sync {
 /// Streams a completion for `messages`, honoring `token` for cancellation.
 async fn chat_stream(
 &self,
 messages: Vec<ChatMessage>,
 token: CancellationToken,
 ) -> Result<BoxStream<'static, Result<StreamToken>>>;

 /// Currently configured model identifier.
 fn model(&self) -> &str;

 /// Switches the model used by subsequent calls.
 fn set_model(&mut self, model: String);
}
