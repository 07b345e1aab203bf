//! The `CodeSession` aggregate: one durable conversation and its state.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{ContextSnapshot, Edit, MessageId, SessionId};

/// Who authored a [`CodeMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

/// A single turn's message content, tagged by role.
///
/// Replaces a heterogeneous "message with optional fields" shape: only an
/// assistant message can carry `extracted_edits`, only a user/assistant
/// message is ever attached to a `context_snapshot`, and the variant makes
/// both facts checkable at compile time instead of by convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeMessage {
    /// Identifier, stable for the lifetime of the owning session.
    pub id: MessageId,
    /// Who authored this message.
    pub role: MessageRole,
    /// Raw message text.
    pub content: String,
    /// When this message was recorded.
    pub timestamp: DateTime<Utc>,
    /// Context snapshot built for this turn, if this is a user message that
    /// triggered a context build.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_snapshot: Option<ContextSnapshot>,
    /// Edit ids parsed out of this message, if this is an assistant message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_edits: Option<Vec<crate::value_objects::EditId>>,
}

impl CodeMessage {
    /// Builds a plain message with no snapshot or extracted edits attached.
    pub fn new(role: MessageRole, content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: MessageId::new(),
            role,
            content: content.into(),
            timestamp,
            context_snapshot: None,
            extracted_edits: None,
        }
    }
}

/// The user's and system's current working set of files and symbols.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveContext {
    /// User-pinned files. A set: no duplicates, insertion order preserved.
    pub explicit_files: Vec<String>,
    /// Files surfaced by vector/graph search during prior turns.
    pub discovered_files: Vec<String>,
    /// Qualified names of symbols currently considered "active".
    pub active_symbols: Vec<String>,
    /// Estimated token cost of the current context.
    pub token_count: usize,
    /// Token budget this context must not exceed.
    pub token_limit: usize,
}

impl ActiveContext {
    /// Builds an empty context with the given budget.
    pub fn new(token_limit: usize) -> Self {
        Self {
            token_limit,
            ..Default::default()
        }
    }

    /// Pins `path`, preserving set semantics (no duplicate, order preserved).
    pub fn pin_file(&mut self, path: impl Into<String>) {
        let path = path.into();
        if !self.explicit_files.contains(&path) {
            self.explicit_files.push(path);
        }
    }

    /// Unpins `path` if present.
    pub fn unpin_file(&mut self, path: &str) {
        self.explicit_files.retain(|p| p != path);
    }
}

/// Durable record of one user's conversation, its context, and its edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeSession {
    /// Identifier, stable for the lifetime of the session.
    pub id: SessionId,
    /// When this session was first created.
    pub created_at: DateTime<Utc>,
    /// When this session was last saved.
    pub updated_at: DateTime<Utc>,
    /// Git branch checked out when the session was created.
    pub branch: Option<String>,
    /// Commit the working tree was at when the session was created.
    pub commit_at_start: Option<String>,
    /// Messages in chronological order.
    pub messages: Vec<CodeMessage>,
    /// Current working set of files and symbols.
    pub active_context: ActiveContext,
    /// Edits proposed but not yet applied.
    pub pending_edits: Vec<Edit>,
    /// Edits successfully applied, most recent last.
    pub applied_edits: Vec<Edit>,
    /// Free-form bookkeeping, e.g. `filesModified`, `totalEdits`.
    pub metadata: HashMap<String, serde_json::Value>,
}

impl CodeSession {
    /// Creates a fresh session with an empty context of the given budget.
    pub fn new(
        branch: Option<String>,
        commit_at_start: Option<String>,
        token_limit: usize,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: SessionId::new(),
            created_at: now,
            updated_at: now,
            branch,
            commit_at_start,
            messages: Vec::new(),
            active_context: ActiveContext::new(token_limit),
            pending_edits: Vec::new(),
            applied_edits: Vec::new(),
            metadata: HashMap::new(),
        }
    }

    /// `true` iff no edit id appears in both `pending_edits` and `applied_edits`.
    pub fn edits_are_disjoint(&self) -> bool {
        self.pending_edits
            .iter()
            .all(|p| !self.applied_edits.iter().any(|a| a.id == p.id))
    }
}
