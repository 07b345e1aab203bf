//! Proposed and applied file edits.

use serde::{Deserialize, Serialize};

use super::ids::EditId;

/// A single search/replace instruction within a `modify` edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchReplaceBlock {
    /// Text that must appear verbatim (module whitespace) in the target file.
    pub search: String,
    /// Text to substitute in its place.
    pub replace: String,
}

/// The kind of change an [`Edit`] describes, and the data specific to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditType {
    /// Create a new file. Fails if the file already exists, unless `Apply`
    /// degrades it to `Modify` per the create/modify invariant.
    Create {
        /// Full content of the new file.
        content: String,
    },
    /// Apply one or more search/replace blocks to an existing file.
    Modify {
        /// Blocks applied in order; each must match exactly once.
        blocks: Vec<SearchReplaceBlock>,
    },
    /// Delete an existing file.
    Delete,
    /// Rename (and optionally rewrite) an existing file.
    Rename {
        /// Destination path, relative to the codebase root.
        to: String,
        /// Full replacement content, if the rename also rewrites the file.
        content: Option<String>,
    },
}

/// Lifecycle state of a proposed edit within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditStatus {
    /// Parsed from the assistant's response, not yet applied.
    Pending,
    /// Approved by the caller, awaiting application.
    Approved,
    /// Applied to disk successfully.
    Applied,
    /// Application was attempted and failed; the file tree is unchanged.
    Failed,
    /// Explicitly discarded by the caller without being applied.
    Rejected,
}

/// A single proposed change to a file, as parsed from an assistant response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edit {
    /// Identifier, stable for the lifetime of the owning session.
    pub id: EditId,
    /// Path the edit targets, relative to the codebase root.
    pub file: String,
    /// What kind of change this is, and its type-specific payload.
    pub edit_type: EditType,
    /// Current lifecycle state.
    pub status: EditStatus,
}

impl Edit {
    /// Builds a new, `Pending` edit for `file`.
    pub fn new(file: impl Into<String>, edit_type: EditType) -> Self {
        Self {
            id: EditId::new(),
            file: file.into(),
            edit_type,
            status: EditStatus::Pending,
        }
    }
}

/// Outcome of attempting to apply a single [`Edit`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditResult {
    /// Id of the edit this result reports on.
    pub edit_id: EditId,
    /// Status after the apply attempt.
    pub status: EditStatus,
    /// Path of the timestamped, content-hashed backup, if one was written.
    pub backup_path: Option<String>,
    /// Human-readable failure detail, set only when `status == Failed`.
    pub error: Option<String>,
}
