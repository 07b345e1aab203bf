//! Edit Parser and File Operations contracts.

use async_trait::async_trait;

use crate::error::Result;
use crate::value_objects::{Edit, EditResult, MessageId};

/// Parses structured edit blocks out of an LLM response.
pub trait EditParserInterface: Send + Sync {
 /// Parses `response` into zero or more [`Edit`]s, each freshly
 /// identified and tagged with `source_message`.
 fn parse_response(&self, response: &str, source_message: MessageId) -> Vec<Edit>;

 /// Renders a unified-diff-style hunk for `edit`, against `current_content`
 /// when the edit type needs it (`modify`) to compute line offsets.
 fn render_diff(&self, edit: &Edit, current_content: Option<&str>) -> String;
}

/// Applies and reverts [`Edit`]s against the filesystem, with backups.
#[async_trait]
pub trait FileOperationsInterface: Send + Sync {
 /// Applies a single edit. Never partially writes: a failure leaves the
 /// target file exactly as it was before the call.
 async fn apply_edit(&self, edit: &Edit) -> Result<EditResult>;

 /// Restores the file a previously-applied edit touched from its backup,
 /// to the original path (or to the source path, for a `rename`).
 async fn revert_edit(&self, edit: &Edit, result: &EditResult) -> Result<()>;

 /// Deletes backup files older than `retention_days`. Never invoked
 /// automatically during an edit; a caller-driven maintenance operation.
 async fn cleanup_backups(&self, retention_days: u64) -> Result<usize>;
}
