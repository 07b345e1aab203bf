//! Git contract: working-tree state and commit history.

use async_trait::async_trait;

use crate::error::Result;

/// A `from -> to` rename detected between two commits.
#[derive(Debug, Clone)]
pub struct Rename {
 pub from: String,
 pub to: String,
}

/// The set of paths that changed between two points in history.
#[derive(Debug, Clone, Default)]
pub struct ChangedFiles {
 pub added: Vec<String>,
 pub modified: Vec<String>,
 pub deleted: Vec<String>,
 pub renames: Vec<Rename>,
}

/// Read-only git facility consumed by the Sync Engine.
#[async_trait]
pub trait GitProvider: Send + Sync {
 /// `true` if the working tree is a git repository.
 async fn is_repo(&self) -> Result<bool>;

 /// Name of the currently checked-out branch, if HEAD is not detached.
 async fn current_branch(&self) -> Result<Option<String>>;

 /// Full hash of the commit HEAD points at.
 async fn head_commit(&self) -> Result<String>;

 /// The `n` most recent commit hashes, most recent first.
 async fn recent_commits(&self, n: usize) -> Result<Vec<String>>;

 /// Files added, modified, deleted or renamed since `commit`.
 async fn changed_files_since(&self, commit: &str) -> Result<ChangedFiles>;
}
