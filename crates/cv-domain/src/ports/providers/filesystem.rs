//! Filesystem contract, so application use-cases never `std::fs` directly.

use async_trait::async_trait;

use crate::error::Result;

/// A single entry discovered by a repository walk.
#[derive(Debug, Clone)]
pub struct WalkEntry {
 /// Repo-relative path, forward-slash separated.
 pub path: String,
 /// Whether the entry is a directory.
 pub is_dir: bool,
}

/// Filesystem facility, honoring `.gitignore` and configured exclude patterns.
#[async_trait]
pub trait FileSystemProvider: Send + Sync {
 /// Walks the repository root, yielding files (and, if requested,
 /// directories) not excluded by `.gitignore` or `exclude_patterns`.
 async fn walk(&self, exclude_patterns: &[String]) -> Result<Vec<WalkEntry>>;

 /// Reads the full byte content of `path`.
 async fn read(&self, path: &str) -> Result<Vec<u8>>;

 /// Writes `content` to `path`, creating parent directories as needed.
 async fn write(&self, path: &str, content: &[u8]) -> Result<()>;

 /// Removes `path`.
 async fn remove(&self, path: &str) -> Result<()>;

 /// Renames `from` to `to`, creating the destination's parent directory
 /// as needed. Must not follow symlinks.
 async fn rename(&self, from: &str, to: &str) -> Result<()>;

 /// `true` if `path` exists.
 async fn exists(&self, path: &str) -> Result<bool>;
}
