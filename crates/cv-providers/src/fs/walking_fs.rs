//! `FileSystemProvider` over the local filesystem, rooted at a codebase path.
//!
//! Repository walks honor `.gitignore` via `ignore::WalkBuilder` plus
//! caller-supplied glob exclude patterns compiled with `globset`. All
//! blocking I/O runs on `tokio::task::spawn_blocking` so async callers never
//! stall the runtime.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use globset::{Glob, GlobSetBuilder};
use ignore::WalkBuilder;

use cv_domain::error::{Error, Result};
use cv_domain::ports::{FileSystemProvider, WalkEntry};

/// Rooted local-disk filesystem facility.
pub struct WalkingFileSystem {
    root: PathBuf,
}

impl WalkingFileSystem {
    /// Builds a provider whose relative paths resolve against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn absolute(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }

    fn relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }
}

#[async_trait]
impl FileSystemProvider for WalkingFileSystem {
    async fn walk(&self, exclude_patterns: &[String]) -> Result<Vec<WalkEntry>> {
        let root = self.root.clone();
        let exclude_patterns = exclude_patterns.to_vec();
        tokio::task::spawn_blocking(move || -> Result<Vec<WalkEntry>> {
            let mut builder = GlobSetBuilder::new();
            for pattern in &exclude_patterns {
                let glob = Glob::new(pattern)
                    .map_err(|e| Error::invalid_argument(format!("bad exclude pattern {pattern}: {e}")))?;
                builder.add(glob);
            }
            let excludes = builder
                .build()
                .map_err(|e| Error::invalid_argument(format!("failed to compile exclude patterns: {e}")))?;

            let mut entries = Vec::new();
            let walker = WalkBuilder::new(&root).hidden(false).build();
            for entry in walker {
                let entry = entry
                    .map_err(|e| Error::io(root.display().to_string(), std::io::Error::other(e.to_string())))?;
                if entry.path() == root {
                    continue;
                }
                let relative = entry
                    .path()
                    .strip_prefix(&root)
                    .unwrap_or(entry.path())
                    .to_string_lossy()
                    .replace('\\', "/");
                if excludes.is_match(&relative) {
                    continue;
                }
                let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
                entries.push(WalkEntry {
                    path: relative,
                    is_dir,
                });
            }
            Ok(entries)
        })
        .await
        .map_err(|e| Error::internal(format!("walk task panicked: {e}")))?
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>> {
        let full = self.absolute(path);
        let path_owned = path.to_string();
        tokio::task::spawn_blocking(move || fs::read(&full).map_err(|e| Error::io(path_owned, e)))
            .await
            .map_err(|e| Error::internal(format!("read task panicked: {e}")))?
    }

    async fn write(&self, path: &str, content: &[u8]) -> Result<()> {
        let full = self.absolute(path);
        let content = content.to_vec();
        let path_owned = path.to_string();
        tokio::task::spawn_blocking(move || -> Result<()> {
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).map_err(|e| Error::io(path_owned.clone(), e))?;
            }
            fs::write(&full, content).map_err(|e| Error::io(path_owned, e))
        })
        .await
        .map_err(|e| Error::internal(format!("write task panicked: {e}")))?
    }

    async fn remove(&self, path: &str) -> Result<()> {
        let full = self.absolute(path);
        let path_owned = path.to_string();
        tokio::task::spawn_blocking(move || fs::remove_file(&full).map_err(|e| Error::io(path_owned, e)))
            .await
            .map_err(|e| Error::internal(format!("remove task panicked: {e}")))?
    }

    async fn rename(&self, from: &str, to: &str) -> Result<()> {
        let full_from = self.absolute(from);
        let full_to = self.absolute(to);
        let from_owned = from.to_string();
        tokio::task::spawn_blocking(move || -> Result<()> {
            if let Some(parent) = full_to.parent() {
                fs::create_dir_all(parent).map_err(|e| Error::io(from_owned.clone(), e))?;
            }
            fs::rename(&full_from, &full_to).map_err(|e| Error::io(from_owned, e))
        })
        .await
        .map_err(|e| Error::internal(format!("rename task panicked: {e}")))?
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        let full = self.absolute(path);
        tokio::task::spawn_blocking(move || full.exists())
            .await
            .map_err(|e| Error::internal(format!("exists task panicked: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let fs = WalkingFileSystem::new(dir.path());
        fs.write("src/a.rs", b"fn main() {}").await.unwrap();
        let bytes = fs.read("src/a.rs").await.unwrap();
        assert_eq!(bytes, b"fn main() {}");
    }

    #[tokio::test]
    async fn walk_excludes_glob_matches() {
        let dir = tempfile::tempdir().unwrap();
        let fs = WalkingFileSystem::new(dir.path());
        fs.write("src/a.rs", b"1").await.unwrap();
        fs.write("target/debug/b.rs", b"2").await.unwrap();

        let entries = fs.walk(&["target/**".to_string()]).await.unwrap();
        let paths: Vec<&str> = entries
            .iter()
            .filter(|e| !e.is_dir)
            .map(|e| e.path.as_str())
            .collect();
        assert!(paths.contains(&"src/a.rs"));
        assert!(!paths.iter().any(|p| p.starts_with("target/")));
    }

    #[tokio::test]
    async fn rename_moves_file() {
        let dir = tempfile::tempdir().unwrap();
        let fs = WalkingFileSystem::new(dir.path());
        fs.write("a.rs", b"x").await.unwrap();
        fs.rename("a.rs", "sub/b.rs").await.unwrap();
        assert!(!fs.exists("a.rs").await.unwrap());
        assert!(fs.exists("sub/b.rs").await.unwrap());
    }
}
