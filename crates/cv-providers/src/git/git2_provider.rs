//! `GitProvider` over `git2` (libgit2 bindings).

use std::path::PathBuf;

use async_trait::async_trait;
use git2::{Repository, Status, StatusOptions};

use cv_domain::error::{Error, Result};
use cv_domain::ports::{ChangedFiles, GitProvider, Rename};

/// Reads working-tree and history state from a local git repository.
///
/// All `git2` calls are synchronous (libgit2 has no async API); each
/// method wraps its call in `spawn_blocking` so the sync engine's async
/// tasks don't stall the runtime's worker threads on repository I/O.
pub struct Git2Provider {
    root: PathBuf,
}

impl Git2Provider {
    /// Builds a provider rooted at `root`, which may or may not be a git
    /// repository: [`Self::is_repo`] reports which.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn open(&self) -> Result<Repository> {
        Repository::open(&self.root)
            .map_err(|e| Error::provider_with_source(format!("failed to open repository at {}", self.root.display()), e))
    }
}

#[async_trait]
impl GitProvider for Git2Provider {
    async fn is_repo(&self) -> Result<bool> {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || Repository::open(&root).is_ok())
            .await
            .map_err(|e| Error::internal(format!("is_repo task panicked: {e}")))
    }

    async fn current_branch(&self) -> Result<Option<String>> {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || -> Result<Option<String>> {
            let repo = Repository::open(&root)
                .map_err(|e| Error::provider_with_source("failed to open repository", e))?;
            let head = match repo.head() {
                Ok(head) => head,
                Err(_) => return Ok(None),
            };
            if !head.is_branch() {
                return Ok(None);
            }
            Ok(head.shorthand().map(str::to_string))
        })
        .await
        .map_err(|e| Error::internal(format!("current_branch task panicked: {e}")))?
    }

    async fn head_commit(&self) -> Result<String> {
        let repo = self.open()?;
        let head = repo
            .head()
            .map_err(|e| Error::provider_with_source("repository has no HEAD", e))?;
        let commit = head
            .peel_to_commit()
            .map_err(|e| Error::provider_with_source("HEAD does not resolve to a commit", e))?;
        Ok(commit.id().to_string())
    }

    async fn recent_commits(&self, n: usize) -> Result<Vec<String>> {
        let repo = self.open()?;
        let mut walker = repo
            .revwalk()
            .map_err(|e| Error::provider_with_source("failed to start revwalk", e))?;
        walker
            .push_head()
            .map_err(|e| Error::provider_with_source("failed to push HEAD onto revwalk", e))?;

        walker
            .take(n)
            .map(|oid| {
                oid.map(|oid| oid.to_string())
                    .map_err(|e| Error::provider_with_source("revwalk iteration failed", e))
            })
            .collect()
    }

    async fn changed_files_since(&self, commit: &str) -> Result<ChangedFiles> {
        let repo = self.open()?;
        let old_oid = git2::Oid::from_str(commit)
            .map_err(|e| Error::invalid_argument(format!("not a valid commit hash: {e}")))?;
        let old_tree = repo
            .find_commit(old_oid)
            .and_then(|c| c.tree())
            .map_err(|e| Error::provider_with_source(format!("commit {commit} not found"), e))?;

        let head_tree = repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .and_then(|c| c.tree())
            .map_err(|e| Error::provider_with_source("failed to resolve HEAD tree", e))?;

        let mut diff_opts = git2::DiffOptions::new();
        diff_opts.include_untracked(false);
        let mut find_opts = git2::DiffFindOptions::new();
        find_opts.renames(true);

        let mut diff = repo
            .diff_tree_to_tree(Some(&old_tree), Some(&head_tree), Some(&mut diff_opts))
            .map_err(|e| Error::provider_with_source("diff_tree_to_tree failed", e))?;
        diff.find_similar(Some(&mut find_opts))
            .map_err(|e| Error::provider_with_source("rename detection failed", e))?;

        let mut changed = ChangedFiles::default();
        for delta in diff.deltas() {
            let old_path = delta.old_file().path().map(|p| p.display().to_string());
            let new_path = delta.new_file().path().map(|p| p.display().to_string());
            match delta.status() {
                git2::Delta::Added => {
                    if let Some(p) = new_path {
                        changed.added.push(p);
                    }
                }
                git2::Delta::Deleted => {
                    if let Some(p) = old_path {
                        changed.deleted.push(p);
                    }
                }
                git2::Delta::Renamed => {
                    if let (Some(from), Some(to)) = (old_path, new_path) {
                        changed.renames.push(Rename { from, to });
                    }
                }
                _ => {
                    if let Some(p) = new_path {
                        changed.modified.push(p);
                    }
                }
            }
        }
        Ok(changed)
    }
}

/// Widens working-tree status (not just committed history) when a caller
/// needs to know about uncommitted edits. Unused by the Sync Engine's git
/// diff path today; kept for callers that need it directly.
pub fn working_tree_dirty(repo: &Repository) -> Result<bool> {
    let mut opts = StatusOptions::new();
    opts.include_untracked(true);
    let statuses = repo
        .statuses(Some(&mut opts))
        .map_err(|e| Error::provider_with_source("failed to read working tree status", e))?;
    Ok(statuses.iter().any(|s| s.status() != Status::CURRENT))
}
