//! File Operations: applies and reverts [`Edit`]s against a
//! [`FileSystemProvider`], backing up every destructive write first.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use cv_domain::error::{Error, Result};
use cv_domain::ports::services::FileOperationsInterface;
use cv_domain::ports::FileSystemProvider;
use cv_domain::value_objects::{Edit, EditResult, EditStatus, EditType, SearchReplaceBlock};

/// Applies [`Edit`]s to a codebase checkout, backing up prior content to
/// `<backups_dir>/<flattened path>.<unix millis>.<hash-8>` before any
/// destructive write.
pub struct FileOperationsImpl {
 fs: Arc<dyn FileSystemProvider>,
 backups_dir: String,
}

impl FileOperationsImpl {
 /// Builds an instance writing backups under `backups_dir` (typically
 /// `.cv/backups`), relative to the same root `fs` resolves paths against.
 pub fn new(fs: Arc<dyn FileSystemProvider>, backups_dir: impl Into<String>) -> Self {
 Self {
 fs,
 backups_dir: backups_dir.into(),
 }
 }

 fn flatten(path: &str) -> String {
 path.replace('/', "_")
 }

 async fn write_backup(&self, path: &str, content: &[u8]) -> Result<String> {
 let millis = SystemTime::now()
.duration_since(UNIX_EPOCH)
.map(|d| d.as_millis())
.unwrap_or(0);
 let hash = hex::encode(Sha256::digest(content));
 let backup_path = format!(
 "{}/{}.{}.{}",
 self.backups_dir,
 Self::flatten(path),
 millis,
 &hash[..8]
 );
 self.fs.write(&backup_path, content).await?;
 Ok(backup_path)
 }

 fn approximate_match(search: &str, content: &str) -> Option<String> {
 let first_line = search.lines().next()?.trim();
 if first_line.is_empty() {
 return None;
 }
 content
.lines()
.find(|line| line.trim() == first_line)
.map(|line| line.trim().to_string())
 }

 fn apply_blocks(file: &str, mut content: String, blocks: &[SearchReplaceBlock]) -> Result<String> {
 for block in blocks {
 match content.find(block.search.as_str()) {
 Some(pos) => {
 content.replace_range(pos..pos + block.search.len(), &block.replace);
 }
 None => {
 let found = Self::approximate_match(&block.search, &content);
 return Err(Error::edit_search_miss(file, block.search.clone(), found));
 }
 }
 }
 Ok(content)
 }

 fn failure(edit: &Edit, error: Error) -> Result<EditResult> {
 if error.is_conflict_degrade() {
 return Err(error);
 }
 Ok(EditResult {
 edit_id: edit.id,
 status: EditStatus::Failed,
 backup_path: None,
 error: Some(error.to_string()),
 })
 }
}

#[async_trait]
impl FileOperationsInterface for FileOperationsImpl {
 async fn apply_edit(&self, edit: &Edit) -> Result<EditResult> {
 let result = match &edit.edit_type {
 EditType::Create { content } => {
 if self.fs.exists(&edit.file).await? {
 // Create-on-existing-file degrades to a full-content modify.
 let current = self.fs.read(&edit.file).await?;
 let backup_path = self.write_backup(&edit.file, &current).await?;
 self.fs.write(&edit.file, content.as_bytes()).await?;
 Ok(EditResult {
 edit_id: edit.id,
 status: EditStatus::Applied,
 backup_path: Some(backup_path),
 error: None,
 })
 } else {
 self.fs.write(&edit.file, content.as_bytes()).await?;
 Ok(EditResult {
 edit_id: edit.id,
 status: EditStatus::Applied,
 backup_path: None,
 error: None,
 })
 }
 }
 EditType::Modify { blocks } => {
 let current = self.fs.read(&edit.file).await?;
 let current = String::from_utf8_lossy(&current).into_owned();
 match Self::apply_blocks(&edit.file, current.clone(), blocks) {
 Ok(next) => {
 let backup_path = self.write_backup(&edit.file, current.as_bytes()).await?;
 self.fs.write(&edit.file, next.as_bytes()).await?;
 Ok(EditResult {
 edit_id: edit.id,
 status: EditStatus::Applied,
 backup_path: Some(backup_path),
 error: None,
 })
 }
 Err(e) => return Self::failure(edit, e),
 }
 }
 EditType::Delete => {
 let current = self.fs.read(&edit.file).await?;
 let backup_path = self.write_backup(&edit.file, &current).await?;
 self.fs.remove(&edit.file).await?;
 Ok(EditResult {
 edit_id: edit.id,
 status: EditStatus::Applied,
 backup_path: Some(backup_path),
 error: None,
 })
 }
 EditType::Rename { to, content } => {
 let current = self.fs.read(&edit.file).await?;
 let backup_path = self.write_backup(&edit.file, &current).await?;
 self.fs.rename(&edit.file, to).await?;
 if let Some(content) = content {
 self.fs.write(to, content.as_bytes()).await?;
 }
 Ok(EditResult {
 edit_id: edit.id,
 status: EditStatus::Applied,
 backup_path: Some(backup_path),
 error: None,
 })
 }
 };

 match result {
 Ok(r) => Ok(r),
 Err(e) => Self::failure(edit, e),
 }
 }

 async fn revert_edit(&self, edit: &Edit, result: &EditResult) -> Result<()> {
 let Some(backup_path) = &result.backup_path else {
 // A `create` against a file that didn't exist has nothing to
 // restore; reverting means removing what we created.
 return if matches!(edit.edit_type, EditType::Create {.. }) {
 self.fs.remove(&edit.file).await
 } else {
 Err(Error::invalid_argument(format!(
 "edit {} has no backup to revert from",
 edit.id
 )))
 };
 };
 let backup = self.fs.read(backup_path).await?;

 if let EditType::Rename { to,.. } = &edit.edit_type {
 if self.fs.exists(to).await? {
 self.fs.remove(to).await?;
 }
 self.fs.write(&edit.file, &backup).await?;
 } else {
 self.fs.write(&edit.file, &backup).await?;
 }
 Ok(())
 }

 async fn cleanup_backups(&self, retention_days: u64) -> Result<usize> {
 let cutoff_millis = SystemTime::now()
.duration_since(UNIX_EPOCH)
.map(|d| d.as_millis())
.unwrap_or(0)
.saturating_sub(u128::from(retention_days) * 24 * 60 * 60 * 1000);

 let entries = self.fs.walk(&[]).await?;
 let mut removed = 0;
 for entry in entries {
 if entry.is_dir || !entry.path.starts_with(&format!("{}/", self.backups_dir)) {
 continue;
 }
 let Some(millis) = entry.path.split('.').nth_back(1).and_then(|s| s.parse::<u128>().ok())
 else {
 continue;
 };
 if millis < cutoff_millis {
 self.fs.remove(&entry.path).await?;
 removed += 1;
 }
 }
 Ok(removed)
 }
}

#[cfg(test)]
mod tests {
 use super::*;
 use cv_providers::fs::WalkingFileSystem;

 fn ops(dir: &std::path::Path) -> FileOperationsImpl {
 FileOperationsImpl::new(Arc::new(WalkingFileSystem::new(dir)), ".cv/backups".to_string())
 }

 #[tokio::test]
 async fn create_on_new_file_writes_with_no_backup() {
 let dir = tempfile::tempdir().unwrap();
 let ops = ops(dir.path());
 let edit = Edit::new(
 "src/new.rs",
 EditType::Create {
 content: "fn new() {}".to_string(),
 },
 );
 let result = ops.apply_edit(&edit).await.unwrap();
 assert_eq!(result.status, EditStatus::Applied);
 assert!(result.backup_path.is_none());
 }

 #[tokio::test]
 async fn create_on_existing_file_degrades_to_modify() {
 let dir = tempfile::tempdir().unwrap();
 let ops = ops(dir.path());
 ops.fs.write("src/a.rs", b"old").await.unwrap();
 let edit = Edit::new(
 "src/a.rs",
 EditType::Create {
 content: "new".to_string(),
 },
 );
 let result = ops.apply_edit(&edit).await.unwrap();
 assert_eq!(result.status, EditStatus::Applied);
 assert!(result.backup_path.is_some());
 assert_eq!(ops.fs.read("src/a.rs").await.unwrap(), b"new");
 }

 #[tokio::test]
 async fn modify_applies_blocks_in_order() {
 let dir = tempfile::tempdir().unwrap();
 let ops = ops(dir.path());
 ops.fs.write("src/a.rs", b"fn foo() {}\nfn bar() {}").await.unwrap();
 let edit = Edit::new(
 "src/a.rs",
 EditType::Modify {
 blocks: vec![SearchReplaceBlock {
 search: "fn foo() {}".to_string(),
 replace: "fn foo() { 1 }".to_string(),
 }],
 },
 );
 let result = ops.apply_edit(&edit).await.unwrap();
 assert_eq!(result.status, EditStatus::Applied);
 let content = ops.fs.read("src/a.rs").await.unwrap();
 assert_eq!(content, b"fn foo() { 1 }\nfn bar() {}");
 }

 #[tokio::test]
 async fn modify_search_miss_aborts_with_no_partial_write() {
 let dir = tempfile::tempdir().unwrap();
 let ops = ops(dir.path());
 ops.fs.write("src/a.rs", b"fn foo() {}\nfn bar() {}").await.unwrap();
 let edit = Edit::new(
 "src/a.rs",
 EditType::Modify {
 blocks: vec![
 SearchReplaceBlock {
 search: "fn foo() {}".to_string(),
 replace: "fn foo() { 1 }".to_string(),
 },
 SearchReplaceBlock {
 search: "fn missing() {}".to_string(),
 replace: "x".to_string(),
 },
 ],
 },
 );
 let result = ops.apply_edit(&edit).await.unwrap();
 assert_eq!(result.status, EditStatus::Failed);
 let content = ops.fs.read("src/a.rs").await.unwrap();
 assert_eq!(content, b"fn foo() {}\nfn bar() {}");
 }

 #[tokio::test]
 async fn delete_backs_up_then_removes() {
 let dir = tempfile::tempdir().unwrap();
 let ops = ops(dir.path());
 ops.fs.write("src/a.rs", b"content").await.unwrap();
 let edit = Edit::new("src/a.rs", EditType::Delete);
 let result = ops.apply_edit(&edit).await.unwrap();
 assert_eq!(result.status, EditStatus::Applied);
 assert!(!ops.fs.exists("src/a.rs").await.unwrap());
 let backup = ops.fs.read(result.backup_path.as_ref().unwrap()).await.unwrap();
 assert_eq!(backup, b"content");
 }

 #[tokio::test]
 async fn revert_restores_backup_to_original_path() {
 let dir = tempfile::tempdir().unwrap();
 let ops = ops(dir.path());
 ops.fs.write("src/a.rs", b"original").await.unwrap();
 let edit = Edit::new(
 "src/a.rs",
 EditType::Modify {
 blocks: vec![SearchReplaceBlock {
 search: "original".to_string(),
 replace: "changed".to_string(),
 }],
 },
 );
 let result = ops.apply_edit(&edit).await.unwrap();
 ops.revert_edit(&edit, &result).await.unwrap();
 assert_eq!(ops.fs.read("src/a.rs").await.unwrap(), b"original");
 }

 #[tokio::test]
 async fn rename_moves_file_and_can_rewrite_content() {
 let dir = tempfile::tempdir().unwrap();
 let ops = ops(dir.path());
 ops.fs.write("src/old.rs", b"content").await.unwrap();
 let edit = Edit::new(
 "src/old.rs",
 EditType::Rename {
 to: "src/new.rs".to_string(),
 content: Some("rewritten".to_string()),
 },
 );
 let result = ops.apply_edit(&edit).await.unwrap();
 assert_eq!(result.status, EditStatus::Applied);
 assert!(!ops.fs.exists("src/old.rs").await.unwrap());
 assert_eq!(ops.fs.read("src/new.rs").await.unwrap(), b"rewritten");
 }
}
