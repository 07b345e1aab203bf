//! Sync Engine: orchestrates full and incremental repository
//! synchronization across the Parser Registry, Chunker, Graph Writer and
//! Vector Writer, persisting bookkeeping between runs.

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use cv_language_support::{Chunker, ParserRegistry};
use sha2::{Digest, Sha256};
use tracing::{error, info, warn};

use cv_domain::constants::sync::{
 COLLECTION_CODE_CHUNKS, COLLECTION_DOCSTRINGS, DEFAULT_EMBEDDING_DIMENSIONS, DEFAULT_EMBED_BATCH_SIZE,
};
use cv_domain::entities::{File, SyncStateRecord};
use cv_domain::error::Result;
use cv_domain::ports::services::indexing_service::{SyncFileError, SyncReport};
use cv_domain::ports::services::IndexingServiceInterface;
use cv_domain::ports::{
 EmbeddingProvider, FileSystemProvider, GitProvider, GraphStoreProvider, SyncStateRepository, VectorStoreProvider,
};
use cv_domain::value_objects::SyncState;

/// Drives indexing: a repository walk, per-file parse/chunk/write, and
/// bookkeeping persisted at the end of each run.
pub struct SyncEngineImpl {
 fs: Arc<dyn FileSystemProvider>,
 git: Option<Arc<dyn GitProvider>>,
 graph: Option<Arc<dyn GraphStoreProvider>>,
 vector: Option<Arc<dyn VectorStoreProvider>>,
 embedding: Option<Arc<dyn EmbeddingProvider>>,
 sync_state_repository: Arc<dyn SyncStateRepository>,
 exclude_patterns: Vec<String>,
 include_languages: Option<HashSet<String>>,
 embed_batch_size: usize,
}

impl SyncEngineImpl {
 /// Builds an engine. `git`, `graph`, `vector` and `embedding` are
 /// nullable capabilities: an incremental sync with no `git` falls back
 /// to a full sync, and writers absent from the config simply skip the
 /// writes they'd otherwise perform.
 #[allow(clippy::too_many_arguments)]
 pub fn new(
 fs: Arc<dyn FileSystemProvider>,
 git: Option<Arc<dyn GitProvider>>,
 graph: Option<Arc<dyn GraphStoreProvider>>,
 vector: Option<Arc<dyn VectorStoreProvider>>,
 embedding: Option<Arc<dyn EmbeddingProvider>>,
 sync_state_repository: Arc<dyn SyncStateRepository>,
 exclude_patterns: Vec<String>,
 include_languages: Option<HashSet<String>>,
 ) -> Self {
 Self {
 fs,
 git,
 graph,
 vector,
 embedding,
 sync_state_repository,
 exclude_patterns,
 include_languages,
 embed_batch_size: DEFAULT_EMBED_BATCH_SIZE,
 }
 }

 fn content_hash(bytes: &[u8]) -> String {
 hex::encode(Sha256::digest(bytes))
 }

 /// Parses, chunks and writes a single file to the graph and vector
 /// stores, updating `state`'s bookkeeping for it. Never aborts the run
 /// on a per-file failure; the caller records it in `errors`.
 async fn index_file(
 &self,
 path: &str,
 state: &mut SyncState,
 histogram: &mut HashMap<String, usize>,
 errors: &mut Vec<SyncFileError>,
 ) {
 let registry = ParserRegistry::new();
 let chunker = Chunker::new();

 let bytes = match self.fs.read(path).await {
 Ok(b) => b,
 Err(e) => {
 errors.push(SyncFileError {
 path: path.to_string(),
 reason: e.to_string(),
 });
 return;
 }
 };
 let content_hash = Self::content_hash(&bytes);

 if state.is_unchanged(path, &content_hash) {
 if let Some(language) = cv_language_support::LanguageDetector::new()
.detect_opt(std::path::Path::new(path))
 {
 *histogram.entry(language.name().to_string()).or_insert(0) += 1;
 }
 return;
 }

 let parsed = match registry.parse(std::path::Path::new(path), &bytes) {
 Ok(p) => p,
 Err(e) => {
 errors.push(SyncFileError {
 path: path.to_string(),
 reason: e.to_string(),
 });
 return;
 }
 };

 if let Some(allowed) = &self.include_languages {
 if !allowed.contains(parsed.language.name()) {
 return;
 }
 }

 let text = String::from_utf8_lossy(&bytes).into_owned();
 let chunks = chunker.chunk(path, &text, &parsed);
 let chunk_ids: Vec<String> = chunks.iter().map(|c| c.id.clone()).collect();

 if let Some(graph) = &self.graph {
 let file = File::new(path, parsed.language.name(), content_hash.clone(), Utc::now());
 if let Err(e) = graph.clear_by_file(path).await {
 warn!(path, error = %e, "failed to clear graph state before re-index");
 }
 if let Err(e) = graph.upsert_file(&file).await {
 error!(path, error = %e, "failed to upsert file node");
 }
 if let Err(e) = graph.upsert_symbols(path, &parsed.symbols).await {
 error!(path, error = %e, "failed to upsert symbols");
 }
 let calls: Vec<_> = parsed
.symbols
.iter()
.flat_map(|symbol| {
 symbol.calls.iter().map(move |call| cv_domain::ports::CallRecord {
 caller_qualified_name: symbol.qualified_name.clone(),
 callee_name: call.name.clone(),
 is_conditional: call.is_conditional,
 })
 })
.collect();
 if let Err(e) = graph.upsert_call_edges(path, &calls).await {
 error!(path, error = %e, "failed to upsert call edges");
 }
 }

 if let (Some(vector), Some(embedding)) = (&self.vector, &self.embedding) {
 if let Err(e) = vector.ensure_collection(COLLECTION_CODE_CHUNKS, embedding.dimensions()).await {
 warn!(error = %e, "failed to ensure code_chunks collection");
 }
 if let Err(e) = vector
.ensure_collection(COLLECTION_DOCSTRINGS, embedding.dimensions())
.await
 {
 warn!(error = %e, "failed to ensure docstrings collection");
 }

 for batch in chunks.chunks(self.embed_batch_size) {
 let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
 match embedding.embed(&texts).await {
 Ok(vectors) => {
 let points: Vec<_> = batch
.iter()
.zip(vectors)
.map(|(chunk, vector)| {
 let mut payload = std::collections::HashMap::new();
 payload.insert("path".to_string(), serde_json::Value::String(chunk.file.clone()));
 payload.insert(
 "startLine".to_string(),
 serde_json::Value::Number(chunk.start_line.into()),
 );
 payload.insert("endLine".to_string(), serde_json::Value::Number(chunk.end_line.into()));
 if let Some(symbol_name) = &chunk.symbol_name {
 payload.insert(
 "symbolName".to_string(),
 serde_json::Value::String(symbol_name.clone()),
 );
 }
 payload.insert("language".to_string(), serde_json::Value::String(chunk.language.clone()));
 if let Some(docstring) = &chunk.docstring {
 payload.insert("docstring".to_string(), serde_json::Value::String(docstring.clone()));
 }
 payload.insert("text".to_string(), serde_json::Value::String(chunk.text.clone()));
 cv_domain::ports::VectorPoint {
 id: chunk.id.clone(),
 vector,
 payload,
 }
 })
.collect();
 if let Err(e) = vector.upsert_batch(COLLECTION_CODE_CHUNKS, &points).await {
 errors.push(SyncFileError {
 path: path.to_string(),
 reason: format!("vector upsert failed: {e}"),
 });
 }
 }
 Err(e) => {
 errors.push(SyncFileError {
 path: path.to_string(),
 reason: format!("embedding failed: {e}"),
 });
 }
 }
 }
 }

 *histogram.entry(parsed.language.name().to_string()).or_insert(0) += 1;
 state.record(path, content_hash, chunk_ids, Utc::now());
 }

 async fn delete_file_from_stores(&self, path: &str, state: &mut SyncState) {
 state.remove(path);
 if let Some(graph) = &self.graph {
 if let Err(e) = graph.delete_file(path).await {
 warn!(path, error = %e, "failed to delete file from graph");
 }
 }
 if let Some(vector) = &self.vector {
 if let Err(e) = vector.delete_by_path(COLLECTION_CODE_CHUNKS, path).await {
 warn!(path, error = %e, "failed to delete file from vector store");
 }
 }
 }

 async fn persist_report(&self, state: &SyncState, histogram: HashMap<String, usize>) -> Result<SyncStateRecord> {
 let last_commit_synced = match &self.git {
 Some(git) => git.head_commit().await.ok(),
 None => None,
 };
 let edge_count = match &self.graph {
 Some(graph) => graph.edge_count().await.unwrap_or(0),
 None => 0,
 };
 let symbol_count = match &self.graph {
 Some(graph) => graph.symbol_count().await.unwrap_or(0),
 None => 0,
 };
 let vector_count = match &self.vector {
 Some(vector) => vector.point_count(COLLECTION_CODE_CHUNKS).await.unwrap_or(0),
 None => 0,
 };
 let record = SyncStateRecord {
 last_commit_synced,
 last_sync_at: Some(Utc::now()),
 file_count: state.files.len(),
 symbol_count,
 edge_count,
 vector_count,
 language_histogram: histogram,
 };
 self.sync_state_repository.save_state(state).await?;
 self.sync_state_repository.save_record(&record).await?;
 Ok(record)
 }
}

#[async_trait]
impl IndexingServiceInterface for SyncEngineImpl {
 async fn full_sync(&self, clear_first: bool) -> Result<SyncReport> {
 if clear_first {
 if let Some(graph) = &self.graph {
 graph.clear_all().await?;
 }
 }

 let entries = self.fs.walk(&self.exclude_patterns).await?;
 let mut state = self.sync_state_repository.load_state().await.unwrap_or_default();
 let mut histogram = HashMap::new();
 let mut errors = Vec::new();

 let walked_paths: HashSet<String> = entries
.iter()
.filter(|e| !e.is_dir)
.map(|e| e.path.clone())
.collect();

 let previously_tracked: Vec<String> = state.files.keys().cloned().collect();
 for path in previously_tracked {
 if !walked_paths.contains(&path) {
 self.delete_file_from_stores(&path, &mut state).await;
 }
 }

 for path in &walked_paths {
 self.index_file(path, &mut state, &mut histogram, &mut errors).await;
 }

 info!(files = walked_paths.len(), errors = errors.len(), "full sync complete");
 let record = self.persist_report(&state, histogram).await?;
 Ok(SyncReport { state: record, errors })
 }

 async fn incremental_sync(&self) -> Result<SyncReport> {
 let Some(git) = &self.git else {
 warn!("no git provider configured, falling back to full sync");
 return self.full_sync(false).await;
 };

 let previous_record = self.sync_state_repository.load_record().await?;
 let Some(last_commit) = previous_record.as_ref().and_then(|r| r.last_commit_synced.clone()) else {
 return self.full_sync(false).await;
 };

 let changed = git.changed_files_since(&last_commit).await?;
 let mut state = self.sync_state_repository.load_state().await.unwrap_or_default();
 let mut histogram = HashMap::new();
 let mut errors = Vec::new();

 for path in changed.deleted.iter().chain(changed.renames.iter().map(|r| &r.from)) {
 self.delete_file_from_stores(path, &mut state).await;
 }

 let touched: Vec<&String> = changed
.added
.iter()
.chain(changed.modified.iter())
.chain(changed.renames.iter().map(|r| &r.to))
.collect();

 for path in touched {
 if let Some(graph) = &self.graph {
 if let Err(e) = graph.clear_by_file(path).await {
 warn!(path, error = %e, "failed to clear graph state before re-index");
 }
 }
 self.index_file(path, &mut state, &mut histogram, &mut errors).await;
 }

 info!(
 added = changed.added.len(),
 modified = changed.modified.len(),
 deleted = changed.deleted.len(),
 renamed = changed.renames.len(),
 "incremental sync complete"
 );
 let record = self.persist_report(&state, histogram).await?;
 Ok(SyncReport { state: record, errors })
 }

 async fn current_state(&self) -> Result<Option<SyncStateRecord>> {
 self.sync_state_repository.load_record().await
 }
}

#[cfg(test)]
mod tests {
 use super::*;
 use cv_providers::fs::WalkingFileSystem;
 use cv_providers::graph::PetgraphStore;
 use cv_providers::vector::EdgevecStore;
 use std::sync::Mutex;

 struct FixedEmbedding;

 #[async_trait]
 impl EmbeddingProvider for FixedEmbedding {
 async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
 Ok(texts.iter().map(|_| vec![0.1, 0.2, 0.3]).collect())
 }

 fn dimensions(&self) -> usize {
 3
 }
 }

 #[derive(Default)]
 struct InMemorySyncStateRepository {
 state: Mutex<Option<SyncState>>,
 record: Mutex<Option<SyncStateRecord>>,
 }

 #[async_trait]
 impl SyncStateRepository for InMemorySyncStateRepository {
 async fn load_state(&self) -> Result<SyncState> {
 Ok(self.state.lock().unwrap().clone().unwrap_or_default())
 }

 async fn save_state(&self, state: &SyncState) -> Result<()> {
 *self.state.lock().unwrap() = Some(state.clone());
 Ok(())
 }

 async fn load_record(&self) -> Result<Option<SyncStateRecord>> {
 Ok(self.record.lock().unwrap().clone())
 }

 async fn save_record(&self, record: &SyncStateRecord) -> Result<()> {
 *self.record.lock().unwrap() = Some(record.clone());
 Ok(())
 }
 }

 fn engine(fs: Arc<dyn FileSystemProvider>, repo: Arc<dyn SyncStateRepository>) -> SyncEngineImpl {
 SyncEngineImpl::new(fs, None, None, None, None, repo, Vec::new(), None)
 }

 #[tokio::test]
 async fn full_sync_indexes_walked_files_and_records_state() {
 let dir = tempfile::tempdir().unwrap();
 let fs: Arc<dyn FileSystemProvider> = Arc::new(WalkingFileSystem::new(dir.path()));
 fs.write("src/lib.rs", b"pub fn greet() {}").await.unwrap();
 let repo: Arc<dyn SyncStateRepository> = Arc::new(InMemorySyncStateRepository::default());
 let engine = engine(fs, repo.clone());

 let report = engine.full_sync(false).await.unwrap();
 assert!(report.errors.is_empty());
 assert_eq!(report.state.file_count, 1);
 assert_eq!(report.state.language_histogram.get("rust"), Some(&1));
 }

 #[tokio::test]
 async fn unchanged_file_short_circuits_reindex_but_still_counted() {
 let dir = tempfile::tempdir().unwrap();
 let fs: Arc<dyn FileSystemProvider> = Arc::new(WalkingFileSystem::new(dir.path()));
 fs.write("src/lib.rs", b"pub fn greet() {}").await.unwrap();
 let repo: Arc<dyn SyncStateRepository> = Arc::new(InMemorySyncStateRepository::default());
 let engine = engine(fs, repo.clone());

 engine.full_sync(false).await.unwrap();
 let second = engine.full_sync(false).await.unwrap();
 assert_eq!(second.state.file_count, 1);
 assert_eq!(second.state.language_histogram.get("rust"), Some(&1));
 }

 #[tokio::test]
 async fn full_sync_detects_deleted_files() {
 let dir = tempfile::tempdir().unwrap();
 let fs: Arc<dyn FileSystemProvider> = Arc::new(WalkingFileSystem::new(dir.path()));
 fs.write("src/a.rs", b"pub fn a() {}").await.unwrap();
 fs.write("src/b.rs", b"pub fn b() {}").await.unwrap();
 let repo: Arc<dyn SyncStateRepository> = Arc::new(InMemorySyncStateRepository::default());
 let engine = engine(fs.clone(), repo.clone());

 engine.full_sync(false).await.unwrap();
 fs.remove("src/b.rs").await.unwrap();
 let report = engine.full_sync(false).await.unwrap();
 assert_eq!(report.state.file_count, 1);
 }

 #[tokio::test]
 async fn incremental_sync_without_git_falls_back_to_full_sync() {
 let dir = tempfile::tempdir().unwrap();
 let fs: Arc<dyn FileSystemProvider> = Arc::new(WalkingFileSystem::new(dir.path()));
 fs.write("src/lib.rs", b"pub fn greet() {}").await.unwrap();
 let repo: Arc<dyn SyncStateRepository> = Arc::new(InMemorySyncStateRepository::default());
 let engine = engine(fs, repo.clone());

 let report = engine.incremental_sync().await.unwrap();
 assert_eq!(report.state.file_count, 1);
 }

 #[tokio::test]
 async fn current_state_reflects_last_sync() {
 let dir = tempfile::tempdir().unwrap();
 let fs: Arc<dyn FileSystemProvider> = Arc::new(WalkingFileSystem::new(dir.path()));
 fs.write("src/lib.rs", b"pub fn greet() {}").await.unwrap();
 let repo: Arc<dyn SyncStateRepository> = Arc::new(InMemorySyncStateRepository::default());
 let engine = engine(fs, repo);

 assert!(engine.current_state().await.unwrap().is_none());
 engine.full_sync(false).await.unwrap();
 assert!(engine.current_state().await.unwrap().is_some());
 }

 #[tokio::test]
 async fn repeated_full_sync_over_unchanged_tree_keeps_symbol_and_vector_counts() {
 let dir = tempfile::tempdir().unwrap();
 let fs: Arc<dyn FileSystemProvider> = Arc::new(WalkingFileSystem::new(dir.path()));
 fs.write("src/lib.rs", b"pub fn greet() {}\npub fn wave() {}").await.unwrap();
 let repo: Arc<dyn SyncStateRepository> = Arc::new(InMemorySyncStateRepository::default());
 let graph: Arc<dyn GraphStoreProvider> = Arc::new(PetgraphStore::new());
 let vector: Arc<dyn VectorStoreProvider> = Arc::new(EdgevecStore::new());
 let embedding: Arc<dyn EmbeddingProvider> = Arc::new(FixedEmbedding);
 let engine = SyncEngineImpl::new(
 fs,
 None,
 Some(graph),
 Some(vector),
 Some(embedding),
 repo,
 Vec::new(),
 None,
 );

 let first = engine.full_sync(false).await.unwrap();
 assert_eq!(first.state.symbol_count, 2);
 assert_eq!(first.state.vector_count, 2);

 let second = engine.full_sync(false).await.unwrap();
 assert_eq!(second.state.symbol_count, first.state.symbol_count);
 assert_eq!(second.state.vector_count, first.state.vector_count);
 }
}
