//! Assembles one process's providers, use cases and orchestrator from a
//! loaded [`CvConfig`].

use std::sync::Arc;
use std::time::Duration;

use cv_application::use_cases::{
 AssistantOrchestrator, ContextEngineImpl, EditParserImpl, FileOperationsImpl, SessionServiceImpl, SyncEngineImpl,
};
use cv_domain::error::Result;
use cv_domain::ports::services::{ContextServiceInterface, EditParserInterface, FileOperationsInterface, IndexingServiceInterface, SessionServiceInterface};
use cv_domain::ports::{ChatProvider, EmbeddingProvider, FileSystemProvider, GitProvider, GraphStoreProvider, SyncStateRepository, VectorStoreProvider};
use cv_providers::chat::{HttpChatConfig, HttpChatProvider};
use cv_providers::embedding::{HttpEmbeddingConfig, HttpEmbeddingProvider};
use cv_providers::fs::WalkingFileSystem;
use cv_providers::git::Git2Provider;
use cv_providers::graph::PetgraphStore;
use cv_providers::vector::EdgevecStore;

use crate::config::CvConfig;
use crate::persistence::{JsonSessionRepository, JsonSyncStateRepository};

/// One process's fully wired collaborators: everything a `cv` CLI command
/// needs, built once at startup.
pub struct AppContext {
 /// The configuration this context was built from.
 pub config: CvConfig,
 /// Repository/file access, rooted at `config.codebase_root`.
 pub fs: Arc<dyn FileSystemProvider>,
 /// Sync Engine.
 pub sync_engine: Arc<dyn IndexingServiceInterface>,
 /// Context Engine.
 pub context_engine: Arc<dyn ContextServiceInterface>,
 /// Edit Parser.
 pub edit_parser: Arc<dyn EditParserInterface>,
 /// File Operations.
 pub file_operations: Arc<dyn FileOperationsInterface>,
 /// Session Store business rules.
 pub session_service: Arc<dyn SessionServiceInterface>,
 /// Assistant Orchestrator, present only when a chat provider is
 /// configured: there is no degraded mode for a turn with nothing to
 /// talk to.
 pub orchestrator: Option<Arc<AssistantOrchestrator>>,
}

impl AppContext {
 /// Builds every collaborator from `config`, creating `.cv/`'s
 /// directories if missing.
 pub async fn bootstrap(config: CvConfig) -> Result<Self> {
 let layout = config.layout();
 layout.ensure_dirs()?;

 let fs: Arc<dyn FileSystemProvider> = Arc::new(WalkingFileSystem::new(config.codebase_root.clone()));

 let git: Option<Arc<dyn GitProvider>> = {
 let candidate = Git2Provider::new(config.codebase_root.clone());
 if candidate.is_repo().await.unwrap_or(false) {
 Some(Arc::new(candidate))
 } else {
 None
 }
 };

 let graph: Option<Arc<dyn GraphStoreProvider>> = Some(Arc::new(PetgraphStore::new()));
 let vector: Option<Arc<dyn VectorStoreProvider>> = Some(Arc::new(EdgevecStore::new()));

 let embedding: Option<Arc<dyn EmbeddingProvider>> = match &config.embedding {
 Some(model) => Some(Arc::new(HttpEmbeddingProvider::new(HttpEmbeddingConfig {
 base_url: model.base_url.clone(),
 api_key: model.api_key.clone(),
 model: model.model.clone(),
 dimensions: model.dimensions,
 timeout: Duration::from_secs(model.timeout_secs),
 })?)),
 None => None,
 };

 let chat_provider: Option<Box<dyn ChatProvider>> = match &config.chat {
 Some(model) => Some(Box::new(HttpChatProvider::new(
 HttpChatConfig {
 base_url: model.base_url.clone(),
 api_key: model.api_key.clone(),
 timeout: Duration::from_secs(model.timeout_secs),
 },
 model.model.clone(),
 )?) as Box<dyn ChatProvider>),
 None => None,
 };

 let sync_state_repository: Arc<dyn SyncStateRepository> =
 Arc::new(JsonSyncStateRepository::new(layout.sync_state_file(), layout.sync_record_file()));
 let session_repository = Arc::new(JsonSessionRepository::new(layout.sessions_dir()));

 let include_languages = config
.include_languages
.clone()
.map(|langs| langs.into_iter().collect());

 let sync_engine: Arc<dyn IndexingServiceInterface> = Arc::new(SyncEngineImpl::new(
 fs.clone(),
 git,
 graph.clone(),
 vector.clone(),
 embedding.clone(),
 sync_state_repository,
 config.exclude_patterns.clone(),
 include_languages,
 ));

 let context_engine: Arc<dyn ContextServiceInterface> =
 Arc::new(ContextEngineImpl::new(graph, vector, embedding, fs.clone()));

 let edit_parser: Arc<dyn EditParserInterface> = Arc::new(EditParserImpl::new());
 let file_operations: Arc<dyn FileOperationsInterface> =
 Arc::new(FileOperationsImpl::new(fs.clone(), ".cv/backups"));
 let session_service: Arc<dyn SessionServiceInterface> = Arc::new(SessionServiceImpl::new(session_repository));

 let orchestrator = chat_provider.map(|chat_provider| {
 Arc::new(AssistantOrchestrator::new(
 context_engine.clone(),
 Arc::new(tokio::sync::Mutex::new(chat_provider)),
 edit_parser.clone(),
 file_operations.clone(),
 session_service.clone(),
 ))
 });

 Ok(Self {
 config,
 fs,
 sync_engine,
 context_engine,
 edit_parser,
 file_operations,
 session_service,
 orchestrator,
 })
 }
}
