//! `.cv/config.json` loading, layered with `CV_`-prefixed environment
//! overrides via `figment`.

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Json};
use figment::Figment;
use serde::{Deserialize, Serialize};

use cv_domain::constants::sync::{DEFAULT_EMBEDDING_DIMENSIONS, DEFAULT_EMBED_BATCH_SIZE};
use cv_domain::error::{Error, Result};

/// Connection details for the HTTP chat/embedding providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelProviderConfig {
 /// Base URL of an OpenAI-compatible endpoint.
 pub base_url: String,
 /// Bearer token. Left empty to read from an environment override
 /// instead of committing a secret to `.cv/config.json`.
 #[serde(default)]
 pub api_key: String,
 /// Model identifier sent with each request.
 pub model: String,
 /// Output embedding dimensionality, when this is an embedding config.
 #[serde(default = "default_embedding_dimensions")]
 pub dimensions: usize,
 /// Request timeout, in seconds.
 #[serde(default = "default_timeout_secs")]
 pub timeout_secs: u64,
}

fn default_embedding_dimensions() -> usize {
 DEFAULT_EMBEDDING_DIMENSIONS
}

fn default_timeout_secs() -> u64 {
 30
}

/// Vector store collection naming and batching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorConfig {
 /// Name of the collection holding code chunk embeddings.
 #[serde(default = "default_code_chunks_collection")]
 pub code_chunks_collection: String,
 /// Batch size for embedding calls during a sync run.
 #[serde(default = "default_embed_batch_size")]
 pub embed_batch_size: usize,
}

fn default_code_chunks_collection() -> String {
 cv_domain::constants::sync::COLLECTION_CODE_CHUNKS.to_string()
}

fn default_embed_batch_size() -> usize {
 DEFAULT_EMBED_BATCH_SIZE
}

impl Default for VectorConfig {
 fn default() -> Self {
 Self {
 code_chunks_collection: default_code_chunks_collection(),
 embed_batch_size: default_embed_batch_size(),
 }
 }
}

/// Core configuration, loaded from `.cv/config.json` and environment
/// overrides (`.cv/config.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvConfig {
 /// Repository root to index, relative to the working directory.
 #[serde(default = "default_codebase_root")]
 pub codebase_root: String,
 /// Glob patterns excluded from repository walks, in addition to
 /// `.gitignore`.
 #[serde(default)]
 pub exclude_patterns: Vec<String>,
 /// If set, only these languages (by `LanguageId::name()`) are indexed.
 #[serde(default)]
 pub include_languages: Option<Vec<String>>,
 /// Default token budget for a Context Engine build.
 #[serde(default = "default_token_limit")]
 pub token_limit: usize,
 /// Days a backup file is retained before `cleanup_backups` removes it.
 #[serde(default = "default_backup_retention_days")]
 pub backup_retention_days: u64,
 /// Chat completion provider connection details, absent for sync-only use.
 pub chat: Option<ModelProviderConfig>,
 /// Embedding provider connection details, absent for graph-only use.
 pub embedding: Option<ModelProviderConfig>,
 /// Vector store collection naming and batching.
 #[serde(default)]
 pub vector: VectorConfig,
}

fn default_codebase_root() -> String {
 ".".to_string()
}

fn default_token_limit() -> usize {
 8_000
}

fn default_backup_retention_days() -> u64 {
 cv_domain::constants::sync::DEFAULT_BACKUP_RETENTION_DAYS
}

impl CvConfig {
 /// Loads configuration from `config_path` (JSON), overlaid with any
 /// `CV_`-prefixed environment variables (e.g. `CV_TOKEN_LIMIT=4000`).
 pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
 let config_path = config_path.as_ref();
 if !config_path.exists() {
 return Err(Error::config_missing(config_path.display().to_string()));
 }
 Figment::new()
.merge(Json::file(config_path))
.merge(Env::prefixed("CV_"))
.extract()
.map_err(|e| Error::config_invalid(config_path.display().to_string(), e.to_string()))
 }

 /// Path layout rooted at `.cv/` inside the codebase root.
 pub fn layout(&self) -> CvLayout {
 CvLayout::new(&self.codebase_root)
 }
}

/// The `.cv/` directory layout: sessions, backups, cache and sync-state
/// all live under one root next to the indexed codebase.
#[derive(Debug, Clone)]
pub struct CvLayout {
 root: PathBuf,
}

impl CvLayout {
 /// Builds a layout rooted at `<codebase_root>/.cv`.
 pub fn new(codebase_root: impl AsRef<Path>) -> Self {
 Self {
 root: codebase_root.as_ref().join(".cv"),
 }
 }

 /// The `.cv/` directory itself.
 pub fn root(&self) -> &Path {
 &self.root
 }

 /// `.cv/config.json`.
 pub fn config_file(&self) -> PathBuf {
 self.root.join("config.json")
 }

 /// `.cv/cache/`.
 pub fn cache_dir(&self) -> PathBuf {
 self.root.join("cache")
 }

 /// `.cv/sessions/`.
 pub fn sessions_dir(&self) -> PathBuf {
 self.root.join("sessions")
 }

 /// `.cv/backups/`.
 pub fn backups_dir(&self) -> PathBuf {
 self.root.join("backups")
 }

 /// `.cv/sync-state.json`.
 pub fn sync_state_file(&self) -> PathBuf {
 self.root.join("sync-state.json")
 }

 /// `.cv/sync-record.json`, the externally-reported `SyncStateRecord`
 /// summary, kept distinct from the engine's internal `sync-state.json`.
 pub fn sync_record_file(&self) -> PathBuf {
 self.root.join("sync-record.json")
 }

 /// Creates every directory this layout names, if missing.
 pub fn ensure_dirs(&self) -> Result<()> {
 for dir in [self.root(), &self.cache_dir(), &self.sessions_dir(), &self.backups_dir()] {
 std::fs::create_dir_all(dir).map_err(|e| Error::io(dir.display().to_string(), e))?;
 }
 Ok(())
 }
}

#[cfg(test)]
mod tests {
 use super::*;

 #[test]
 fn load_missing_file_errors() {
 let result = CvConfig::load("/nonexistent/.cv/config.json");
 assert!(matches!(result, Err(Error::ConfigMissing(_))));
 }

 #[test]
 fn load_parses_minimal_json_with_defaults() {
 let dir = tempfile::tempdir().unwrap();
 let path = dir.path().join("config.json");
 std::fs::write(&path, r#"{"codebase_root": "."}"#).unwrap();

 let config = CvConfig::load(&path).unwrap();
 assert_eq!(config.codebase_root, ".");
 assert_eq!(config.token_limit, 8_000);
 assert!(config.chat.is_none());
 }

 #[test]
 fn layout_resolves_paths_under_dot_cv() {
 let layout = CvLayout::new("/repo");
 assert_eq!(layout.sessions_dir(), Path::new("/repo/.cv/sessions"));
 assert_eq!(layout.sync_state_file(), Path::new("/repo/.cv/sync-state.json"));
 }
}
