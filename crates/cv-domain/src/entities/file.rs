//! The `File` entity: a single source file tracked by the index.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A source file as last observed by the Indexer.
///
/// Created on first observation, updated on change, deleted when absent
/// from a repository walk. Exclusively owns its [`crate::entities::Symbol`]s
/// and imports for graph purposes: deleting a `File` removes them too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct File {
    /// Repo-relative path, forward-slash separated regardless of platform.
    pub path: String,
    /// Detected language, e.g. `"rust"`, `"python"`.
    pub language: String,
    /// Hex digest of the file's current byte content.
    pub content_hash: String,
    /// When this file was last successfully parsed.
    pub last_parsed_at: DateTime<Utc>,
}

impl File {
    /// Builds a `File` record for a just-parsed file.
    pub fn new(
        path: impl Into<String>,
        language: impl Into<String>,
        content_hash: impl Into<String>,
        last_parsed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            path: path.into(),
            language: language.into(),
            content_hash: content_hash.into(),
            last_parsed_at,
        }
    }
}
