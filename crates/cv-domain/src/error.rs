//! Crate-wide error taxonomy.
//!
//! Each kind carries either a bare message or a message plus an optional
//! boxed source, with small constructor methods per family so call sites
//! read `Error::not_found("x")` rather than spelling out struct literals.
//! Scoped to the kinds named in the error-handling design
//! (config/store/parse/embed/edit/io/cancellation/provider), plus the
//! generic few every component needs for everyday control flow.

use thiserror::Error;

/// Result alias used throughout the core.
pub type Result<T> = std::result::Result<T, Error>;

/// The crate-wide error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Required configuration (a store URL, a collection name, ...) is
    /// absent. Fatal for the operation it blocks.
    #[error("missing configuration: {0}")]
    ConfigMissing(String),

    /// Configuration was present but failed validation.
    #[error("invalid configuration for '{key}': {message}")]
    ConfigInvalid {
        /// The offending configuration key.
        key: String,
        /// Why the value is invalid.
        message: String,
    },

    /// The graph or vector store is unreachable. Callers degrade rather
    /// than abort, per the propagation policy.
    #[error("store unavailable: {message}")]
    StoreUnavailable {
        /// Which store and why.
        message: String,
        /// Underlying transport error, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A single file failed to parse. Never aborts a sync; the caller logs
    /// and records it in the sync run's error list.
    #[error("failed to parse {path}: {reason}")]
    ParseFailure {
        /// Repo-relative path of the file that failed to parse.
        path: String,
        /// One-line reason.
        reason: String,
    },

    /// A single chunk failed to embed. Never aborts a batch.
    #[error("failed to embed chunk {chunk_id}: {reason}")]
    EmbedFailure {
        /// The chunk id that failed.
        chunk_id: String,
        /// Why embedding failed.
        reason: String,
    },

    /// A `SearchReplaceBlock`'s `search` text was not found while applying a
    /// modify edit. The whole edit aborts atomically; no partial write.
    #[error("search text not found in {file}: expected {expected:?}{found}")]
    EditSearchMiss {
        /// The file being edited.
        file: String,
        /// The text that was searched for.
        expected: String,
        /// An approximate match description, if one was found.
        found: String,
    },

    /// Deliberately not an error: a `create` edit targeting an existing
    /// file degrades to `modify`. Kept as a variant so call sites can log
    /// the degrade without it being mistaken for failure by the type
    /// system; `is_conflict_degrade` distinguishes it.
    #[error("edit conflict for {file}: file exists, degraded to modify")]
    EditConflict {
        /// The file that already existed.
        file: String,
    },

    /// Filesystem failure, always carrying the path it happened on.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The path involved.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Cooperative cancellation. Clean return; no side effects past the
    /// last completed unit of work.
    #[error("operation cancelled")]
    Cancelled,

    /// A chat/embedding provider call failed.
    #[error("provider error: {message}")]
    ProviderError {
        /// Description of the failure.
        message: String,
        /// Underlying transport error, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A caller-supplied argument was invalid.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// JSON (de)serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Anything else, with context preserved via `source`.
    #[error("internal error: {message}")]
    Internal {
        /// Description of the failure.
        message: String,
        /// Underlying error, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Error {
    /// Build a [`Error::ConfigMissing`].
    pub fn config_missing<S: Into<String>>(key: S) -> Self {
        Self::ConfigMissing(key.into())
    }

    /// Build a [`Error::ConfigInvalid`].
    pub fn config_invalid<K: Into<String>, M: Into<String>>(key: K, message: M) -> Self {
        Self::ConfigInvalid {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Build a [`Error::StoreUnavailable`] with no source.
    pub fn store_unavailable<S: Into<String>>(message: S) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
            source: None,
        }
    }

    /// Build a [`Error::StoreUnavailable`] wrapping a source error.
    pub fn store_unavailable_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::StoreUnavailable {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Build a [`Error::ParseFailure`].
    pub fn parse_failure<P: Into<String>, R: Into<String>>(path: P, reason: R) -> Self {
        Self::ParseFailure {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`Error::EmbedFailure`].
    pub fn embed_failure<C: Into<String>, R: Into<String>>(chunk_id: C, reason: R) -> Self {
        Self::EmbedFailure {
            chunk_id: chunk_id.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`Error::EditSearchMiss`].
    pub fn edit_search_miss<F, E>(file: F, expected: E, found: Option<String>) -> Self
    where
        F: Into<String>,
        E: Into<String>,
    {
        Self::EditSearchMiss {
            file: file.into(),
            expected: expected.into(),
            found: found
                .map(|f| format!(", approximate match found: {f:?}"))
                .unwrap_or_default(),
        }
    }

    /// Build a [`Error::Io`].
    pub fn io<P: Into<String>>(path: P, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Build a [`Error::ProviderError`] with no source.
    pub fn provider<S: Into<String>>(message: S) -> Self {
        Self::ProviderError {
            message: message.into(),
            source: None,
        }
    }

    /// Build a [`Error::ProviderError`] wrapping a source error.
    pub fn provider_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ProviderError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Build a [`Error::NotFound`].
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound(resource.into())
    }

    /// Build a [`Error::InvalidArgument`].
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Build a [`Error::Internal`] with no source.
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// True for the deliberate create-on-existing-file degrade, which
    /// callers should log but never treat as a failed operation.
    #[must_use]
    pub fn is_conflict_degrade(&self) -> bool {
        matches!(self, Self::EditConflict { .. })
    }
}
