//! Language support error types.

use thiserror::Error;

/// Errors raised by language detection and parsing.
#[derive(Error, Debug)]
pub enum LanguageError {
    /// No supported language matches the file's extension.
    #[error("unsupported language for {path}")]
    UnsupportedLanguage {
        /// The file path that failed detection.
        path: String,
    },

    /// The tree-sitter grammar failed to produce a tree.
    #[error("failed to parse {path}: {reason}")]
    ParseFailed {
        /// Repo-relative path of the file that failed to parse.
        path: String,
        /// One-line reason.
        reason: String,
    },
}

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, LanguageError>;
