//! AST utility error types.

use thiserror::Error;

/// AST utilities error type.
#[derive(Error, Debug)]
pub enum AstError {
    /// Tree-sitter parsing failed.
    #[error("failed to parse source: {reason}")]
    ParseFailed {
        /// Reason for failure.
        reason: String,
    },

    /// No registered grammar matches a requested language.
    #[error("unsupported language for tree-sitter: {language}")]
    UnsupportedLanguage {
        /// The unsupported language name.
        language: String,
    },
}

/// Result alias for AST utility operations.
pub type Result<T> = std::result::Result<T, AstError>;
