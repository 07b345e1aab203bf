//! Language registry, parser front-ends and chunking.
//!
//! Parses supported languages directly via tree-sitter grammars (no
//! higher-level code-metrics tool sits between this crate and the
//! grammars) and turns the result into embedding-sized [`Chunk`]s.
//!
//! ## Modules
//!
//! - [`language`] — the supported-language enum and its grammar/extension tables
//! - [`detection`] — extension-based language detection
//! - [`parser`] — the [`ParserRegistry`]: `parse(path, bytes) -> ParsedFile`
//! - [`chunking`] — the [`chunking::Chunker`]

pub mod chunking;
pub mod detection;
pub mod error;
pub mod language;
pub mod parser;

pub use chunking::Chunker;
pub use cv_domain::value_objects::Chunk;
pub use detection::LanguageDetector;
pub use error::{LanguageError, Result};
pub use language::LanguageId;
pub use parser::{ParsedFile, ParserRegistry};
