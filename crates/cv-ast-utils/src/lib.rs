//! AST traversal and analysis utilities, built directly on tree-sitter.
//!
//! Deliberately independent of any particular language-registry crate: a
//! parser front-end hands this crate a parsed [`tree_sitter::Tree`] plus a
//! [`SourceLanguage`] discriminant, and gets back symbol locations,
//! complexity metrics, docstrings, signatures and call sites. No crate in
//! this workspace wraps a higher-level code-metrics tool; everything here
//! walks the grammar's own node kinds.
//!
//! ## Modules
//!
//! - [`walker`] — depth-first traversal and kind-based search
//! - [`cursor`] — single-node navigation helpers
//! - [`visitor`] — the visitor trait plus two ready-made visitors
//! - [`symbols`] — function/class/etc. symbol extraction
//! - [`complexity`] — branching-node complexity counts
//! - [`docstring`] — leading comment-block extraction
//! - [`signature`] — parameter-list-and-return-type text extraction
//! - [`calls`] — callee name extraction with conditional-call flagging

pub mod calls;
pub mod complexity;
pub mod cursor;
pub mod docstring;
pub mod error;
pub mod language;
pub mod signature;
pub mod symbols;
pub mod visitor;
pub mod walker;

pub use calls::{CallSite, extract_calls};
pub use complexity::{ComplexityAnalyzer, ComplexityMetrics};
pub use cursor::CursorUtils;
pub use docstring::extract_docstring;
pub use error::{AstError, Result};
pub use language::SourceLanguage;
pub use signature::extract_signature;
pub use symbols::{SymbolExtractor, SymbolInfo, SymbolInfoKind, Visibility, infer_visibility};
pub use visitor::{KindCollector, KindCounter, NodeMatch, NodeVisitor};
pub use walker::TreeWalker;
