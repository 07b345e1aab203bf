//! The discriminant every per-language rule table in this crate switches on.

/// A source language this crate has node-kind tables for.
///
/// Intentionally not tied to any registry crate's language enum: parser
/// front-ends convert their own language identifiers into this one at the
/// call site, so this crate never depends on a language-registry crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceLanguage {
    Rust,
    Python,
    JavaScript,
    TypeScript,
    Go,
}
