//! Code chunks: the unit the Indexer emits and the Context Engine retrieves.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A contiguous slice of a source file, embedded and stored for retrieval.
///
/// `id` is not random: it is a deterministic digest of the fields that
/// define the chunk's identity, so re-indexing an unchanged region of a
/// file reproduces the same id and the sync engine can diff by id alone
/// instead of re-embedding unchanged chunks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Deterministic hex digest of `path`, `start_line`, `end_line` and `text`.
    pub id: String,
    /// Path of the owning file, relative to the codebase root.
    pub file: String,
    /// Name of the symbol this chunk corresponds to, if any.
    pub symbol_name: Option<String>,
    /// 1-indexed, inclusive start line.
    pub start_line: u32,
    /// 1-indexed, inclusive end line.
    pub end_line: u32,
    /// Raw chunk text, as it appears in the source file.
    pub text: String,
    /// Language this chunk was parsed as.
    pub language: String,
    /// Docstring/doc-comment attached to the chunk's symbol, if any.
    pub docstring: Option<String>,
}

impl Chunk {
    /// Builds a chunk, computing its deterministic id from its content fields.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        file: impl Into<String>,
        symbol_name: Option<String>,
        start_line: u32,
        end_line: u32,
        text: impl Into<String>,
        language: impl Into<String>,
        docstring: Option<String>,
    ) -> Self {
        let file = file.into();
        let text = text.into();
        let language = language.into();
        let id = Self::compute_id(&file, start_line, end_line, &text);
        Self {
            id,
            file,
            symbol_name,
            start_line,
            end_line,
            text,
            language,
            docstring,
        }
    }

    /// Computes the deterministic chunk id for the given identity fields.
    ///
    /// `path || startLine || endLine || text`, SHA-256, hex-encoded. Any
    /// edit to `text` (even a single byte) changes the id.
    pub fn compute_id(path: &str, start_line: u32, end_line: u32, text: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(path.as_bytes());
        hasher.update(start_line.to_le_bytes());
        hasher.update(end_line.to_le_bytes());
        hasher.update(text.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Line count spanned by this chunk.
    pub fn line_count(&self) -> u32 {
        self.end_line.saturating_sub(self.start_line) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_content_reproduces_same_id() {
        let a = Chunk::compute_id("src/lib.rs", 1, 10, "fn foo() {}");
        let b = Chunk::compute_id("src/lib.rs", 1, 10, "fn foo() {}");
        assert_eq!(a, b);
    }

    #[test]
    fn single_byte_edit_changes_id() {
        let a = Chunk::compute_id("src/lib.rs", 1, 10, "fn foo() {}");
        let b = Chunk::compute_id("src/lib.rs", 1, 10, "fn foo() {} ");
        assert_ne!(a, b);
    }

    #[test]
    fn line_count_is_inclusive() {
        let c = Chunk::new("src/lib.rs", None, 5, 5, "x", "rust", None);
        assert_eq!(c.line_count(), 1);
    }
}
