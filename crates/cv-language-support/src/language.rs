//! The supported-language enum and its grammar/extension tables.

use cv_ast_utils::SourceLanguage;
use serde::{Deserialize, Serialize};

/// A language this registry has a tree-sitter grammar and node-kind rules for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageId {
    Rust,
    Python,
    JavaScript,
    TypeScript,
    Go,
}

impl LanguageId {
    /// Every language this registry supports.
    pub fn all() -> &'static [LanguageId] {
        &[
            LanguageId::Rust,
            LanguageId::Python,
            LanguageId::JavaScript,
            LanguageId::TypeScript,
            LanguageId::Go,
        ]
    }

    /// Canonical lowercase name, as recorded on `File::language`.
    pub fn name(&self) -> &'static str {
        match self {
            LanguageId::Rust => "rust",
            LanguageId::Python => "python",
            LanguageId::JavaScript => "javascript",
            LanguageId::TypeScript => "typescript",
            LanguageId::Go => "go",
        }
    }

    /// File extensions (without the leading dot) recognized for this language.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            LanguageId::Rust => &["rs"],
            LanguageId::Python => &["py", "pyi", "pyw"],
            LanguageId::JavaScript => &["js", "mjs", "cjs", "jsx"],
            LanguageId::TypeScript => &["ts", "mts", "cts", "tsx"],
            LanguageId::Go => &["go"],
        }
    }

    /// Looks up a language by (case-insensitive, dot-optional) extension.
    pub fn from_extension(ext: &str) -> Option<LanguageId> {
        let ext = ext.trim_start_matches('.').to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|lang| lang.extensions().contains(&ext.as_str()))
    }

    /// The tree-sitter grammar for this language.
    pub fn tree_sitter_language(&self) -> tree_sitter::Language {
        match self {
            LanguageId::Rust => tree_sitter_rust::LANGUAGE.into(),
            LanguageId::Python => tree_sitter_python::LANGUAGE.into(),
            LanguageId::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            LanguageId::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            LanguageId::Go => tree_sitter_go::LANGUAGE.into(),
        }
    }

    /// The [`SourceLanguage`] discriminant `cv-ast-utils`'s rule tables switch on.
    pub fn to_ast_utils(&self) -> SourceLanguage {
        match self {
            LanguageId::Rust => SourceLanguage::Rust,
            LanguageId::Python => SourceLanguage::Python,
            LanguageId::JavaScript => SourceLanguage::JavaScript,
            LanguageId::TypeScript => SourceLanguage::TypeScript,
            LanguageId::Go => SourceLanguage::Go,
        }
    }
}

impl std::fmt::Display for LanguageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tsx_resolves_to_typescript() {
        assert_eq!(LanguageId::from_extension("tsx"), Some(LanguageId::TypeScript));
    }

    #[test]
    fn unknown_extension_resolves_to_none() {
        assert_eq!(LanguageId::from_extension("unknown"), None);
    }
}
