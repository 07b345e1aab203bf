//! Extension-based language detection.

use std::path::Path;

use crate::error::{LanguageError, Result};
use crate::language::LanguageId;

/// Detects a file's language from its path.
#[derive(Debug, Default, Clone, Copy)]
pub struct LanguageDetector;

impl LanguageDetector {
    /// Builds a detector. Stateless; extension tables live on [`LanguageId`].
    pub fn new() -> Self {
        Self
    }

    /// Detects the language of `path`, erroring if no registered language
    /// claims its extension.
    pub fn detect(&self, path: &Path) -> Result<LanguageId> {
        self.detect_opt(path)
            .ok_or_else(|| LanguageError::UnsupportedLanguage {
                path: path.display().to_string(),
            })
    }

    /// Detects the language of `path`, returning `None` instead of erroring.
    pub fn detect_opt(&self, path: &Path) -> Option<LanguageId> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(LanguageId::from_extension)
    }

    /// `true` if `path`'s language is one of `allowed`.
    pub fn matches(&self, path: &Path, allowed: &[LanguageId]) -> bool {
        self.detect_opt(path).is_some_and(|lang| allowed.contains(&lang))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_rust_by_extension() {
        let detector = LanguageDetector::new();
        assert_eq!(detector.detect(Path::new("main.rs")).unwrap(), LanguageId::Rust);
    }

    #[test]
    fn unknown_extension_is_an_error() {
        let detector = LanguageDetector::new();
        assert!(detector.detect(Path::new("README.md")).is_err());
    }

    #[test]
    fn matches_checks_membership() {
        let detector = LanguageDetector::new();
        assert!(detector.matches(Path::new("main.rs"), &[LanguageId::Rust, LanguageId::Go]));
        assert!(!detector.matches(Path::new("main.rs"), &[LanguageId::Python]));
    }
}
