//! Graph edge type names.
//!
//! Namespaced with a `cv_` prefix so this core's own edge types never
//! collide with an unrelated feature sharing the same graph database.

/// File DEFINES Symbol.
pub const DEFINES: &str = "CV_DEFINES";
/// Symbol CALLS Symbol.
pub const CALLS: &str = "CV_CALLS";
/// File IMPORTS File|External.
pub const IMPORTS: &str = "CV_IMPORTS";
/// Symbol IMPLEMENTS Symbol.
pub const IMPLEMENTS: &str = "CV_IMPLEMENTS";
/// Symbol EXTENDS Symbol.
pub const EXTENDS: &str = "CV_EXTENDS";

/// Node label for a [`crate::entities::File`].
pub const LABEL_FILE: &str = "CvFile";
/// Node label for a [`crate::entities::Symbol`].
pub const LABEL_SYMBOL: &str = "CvSymbol";
