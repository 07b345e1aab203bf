//! The `Symbol` and `Import` entities extracted from a parsed `File`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The syntactic kind a [`Symbol`] was extracted as.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    strum_macros::Display,
    strum_macros::AsRefStr,
    strum_macros::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SymbolKind {
    Function,
    Method,
    Class,
    Struct,
    Interface,
    Type,
    Enum,
    Variable,
}

/// Declared accessibility of a [`Symbol`], inferred per-language.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    JsonSchema,
    strum_macros::Display,
    strum_macros::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Visibility {
    Public,
    Private,
    Protected,
}

impl Default for Visibility {
    fn default() -> Self {
        Self::Public
    }
}

/// A function, method, type or similar declaration extracted from a `File`.
///
/// Tied to its parent [`crate::entities::File`]: rewritten in full on every
/// re-parse of that file, never patched incrementally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Symbol {
    /// Globally unique (within one repo/workspace graph) key: `path:scope.name`.
    pub qualified_name: String,
    /// Bare declared name.
    pub name: String,
    /// Syntactic kind.
    pub kind: SymbolKind,
    /// Owning file's path.
    pub file: String,
    /// 1-indexed, inclusive start line of the declaration (including its docstring).
    pub start_line: u32,
    /// 1-indexed, inclusive end line of the declaration.
    pub end_line: u32,
    /// Parameter list and return type, as text up to the body delimiter.
    pub signature: Option<String>,
    /// Contiguous comment block immediately preceding the declaration, trimmed.
    pub docstring: Option<String>,
    /// Declared or inferred accessibility.
    pub visibility: Visibility,
    /// Whether the declaration is an async function/method.
    pub is_async: bool,
    /// Count of branching nodes inside the body. Minimum 1.
    pub complexity: u32,
    /// Callee names referenced within the body, with conditional flags.
    pub calls: Vec<Call>,
}

/// A single call-site reference collected from a `Symbol`'s body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Call {
    /// Unqualified callee name (final field name of a selector expression).
    pub name: String,
    /// Whether the call site is nested inside an `if`/`switch`/ternary.
    pub is_conditional: bool,
}

/// An import statement owned by a `File`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Import {
    /// Owning file's path.
    pub file: String,
    /// Raw import source, e.g. a module path or package name.
    pub source: String,
    /// Names brought into scope by this import, if the language distinguishes them.
    pub imported_names: Vec<String>,
    /// Whether `source` resolves outside this repository.
    pub is_external: bool,
}
