//! The Parser Registry: per-language tree-sitter front-ends.
//!
//! Maps a file extension to a language, parses it with that language's
//! tree-sitter grammar, and enriches the raw AST into domain [`Symbol`],
//! [`Import`] and unresolved [`CallRecord`] values. No higher-level
//! code-metrics tool sits between this crate and the grammars; every
//! extraction rule walks node kinds directly via `cv-ast-utils`.

use cv_ast_utils::{ComplexityAnalyzer, CursorUtils, SymbolExtractor, SymbolInfo, SymbolInfoKind, TreeWalker};
use cv_domain::entities::{Call, Import, Symbol, SymbolKind};
use cv_domain::ports::CallRecord;
use std::path::Path;
use tree_sitter::Node;

use crate::detection::LanguageDetector;
use crate::error::{LanguageError, Result};
use crate::language::LanguageId;

/// The full result of parsing one file.
#[derive(Debug, Clone)]
pub struct ParsedFile {
 /// The detected language.
 pub language: LanguageId,
 /// Every declaration the grammar recognizes as a symbol.
 pub symbols: Vec<Symbol>,
 /// Import statements found at the top level.
 pub imports: Vec<Import>,
 /// Qualified names of this file's public-visibility symbols.
 pub exports: Vec<String>,
 /// Unresolved call sites, ready for the Graph Writer to resolve.
 pub calls: Vec<CallRecord>,
}

/// Maps file extensions to languages and drives per-language parsing.
#[derive(Debug, Default, Clone)]
pub struct ParserRegistry {
 detector: LanguageDetector,
}

impl ParserRegistry {
 /// Builds a registry over every supported language.
 pub fn new() -> Self {
 Self {
 detector: LanguageDetector::new(),
 }
 }

 /// Every extension this registry recognizes, across all languages.
 pub fn supported_extensions(&self) -> Vec<&'static str> {
 LanguageId::all()
.iter()
.flat_map(|lang| lang.extensions().iter().copied())
.collect()
 }

 /// Parses `bytes` as the file at `path`, detecting its language from the
 /// extension. On failure, callers are expected to skip the file
 /// and record the error rather than abort a sync run.
 pub fn parse(&self, path: &Path, bytes: &[u8]) -> Result<ParsedFile> {
 let language = self.detector.detect(path)?;
 self.parse_as(path, bytes, language)
 }

 /// Parses `bytes` under an explicitly chosen `language`, bypassing detection.
 pub fn parse_as(&self, path: &Path, bytes: &[u8], language: LanguageId) -> Result<ParsedFile> {
 let mut parser = tree_sitter::Parser::new();
 parser
.set_language(&language.tree_sitter_language())
.map_err(|e| LanguageError::ParseFailed {
 path: path.display().to_string(),
 reason: format!("grammar load failed: {e}"),
 })?;

 let tree = parser
.parse(bytes, None)
.ok_or_else(|| LanguageError::ParseFailed {
 path: path.display().to_string(),
 reason: "tree-sitter returned no tree".to_string(),
 })?;

 let path_str = path.display().to_string();
 let ast_language = language.to_ast_utils();
 let raw_symbols = SymbolExtractor::extract(&tree, bytes, ast_language);

 let mut symbols = Vec::with_capacity(raw_symbols.len());
 let mut calls = Vec::new();
 for info in &raw_symbols {
 let Some(node) = find_node_at(tree.root_node(), info) else {
 continue;
 };
 let qualified_name = match &info.receiver {
 Some(receiver) => format!("{path_str}:{receiver}.{}", info.name),
 None => format!("{path_str}:{}", info.name),
 };
 let symbol_calls = cv_ast_utils::extract_calls(node, bytes, ast_language);
 for call in &symbol_calls {
 calls.push(CallRecord {
 caller_qualified_name: qualified_name.clone(),
 callee_name: call.name.clone(),
 is_conditional: call.is_conditional,
 });
 }

 symbols.push(Symbol {
 qualified_name,
 name: info.name.clone(),
 kind: map_symbol_kind(info.kind),
 file: path_str.clone(),
 start_line: docstring_start_line(node, info),
 end_line: (info.end_line + 1) as u32,
 signature: cv_ast_utils::extract_signature(node, bytes),
 docstring: cv_ast_utils::extract_docstring(node, bytes),
 visibility: map_visibility(cv_ast_utils::infer_visibility(node, bytes, ast_language)),
 is_async: is_async_node(node),
 complexity: ComplexityAnalyzer::analyze(node, ast_language).cyclomatic as u32,
 calls: symbol_calls
.into_iter()
.map(|c| Call {
 name: c.name,
 is_conditional: c.is_conditional,
 })
.collect(),
 });
 }

 let exports = symbols
.iter()
.filter(|s| s.visibility == cv_domain::entities::Visibility::Public)
.map(|s| s.qualified_name.clone())
.collect();

 let imports = extract_imports(tree.root_node(), bytes, &path_str, language);

 Ok(ParsedFile {
 language,
 symbols,
 imports,
 exports,
 calls,
 })
 }
}

/// Re-finds the tree-sitter node a [`SymbolInfo`] was extracted from.
///
/// `SymbolExtractor` only reports positions; re-walking by `node_kind` and
/// start position avoids threading `Node` handles (which borrow the tree)
/// back out of the extraction pass.
fn find_node_at<'a>(root: Node<'a>, info: &SymbolInfo) -> Option<Node<'a>> {
 TreeWalker::find_by_kind(root, info.node_kind)
.into_iter()
.find(|n| n.start_position().row == info.start_line && n.start_position().column == info.start_column)
}

/// 1-indexed start line, pulled back to include a leading docstring block
/// when one is attached (the start line covers "including its docstring").
fn docstring_start_line(node: Node<'_>, info: &SymbolInfo) -> u32 {
 let mut current = node.prev_sibling();
 let mut earliest = info.start_line;
 let mut expected_end = info.start_line;
 while let Some(sibling) = current {
 if !matches!(sibling.kind(), "comment" | "line_comment") {
 break;
 }
 if sibling.end_position().row + 1 < expected_end {
 break;
 }
 earliest = sibling.start_position().row;
 expected_end = sibling.start_position().row;
 current = sibling.prev_sibling();
 }
 (earliest + 1) as u32
}

fn is_async_node(node: Node<'_>) -> bool {
 CursorUtils::count_children_of_kind(node, "async") > 0
}

fn map_symbol_kind(kind: SymbolInfoKind) -> SymbolKind {
 match kind {
 SymbolInfoKind::Function => SymbolKind::Function,
 SymbolInfoKind::Method => SymbolKind::Method,
 SymbolInfoKind::Class => SymbolKind::Class,
 SymbolInfoKind::Module => SymbolKind::Variable,
 SymbolInfoKind::Interface => SymbolKind::Interface,
 SymbolInfoKind::Enum => SymbolKind::Enum,
 }
}

fn map_visibility(v: cv_ast_utils::Visibility) -> cv_domain::entities::Visibility {
 match v {
 cv_ast_utils::Visibility::Public => cv_domain::entities::Visibility::Public,
 cv_ast_utils::Visibility::Private => cv_domain::entities::Visibility::Private,
 cv_ast_utils::Visibility::Protected => cv_domain::entities::Visibility::Protected,
 }
}

fn import_node_kind(language: LanguageId) -> &'static str {
 match language {
 LanguageId::Rust => "use_declaration",
 LanguageId::Python => "import_statement",
 LanguageId::JavaScript | LanguageId::TypeScript => "import_statement",
 LanguageId::Go => "import_spec",
 }
}

fn extract_imports(root: Node<'_>, source: &[u8], path: &str, language: LanguageId) -> Vec<Import> {
 let mut imports: Vec<Import> = TreeWalker::find_by_kind(root, import_node_kind(language))
.into_iter()
.filter_map(|node| node.utf8_text(source).ok().map(|text| (node, text.trim().to_string())))
.map(|(node, text)| Import {
 file: path.to_string(),
 source: text,
 imported_names: Vec::new(),
 is_external: !is_relative_import(node, source, language),
 })
.collect();

 if matches!(language, LanguageId::Python) {
 imports.extend(
 TreeWalker::find_by_kind(root, "import_from_statement")
.into_iter()
.filter_map(|node| node.utf8_text(source).ok().map(|text| (node, text.trim().to_string())))
.map(|(node, text)| Import {
 file: path.to_string(),
 source: text,
 imported_names: Vec::new(),
 is_external: !is_relative_import(node, source, language),
 }),
 );
 }

 imports
}

/// Heuristic: a relative import starts with `.`/`./`/`../` (Python/JS/TS) or
/// names a path under the current module (Rust `self`/`super`/`crate`). Go
/// modules have no relative-import concept, so every Go import is external.
fn is_relative_import(node: Node<'_>, source: &[u8], language: LanguageId) -> bool {
 let Ok(text) = node.utf8_text(source) else {
 return false;
 };
 match language {
 LanguageId::Go => false,
 LanguageId::Rust => {
 let text = text.trim_start_matches("use ").trim_start();
 text.starts_with("self::") || text.starts_with("super::") || text.starts_with("crate::")
 }
 LanguageId::Python | LanguageId::JavaScript | LanguageId::TypeScript => {
 text.contains("\"./") || text.contains("'./") || text.contains("\"../") || text.contains("'../")
 || text.trim_start().starts_with("from.")
 }
 }
}

#[cfg(test)]
mod tests {
 use super::*;
 use std::path::PathBuf;

 #[test]
 fn typescript_function_matches_scenario_a() {
 let registry = ParserRegistry::new();
 let code = b"/** abs */\nexport function foo(x: number): number { if (x>0) return x; return -x; }";
 let parsed = registry
.parse(&PathBuf::from("src/a.ts"), code)
.expect("should parse");

 assert_eq!(parsed.symbols.len(), 1);
 let foo = &parsed.symbols[0];
 assert_eq!(foo.qualified_name, "src/a.ts:foo");
 assert_eq!(foo.kind, SymbolKind::Function);
 assert_eq!(foo.complexity, 2);
 assert_eq!(foo.visibility, cv_domain::entities::Visibility::Public);
 assert_eq!(foo.docstring.as_deref(), Some("abs"));
 assert!(foo.signature.as_deref().unwrap().contains("foo(x: number): number"));
 }

 #[test]
 fn rust_free_function_is_public_by_default() {
 let registry = ParserRegistry::new();
 let code = b"fn helper() -> i32 { 1 }";
 let parsed = registry
.parse(&PathBuf::from("src/lib.rs"), code)
.expect("should parse");
 assert_eq!(parsed.symbols[0].visibility, cv_domain::entities::Visibility::Private);
 }

 #[test]
 fn go_uppercase_function_is_public() {
 let registry = ParserRegistry::new();
 let code = b"package main\nfunc Exported() {}\nfunc hidden() {}";
 let parsed = registry
.parse(&PathBuf::from("main.go"), code)
.expect("should parse");
 let exported = parsed.symbols.iter().find(|s| s.name == "Exported").unwrap();
 let hidden = parsed.symbols.iter().find(|s| s.name == "hidden").unwrap();
 assert_eq!(exported.visibility, cv_domain::entities::Visibility::Public);
 assert_eq!(hidden.visibility, cv_domain::entities::Visibility::Private);
 }

 #[test]
 fn calls_are_recorded_against_their_caller() {
 let registry = ParserRegistry::new();
 let code = b"fn main() { helper(); }\nfn helper() {}";
 let parsed = registry
.parse(&PathBuf::from("src/main.rs"), code)
.expect("should parse");
 let call = parsed
.calls
.iter()
.find(|c| c.callee_name == "helper")
.expect("call recorded");
 assert_eq!(call.caller_qualified_name, "src/main.rs:main");
 assert!(!call.is_conditional);
 }

 #[test]
 fn unsupported_extension_is_an_error() {
 let registry = ParserRegistry::new();
 assert!(registry.parse(&PathBuf::from("README.md"), b"# hi").is_err());
 }

 #[test]
 fn methods_on_different_receivers_get_distinct_qualified_names() {
 let registry = ParserRegistry::new();
 let code = b"struct A; struct B;\nimpl A { fn foo(&self) {} }\nimpl B { fn foo(&self) {} }";
 let parsed = registry
.parse(&PathBuf::from("src/lib.rs"), code)
.expect("should parse");

 let foos: Vec<_> = parsed.symbols.iter().filter(|s| s.name == "foo").collect();
 assert_eq!(foos.len(), 2);
 let qualified_names: std::collections::HashSet<_> =
 foos.iter().map(|s| s.qualified_name.as_str()).collect();
 assert_eq!(qualified_names.len(), 2);
 assert!(qualified_names.contains("src/lib.rs:A.foo"));
 assert!(qualified_names.contains("src/lib.rs:B.foo"));
 }
}
