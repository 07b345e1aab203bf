//! Function/class/etc. symbol extraction from a parsed tree.

use tree_sitter::{Node, Tree};

use crate::cursor::CursorUtils;
use crate::language::SourceLanguage;
use crate::walker::TreeWalker;

/// The syntactic kind a raw AST symbol was extracted as.
///
/// Distinct from any domain-level symbol-kind type: this is purely what the
/// grammar's node kind implies, before a parser front-end maps it onto its
/// own vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolInfoKind {
 Function,
 Method,
 Class,
 Module,
 Interface,
 Enum,
}

/// A symbol as extracted directly from AST node positions, pre-enrichment.
#[derive(Debug, Clone)]
pub struct SymbolInfo {
 pub name: String,
 pub kind: SymbolInfoKind,
 /// 0-indexed start line.
 pub start_line: usize,
 /// 0-indexed end line.
 pub end_line: usize,
 /// 0-indexed start column.
 pub start_column: usize,
 pub node_kind: &'static str,
 /// Enclosing type name for a method (the `impl`/class/receiver type), if any.
 pub receiver: Option<String>,
}

/// Declared or inferred accessibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
 Public,
 Private,
 Protected,
}

type SymbolMapping = &'static [(&'static str, SymbolInfoKind)];
type FunctionChecks = &'static [(&'static str, &'static str)];

/// Extracts [`SymbolInfo`] records from a parsed tree.
pub struct SymbolExtractor;

impl SymbolExtractor {
 /// Extracts every top-level-and-nested declaration `language`'s grammar
 /// recognizes as a symbol.
 pub fn extract(tree: &Tree, source: &[u8], language: SourceLanguage) -> Vec<SymbolInfo> {
 let root = tree.root_node();
 let mut symbols = Vec::new();

 let (mapping, checks): (SymbolMapping, FunctionChecks) = match language {
 SourceLanguage::Rust => (
 &[
 ("struct_item", SymbolInfoKind::Class),
 ("trait_item", SymbolInfoKind::Interface),
 ("enum_item", SymbolInfoKind::Enum),
 ("mod_item", SymbolInfoKind::Module),
 ],
 &[("function_item", "impl_item")],
 ),
 SourceLanguage::Python => (
 &[("class_definition", SymbolInfoKind::Class)],
 &[("function_definition", "class_definition")],
 ),
 SourceLanguage::JavaScript | SourceLanguage::TypeScript => (
 &[
 ("function_declaration", SymbolInfoKind::Function),
 ("method_definition", SymbolInfoKind::Method),
 ("class_declaration", SymbolInfoKind::Class),
 ],
 &[],
 ),
 SourceLanguage::Go => (
 &[
 ("type_declaration", SymbolInfoKind::Class),
 ("method_declaration", SymbolInfoKind::Method),
 ],
 &[("function_declaration", "")],
 ),
 };

 for (node_kind, symbol_kind) in mapping {
 Self::extract_of_kind(root, source, node_kind, *symbol_kind, &mut symbols);
 }

 for (func_kind, parent_kind) in checks {
 Self::extract_functions(root, source, func_kind, parent_kind, &mut symbols);
 }

 symbols
 }

 /// Extracts a declaration node's name, trying common grammar field names
 /// first and falling back to the first identifier child.
 pub fn extract_name(node: Node<'_>, source: &[u8]) -> Option<String> {
 for field in &["name", "declarator", "identifier"] {
 if let Some(name_node) = CursorUtils::child_by_field(node, field) {
 if matches!(name_node.kind(), "function_declarator" | "declarator") {
 return Self::extract_name(name_node, source);
 }
 if let Ok(name) = name_node.utf8_text(source) {
 return Some(name.to_string());
 }
 }
 }
 CursorUtils::first_child_of_kind(node, "identifier")
.or_else(|| CursorUtils::first_child_of_kind(node, "type_identifier"))
.and_then(|n| n.utf8_text(source).ok())
.map(String::from)
 }

 fn extract_of_kind(
 node: Node<'_>,
 source: &[u8],
 node_kind: &'static str,
 symbol_kind: SymbolInfoKind,
 symbols: &mut Vec<SymbolInfo>,
 ) {
 for item in TreeWalker::find_by_kind(node, node_kind) {
 if let Some(name) = Self::extract_name(item, source) {
 let receiver = matches!(symbol_kind, SymbolInfoKind::Method)
.then(|| extract_receiver(item, source))
.flatten();
 symbols.push(SymbolInfo {
 name,
 kind: symbol_kind,
 start_line: item.start_position().row,
 end_line: item.end_position().row,
 start_column: item.start_position().column,
 node_kind,
 receiver,
 });
 }
 }
 }

 fn extract_functions(
 node: Node<'_>,
 source: &[u8],
 func_kind: &'static str,
 parent_kind: &str,
 symbols: &mut Vec<SymbolInfo>,
 ) {
 for func in TreeWalker::find_by_kind(node, func_kind) {
 if let Some(name) = Self::extract_name(func, source) {
 let is_method =
 !parent_kind.is_empty() && TreeWalker::is_inside_kind(func, parent_kind);
 let receiver = if is_method { extract_receiver(func, source) } else { None };
 symbols.push(SymbolInfo {
 name,
 kind: if is_method {
 SymbolInfoKind::Method
 } else {
 SymbolInfoKind::Function
 },
 start_line: func.start_position().row,
 end_line: func.end_position().row,
 start_column: func.start_position().column,
 node_kind: func_kind,
 receiver,
 });
 }
 }
 }
}

/// Finds the enclosing type name for a method node: a Go receiver's type
/// (its own `receiver` field), or the nearest enclosing `impl`/class
/// declaration's type/name field.
fn extract_receiver(node: Node<'_>, source: &[u8]) -> Option<String> {
 if let Some(receiver) = CursorUtils::child_by_field(node, "receiver") {
 return TreeWalker::find_by_kind(receiver, "type_identifier")
.first()
.and_then(|n| n.utf8_text(source).ok())
.map(|s| s.trim_start_matches('*').to_string());
 }

 for ancestor in TreeWalker::ancestors(node) {
 let field = match ancestor.kind() {
 "impl_item" => "type",
 "class_declaration" | "class_definition" => "name",
 _ => continue,
 };
 if let Some(type_node) = CursorUtils::child_by_field(ancestor, field) {
 return type_node.utf8_text(source).ok().map(String::from);
 }
 }
 None
}

/// Infers a declaration's [`Visibility`] using per-language rules: Go
/// marks public via an uppercase leading letter in the identifier;
/// Python/JS/TS mark private via a leading underscore (advisory); everything
/// else defaults to public unless the grammar exposes an explicit modifier.
pub fn infer_visibility(node: Node<'_>, source: &[u8], language: SourceLanguage) -> Visibility {
 let name = SymbolExtractor::extract_name(node, source).unwrap_or_default();
 match language {
 SourceLanguage::Go => {
 if name.chars().next().is_some_and(|c| c.is_uppercase()) {
 Visibility::Public
 } else {
 Visibility::Private
 }
 }
 SourceLanguage::Python | SourceLanguage::JavaScript | SourceLanguage::TypeScript => {
 if name.starts_with('_') {
 Visibility::Private
 } else {
 Visibility::Public
 }
 }
 SourceLanguage::Rust => {
 if CursorUtils::first_child_of_kind(node, "visibility_modifier").is_some() {
 Visibility::Public
 } else {
 Visibility::Private
 }
 }
 }
}

#[cfg(test)]
mod tests {
 use super::*;

 fn parse_rust(code: &str) -> Tree {
 let mut parser = tree_sitter::Parser::new();
 parser
.set_language(&tree_sitter_rust::LANGUAGE.into())
.expect("load rust grammar");
 parser.parse(code, None).unwrap()
 }

 #[test]
 fn extracts_free_function() {
 let tree = parse_rust("fn foo() {}");
 let symbols = SymbolExtractor::extract(&tree, b"fn foo() {}", SourceLanguage::Rust);
 assert_eq!(symbols.len(), 1);
 assert_eq!(symbols[0].name, "foo");
 assert_eq!(symbols[0].kind, SymbolInfoKind::Function);
 }

 #[test]
 fn method_inside_impl_block_is_flagged() {
 let code = "struct S; impl S { fn bar(&self) {} }";
 let tree = parse_rust(code);
 let symbols = SymbolExtractor::extract(&tree, code.as_bytes(), SourceLanguage::Rust);
 let method = symbols
.iter()
.find(|s| s.name == "bar")
.expect("method symbol");
 assert_eq!(method.kind, SymbolInfoKind::Method);
 assert_eq!(method.receiver.as_deref(), Some("S"));
 }

 #[test]
 fn free_function_has_no_receiver() {
 let code = "fn foo() {}";
 let tree = parse_rust(code);
 let symbols = SymbolExtractor::extract(&tree, code.as_bytes(), SourceLanguage::Rust);
 assert_eq!(symbols[0].receiver, None);
 }

 #[test]
 fn rust_without_pub_is_private() {
 let code = "fn hidden() {}";
 let tree = parse_rust(code);
 let func = TreeWalker::find_first(tree.root_node(), "function_item").unwrap();
 assert_eq!(
 infer_visibility(func, code.as_bytes(), SourceLanguage::Rust),
 Visibility::Private
 );
 }
}
