//! Callee name extraction, with conditional-call flagging.

use tree_sitter::Node;

use crate::complexity::ComplexityAnalyzer;
use crate::cursor::CursorUtils;
use crate::language::SourceLanguage;
use crate::walker::TreeWalker;

/// A single call site found within a declaration's body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// Unqualified callee name; nested selector expressions keep only the
    /// final field name (e.g. `a.b.c()` yields `"c"`).
    pub name: String,
    /// `true` if the call site is nested inside an `if`/`switch`/ternary
    /// relative to `node`.
    pub is_conditional: bool,
}

/// Collects every call site within `node`'s subtree.
pub fn extract_calls(node: Node<'_>, source: &[u8], language: SourceLanguage) -> Vec<CallSite> {
    let call_kind = match language {
        SourceLanguage::Rust => "call_expression",
        SourceLanguage::Python => "call",
        SourceLanguage::JavaScript | SourceLanguage::TypeScript => "call_expression",
        SourceLanguage::Go => "call_expression",
    };

    TreeWalker::find_by_kind(node, call_kind)
        .into_iter()
        .filter_map(|call| callee_name(call, source).map(|name| (call, name)))
        .map(|(call, name)| CallSite {
            name,
            is_conditional: is_conditional_call(call, node, language),
        })
        .collect()
}

fn callee_name(call: Node<'_>, source: &[u8]) -> Option<String> {
    let function = call.child_by_field_name("function")?;
    let final_node = match function.kind() {
        "field_expression" | "member_expression" | "attribute" | "selector_expression" => {
            function
                .child_by_field_name("field")
                .or_else(|| function.child_by_field_name("property"))
                .or_else(|| function.child_by_field_name("attribute"))
                .unwrap_or(function)
        }
        _ => function,
    };
    final_node.utf8_text(source).ok().map(|s| s.to_string())
}

fn is_conditional_call(call: Node<'_>, scope_root: Node<'_>, language: SourceLanguage) -> bool {
    let mut current = call;
    while let Some(parent) = current.parent() {
        if parent.id() == scope_root.id() {
            break;
        }
        if ComplexityAnalyzer::is_decision_point(parent.kind(), language)
            || matches!(parent.kind(), "if_expression" | "if_statement" | "ternary_expression")
        {
            return true;
        }
        current = parent;
    }
    false
}

/// Returns the final field name of a selector/member/attribute expression,
/// or the text of `node` itself if it isn't one.
pub fn final_selector_name(node: Node<'_>, source: &[u8]) -> Option<String> {
    CursorUtils::child_by_field(node, "field")
        .or_else(|| CursorUtils::child_by_field(node, "property"))
        .and_then(|n| n.utf8_text(source).ok())
        .map(String::from)
        .or_else(|| node.utf8_text(source).ok().map(String::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(code: &str) -> tree_sitter::Tree {
        let mut parser = tree_sitter::Parser::new();
        parser.set_language(&tree_sitter_rust::LANGUAGE.into()).unwrap();
        parser.parse(code, None).unwrap()
    }

    #[test]
    fn unconditional_call_is_not_flagged() {
        let code = "fn main() { helper(); }";
        let tree = parse(code);
        let func = TreeWalker::find_first(tree.root_node(), "function_item").unwrap();
        let calls = extract_calls(func, code.as_bytes(), SourceLanguage::Rust);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "helper");
        assert!(!calls[0].is_conditional);
    }

    #[test]
    fn call_inside_if_is_flagged_conditional() {
        let code = "fn main() { if true { helper(); } }";
        let tree = parse(code);
        let func = TreeWalker::find_first(tree.root_node(), "function_item").unwrap();
        let calls = extract_calls(func, code.as_bytes(), SourceLanguage::Rust);
        assert_eq!(calls.len(), 1);
        assert!(calls[0].is_conditional);
    }

    #[test]
    fn selector_call_keeps_only_final_name() {
        let code = "fn main() { a.b.c(); }";
        let tree = parse(code);
        let func = TreeWalker::find_first(tree.root_node(), "function_item").unwrap();
        let calls = extract_calls(func, code.as_bytes(), SourceLanguage::Rust);
        assert_eq!(calls[0].name, "c");
    }
}
