//! Parameter-list-and-return-type text extraction.

use tree_sitter::Node;

/// Text of `node` from its start up to (but excluding) its body delimiter.
///
/// The body is located via the grammar's `body` field, falling back to the
/// first `block`/`compound_statement`/`suite` child; if no body is found
/// (e.g. an abstract/trait method), the whole node's text is returned.
pub fn extract_signature(node: Node<'_>, source: &[u8]) -> Option<String> {
    let body = node.child_by_field_name("body").or_else(|| {
        let mut cursor = node.walk();
        node.children(&mut cursor)
            .find(|c| matches!(c.kind(), "block" | "compound_statement" | "suite"))
    });

    let end_byte = match body {
        Some(body) => body.start_byte(),
        None => node.end_byte(),
    };

    let start_byte = node.start_byte();
    if end_byte < start_byte {
        return None;
    }

    std::str::from_utf8(&source[start_byte..end_byte])
        .ok()
        .map(|s| s.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walker::TreeWalker;

    #[test]
    fn signature_stops_before_body() {
        let code = "fn foo(x: i32) -> i32 { x + 1 }";
        let mut parser = tree_sitter::Parser::new();
        parser.set_language(&tree_sitter_rust::LANGUAGE.into()).unwrap();
        let tree = parser.parse(code, None).unwrap();
        let func = TreeWalker::find_first(tree.root_node(), "function_item").unwrap();
        let sig = extract_signature(func, code.as_bytes()).unwrap();
        assert_eq!(sig, "fn foo(x: i32) -> i32");
    }
}
