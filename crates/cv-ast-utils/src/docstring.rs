//! Leading comment-block extraction: a declaration's docstring.

use tree_sitter::Node;

/// The contiguous comment block immediately preceding `node`, trimmed.
///
/// Walks backward over `node`'s previous siblings while they are comment
/// nodes separated only by whitespace, then concatenates them in source
/// order. Returns `None` if `node` has no immediately preceding comment.
pub fn extract_docstring(node: Node<'_>, source: &[u8]) -> Option<String> {
    let mut comments = Vec::new();
    let mut current = node.prev_sibling();
    let mut expected_end_line = node.start_position().row;

    while let Some(sibling) = current {
        if sibling.kind() != "comment" && sibling.kind() != "line_comment" {
            break;
        }
        if sibling.end_position().row + 1 < expected_end_line {
            break;
        }
        expected_end_line = sibling.start_position().row;
        comments.push(sibling);
        current = sibling.prev_sibling();
    }

    if comments.is_empty() {
        return None;
    }

    comments.reverse();
    let text = comments
        .iter()
        .filter_map(|c| c.utf8_text(source).ok())
        .map(strip_comment_markers)
        .collect::<Vec<_>>()
        .join("\n");

    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn strip_comment_markers(line: &str) -> String {
    let line = line.trim();
    line.trim_start_matches("///")
        .trim_start_matches("//!")
        .trim_start_matches("//")
        .trim_start_matches("/**")
        .trim_start_matches("/*")
        .trim_end_matches("*/")
        .trim_start_matches('#')
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walker::TreeWalker;

    #[test]
    fn extracts_line_comment_block_above_function() {
        let code = "/// abs\nfn abs(x: i32) -> i32 { x }";
        let mut parser = tree_sitter::Parser::new();
        parser.set_language(&tree_sitter_rust::LANGUAGE.into()).unwrap();
        let tree = parser.parse(code, None).unwrap();
        let func = TreeWalker::find_first(tree.root_node(), "function_item").unwrap();
        assert_eq!(extract_docstring(func, code.as_bytes()), Some("abs".to_string()));
    }

    #[test]
    fn no_preceding_comment_yields_none() {
        let code = "fn plain() {}";
        let mut parser = tree_sitter::Parser::new();
        parser.set_language(&tree_sitter_rust::LANGUAGE.into()).unwrap();
        let tree = parser.parse(code, None).unwrap();
        let func = TreeWalker::find_first(tree.root_node(), "function_item").unwrap();
        assert_eq!(extract_docstring(func, code.as_bytes()), None);
    }
}
