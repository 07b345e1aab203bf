//! Depth-first traversal and kind-based search over a parsed tree.

use tree_sitter::{Node, Tree};

use crate::visitor::NodeVisitor;

/// Tree traversal utilities.
pub struct TreeWalker;

impl TreeWalker {
    /// Depth-first traversal of `tree`, calling `visitor` at each node.
    pub fn walk<V: NodeVisitor>(tree: &Tree, source: &[u8], visitor: &mut V, ctx: &mut V::Context) {
        Self::walk_node(tree.root_node(), source, visitor, ctx);
    }

    /// Depth-first traversal starting from an arbitrary node.
    pub fn walk_node<V: NodeVisitor>(
        node: Node<'_>,
        source: &[u8],
        visitor: &mut V,
        ctx: &mut V::Context,
    ) {
        let should_continue = visitor.visit(node, source, ctx);

        if should_continue {
            let mut cursor = node.walk();
            if cursor.goto_first_child() {
                loop {
                    Self::walk_node(cursor.node(), source, visitor, ctx);
                    if !cursor.goto_next_sibling() {
                        break;
                    }
                }
            }
        }

        visitor.leave(node, source, ctx);
    }

    /// Every descendant of `node` (including `node`) whose kind equals `kind`.
    pub fn find_by_kind<'a>(node: Node<'a>, kind: &str) -> Vec<Node<'a>> {
        let mut results = Vec::new();
        Self::find_by_kind_recursive(node, kind, &mut results);
        results
    }

    fn find_by_kind_recursive<'a>(node: Node<'a>, kind: &str, results: &mut Vec<Node<'a>>) {
        if node.kind() == kind {
            results.push(node);
        }
        let mut cursor = node.walk();
        if cursor.goto_first_child() {
            loop {
                Self::find_by_kind_recursive(cursor.node(), kind, results);
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }
    }

    /// The first descendant of `node` (including `node`) whose kind equals `kind`.
    pub fn find_first<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
        if node.kind() == kind {
            return Some(node);
        }
        let mut cursor = node.walk();
        if cursor.goto_first_child() {
            loop {
                if let Some(found) = Self::find_first(cursor.node(), kind) {
                    return Some(found);
                }
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }
        None
    }

    /// Number of ancestors between `node` and the tree root.
    pub fn depth(node: Node<'_>) -> usize {
        let mut depth = 0;
        let mut current = node;
        while let Some(parent) = current.parent() {
            depth += 1;
            current = parent;
        }
        depth
    }

    /// Every ancestor of `node`, nearest first.
    pub fn ancestors(node: Node<'_>) -> Vec<Node<'_>> {
        let mut ancestors = Vec::new();
        let mut current = node;
        while let Some(parent) = current.parent() {
            ancestors.push(parent);
            current = parent;
        }
        ancestors
    }

    /// `true` if any ancestor of `node` has kind `kind`.
    pub fn is_inside_kind(node: Node<'_>, kind: &str) -> bool {
        Self::ancestors(node).iter().any(|n| n.kind() == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visitor::KindCounter;

    fn parse_rust(code: &str) -> Tree {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_rust::LANGUAGE.into())
            .expect("load rust grammar");
        parser.parse(code, None).unwrap()
    }

    #[test]
    fn depth_of_root_is_zero() {
        let tree = parse_rust("fn main() { let x = 1; }");
        assert_eq!(TreeWalker::depth(tree.root_node()), 0);
        let nodes = TreeWalker::find_by_kind(tree.root_node(), "let_declaration");
        assert!(!nodes.is_empty());
        assert!(TreeWalker::depth(nodes[0]) > 0);
    }

    #[test]
    fn find_by_kind_finds_all_matches() {
        let tree = parse_rust("fn foo() {} fn bar() {}");
        let functions = TreeWalker::find_by_kind(tree.root_node(), "function_item");
        assert_eq!(functions.len(), 2);
    }

    #[test]
    fn find_first_stops_at_first_match() {
        let tree = parse_rust("fn main() { let x = 1; let y = 2; }");
        assert!(TreeWalker::find_first(tree.root_node(), "let_declaration").is_some());
    }

    #[test]
    fn walk_visits_every_node() {
        let tree = parse_rust("fn main() { let x = 1; }");
        let mut counter = KindCounter::new();
        let mut ctx = ();
        TreeWalker::walk(&tree, b"fn main() { let x = 1; }", &mut counter, &mut ctx);
        assert!(counter.count("function_item") >= 1);
        assert!(counter.count("let_declaration") >= 1);
    }

    #[test]
    fn is_inside_kind_detects_enclosing_function() {
        let tree = parse_rust("fn main() { let x = 1; }");
        let let_nodes = TreeWalker::find_by_kind(tree.root_node(), "let_declaration");
        assert!(TreeWalker::is_inside_kind(let_nodes[0], "function_item"));
    }
}
