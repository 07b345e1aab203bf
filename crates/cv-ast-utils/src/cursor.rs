//! Single-node navigation helpers built on `tree_sitter::Node`.

use tree_sitter::Node;

/// Navigation helpers that don't need a full traversal.
pub struct CursorUtils;

impl CursorUtils {
    /// Path from the root to `node`, as `(kind, child_index)` pairs.
    pub fn path_to_root(node: Node<'_>) -> Vec<(String, usize)> {
        let mut path = Vec::new();
        let mut current = node;

        while let Some(parent) = current.parent() {
            let mut cursor = parent.walk();
            let idx = parent
                .children(&mut cursor)
                .position(|child| child.id() == current.id())
                .unwrap_or(0);

            path.push((current.kind().to_string(), idx));
            current = parent;
        }

        path.push((current.kind().to_string(), 0));
        path.reverse();
        path
    }

    /// Every sibling of `node`, excluding `node` itself.
    pub fn siblings(node: Node<'_>) -> Vec<Node<'_>> {
        node.parent()
            .map(|parent| {
                let mut cursor = parent.walk();
                parent
                    .children(&mut cursor)
                    .filter(|child| child.id() != node.id())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Count of `node`'s children whose kind equals `kind`.
    pub fn count_children_of_kind(node: Node<'_>, kind: &str) -> usize {
        let mut cursor = node.walk();
        node.children(&mut cursor)
            .filter(|child| child.kind() == kind)
            .count()
    }

    /// Every child of `node` whose kind equals `kind`.
    pub fn children_of_kind<'a>(node: Node<'a>, kind: &str) -> Vec<Node<'a>> {
        let mut cursor = node.walk();
        node.children(&mut cursor)
            .filter(|child| child.kind() == kind)
            .collect()
    }

    /// The first child of `node` whose kind equals `kind`.
    pub fn first_child_of_kind<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
        let mut cursor = node.walk();
        node.children(&mut cursor).find(|child| child.kind() == kind)
    }

    /// Named children of `node` (anonymous nodes like punctuation excluded).
    pub fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor).collect()
    }

    /// Child reachable via the grammar's `field` name, if any.
    pub fn child_by_field<'a>(node: Node<'a>, field: &str) -> Option<Node<'a>> {
        node.child_by_field_name(field)
    }
}
