//! The visitor pattern used by [`crate::walker::TreeWalker`].

use std::collections::HashMap;
use tree_sitter::Node;

/// Implement to process specific node kinds during a [`crate::walker::TreeWalker`] traversal.
pub trait NodeVisitor {
    /// Context threaded through the traversal.
    type Context;

    /// Called on entry to `node`. Return `false` to skip its children.
    fn visit(&mut self, node: Node<'_>, source: &[u8], ctx: &mut Self::Context) -> bool;

    /// Called after all of `node`'s children have been visited.
    fn leave(&mut self, _node: Node<'_>, _source: &[u8], _ctx: &mut Self::Context) {}
}

/// A matched node, captured with its byte/line/column span and text.
#[derive(Debug, Clone)]
pub struct NodeMatch {
    pub start_byte: usize,
    pub end_byte: usize,
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub text: String,
}

/// Collects every node matching `target_kind`.
pub struct KindCollector {
    pub target_kind: String,
    pub matches: Vec<NodeMatch>,
}

impl KindCollector {
    pub fn new(target_kind: &str) -> Self {
        Self {
            target_kind: target_kind.to_string(),
            matches: Vec::new(),
        }
    }
}

impl NodeVisitor for KindCollector {
    type Context = ();

    fn visit(&mut self, node: Node<'_>, source: &[u8], _ctx: &mut Self::Context) -> bool {
        if node.kind() == self.target_kind {
            let text = node.utf8_text(source).map(String::from).unwrap_or_default();
            self.matches.push(NodeMatch {
                start_byte: node.start_byte(),
                end_byte: node.end_byte(),
                start_line: node.start_position().row,
                start_column: node.start_position().column,
                end_line: node.end_position().row,
                end_column: node.end_position().column,
                text,
            });
        }
        true
    }
}

/// Counts every node kind seen during a traversal.
#[derive(Default)]
pub struct KindCounter {
    pub counts: HashMap<String, usize>,
}

impl KindCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, kind: &str) -> usize {
        self.counts.get(kind).copied().unwrap_or(0)
    }
}

impl NodeVisitor for KindCounter {
    type Context = ();

    fn visit(&mut self, node: Node<'_>, _source: &[u8], _ctx: &mut Self::Context) -> bool {
        *self.counts.entry(node.kind().to_string()).or_insert(0) += 1;
        true
    }
}
