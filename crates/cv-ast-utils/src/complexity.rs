//! Branching-node complexity counts, computed directly from AST node kinds.

use tree_sitter::Node;

use crate::language::SourceLanguage;

/// Complexity metrics for a single declaration's body.
#[derive(Debug, Clone, Default)]
pub struct ComplexityMetrics {
    /// Count of branching nodes (`if`, `switch`/`match` arms, `for`, `while`,
    /// `catch`, short-circuit boolean operators), minimum 1.
    pub cyclomatic: usize,
    /// Maximum nesting depth of branching/loop constructs.
    pub max_nesting: usize,
    /// Number of conditional branches (`if`/`else`/`match` arms).
    pub branches: usize,
    /// Number of loop constructs.
    pub loops: usize,
}

/// Computes [`ComplexityMetrics`] for a node's subtree.
pub struct ComplexityAnalyzer;

impl ComplexityAnalyzer {
    /// Analyzes `node`'s subtree as `language` source.
    pub fn analyze(node: Node<'_>, language: SourceLanguage) -> ComplexityMetrics {
        let mut metrics = ComplexityMetrics {
            cyclomatic: 1,
            max_nesting: 0,
            branches: 0,
            loops: 0,
        };
        Self::analyze_recursive(node, language, 0, &mut metrics);
        metrics
    }

    fn analyze_recursive(
        node: Node<'_>,
        language: SourceLanguage,
        current_depth: usize,
        metrics: &mut ComplexityMetrics,
    ) {
        if Self::is_nesting_node(node.kind(), language) {
            let new_depth = current_depth + 1;
            if new_depth > metrics.max_nesting {
                metrics.max_nesting = new_depth;
            }
        }

        if Self::is_decision_point(node.kind(), language) {
            metrics.cyclomatic += 1;
            metrics.branches += 1;
        }

        if Self::is_loop(node.kind(), language) {
            metrics.cyclomatic += 1;
            metrics.loops += 1;
        }

        let depth_for_children = if Self::is_nesting_node(node.kind(), language) {
            current_depth + 1
        } else {
            current_depth
        };

        let mut cursor = node.walk();
        if cursor.goto_first_child() {
            loop {
                Self::analyze_recursive(cursor.node(), language, depth_for_children, metrics);
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }
    }

    /// `true` if `kind` is a branching construct (`if`, `match` arm, `catch`,
    /// short-circuit boolean operator) for `language`.
    pub fn is_decision_point(kind: &str, language: SourceLanguage) -> bool {
        match language {
            SourceLanguage::Rust => matches!(
                kind,
                "if_expression" | "else_clause" | "match_arm" | "and_expression" | "or_expression"
            ),
            SourceLanguage::Python => matches!(
                kind,
                "if_statement"
                    | "elif_clause"
                    | "else_clause"
                    | "and_operator"
                    | "or_operator"
                    | "conditional_expression"
                    | "except_clause"
            ),
            SourceLanguage::JavaScript | SourceLanguage::TypeScript => matches!(
                kind,
                "if_statement"
                    | "else_clause"
                    | "switch_case"
                    | "ternary_expression"
                    | "catch_clause"
                    | "binary_expression"
            ),
            SourceLanguage::Go => matches!(
                kind,
                "if_statement" | "else_clause" | "expression_case" | "type_case"
            ),
        }
    }

    /// `true` if `kind` is a loop construct for `language`.
    pub fn is_loop(kind: &str, language: SourceLanguage) -> bool {
        match language {
            SourceLanguage::Rust => {
                matches!(kind, "for_expression" | "while_expression" | "loop_expression")
            }
            SourceLanguage::Python => matches!(kind, "for_statement" | "while_statement"),
            SourceLanguage::JavaScript | SourceLanguage::TypeScript => matches!(
                kind,
                "for_statement" | "for_in_statement" | "while_statement" | "do_statement"
            ),
            SourceLanguage::Go => matches!(kind, "for_statement"),
        }
    }

    fn is_nesting_node(kind: &str, language: SourceLanguage) -> bool {
        Self::is_decision_point(kind, language)
            || Self::is_loop(kind, language)
            || matches!(kind, "block" | "compound_statement" | "suite")
    }
}

/// Nesting depth of `node` measured by enclosing block-like ancestors.
pub fn nesting_depth_at(node: Node<'_>) -> usize {
    crate::walker::TreeWalker::ancestors(node)
        .iter()
        .filter(|n| matches!(n.kind(), "block" | "compound_statement" | "suite"))
        .count()
}

/// Count of a function-like node's declared parameters.
pub fn count_parameters(function_node: Node<'_>) -> usize {
    for field in &["parameters", "formal_parameters", "parameter_list"] {
        if let Some(params) = crate::cursor::CursorUtils::child_by_field(function_node, field) {
            return crate::cursor::CursorUtils::named_children(params)
                .iter()
                .filter(|n| !matches!(n.kind(), "comment" | ","))
                .count();
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(code: &str) -> tree_sitter::Tree {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_rust::LANGUAGE.into())
            .expect("load rust grammar");
        parser.parse(code, None).unwrap()
    }

    #[test]
    fn single_branch_yields_complexity_two() {
        let code = "fn abs(x: i32) -> i32 { if x > 0 { return x; } return -x; }";
        let tree = parse(code);
        let func = crate::walker::TreeWalker::find_first(tree.root_node(), "function_item")
            .expect("function node");
        let metrics = ComplexityAnalyzer::analyze(func, SourceLanguage::Rust);
        assert_eq!(metrics.cyclomatic, 2);
    }

    #[test]
    fn no_branches_yields_complexity_one() {
        let tree = parse("fn main() { let x = 1; }");
        let func = crate::walker::TreeWalker::find_first(tree.root_node(), "function_item")
            .expect("function node");
        let metrics = ComplexityAnalyzer::analyze(func, SourceLanguage::Rust);
        assert_eq!(metrics.cyclomatic, 1);
    }
}
