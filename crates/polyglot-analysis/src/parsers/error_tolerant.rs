//! Inspect tree-sitter ERROR / MISSING nodes and phrase them as parser messages.

use tree_sitter::Node;

/// A syntax problem located in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxProblem {
    /// 1-based line.
    pub line: u32,
    pub column: u32,
    pub message: String,
}

/// Count ERROR and MISSING nodes in a tree.
pub fn count_errors(root: Node) -> u32 {
    let mut count = 0u32;
    visit(root, &mut |node| {
        if node.is_error() || node.is_missing() {
            count += 1;
        }
    });
    count
}

/// The first ERROR / MISSING node in document order, described the way a
/// conventional parser would report it ("Unexpected token }", "Missing ;").
pub fn first_problem(root: Node, source: &[u8]) -> Option<SyntaxProblem> {
    let mut found: Option<SyntaxProblem> = None;
    visit(root, &mut |node| {
        if found.is_some() || !(node.is_error() || node.is_missing()) {
            return;
        }
        let pos = node.start_position();
        let message = if node.is_missing() {
            format!("Missing {} at line {}", node.kind(), pos.row + 1)
        } else {
            let token = first_token_text(node, source);
            format!("Unexpected token {} at line {}", token, pos.row + 1)
        };
        found = Some(SyntaxProblem {
            line: pos.row as u32 + 1,
            column: pos.column as u32,
            message,
        });
    });
    found
}

/// Text of the first leaf under `node`, clipped to a short preview.
fn first_token_text(node: Node, source: &[u8]) -> String {
    let mut leaf = node;
    while let Some(child) = leaf.child(0) {
        leaf = child;
    }
    let text = leaf.utf8_text(source).unwrap_or("").trim();
    if text.is_empty() {
        return "<eof>".to_string();
    }
    text.chars().take(24).collect()
}

fn visit<'a, F: FnMut(Node<'a>)>(node: Node<'a>, f: &mut F) {
    f(node);
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit(child, f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_js(src: &str) -> tree_sitter::Tree {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_javascript::LANGUAGE.into())
            .unwrap();
        parser.parse(src, None).unwrap()
    }

    #[test]
    fn clean_tree_has_no_problem() {
        let tree = parse_js("function f() { return 1; }");
        assert_eq!(count_errors(tree.root_node()), 0);
        assert!(first_problem(tree.root_node(), b"function f() { return 1; }").is_none());
    }

    #[test]
    fn broken_tree_reports_problem() {
        let src = "function f() { return 1; }}";
        let tree = parse_js(src);
        assert!(count_errors(tree.root_node()) > 0);
        let problem = first_problem(tree.root_node(), src.as_bytes()).unwrap();
        assert_eq!(problem.line, 1);
        assert!(
            problem.message.starts_with("Unexpected token") || problem.message.starts_with("Missing"),
            "unexpected message: {}",
            problem.message
        );
    }
}
