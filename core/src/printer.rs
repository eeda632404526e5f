//! Indented textual dump of an AST, for debugging the front end.

use crate::ast::Node;

fn indent(n: usize) -> String {
    " ".repeat(n)
}

pub fn print_ast(node: &Node) -> String {
    print_node(node, 0)
}

fn print_node(node: &Node, depth: usize) -> String {
    match node {
        Node::Program { body, .. } => body
            .iter()
            .map(|n| print_node(n, depth))
            .collect::<Vec<_>>()
            .join("\n"),
        Node::NumberLiteral { value, .. }
        | Node::StringLiteral { value, .. }
        | Node::BooleanLiteral { value, .. }
        | Node::KeywordLiteral { value, .. } => {
            format!("{}{}: {}", indent(depth), node.kind(), value)
        }
        Node::NilLiteral { .. } => format!("{}{}: nil", indent(depth), node.kind()),
        Node::Symbol { name, .. } => format!("{}Symbol: {}", indent(depth), name),
        Node::CallExpression { callee, args, .. } => {
            let mut out = format!("{}CallExpression\n", indent(depth));
            out.push_str(&format!(
                "{}Func:\n{}\n",
                indent(depth + 2),
                print_node(callee, depth + 4)
            ));
            out.push_str(&format!("{}Args:", indent(depth + 2)));
            for arg in args {
                out.push('\n');
                out.push_str(&print_node(arg, depth + 4));
            }
            out
        }
    }
}
