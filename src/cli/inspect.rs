//! Token and tree dumps for debugging expressions

use super::CliError;
use crate::{ExpressionParser, Node};

/// Render the token stream of an expression, one token per line.
pub fn render_tokens(source: &str) -> Result<String, CliError> {
    let parser = ExpressionParser::new();
    let (_, tokens) = parser.parse_debug(source)?;

    let mut out = String::new();
    for token in tokens {
        out.push_str(&format!("{}\n", token));
    }
    Ok(out)
}

/// Render an indented outline of the parsed tree followed by its
/// canonical rendering.
pub fn outline_tree(source: &str) -> Result<String, CliError> {
    let parser = ExpressionParser::new();
    let expression = parser.parse(source)?;

    let mut out = String::new();
    outline_node(expression.root(), 0, &mut out);
    out.push_str(&format!("=> {}\n", expression.render()));
    Ok(out)
}

fn outline_node(node: &Node, depth: usize, out: &mut String) {
    out.push_str(&"  ".repeat(depth));
    out.push_str(node.kind_name());
    let span = node.span();
    out.push_str(&format!(" ({},{})\n", span.start, span.end));

    for child in node.children() {
        outline_node(child, depth + 1, out);
    }
}
