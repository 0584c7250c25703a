//! HTML renderer for parsed trees.
//!
//! A pure depth-first walk with one match arm per node kind. Text
//! payloads are emitted verbatim: the parser already resolved every
//! dialect marker, so no escaping happens at this stage.

use crate::ast::Node;

/// Renders a parse tree to an HTML fragment string.
pub fn render(node: &Node) -> String {
    let mut out = String::new();
    render_into(node, &mut out);
    out
}

fn render_into(node: &Node, out: &mut String) {
    match node {
        Node::Root { children } => render_children(children, out),
        Node::Text { text } => out.push_str(text),
        Node::NewLine => out.push_str("<br/>"),
        Node::Italic { children } => {
            out.push_str("<em>");
            render_children(children, out);
            out.push_str("</em>");
        }
        Node::Bold { children } => {
            out.push_str("<strong>");
            render_children(children, out);
            out.push_str("</strong>");
        }
        Node::Header { level, children } => {
            let digit = char::from(b'0' + level.get());
            out.push_str("<h");
            out.push(digit);
            out.push('>');
            render_children(children, out);
            out.push_str("</h");
            out.push(digit);
            out.push('>');
        }
        Node::Link { label, target } => render_link(label, target, out),
    }
}

fn render_children(children: &[Node], out: &mut String) {
    for child in children {
        render_into(child, out);
    }
}

/// A link becomes an anchor only when both subtrees carry content;
/// otherwise label and target flow through unwrapped.
fn render_link(label: &[Node], target: &[Node], out: &mut String) {
    if label.is_empty() || target.is_empty() {
        render_children(label, out);
        render_children(target, out);
        return;
    }
    out.push_str(r#"<a href=""#);
    render_children(target, out);
    out.push_str("\">");
    render_children(label, out);
    out.push_str("</a>");
}
