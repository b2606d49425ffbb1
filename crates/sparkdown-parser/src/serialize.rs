//! Output formats for a finished tree: HTML, a JSON snapshot, and an indented
//! debug dump.
//!
//! Every walk is depth-first, pre-order. The Document emits no tag of its
//! own; void elements emit a single self-closed tag.

use std::fmt::Write;

use serde::Serialize;
use sparkdown_dom::{DomTree, ElementKind, NodeId, NodeType};

/// Serialize the tree as an HTML fragment.
#[must_use]
pub fn to_html(tree: &DomTree) -> String {
    let mut out = String::new();
    write_html(tree, tree.root(), &mut out);
    out
}

/// Serialize the tree as a complete HTML page.
#[must_use]
pub fn to_html_page(tree: &DomTree, title: &str) -> String {
    let mut out = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<title>");
    escape_into(title, &mut out);
    out.push_str("</title>\n</head>\n<body>\n");
    write_html(tree, tree.root(), &mut out);
    out.push_str("\n</body>\n</html>\n");
    out
}

/// Text of the first top-level `<h1>`, used as the page title.
#[must_use]
pub fn document_title(tree: &DomTree) -> Option<String> {
    tree.children(tree.root())
        .iter()
        .find(|&&id| tree.kind(id) == Some(ElementKind::Heading1))
        .map(|&id| tree.text_content(id).trim().to_string())
        .filter(|title| !title.is_empty())
}

fn write_html(tree: &DomTree, id: NodeId, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    match &node.node_type {
        NodeType::Document => {
            for &child in &node.children {
                write_html(tree, child, out);
            }
        }
        NodeType::Text(text) => escape_into(text, out),
        NodeType::Element(data) => {
            let Some(tag) = data.kind().tag_name() else {
                return;
            };
            if data.kind().is_void() {
                let _ = write!(out, "<{tag}/>");
                return;
            }
            let _ = write!(out, "<{tag}>");
            for &child in &node.children {
                write_html(tree, child, out);
            }
            let _ = write!(out, "</{tag}>");
        }
    }
}

fn escape_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}

/// Serializable copy of a subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSnapshot {
    /// Node kind; `plaintext` for text.
    pub kind: ElementKind,
    /// Text content, for text nodes only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Set on elements that were still open at end of input.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub open: bool,
    /// Children in document order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

/// Copy the whole tree into a [`NodeSnapshot`].
#[must_use]
pub fn snapshot(tree: &DomTree) -> NodeSnapshot {
    snapshot_node(tree, tree.root())
}

fn snapshot_node(tree: &DomTree, id: NodeId) -> NodeSnapshot {
    let (text, open) = match tree.get(id).map(|node| &node.node_type) {
        Some(NodeType::Text(text)) => (Some(text.clone()), false),
        Some(NodeType::Element(_)) => (None, !tree.is_sealed(id)),
        Some(NodeType::Document) | None => (None, false),
    };
    NodeSnapshot {
        kind: tree.kind(id).unwrap_or(ElementKind::Document),
        text,
        open,
        children: tree
            .children(id)
            .iter()
            .map(|&child| snapshot_node(tree, child))
            .collect(),
    }
}

/// Pretty-printed JSON of [`snapshot`].
///
/// # Errors
///
/// Returns the serializer's error; a tree snapshot never actually fails.
pub fn to_json(tree: &DomTree) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&snapshot(tree))
}

/// Indented dump of the subtree at `id`, one node per line.
///
/// Spaces in text show as `·` and newlines as `\n`; elements still open are
/// marked.
#[must_use]
pub fn format_tree(tree: &DomTree, id: NodeId, indent: usize) -> String {
    let mut out = String::new();
    format_node(tree, id, indent, &mut out);
    out
}

fn format_node(tree: &DomTree, id: NodeId, indent: usize, out: &mut String) {
    let prefix = "  ".repeat(indent);
    let Some(node) = tree.get(id) else {
        return;
    };
    match &node.node_type {
        NodeType::Document => {
            let _ = writeln!(out, "{prefix}Document");
        }
        NodeType::Element(data) => {
            let tag = data.kind().tag_name().unwrap_or("?");
            if data.kind().is_void() {
                let _ = writeln!(out, "{prefix}<{tag}/>");
            } else if node.sealed {
                let _ = writeln!(out, "{prefix}<{tag}>");
            } else {
                let _ = writeln!(out, "{prefix}<{tag}> (open)");
            }
        }
        NodeType::Text(data) => {
            let display = data.replace('\n', "\\n").replace(' ', "\u{00B7}");
            let _ = writeln!(out, "{prefix}\"{display}\"");
        }
    }
    for &child in &node.children {
        format_node(tree, child, indent + 1, out);
    }
}

/// Print [`format_tree`] to stdout.
pub fn print_tree(tree: &DomTree, id: NodeId, indent: usize) {
    print!("{}", format_tree(tree, id, indent));
}
