//! Debug dump of a parsed tree.
//!
//! The layout follows the html5lib tree-construction test format: one node
//! per line, prefixed with `| ` and two spaces per level, attributes sorted
//! by name on the lines below their element.

use std::fmt::Write;

use weft_dom::{DomTree, Namespace, NodeId, NodeType};

/// Dump the whole document, one line per node.
#[must_use]
pub fn dump_tree(tree: &DomTree) -> String {
    let mut out = String::new();
    for &child in tree.children(tree.root()) {
        write_subtree(&mut out, tree, child, 0);
    }
    out
}

/// Print the subtree rooted at `id` to stdout, starting at `indent` levels.
pub fn print_tree(tree: &DomTree, id: NodeId, indent: usize) {
    let mut out = String::new();
    write_subtree(&mut out, tree, id, indent);
    print!("{out}");
}

/// Write `id` and its descendants in tree order. Nesting depth is only
/// bounded by memory, so the walk keeps its own stack.
fn write_subtree(out: &mut String, tree: &DomTree, id: NodeId, depth: usize) {
    let mut stack = vec![(id, depth)];
    while let Some((id, depth)) = stack.pop() {
        let Some(node) = tree.get(id) else {
            continue;
        };
        write_node(out, &node.node_type, depth);

        let child_depth = if matches!(node.node_type, NodeType::Document) {
            depth
        } else {
            depth + 1
        };
        stack.extend(
            tree.children(id)
                .iter()
                .rev()
                .map(|&child| (child, child_depth)),
        );
    }
}

fn write_node(out: &mut String, node_type: &NodeType, depth: usize) {
    let pad = "  ".repeat(depth);

    match node_type {
        NodeType::Document => {
            let _ = writeln!(out, "#document");
        }
        NodeType::DocumentType {
            name,
            public_id,
            system_id,
        } => {
            if public_id.is_empty() && system_id.is_empty() {
                let _ = writeln!(out, "| {pad}<!DOCTYPE {name}>");
            } else {
                let _ = writeln!(
                    out,
                    "| {pad}<!DOCTYPE {name} \"{public_id}\" \"{system_id}\">"
                );
            }
        }
        NodeType::Element(data) => {
            match data.namespace {
                Namespace::Html => {
                    let _ = writeln!(out, "| {pad}<{}>", data.tag_name);
                }
                namespace => {
                    let _ = writeln!(out, "| {pad}<{namespace} {}>", data.tag_name);
                }
            }
            let mut attrs: Vec<_> = data.attrs.iter().collect();
            attrs.sort_unstable_by(|a, b| a.0.cmp(b.0));
            for (name, value) in attrs {
                // html5lib separates an attribute's prefix with a space.
                let name = match name.split_once(':') {
                    Some((prefix @ ("xlink" | "xml" | "xmlns"), local)) => {
                        format!("{prefix} {local}")
                    }
                    _ => name.clone(),
                };
                let _ = writeln!(out, "| {pad}  {name}=\"{value}\"");
            }
        }
        NodeType::Text(data) => {
            let _ = writeln!(out, "| {pad}\"{data}\"");
        }
        NodeType::Comment(data) => {
            let _ = writeln!(out, "| {pad}<!-- {data} -->");
        }
    }
}
