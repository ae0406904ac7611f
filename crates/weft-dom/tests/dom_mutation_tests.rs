//! Tree mutation tests: the operations the tree builder relies on when it
//! inserts, reparents and foster-parents nodes.

use weft_dom::{AttributesMap, DomTree, Namespace, NodeId, NodeType, QuirksMode};

fn html(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.create_element(tag, Namespace::Html, AttributesMap::new())
}

/// A `div` attached to the document with one child element per name.
fn div_with(tree: &mut DomTree, names: &[&str]) -> (NodeId, Vec<NodeId>) {
    let div = html(tree, "div");
    tree.append_child(NodeId::ROOT, div);
    let kids = names
        .iter()
        .map(|name| {
            let id = html(tree, name);
            tree.append_child(div, id);
            id
        })
        .collect();
    (div, kids)
}

/// Every child points back at `parent`, and the sibling links agree with the
/// child list in both directions.
fn assert_consistent(tree: &DomTree, parent: NodeId) {
    let kids = tree.children(parent);
    for (i, &kid) in kids.iter().enumerate() {
        assert_eq!(tree.parent(kid), Some(parent));
        let prev = i.checked_sub(1).map(|j| kids[j]);
        assert_eq!(tree.prev_sibling(kid), prev, "prev of child {i}");
        assert_eq!(tree.next_sibling(kid), kids.get(i + 1).copied(), "next of child {i}");
    }
    assert_eq!(tree.first_child(parent), kids.first().copied());
    assert_eq!(tree.last_child(parent), kids.last().copied());
}

fn tag_names(tree: &DomTree, parent: NodeId) -> Vec<String> {
    tree.children(parent)
        .iter()
        .filter_map(|&id| tree.as_element(id).map(|e| e.tag_name.clone()))
        .collect()
}

// ---- removal ----

#[test]
fn test_remove_each_position() {
    for index in 0..3 {
        let mut tree = DomTree::new();
        let (div, kids) = div_with(&mut tree, &["em", "i", "u"]);
        tree.remove_child(div, kids[index]);

        assert_eq!(tree.children(div).len(), 2);
        assert!(!tree.children(div).contains(&kids[index]));
        assert_eq!(tree.parent(kids[index]), None);
        assert_eq!(tree.next_sibling(kids[index]), None);
        assert_consistent(&tree, div);
    }
}

#[test]
fn test_remove_only_child() {
    let mut tree = DomTree::new();
    let (div, kids) = div_with(&mut tree, &["p"]);
    tree.remove_child(div, kids[0]);

    assert!(tree.children(div).is_empty());
    assert_eq!(tree.first_child(div), None);
    assert_eq!(tree.prev_sibling(kids[0]), None);
}

#[test]
fn test_remove_from_wrong_parent_is_ignored() {
    let mut tree = DomTree::new();
    let (div, _) = div_with(&mut tree, &[]);
    let (owner, kids) = div_with(&mut tree, &["span"]);

    tree.remove_child(div, kids[0]);

    assert_eq!(tree.parent(kids[0]), Some(owner));
    assert_consistent(&tree, owner);
}

// ---- insertion ----

#[test]
fn test_insert_before_front_and_middle() {
    let mut tree = DomTree::new();
    let (div, kids) = div_with(&mut tree, &["b", "d"]);

    let a = html(&mut tree, "a");
    tree.insert_before(div, a, kids[0]);
    let c = html(&mut tree, "c");
    tree.insert_before(div, c, kids[1]);

    assert_eq!(tag_names(&tree, div), ["a", "b", "c", "d"]);
    assert_consistent(&tree, div);
}

#[test]
fn test_insert_before_unrelated_reference_appends() {
    let mut tree = DomTree::new();
    let (div, _) = div_with(&mut tree, &["a"]);
    let detached = html(&mut tree, "table");

    let b = html(&mut tree, "b");
    tree.insert_before(div, b, detached);

    assert_eq!(tag_names(&tree, div), ["a", "b"]);
    assert_consistent(&tree, div);
}

#[test]
fn test_insert_before_takes_node_from_old_parent() {
    // What foster parenting does with a node that was already placed.
    let mut tree = DomTree::new();
    let (body, body_kids) = div_with(&mut tree, &["table"]);
    let (cell, cell_kids) = div_with(&mut tree, &["b"]);

    tree.insert_before(body, cell_kids[0], body_kids[0]);

    assert!(tree.children(cell).is_empty());
    assert_eq!(tag_names(&tree, body), ["b", "table"]);
    assert_consistent(&tree, body);
}

#[test]
fn test_append_child_reparents() {
    let mut tree = DomTree::new();
    let (first, kids) = div_with(&mut tree, &["a", "b", "c"]);
    let (second, _) = div_with(&mut tree, &[]);

    tree.append_child(second, kids[1]);

    assert_eq!(tag_names(&tree, first), ["a", "c"]);
    assert_eq!(tag_names(&tree, second), ["b"]);
    assert_consistent(&tree, first);
    assert_consistent(&tree, second);
}

// ---- moving children ----

#[test]
fn test_move_children_keeps_order_after_existing() {
    // The adoption agency moves the furthest block's children this way.
    let mut tree = DomTree::new();
    let (from, _) = div_with(&mut tree, &["x", "y", "z"]);
    let (to, _) = div_with(&mut tree, &["w"]);

    tree.move_children(from, to);

    assert!(tree.children(from).is_empty());
    assert_eq!(tag_names(&tree, to), ["w", "x", "y", "z"]);
    assert_consistent(&tree, to);
}

#[test]
fn test_move_children_from_empty_is_noop() {
    let mut tree = DomTree::new();
    let (from, _) = div_with(&mut tree, &[]);
    let (to, _) = div_with(&mut tree, &["p"]);

    tree.move_children(from, to);

    assert_eq!(tag_names(&tree, to), ["p"]);
}

#[test]
fn test_ancestors_and_descendants() {
    let mut tree = DomTree::new();
    let (div, kids) = div_with(&mut tree, &["ul"]);
    let li = html(&mut tree, "li");
    tree.append_child(kids[0], li);

    let chain: Vec<NodeId> = tree.ancestors(li).collect();
    assert_eq!(chain, [kids[0], div, NodeId::ROOT]);
    assert!(tree.is_descendant_of(li, div));
    assert!(!tree.is_descendant_of(div, li));
}

// ---- character data and document state ----

#[test]
fn test_append_text_merges_into_text_node() {
    let mut tree = DomTree::new();
    let (p, _) = div_with(&mut tree, &[]);
    let text = tree.new_text("A &");
    tree.append_child(p, text);
    tree.append_text(text, " B");

    assert_eq!(tree.as_text(text), Some("A & B"));
    assert_eq!(tree.text_content(p), "A & B");
}

#[test]
fn test_append_text_on_element_does_nothing() {
    let mut tree = DomTree::new();
    let p = html(&mut tree, "p");
    tree.append_text(p, "lost");
    assert!(tree.as_element(p).is_some());
    assert_eq!(tree.text_content(p), "");
}

#[test]
fn test_text_content_of_deeply_nested_elements() {
    let mut tree = DomTree::new();
    let (outer, _) = div_with(&mut tree, &[]);
    let before = tree.new_text("a");
    tree.append_child(outer, before);

    let mut parent = outer;
    for _ in 0..100_000 {
        let div = html(&mut tree, "div");
        tree.append_child(parent, div);
        parent = div;
    }
    let deep = tree.new_text("deep");
    tree.append_child(parent, deep);
    let after = tree.new_text("z");
    tree.append_child(outer, after);

    assert_eq!(tree.text_content(NodeId::ROOT), "adeepz");
}

#[test]
fn test_doctype_is_not_the_document_element() {
    let mut tree = DomTree::new();
    let doctype = tree.new_document_type("html", "", "about:legacy-compat");
    tree.append_child(NodeId::ROOT, doctype);
    let root = html(&mut tree, "html");
    tree.append_child(NodeId::ROOT, root);

    assert!(matches!(
        tree.get(doctype).map(|n| &n.node_type),
        Some(NodeType::DocumentType { system_id, .. }) if system_id == "about:legacy-compat"
    ));
    assert_eq!(tree.document_element(), Some(root));
}

#[test]
fn test_body_requires_html_namespace() {
    let mut tree = DomTree::new();
    let root = html(&mut tree, "html");
    tree.append_child(NodeId::ROOT, root);
    let svg_body = tree.create_element("body", Namespace::Svg, AttributesMap::new());
    tree.append_child(root, svg_body);
    assert_eq!(tree.body(), None);

    let body = html(&mut tree, "body");
    tree.append_child(root, body);
    assert_eq!(tree.body(), Some(body));
}

#[test]
fn test_quirks_mode_round_trip() {
    let mut tree = DomTree::new();
    assert_eq!(tree.mode(), QuirksMode::NoQuirks);
    tree.set_mode(QuirksMode::Quirks);
    assert_eq!(tree.mode().to_string(), "quirks");
}

// ---- element classification ----

#[test]
fn test_special_and_integration_points() {
    let mut tree = DomTree::new();
    let mut attrs = AttributesMap::new();
    let _ = attrs.insert("encoding".to_string(), "Text/HTML".to_string());
    let annotation = tree.create_element("annotation-xml", Namespace::MathMl, attrs);
    let mi = tree.create_element("mi", Namespace::MathMl, AttributesMap::new());
    let title = tree.create_element("title", Namespace::Svg, AttributesMap::new());
    let address = html(&mut tree, "address");
    let span = html(&mut tree, "span");

    let element = |id: NodeId| tree.as_element(id).expect("element");
    assert!(element(annotation).is_html_integration_point());
    assert!(element(title).is_html_integration_point());
    assert!(element(mi).is_mathml_text_integration_point());
    assert!(!element(mi).is_html_integration_point());
    assert!(element(address).is_special());
    assert!(element(mi).is_special());
    assert!(!element(span).is_special());
}
