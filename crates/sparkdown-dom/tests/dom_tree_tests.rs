//! Tests for element tree construction: appending, text merging, sealing.

use sparkdown_dom::{
    Category, DomTree, ElementData, ElementKind, NodeId, NodeType, Propagation, Terminator,
};

/// Helper to create an element node and return its `NodeId`.
fn alloc_element(tree: &mut DomTree, kind: ElementKind, lexeme: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData::new(kind, lexeme)))
}

// ========== append_child ==========

#[test]
fn test_append_child_sets_parent() {
    let mut tree = DomTree::new();
    let p = alloc_element(&mut tree, ElementKind::Paragraph, "");
    tree.append_child(NodeId::ROOT, p);

    assert_eq!(tree.children(NodeId::ROOT), &[p]);
    assert_eq!(tree.parent(p), Some(NodeId::ROOT));
    assert_eq!(tree.parent(NodeId::ROOT), None);
}

#[test]
fn test_ancestors_walk_to_root() {
    let mut tree = DomTree::new();
    let p = alloc_element(&mut tree, ElementKind::Paragraph, "");
    let strong = alloc_element(&mut tree, ElementKind::Strong, "**");
    let em = alloc_element(&mut tree, ElementKind::Emphasis, "*");
    tree.append_child(NodeId::ROOT, p);
    tree.append_child(p, strong);
    tree.append_child(strong, em);

    let chain: Vec<NodeId> = tree.ancestors(em).collect();
    assert_eq!(chain, vec![strong, p, NodeId::ROOT]);
}

// ========== append_text ==========

#[test]
fn test_adjacent_text_is_merged() {
    let mut tree = DomTree::new();
    let p = alloc_element(&mut tree, ElementKind::Paragraph, "");
    tree.append_child(NodeId::ROOT, p);

    let first = tree.append_text(p, "Hel");
    let second = tree.append_text(p, "lo");

    assert_eq!(first, second);
    assert_eq!(tree.children(p).len(), 1);
    assert_eq!(tree.as_text(first), Some("Hello"));
}

#[test]
fn test_text_after_element_starts_new_node() {
    let mut tree = DomTree::new();
    let p = alloc_element(&mut tree, ElementKind::Paragraph, "");
    tree.append_child(NodeId::ROOT, p);

    let _ = tree.append_text(p, "a");
    let br = alloc_element(&mut tree, ElementKind::LineBreak, "\\");
    tree.append_child(p, br);
    let _ = tree.append_text(p, "b");

    assert_eq!(tree.children(p).len(), 3);
    assert_eq!(tree.text_content(p), "ab");
}

// ========== sealing ==========

#[test]
fn test_seal_order_is_recorded_once() {
    let mut tree = DomTree::new();
    let p = alloc_element(&mut tree, ElementKind::Paragraph, "");
    let em = alloc_element(&mut tree, ElementKind::Emphasis, "*");
    tree.append_child(NodeId::ROOT, p);
    tree.append_child(p, em);

    tree.seal(em);
    tree.seal(p);
    tree.seal(em);

    assert!(tree.is_sealed(em));
    assert!(tree.is_sealed(p));
    assert!(!tree.is_sealed(NodeId::ROOT));
    assert_eq!(tree.seal_order(), &[em, p]);
}

// ========== element data ==========

#[test]
fn test_terminators_follow_kind() {
    let heading = ElementData::new(ElementKind::Heading2, "##");
    let paragraph = ElementData::new(ElementKind::Paragraph, "");
    let strong = ElementData::new(ElementKind::Strong, "__");
    let rule = ElementData::new(ElementKind::Rule, "---");

    assert_eq!(heading.terminator(), &Terminator::Newlines(1));
    assert_eq!(paragraph.terminator(), &Terminator::Newlines(2));
    assert_eq!(strong.terminator(), &Terminator::Run("__".to_string()));
    assert_eq!(rule.terminator(), &Terminator::SelfClosing);

    assert_eq!(strong.propagation(), Propagation::ABSORB);
    assert_eq!(heading.propagation(), Propagation::NONE);
}

#[test]
fn test_newline_terminators_accept_longer_runs() {
    let line = Terminator::Newlines(1);
    let blank = Terminator::Newlines(2);

    assert!(line.is_satisfied_by("\n"));
    assert!(line.is_satisfied_by("\n\n"));
    assert!(!blank.is_satisfied_by("\n"));
    assert!(blank.is_satisfied_by("\n\n\n"));
    assert!(!blank.is_satisfied_by("**"));
    assert!(!Terminator::EndOfInput.is_satisfied_by("\n"));
}

#[test]
fn test_run_terminator_is_exact() {
    let star = Terminator::Run("*".to_string());
    assert!(star.is_satisfied_by("*"));
    assert!(!star.is_satisfied_by("**"));
    assert!(!star.is_satisfied_by("_"));
}

#[test]
fn test_kind_metadata() {
    assert_eq!(ElementKind::heading(3), Some(ElementKind::Heading3));
    assert_eq!(ElementKind::heading(6), None);
    assert_eq!(ElementKind::Heading5.tag_name(), Some("h5"));
    assert_eq!(ElementKind::Emphasis.tag_name(), Some("em"));
    assert_eq!(ElementKind::Document.tag_name(), None);
    assert_eq!(ElementKind::Rule.category(), Category::Inline);
    assert_eq!(ElementKind::Paragraph.category(), Category::Block);
    assert!(ElementKind::LineBreak.is_void());
    assert!(!ElementKind::Strong.is_void());
}

#[test]
fn test_find_first_and_kind() {
    let mut tree = DomTree::new();
    let h = alloc_element(&mut tree, ElementKind::Heading1, "#");
    tree.append_child(NodeId::ROOT, h);
    let text = tree.append_text(h, "Title");

    assert_eq!(tree.find_first(NodeId::ROOT, ElementKind::Heading1), Some(h));
    assert_eq!(tree.find_first(NodeId::ROOT, ElementKind::Paragraph), None);
    assert_eq!(tree.kind(text), Some(ElementKind::PlainText));
    assert_eq!(tree.kind(NodeId::ROOT), Some(ElementKind::Document));
}
