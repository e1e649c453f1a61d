//! Tests for tree construction, mutation, and element data access.

use tarsier_dom::{DomTree, ElementData, NodeId, NodeType};

/// Helper to create an element node and return its id.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData::new(tag)))
}

#[test]
fn test_new_tree_has_document_root() {
    let tree = DomTree::new();
    assert_eq!(tree.root(), NodeId::ROOT);
    assert_eq!(tree.len(), 1);
    assert!(!tree.is_empty());
    assert!(matches!(
        tree.get(NodeId::ROOT).map(|n| &n.node_type),
        Some(NodeType::Document)
    ));
    assert_eq!(tree.document_element(), None);
}

#[test]
fn test_append_child_maintains_sibling_links() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    let c = alloc_element(&mut tree, "c");
    tree.append_child(parent, a);
    tree.append_child(parent, b);
    tree.append_child(parent, c);

    assert_eq!(tree.children(parent), &[a, b, c]);
    assert_eq!(tree.first_child(parent), Some(a));
    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.next_sibling(b), Some(c));
    assert_eq!(tree.next_sibling(c), None);
    assert_eq!(tree.prev_sibling(a), None);
    assert_eq!(tree.prev_sibling(c), Some(b));
    assert_eq!(tree.parent(b), Some(parent));
}

#[test]
fn test_remove_child_middle_of_three() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    let c = alloc_element(&mut tree, "c");
    tree.append_child(parent, a);
    tree.append_child(parent, b);
    tree.append_child(parent, c);

    tree.remove_child(parent, b);

    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(a));
    assert_eq!(tree.parent(b), None);
    assert_eq!(tree.prev_sibling(b), None);
    assert_eq!(tree.next_sibling(b), None);
}

#[test]
fn test_remove_child_not_a_child_is_a_noop() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    let stranger = alloc_element(&mut tree, "p");
    tree.append_child(NodeId::ROOT, parent);

    tree.remove_child(parent, stranger);
    assert!(tree.children(parent).is_empty());
}

#[test]
fn test_removed_child_can_be_reappended() {
    let mut tree = DomTree::new();
    let first = alloc_element(&mut tree, "div");
    let second = alloc_element(&mut tree, "section");
    tree.append_child(NodeId::ROOT, first);
    tree.append_child(NodeId::ROOT, second);

    let child = alloc_element(&mut tree, "p");
    tree.append_child(first, child);
    tree.remove_child(first, child);
    tree.append_child(second, child);

    assert_eq!(tree.parent(child), Some(second));
    assert_eq!(tree.children(second), &[child]);
}

#[test]
fn test_element_data_access() {
    let mut tree = DomTree::new();
    let node = tree.alloc_element("input", &[("id", "field"), ("class", "a b")]);
    tree.append_child(NodeId::ROOT, node);
    let text = tree.alloc(NodeType::Text("hello".to_string()));
    tree.append_child(node, text);

    let element = tree.as_element(node).unwrap();
    assert_eq!(element.tag_name, "input");
    assert_eq!(element.id(), Some("field"));
    assert!(element.classes().contains("a"));
    assert!(element.classes().contains("b"));
    assert!(!element.classes().contains("c"));

    assert_eq!(tree.as_element(text), None);
    assert_eq!(tree.as_text(text), Some("hello"));
    assert_eq!(tree.as_text(node), None);
}

#[test]
fn test_set_attribute_replaces_value() {
    let mut tree = DomTree::new();
    let node = tree.alloc_element("div", &[("class", "old")]);
    tree.append_child(NodeId::ROOT, node);

    tree.as_element_mut(node)
        .unwrap()
        .set_attribute("class", "new");
    assert!(tree.as_element(node).unwrap().classes().contains("new"));
    assert!(!tree.as_element(node).unwrap().classes().contains("old"));
}

#[test]
fn test_document_element_skips_non_elements() {
    let mut tree = DomTree::new();
    let comment = tree.alloc(NodeType::Comment("leading".to_string()));
    tree.append_child(NodeId::ROOT, comment);
    let html = alloc_element(&mut tree, "html");
    tree.append_child(NodeId::ROOT, html);

    assert_eq!(tree.document_element(), Some(html));
}

#[test]
fn test_get_out_of_range_is_none() {
    let tree = DomTree::new();
    assert!(tree.get(NodeId(42)).is_none());
    assert_eq!(tree.parent(NodeId(42)), None);
    assert!(tree.children(NodeId(42)).is_empty());
}
