//! Integration tests for selector matching against a document tree.

use tarsier_dom::{DomTree, NodeId, NodeType};
use tarsier_selector::{
    Eyes, QuerySelector, SelectorError, collect_children, filter_elements, query_selector,
    query_selector_all,
};

/// Node ids of the sample page, in document order.
struct Page {
    app: NodeId,
    span: NodeId,
    form: NodeId,
    input: NodeId,
    ul_one: NodeId,
    li_one: NodeId,
    li_two: NodeId,
    ul_two: NodeId,
    li_orphan: NodeId,
}

/// Build:
/// ```text
/// <div id="app">
///   <span class="deep text">unit test</span>
///   <form id="myForm">
///     <input name="like" type="text">
///     <ul><li>One</li><li>Two</li></ul>
///     <ul id="list-two"><li>Orphan</li></ul>
///   </form>
/// </div>
/// ```
fn sample_page() -> (DomTree, Page) {
    let mut tree = DomTree::new();

    let app = tree.alloc_element("div", &[("id", "app")]);
    tree.append_child(NodeId::ROOT, app);

    let span = tree.alloc_element("span", &[("class", "deep text")]);
    tree.append_child(app, span);
    let span_text = tree.alloc(NodeType::Text("unit test".to_string()));
    tree.append_child(span, span_text);

    let form = tree.alloc_element("form", &[("id", "myForm")]);
    tree.append_child(app, form);

    let input = tree.alloc_element("input", &[("name", "like"), ("type", "text")]);
    tree.append_child(form, input);

    let ul_one = tree.alloc_element("ul", &[]);
    tree.append_child(form, ul_one);
    let li_one = tree.alloc_element("li", &[]);
    tree.append_child(ul_one, li_one);
    let li_two = tree.alloc_element("li", &[]);
    tree.append_child(ul_one, li_two);

    let ul_two = tree.alloc_element("ul", &[("id", "list-two")]);
    tree.append_child(form, ul_two);
    let li_orphan = tree.alloc_element("li", &[]);
    tree.append_child(ul_two, li_orphan);

    (
        tree,
        Page {
            app,
            span,
            form,
            input,
            ul_one,
            li_one,
            li_two,
            ul_two,
            li_orphan,
        },
    )
}

#[test]
fn test_select_element_by_id() {
    let (tree, page) = sample_page();
    let eyes = Eyes::new();

    let matched = eyes.search(&tree, "#app").unwrap();
    assert_eq!(matched, [page.app]);
    assert_eq!(tree.as_element(matched[0]).unwrap().tag_name, "div");
}

#[test]
fn test_select_element_by_class_name() {
    let (tree, page) = sample_page();
    let eyes = Eyes::new();

    let matched = eyes.search(&tree, ".text").unwrap();
    assert_eq!(matched, [page.span]);

    // Both classes must be present for a multi-class selector.
    assert_eq!(eyes.search(&tree, ".deep.text").unwrap(), [page.span]);
    assert!(eyes.search(&tree, ".deep.missing").unwrap().is_empty());
}

#[test]
fn test_select_element_by_tag_name() {
    let (tree, page) = sample_page();
    let eyes = Eyes::new();

    let matched = eyes.search(&tree, "li").unwrap();
    assert_eq!(matched, [page.li_one, page.li_two, page.li_orphan]);
    assert!(
        matched
            .iter()
            .all(|&id| tree.as_element(id).unwrap().tag_name == "li")
    );
}

#[test]
fn test_tag_match_is_case_insensitive() {
    let (tree, page) = sample_page();
    let eyes = Eyes::new();

    assert_eq!(eyes.search(&tree, "FORM").unwrap(), [page.form]);
    // Ids stay case-sensitive.
    assert!(eyes.search(&tree, "#APP").unwrap().is_empty());
}

#[test]
fn test_select_element_by_attribute_value() {
    let (tree, page) = sample_page();
    let eyes = Eyes::new();

    let matched = eyes.search(&tree, "[name=\"like\"]").unwrap();
    assert_eq!(matched, [page.input]);

    // AND semantics across clauses.
    assert_eq!(
        eyes.search(&tree, "[name=\"like\"][type=\"text\"]").unwrap(),
        [page.input]
    );
    assert!(
        eyes.search(&tree, "[name=\"like\"][type=\"password\"]")
            .unwrap()
            .is_empty()
    );
}

#[test]
fn test_select_with_sub_queries() {
    let (tree, page) = sample_page();
    let eyes = Eyes::new();

    // Descendant-chain narrowing across two ul subtrees, document order.
    let matched = eyes.search(&tree, "form ul li").unwrap();
    assert_eq!(matched, [page.li_one, page.li_two, page.li_orphan]);
}

#[test]
fn test_multiple_selectors_at_once() {
    let (tree, page) = sample_page();
    let eyes = Eyes::new();

    let matched = eyes.search(&tree, ".text, #list-two").unwrap();
    assert_eq!(matched, [page.span, page.ul_two]);
}

#[test]
fn test_alternatives_concatenate_without_dedup() {
    let (tree, page) = sample_page();
    let eyes = Eyes::new();

    // #app matches both alternatives and appears twice.
    let matched = eyes.search(&tree, "div, #app").unwrap();
    assert_eq!(matched, [page.app, page.app]);
}

#[test]
fn test_search_is_idempotent() {
    let (tree, _page) = sample_page();
    let eyes = Eyes::new();

    let first = eyes.search(&tree, "form ul li, .text").unwrap();
    let second = eyes.search(&tree, "form ul li, .text").unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_attribute_operator_truth_table() {
    let mut tree = DomTree::new();
    let node = tree.alloc_element("div", &[("data-kind", "foo-bar")]);
    tree.append_child(NodeId::ROOT, node);
    let eyes = Eyes::new();

    for (selectors, matches) in [
        ("[data-kind^=\"foo\"]", true),
        ("[data-kind$=\"bar\"]", true),
        ("[data-kind*=\"o-b\"]", true),
        ("[data-kind|=\"foo\"]", true),
        // `~=` wants a whole space-separated token.
        ("[data-kind~=\"foo-bar\"]", true),
        ("[data-kind~=\"foo\"]", false),
        ("[data-kind=\"foo-bar\"]", true),
        ("[data-kind=\"foo\"]", false),
        ("[data-kind]", true),
        ("[data-other]", false),
    ] {
        let found = !eyes.search(&tree, selectors).unwrap().is_empty();
        assert_eq!(found, matches, "selector {selectors:?}");
    }
}

#[test]
fn test_operator_without_value_never_matches() {
    let mut tree = DomTree::new();
    let node = tree.alloc_element("div", &[("x", "1")]);
    tree.append_child(NodeId::ROOT, node);

    assert!(Eyes::new().search(&tree, "[x=]").unwrap().is_empty());
    assert_eq!(Eyes::new().search(&tree, "[x]").unwrap(), [node]);
}

#[test]
fn test_search_error_on_unparseable_input() {
    let (tree, _page) = sample_page();
    let eyes = Eyes::new();

    assert_eq!(eyes.search(&tree, ""), Err(SelectorError::Empty));
    assert!(matches!(
        eyes.search(&tree, "div, , p"),
        Err(SelectorError::EmptyAlternative(_))
    ));
}

#[test]
fn test_watch_rescopes_search() {
    let (tree, page) = sample_page();
    let mut eyes = Eyes::new();

    // Scoped to the form: the span outside it disappears, and the scope
    // node itself is never part of a result.
    let _ = eyes.watch(page.form);
    assert!(eyes.search(&tree, ".text").unwrap().is_empty());
    assert!(eyes.search(&tree, "form").unwrap().is_empty());
    assert_eq!(
        eyes.search(&tree, "ul").unwrap(),
        [page.ul_one, page.ul_two]
    );
    assert_eq!(eyes.scope(), page.form);
}

#[test]
fn test_collect_nodes_is_document_order() {
    let (tree, page) = sample_page();
    let eyes = Eyes::new();

    assert_eq!(
        eyes.collect_nodes(&tree),
        [
            page.app,
            page.span,
            page.form,
            page.input,
            page.ul_one,
            page.li_one,
            page.li_two,
            page.ul_two,
            page.li_orphan,
        ]
    );
}

#[test]
fn test_collect_children_with_parent() {
    let (tree, page) = sample_page();

    let without = collect_children(&tree, &[page.ul_one], false);
    assert_eq!(without, [page.li_one, page.li_two]);

    let with = collect_children(&tree, &[page.ul_one], true);
    assert_eq!(with, [page.ul_one, page.li_one, page.li_two]);
}

#[test]
fn test_empty_descriptor_matches_everything() {
    let (tree, _page) = sample_page();
    let eyes = Eyes::new();

    let collected = eyes.collect_nodes(&tree);
    let matched = filter_elements(&tree, &collected, &QuerySelector::default());
    assert_eq!(matched, collected);
}

#[test]
fn test_query_selector_wrappers() {
    let (tree, page) = sample_page();

    assert_eq!(query_selector(&tree, "li").unwrap(), Some(page.li_one));
    assert_eq!(query_selector(&tree, "table").unwrap(), None);
    assert_eq!(
        query_selector_all(&tree, "ul").unwrap(),
        [page.ul_one, page.ul_two]
    );
}

#[test]
fn test_class_list_reads_current_attribute() {
    let (mut tree, page) = sample_page();

    assert!(Eyes::new().search(&tree, ".flagged").unwrap().is_empty());
    tree.as_element_mut(page.input)
        .unwrap()
        .set_attribute("class", "flagged");
    assert_eq!(
        Eyes::new().search(&tree, ".flagged").unwrap(),
        [page.input]
    );
}
