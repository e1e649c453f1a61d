//! Tree matching for parsed selectors.
//!
//! [§ 4.1 Selector Matching](https://www.w3.org/TR/selectors-4/#match-a-selector-against-an-element)
//!
//! [`Eyes`] resolves a selector string against a [`DomTree`]: the subtree
//! under its scope is collected once in document order, each comma
//! alternative filters that collection independently, and a descendant chain
//! re-collects and re-filters from the surviving frontier. Alternative
//! results are concatenated as-is - same order as the selector list, no
//! de-duplication across alternatives.

use crate::parser::parse_selectors;
use crate::query::{AttrOp, QueryAttribute, QuerySelector, SelectorError};
use tarsier_dom::{DomTree, ElementData, NodeId};

/// Selector-driven walker over a document tree.
///
/// Scoped to a root node (the document node by default); the scope node
/// itself is never part of a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eyes {
    scope: NodeId,
}

impl Eyes {
    /// A walker scoped to the whole document.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            scope: NodeId::ROOT,
        }
    }

    /// Re-scope this walker to the subtree under `scope`. Chainable.
    pub fn watch(&mut self, scope: NodeId) -> &mut Self {
        self.scope = scope;
        self
    }

    /// The current scope node.
    #[must_use]
    pub const fn scope(&self) -> NodeId {
        self.scope
    }

    /// Every element under the current scope, in document order.
    #[must_use]
    pub fn collect_nodes(&self, tree: &DomTree) -> Vec<NodeId> {
        collect_children(tree, &[self.scope], false)
    }

    /// Resolve a selector string against `tree`.
    ///
    /// Results are in document order within one alternative; alternatives
    /// are concatenated in selector order without de-duplication, so an
    /// element matching two alternatives appears twice.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError`] when the selector string has no usable
    /// alternative, so callers can tell "no parse" from "no match".
    pub fn search(&self, tree: &DomTree, selectors: &str) -> Result<Vec<NodeId>, SelectorError> {
        let queries = parse_selectors(selectors)?;
        let collected = self.collect_nodes(tree);

        let mut matched = Vec::new();
        for query in &queries {
            let mut frontier = filter_elements(tree, &collected, query);
            for sub in &query.sub_queries {
                // Narrow to descendants-of-descendants: each chained segment
                // filters the descendants of the previous frontier.
                let pool = collect_children(tree, &frontier, false);
                frontier = filter_elements(tree, &pool, sub);
            }
            matched.extend(frontier);
        }
        Ok(matched)
    }
}

impl Default for Eyes {
    fn default() -> Self {
        Self::new()
    }
}

/// Pre-order descendant collection for a set of frontier nodes.
///
/// For each node in `nodes`, every element in its subtree is yielded in
/// document order; `with_parent` additionally yields the frontier node
/// itself (when it is an element) ahead of its subtree. Subtrees shared by
/// overlapping frontier nodes are collected once per occurrence - callers
/// that need distinct frontiers must guarantee them.
#[must_use]
pub fn collect_children(tree: &DomTree, nodes: &[NodeId], with_parent: bool) -> Vec<NodeId> {
    let mut collected = Vec::new();
    for &node in nodes {
        if with_parent && tree.as_element(node).is_some() {
            collected.push(node);
        }
        descend(tree, node, &mut collected);
    }
    collected
}

/// Push every element below `node` in document order.
fn descend(tree: &DomTree, node: NodeId, collected: &mut Vec<NodeId>) {
    for &child in tree.children(node) {
        if tree.as_element(child).is_some() {
            collected.push(child);
        }
        descend(tree, child, collected);
    }
}

/// Keep the elements of `elements` that satisfy `query`, preserving order.
///
/// Only the segment criteria are tested here; the caller drives the
/// `sub_queries` chain.
#[must_use]
pub fn filter_elements(tree: &DomTree, elements: &[NodeId], query: &QuerySelector) -> Vec<NodeId> {
    elements
        .iter()
        .copied()
        .filter(|&id| element_matches(tree, id, query))
        .collect()
}

/// Test one element against one segment descriptor (AND semantics; absent
/// criteria are vacuously true).
fn element_matches(tree: &DomTree, id: NodeId, query: &QuerySelector) -> bool {
    let Some(element) = tree.as_element(id) else {
        return false;
    };

    // [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    // Tag names compare ASCII case-insensitively.
    if let Some(tag) = &query.tag_name
        && !element.tag_name.eq_ignore_ascii_case(tag)
    {
        return false;
    }

    // [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    if let Some(id_value) = &query.id
        && !element.id().is_some_and(|el_id| el_id == id_value)
    {
        return false;
    }

    // [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    // Every requested class must be in the element's current class list.
    if !query.class_names.is_empty() {
        let classes = element.classes();
        if !query
            .class_names
            .iter()
            .all(|name| classes.contains(name.as_str()))
        {
            return false;
        }
    }

    query
        .attributes
        .iter()
        .all(|attr| attribute_matches(element, attr))
}

/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// A missing attribute fails every clause; a clause with no operator is a
/// presence test; an operator with no value matches nothing.
fn attribute_matches(element: &ElementData, attr: &QueryAttribute) -> bool {
    let Some(actual) = element.attrs.get(&attr.name) else {
        return false;
    };
    match (attr.op, attr.value.as_deref()) {
        (None, _) => true,
        (Some(op), Some(expected)) => match op {
            AttrOp::Equals => actual == expected,
            AttrOp::Includes => actual
                .split_ascii_whitespace()
                .any(|token| token == expected),
            AttrOp::DashMatch => {
                actual == expected || actual.starts_with(&format!("{expected}-"))
            }
            AttrOp::PrefixMatch => actual.starts_with(expected),
            AttrOp::SuffixMatch => actual.ends_with(expected),
            AttrOp::SubstringMatch => actual.contains(expected),
        },
        (Some(_), None) => false,
    }
}

/// First element matching `selectors`, in document order.
///
/// [§ 4.2.6 querySelector](https://dom.spec.whatwg.org/#dom-parentnode-queryselector)
///
/// # Errors
///
/// Propagates [`SelectorError`] from parsing.
pub fn query_selector(tree: &DomTree, selectors: &str) -> Result<Option<NodeId>, SelectorError> {
    Ok(query_selector_all(tree, selectors)?.into_iter().next())
}

/// All elements matching `selectors`.
///
/// [§ 4.2.6 querySelectorAll](https://dom.spec.whatwg.org/#dom-parentnode-queryselectorall)
///
/// # Errors
///
/// Propagates [`SelectorError`] from parsing.
pub fn query_selector_all(tree: &DomTree, selectors: &str) -> Result<Vec<NodeId>, SelectorError> {
    Eyes::new().search(tree, selectors)
}
