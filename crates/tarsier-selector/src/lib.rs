//! Selector parsing and matching for the Tarsier query engine.
//!
//! This crate implements the selector subset described by
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/) that legacy host
//! environments actually need: type, id, class, and attribute selectors,
//! comma-separated alternatives, and the descendant combinator. Child and
//! sibling combinators, pseudo-classes, and specificity are deliberately not
//! supported.
//!
//! Two layers:
//! - [`parser`] - pure string-to-descriptor parsing ([`parse_selectors`]).
//! - [`matcher`] - the [`Eyes`] walker that resolves descriptors against a
//!   [`tarsier_dom::DomTree`] in document order.

pub mod matcher;
pub mod parser;
mod query;

pub use matcher::{Eyes, collect_children, filter_elements, query_selector, query_selector_all};
pub use parser::{parse_attributes, parse_component, parse_non_attribute, parse_selectors};
pub use query::{AttrOp, QueryAttribute, QuerySelector, SelectorError};
