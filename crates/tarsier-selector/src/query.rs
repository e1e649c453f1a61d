//! Parsed selector descriptors.
//!
//! A selector string parses into a list of [`QuerySelector`] values, one per
//! comma-separated alternative. Each descriptor captures one
//! whitespace-delimited segment plus the segments that follow it as a
//! descendant chain.

use serde::Serialize;
use strum_macros::{Display, EnumString};
use thiserror::Error;

/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// The attribute match operators, with their literal CSS spellings as the
/// string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize)]
pub enum AttrOp {
    /// `[attr=value]` - "value is exactly 'val'"
    #[strum(serialize = "=")]
    #[serde(rename = "=")]
    Equals,

    /// `[attr~=value]` - "a whitespace-separated list of words, one of which
    /// is exactly 'val'"
    #[strum(serialize = "~=")]
    #[serde(rename = "~=")]
    Includes,

    /// `[attr|=value]` - "either being exactly 'val' or beginning with 'val'
    /// immediately followed by '-'"
    #[strum(serialize = "|=")]
    #[serde(rename = "|=")]
    DashMatch,

    /// `[attr^=value]` - "begins with the prefix 'val'"
    #[strum(serialize = "^=")]
    #[serde(rename = "^=")]
    PrefixMatch,

    /// `[attr$=value]` - "ends with the suffix 'val'"
    #[strum(serialize = "$=")]
    #[serde(rename = "$=")]
    SuffixMatch,

    /// `[attr*=value]` - "contains at least one instance of the substring
    /// 'val'"
    #[strum(serialize = "*=")]
    #[serde(rename = "*=")]
    SubstringMatch,
}

/// One bracketed attribute clause of a selector segment.
///
/// With no operator and no value the clause is a presence test (`[disabled]`).
/// A clause that carries an operator but no value is representable (the
/// grammar makes the quoted value optional) and never matches anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryAttribute {
    /// Attribute name, case-sensitive as written.
    pub name: String,
    /// Match operator, absent for presence tests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub op: Option<AttrOp>,
    /// Expected value with the quotes stripped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl QueryAttribute {
    /// Presence-test clause for the given attribute name.
    #[must_use]
    pub fn presence(name: &str) -> Self {
        Self {
            name: name.to_string(),
            op: None,
            value: None,
        }
    }
}

/// One parsed selector alternative.
///
/// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
///
/// All populated criteria on a segment must hold simultaneously (AND
/// semantics); absent criteria are vacuously true, so an empty descriptor
/// matches every element. `sub_queries` holds the whitespace-separated
/// segments that followed this one, outermost first - each narrows the match
/// to descendants of the previous frontier
/// ([§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuerySelector {
    /// Type selector, matched ASCII case-insensitively.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,
    /// Id selector, matched exactly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Class selectors; every listed class must be present on the element.
    pub class_names: Vec<String>,
    /// Attribute clauses; every clause must hold.
    pub attributes: Vec<QueryAttribute>,
    /// Descendant chain, outermost segment first.
    pub sub_queries: Vec<QuerySelector>,
}

/// Errors surfaced by [`crate::parse_selectors`].
///
/// Parsing is otherwise lenient - malformed bracket clauses are skipped, not
/// reported - so these cover only input with no usable alternative at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// The whole selector string is empty or whitespace.
    #[error("empty selector")]
    Empty,

    /// A comma-separated alternative contains no segments (e.g. `div, , p`).
    #[error("empty alternative in selector list `{0}`")]
    EmptyAlternative(String),
}
