//! Selector string parsing.
//!
//! [§ 4 Selector syntax](https://www.w3.org/TR/selectors-4/#syntax)
//!
//! The entry point is [`parse_selectors`], which turns a full selector list
//! into one [`QuerySelector`] per comma-separated alternative. Splitting on
//! commas and whitespace is quote-aware so attribute values may contain both
//! (`[title="a, b"]` stays one segment).
//!
//! Parsing is lenient everywhere except the alternative level: a bracket
//! clause that does not fit `[name op? "value"?]` is skipped silently, but an
//! alternative with no segments at all is a hard error so callers can
//! distinguish "no parse" from "no match".

use crate::query::{AttrOp, QueryAttribute, QuerySelector, SelectorError};
use std::ops::Range;

/// Characters allowed in tag-position identifiers and attribute names.
///
/// [§ 4.3.9 ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
/// restricted to the ASCII subset this grammar accepts.
const fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Parse a full selector list into its comma-separated alternatives.
///
/// Within each alternative, the first whitespace-delimited segment becomes
/// the primary descriptor and the remaining segments its descendant chain
/// (`sub_queries`), outermost first.
///
/// # Errors
///
/// Returns [`SelectorError::Empty`] for blank input and
/// [`SelectorError::EmptyAlternative`] when a comma group contains no
/// segments (e.g. `div, , p`).
pub fn parse_selectors(input: &str) -> Result<Vec<QuerySelector>, SelectorError> {
    if input.trim().is_empty() {
        return Err(SelectorError::Empty);
    }

    let groups = split_outside_quotes(input, |c| c == ',');
    let mut queries = Vec::with_capacity(groups.len());
    for group in groups {
        let mut segments = split_outside_quotes(group, char::is_whitespace)
            .into_iter()
            .filter(|segment| !segment.is_empty());

        let Some(first) = segments.next() else {
            return Err(SelectorError::EmptyAlternative(input.to_string()));
        };

        let mut query = parse_component(first);
        query.sub_queries = segments.map(parse_component).collect();
        queries.push(query);
    }
    Ok(queries)
}

/// Parse one whitespace-delimited segment into a descriptor.
///
/// The segment splits at the first well-formed attribute bracket: everything
/// before it is the tag/id/class part, everything from it onward is attribute
/// clauses. A segment that opens with a bracket has no tag/id/class part; a
/// segment with no well-formed bracket is entirely non-attribute.
#[must_use]
pub fn parse_component(segment: &str) -> QuerySelector {
    match find_clause(segment) {
        Some((span, _)) if span.start == 0 => QuerySelector {
            attributes: parse_attributes(segment),
            ..QuerySelector::default()
        },
        Some((span, _)) => {
            let mut query = parse_non_attribute(&segment[..span.start]);
            query.attributes = parse_attributes(&segment[span.start..]);
            query
        }
        None => parse_non_attribute(segment),
    }
}

/// Parse the tag/id/class part of a segment.
///
/// Disambiguation follows the leading character:
/// - `#` starts an id selector, optionally followed by `.class` parts;
/// - `.` starts a pure class selector (note that `.bar#foo` is therefore one
///   literal class name, not a class plus an id - id must precede classes);
/// - anything else is tag-led, with optional `#id` and `.class` parts after
///   the tag name.
#[must_use]
pub fn parse_non_attribute(selector: &str) -> QuerySelector {
    match selector.chars().next() {
        Some('#') => {
            if selector.contains('.') {
                let (hashed, class_names) = split_class_suffix(selector);
                QuerySelector {
                    id: Some(hashed[1..].to_string()),
                    class_names,
                    ..QuerySelector::default()
                }
            } else {
                QuerySelector {
                    id: Some(selector[1..].to_string()),
                    ..QuerySelector::default()
                }
            }
        }
        Some('.') => QuerySelector {
            class_names: selector
                .split('.')
                .filter(|part| !part.is_empty())
                .map(ToString::to_string)
                .collect(),
            ..QuerySelector::default()
        },
        Some(_) => parse_tag_led(selector),
        None => QuerySelector::default(),
    }
}

/// Tag-led segment: `tag`, `tag#id`, `tag.class...`, or `tag#id.class...`.
fn parse_tag_led(selector: &str) -> QuerySelector {
    if let Some(id_index) = selector.find('#') {
        let tag_name = Some(selector[..id_index].to_string());
        let rest = &selector[id_index..];
        if rest.contains('.') {
            let (hashed, class_names) = split_class_suffix(rest);
            QuerySelector {
                tag_name,
                id: Some(hashed[1..].to_string()),
                class_names,
                ..QuerySelector::default()
            }
        } else {
            QuerySelector {
                tag_name,
                id: Some(rest[1..].to_string()),
                ..QuerySelector::default()
            }
        }
    } else if selector.contains('.') {
        let (tag, class_names) = split_class_suffix(selector);
        QuerySelector {
            tag_name: Some(tag.to_string()),
            class_names,
            ..QuerySelector::default()
        }
    } else {
        QuerySelector {
            tag_name: Some(selector.to_string()),
            ..QuerySelector::default()
        }
    }
}

/// Split `head.class1.class2` into the head and its non-empty class parts.
fn split_class_suffix(qualified: &str) -> (&str, Vec<String>) {
    let mut parts = qualified.split('.');
    let head = parts.next().unwrap_or("");
    let class_names = parts
        .filter(|part| !part.is_empty())
        .map(ToString::to_string)
        .collect();
    (head, class_names)
}

/// Parse every well-formed attribute clause in `input`, skipping anything
/// malformed (including a trailing bracket with no `]`).
#[must_use]
pub fn parse_attributes(input: &str) -> Vec<QueryAttribute> {
    let mut attributes = Vec::new();
    let mut rest = input;
    while let Some((span, attr)) = find_clause(rest) {
        attributes.push(attr);
        rest = &rest[span.end..];
    }
    attributes
}

/// Locate the first well-formed `[name op? "value"?]` clause in `input`.
///
/// Closing brackets are searched quote-aware so a value may contain `]`.
/// Returns the clause's byte span together with its parsed form.
fn find_clause(input: &str) -> Option<(Range<usize>, QueryAttribute)> {
    let mut scan_from = 0;
    while let Some(rel_close) = find_unquoted(&input[scan_from..], ']') {
        let close = scan_from + rel_close;
        let end = close + 1;
        // Try every opening bracket before this close, leftmost first.
        let mut open_from = scan_from;
        while let Some(rel_open) = input[open_from..close].find('[') {
            let open = open_from + rel_open;
            if let Some(attr) = parse_attr_clause(&input[open..end]) {
                return Some((open..end, attr));
            }
            open_from = open + 1;
        }
        scan_from = end;
    }
    None
}

/// Parse one `[...]` clause. `None` means the clause is malformed and should
/// be skipped.
fn parse_attr_clause(clause: &str) -> Option<QueryAttribute> {
    let inner = clause.strip_prefix('[')?.strip_suffix(']')?;

    let name_end = inner
        .find(|c: char| !is_name_char(c))
        .unwrap_or(inner.len());
    if name_end == 0 {
        return None;
    }
    let name = inner[..name_end].to_string();

    let rest = &inner[name_end..];
    if rest.is_empty() {
        return Some(QueryAttribute {
            name,
            op: None,
            value: None,
        });
    }

    let (op, rest) = split_op(rest)?;
    if rest.is_empty() {
        // `[x=]` - representable, matches nothing.
        return Some(QueryAttribute {
            name,
            op: Some(op),
            value: None,
        });
    }

    let value = parse_quoted_value(rest)?;
    Some(QueryAttribute {
        name,
        op: Some(op),
        value: Some(value),
    })
}

/// Split a recognized operator off the front of `s`.
fn split_op(s: &str) -> Option<(AttrOp, &str)> {
    // Two-character forms (`~=`, `|=`, ...) shadow the bare `=`.
    for len in [2, 1] {
        if let Some(prefix) = s.get(..len)
            && let Ok(op) = prefix.parse::<AttrOp>()
        {
            return Some((op, &s[len..]));
        }
    }
    None
}

/// Parse a fully quoted, non-empty value (`"..."` or `'...'`), stripping the
/// quotes. The other quote kind may appear inside.
fn parse_quoted_value(s: &str) -> Option<String> {
    let quote = s.chars().next()?;
    if quote != '"' && quote != '\'' {
        return None;
    }
    if s.len() < 3 || !s.ends_with(quote) {
        return None;
    }
    let body = s.get(1..s.len() - 1)?;
    if body.contains(quote) {
        return None;
    }
    Some(body.to_string())
}

/// Split `input` at every delimiter that is not inside a quoted run.
///
/// Empty parts are kept; callers decide whether they are errors (comma
/// level) or noise (whitespace level).
fn split_outside_quotes(input: &str, is_delimiter: impl Fn(char) -> bool) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_quote: Option<char> = None;
    let mut start = 0;
    for (index, c) in input.char_indices() {
        if let Some(quote) = in_quote {
            if c == quote {
                in_quote = None;
            }
        } else if c == '"' || c == '\'' {
            in_quote = Some(c);
        } else if is_delimiter(c) {
            parts.push(&input[start..index]);
            start = index + c.len_utf8();
        }
    }
    parts.push(&input[start..]);
    parts
}

/// First occurrence of `target` outside any quoted run.
fn find_unquoted(input: &str, target: char) -> Option<usize> {
    let mut in_quote: Option<char> = None;
    for (index, c) in input.char_indices() {
        if let Some(quote) = in_quote {
            if c == quote {
                in_quote = None;
            }
        } else if c == target {
            return Some(index);
        } else if c == '"' || c == '\'' {
            in_quote = Some(c);
        }
    }
    None
}
