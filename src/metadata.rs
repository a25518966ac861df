//! Metadata records and the metadata block parser.
//!
//! A content file can carry metadata in one of two surface syntaxes, both of
//! which end up as a raw text block handed to [`extract_metadata_values`]:
//!
//! ## Object-literal blocks (MDX)
//!
//! ```text
//! {
//!   title: 'My Post',
//!   description: "A great post",
//!   tags: ['blog', 'tech'],
//! }
//! ```
//!
//! Entries are separated by top-level commas. Keys may be quoted.
//! `//` line comments and `/* */` block comments are ignored.
//!
//! ## Line-oriented blocks (YAML frontmatter)
//!
//! ```text
//! title: My Post
//! tags: [blog, tech]
//! authors:
//!   - ada
//!   - grace
//! ```
//!
//! One `key: value` per line; sequences are either inline `[a, b]` or a run of
//! `- item` lines under an empty value.
//!
//! ## Values
//!
//! Every value is either a string or an ordered list of strings
//! ([`MetaValue`]). Surrounding quotes are stripped from strings and list
//! elements. List elements split on commas at the top level only, so
//! `['a, b', [c, d]]` has two elements. Anything the parser does not
//! recognize (nested objects, function calls) is kept as a raw string.
//!
//! Parsing never fails: malformed input yields whatever entries could be
//! recognized, and an empty or unrecognizable block yields an empty record.

use serde::Serialize;
use std::collections::BTreeMap;

/// A single metadata value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MetaValue {
    String(String),
    List(Vec<String>),
}

impl MetaValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::String(s) => Some(s.as_str()),
            MetaValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            MetaValue::String(_) => None,
            MetaValue::List(items) => Some(items.as_slice()),
        }
    }
}

/// Parsed metadata of one content file.
///
/// Keys are kept sorted so serialized records are byte-stable across runs.
/// An absent key is simply missing from the map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Metadata {
    values: BTreeMap<String, MetaValue>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.values.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: MetaValue) {
        self.values.insert(key.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn title(&self) -> Option<&str> {
        self.string("title")
    }

    pub fn description(&self) -> Option<&str> {
        self.string("description")
    }

    pub fn category(&self) -> Option<&str> {
        self.string("category")
    }

    pub fn tags(&self) -> Option<&[String]> {
        self.get("tags").and_then(MetaValue::as_list)
    }

    fn string(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(MetaValue::as_str)
    }
}

/// Resolve a field from multiple sources.
///
/// Takes a list of optional values in priority order and returns the first
/// non-None, non-blank value, trimmed. Title and description inference are
/// both expressed as a call to this function.
pub fn resolve(sources: &[Option<&str>]) -> Option<String> {
    sources
        .iter()
        .filter_map(|opt| {
            opt.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        })
        .next()
}

/// Parse a raw metadata block into a [`Metadata`] record.
///
/// Accepts either an object-literal block (`{ key: value, ... }`) or a
/// line-oriented YAML-style block. See the module docs for the grammar.
pub fn extract_metadata_values(block: &str) -> Metadata {
    let trimmed = block.trim();
    if trimmed.starts_with('{') {
        let inner = trimmed
            .strip_prefix('{')
            .map(|s| s.strip_suffix('}').unwrap_or(s))
            .unwrap_or(trimmed);
        parse_object_literal(inner)
    } else {
        parse_lines(trimmed)
    }
}

// ============================================================================
// Object-literal syntax
// ============================================================================

fn parse_object_literal(inner: &str) -> Metadata {
    let mut metadata = Metadata::new();
    let without_comments = strip_comments(inner);
    for entry in split_top_level(&without_comments, ',') {
        let Some((key, raw_value)) = split_key_value(entry) else {
            continue;
        };
        if raw_value.is_empty() {
            continue;
        }
        metadata.insert(key, parse_value(raw_value));
    }
    metadata
}

/// Drop `//` and `/* */` comments that sit outside string literals.
fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => {
                quote = Some(c);
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for skipped in chars.by_ref() {
                    if prev == '*' && skipped == '/' {
                        break;
                    }
                    prev = skipped;
                }
            }
            _ => out.push(c),
        }
    }
    out
}

// ============================================================================
// Line-oriented syntax
// ============================================================================

fn parse_lines(block: &str) -> Metadata {
    let mut metadata = Metadata::new();
    // Key whose value was empty, waiting for `- item` lines.
    let mut pending: Option<(String, Vec<String>)> = None;

    for line in block.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some(item) = trimmed.strip_prefix('-').filter(|_| pending.is_some()) {
            if let Some((_, items)) = pending.as_mut() {
                let item = unquote(item.trim());
                if !item.is_empty() {
                    items.push(item);
                }
            }
            continue;
        }

        if let Some((key, items)) = pending.take()
            && !items.is_empty()
        {
            metadata.insert(key, MetaValue::List(items));
        }

        let Some((key, raw_value)) = split_key_value(trimmed) else {
            continue;
        };
        if raw_value.is_empty() {
            pending = Some((key, Vec::new()));
        } else {
            metadata.insert(key, parse_value(raw_value));
        }
    }

    if let Some((key, items)) = pending
        && !items.is_empty()
    {
        metadata.insert(key, MetaValue::List(items));
    }

    metadata
}

// ============================================================================
// Shared value grammar
// ============================================================================

/// Split `key: value` at the first top-level colon.
///
/// Returns `None` when there is no colon or the key is not a plain
/// identifier (after removing optional quotes).
fn split_key_value(entry: &str) -> Option<(String, &str)> {
    let entry = entry.trim();
    let colon = find_top_level(entry, ':')?;
    let key = unquote(entry[..colon].trim());
    if key.is_empty()
        || !key
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '$')
    {
        return None;
    }
    Some((key, entry[colon + 1..].trim()))
}

fn parse_value(raw: &str) -> MetaValue {
    let raw = raw.trim();
    if let Some(inner) = raw.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        let items = split_top_level(inner, ',')
            .into_iter()
            .map(|item| unquote(item.trim()))
            .filter(|item| !item.is_empty())
            .collect();
        return MetaValue::List(items);
    }
    MetaValue::String(unquote(raw))
}

/// Strip one pair of matching surrounding quotes and resolve `\` escapes
/// inside them. Unquoted input is returned trimmed and otherwise unchanged.
fn unquote(value: &str) -> String {
    let value = value.trim();
    let mut chars = value.chars();
    let (Some(first), Some(last)) = (chars.next(), chars.next_back()) else {
        return value.to_string();
    };
    if first != last || !matches!(first, '\'' | '"' | '`') {
        return value.to_string();
    }

    let inner = &value[1..value.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut it = inner.chars();
    while let Some(c) = it.next() {
        if c == '\\' {
            match it.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Split on `sep` wherever it appears outside quotes and brackets.
fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut offset = 0;
    while let Some(pos) = find_top_level(&text[offset..], sep) {
        let abs = offset + pos;
        parts.push(&text[start..abs]);
        start = abs + sep.len_utf8();
        offset = start;
    }
    parts.push(&text[start..]);
    parts
}

/// Byte index of the first `target` outside quotes and `()[]{}` nesting.
fn find_top_level(text: &str, target: char) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '[' | '{' | '(' => depth += 1,
            ']' | '}' | ')' => depth = depth.saturating_sub(1),
            _ if c == target && depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}
