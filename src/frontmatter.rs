//! Locating and removing the metadata block of a document.
//!
//! Two block styles are recognized:
//!
//! ```markdown
//! ---
//! title: My Post
//! ---
//!
//! # Body
//! ```
//!
//! and, in MDX,
//!
//! ```mdx
//! export const metadata = {
//!   title: 'My Post',
//!   tags: ['blog', 'tech'],
//! };
//!
//! # Body
//! ```
//!
//! Both extractors hand back the raw block text (for
//! [`extract_metadata_values`](crate::metadata::extract_metadata_values)) and
//! the body with the block removed. When no block is found the body is the
//! input, untouched.
//!
//! The `export const metadata` object is delimited with a bracket-depth
//! scanner rather than a pattern, so nested objects and braces inside string
//! literals or comments do not end the block early. If the object never
//! balances (an unterminated string, a missing `}`), the statement is left in
//! the body and no metadata is extracted from it.

use crate::scanner;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Which kind of block was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Yaml,
    MetadataExport,
    None,
}

/// A document split into its raw metadata block and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub kind: BlockKind,
    /// Raw block text. For YAML this is the text between the `---` lines;
    /// for an export it is the object literal including its braces.
    pub block: String,
    pub body: String,
}

impl Extracted {
    fn unchanged(input: &str) -> Self {
        Self {
            kind: BlockKind::None,
            block: String::new(),
            body: input.to_string(),
        }
    }

    pub fn has_block(&self) -> bool {
        self.kind != BlockKind::None
    }
}

/// Split off a `---` delimited frontmatter block at the very start of `input`.
///
/// The opening line must be the first line of the document (a leading BOM is
/// tolerated). Without a closing `---` line there is no frontmatter.
pub fn extract_yaml_frontmatter(input: &str) -> Extracted {
    let text = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut lines = text.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return Extracted::unchanged(input);
    };
    if first.trim_end() != "---" {
        return Extracted::unchanged(input);
    }

    let mut offset = first.len();
    for line in lines {
        if line.trim_end() == "---" {
            return Extracted {
                kind: BlockKind::Yaml,
                block: text[first.len()..offset].to_string(),
                body: text[offset + line.len()..].to_string(),
            };
        }
        offset += line.len();
    }

    debug!("frontmatter opened with --- but never closed; treating as body");
    Extracted::unchanged(input)
}

static EXPORT_METADATA_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Optional type annotation: `export const metadata: Metadata = {`
    Regex::new(r"(?m)^[ \t]*export[ \t]+const[ \t]+metadata\b[^=\n]*=\s*\{").expect("valid regex")
});

/// Remove the first `export const metadata = { ... };` statement.
///
/// Statements inside fenced code blocks are ignored. The removed span covers
/// the whole statement: keyword, identifier, `=`, the balanced object, an
/// optional `;` and the rest of its line.
pub fn extract_metadata_export(input: &str) -> Extracted {
    let fences = scanner::fence_ranges(input);

    for m in EXPORT_METADATA_RE.find_iter(input) {
        if scanner::fence_containing(&fences, m.start()).is_some() {
            continue;
        }
        let open = m.end() - 1;
        let Some(close) = scanner::matching_close(input, open) else {
            debug!("unbalanced `export const metadata` object; leaving body unchanged");
            return Extracted::unchanged(input);
        };
        let end = scanner::consume_terminator(input, close);

        let mut body = String::with_capacity(input.len() - (end - m.start()));
        body.push_str(&input[..m.start()]);
        body.push_str(&input[end..]);
        return Extracted {
            kind: BlockKind::MetadataExport,
            block: input[open..close].to_string(),
            body,
        };
    }

    Extracted::unchanged(input)
}

/// MDX extraction: an `export const metadata` statement wins, YAML
/// frontmatter is the fallback.
pub fn extract_mdx_block(input: &str) -> Extracted {
    let extracted = extract_metadata_export(input);
    if extracted.has_block() {
        return extracted;
    }
    extract_yaml_frontmatter(input)
}
