//! Title and description inference.
//!
//! ## Resolution priority
//!
//! Each field is resolved independently; the first non-empty value wins:
//!
//! - **Title**: `metadata.title` → first `#` heading of the body → file name
//!   (`my-awesome-post.mdx` → "My Awesome Post")
//! - **Description**: `metadata.description` → first qualifying paragraph of
//!   the body → none
//!
//! A qualifying paragraph is a top-level paragraph (not inside a list,
//! blockquote or footnote) whose plain text is longer than
//! [`MIN_DESCRIPTION_CHARS`]. Headings, list items and code blocks never
//! qualify. Inline formatting is flattened to its text, so
//! `See [the docs](/docs)` contributes "See the docs".
//!
//! Long paragraphs are shortened to at most [`MAX_DESCRIPTION_CHARS`]
//! characters (ellipsis included), cut at the last word boundary that fits.
//! A single word longer than the limit is the only case that gets cut
//! mid-word.
//!
//! Block structure comes from `pulldown-cmark`, so setext headings
//! (`Title\n=====`) count as H1 too.

use crate::metadata::{Metadata, resolve};
use crate::naming;
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use std::path::Path;

pub const MIN_DESCRIPTION_CHARS: usize = 50;
pub const MAX_DESCRIPTION_CHARS: usize = 200;

const ELLIPSIS: &str = "...";

/// Resolve the display title of a file. Never empty.
pub fn extract_title(path: &Path, metadata: &Metadata, content: &str) -> String {
    let heading = first_h1(content);
    resolve(&[metadata.title(), heading.as_deref()])
        .unwrap_or_else(|| naming::title_from_path(path))
}

/// Resolve the description of a file, if there is one.
pub fn extract_description(metadata: &Metadata, content: &str) -> Option<String> {
    resolve(&[metadata.description()]).or_else(|| {
        first_long_paragraph(content).map(|p| truncate_at_word(&p, MAX_DESCRIPTION_CHARS))
    })
}

/// Text of the first level-1 heading.
fn first_h1(content: &str) -> Option<String> {
    let mut heading: Option<String> = None;
    for event in Parser::new(content) {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => heading = Some(String::new()),
            Event::End(TagEnd::Heading(HeadingLevel::H1)) => {
                let text = heading.take().map(|t| normalize_whitespace(&t));
                if let Some(text) = text.filter(|t| !t.is_empty()) {
                    return Some(text);
                }
            }
            Event::Text(t) | Event::Code(t) => {
                if let Some(buf) = heading.as_mut() {
                    buf.push_str(&t);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some(buf) = heading.as_mut() {
                    buf.push(' ');
                }
            }
            _ => {}
        }
    }
    None
}

fn is_container(tag: &Tag<'_>) -> bool {
    matches!(
        tag,
        Tag::List(_) | Tag::Item | Tag::BlockQuote(_) | Tag::FootnoteDefinition(_)
    )
}

/// Plain text of the first top-level paragraph longer than the minimum.
fn first_long_paragraph(content: &str) -> Option<String> {
    // One entry per open tag: whether it is a container.
    let mut open: Vec<bool> = Vec::new();
    let mut paragraph: Option<String> = None;
    let mut image_depth = 0usize;

    for event in Parser::new(content) {
        match event {
            Event::Start(tag) => {
                let nested = open.iter().any(|&container| container);
                match &tag {
                    Tag::Paragraph if !nested => paragraph = Some(String::new()),
                    Tag::Image { .. } => image_depth += 1,
                    _ => {}
                }
                open.push(is_container(&tag));
            }
            Event::End(tag_end) => {
                open.pop();
                match tag_end {
                    TagEnd::Paragraph => {
                        if let Some(text) = paragraph.take().map(|p| normalize_whitespace(&p))
                            && text.chars().count() > MIN_DESCRIPTION_CHARS
                        {
                            return Some(text);
                        }
                    }
                    TagEnd::Image => image_depth = image_depth.saturating_sub(1),
                    _ => {}
                }
            }
            Event::Text(t) | Event::Code(t) if image_depth == 0 => {
                if let Some(buf) = paragraph.as_mut() {
                    buf.push_str(&t);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some(buf) = paragraph.as_mut() {
                    buf.push(' ');
                }
            }
            _ => {}
        }
    }
    None
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Shorten `text` to at most `max_chars` characters, ellipsis included,
/// breaking at a word boundary.
pub fn truncate_at_word(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let budget = max_chars.saturating_sub(ELLIPSIS.len());
    let cut = text
        .char_indices()
        .nth(budget)
        .map_or(text.len(), |(i, _)| i);
    let head = &text[..cut];

    let head = if text[cut..].starts_with(char::is_whitespace) {
        head
    } else {
        match head.rfind(char::is_whitespace) {
            Some(boundary) => &head[..boundary],
            // One word longer than the budget: the only mid-word cut.
            None => head,
        }
    };
    format!("{}{ELLIPSIS}", head.trim_end())
}
