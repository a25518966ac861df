//! Stripping MDX-only syntax so that plain Markdown prose remains.
//!
//! Passes, in order, each applied to the whole document:
//!
//! 1. **Code statements**: every line starting with `import` (multi-line
//!    specifier lists included) and top-level `export` declarations.
//! 2. **Markup**: components (tags whose name starts with an uppercase
//!    letter, and `<>` fragments) are removed together with everything up to
//!    their matching closing tag; self-closing components are removed in
//!    place. Lowercase HTML/JSX tags are removed but their inner text is
//!    kept. MDX comments `{/* ... */}` are removed.
//! 3. **Whitespace**: whitespace-only lines are emptied, runs of more than
//!    two blank lines are collapsed to two, and the document is trimmed.
//!
//! Fenced code blocks are never touched by any pass, so a JavaScript example
//! that contains `import` lines or `<Component />` survives verbatim. Inline
//! code spans are likewise skipped by the markup pass.
//!
//! Every pass only deletes text, and deleting can expose a new match (a tag
//! split by a removed component, say). [`sanitize`] therefore repeats the
//! passes until the text stops changing, which makes it idempotent.

use crate::scanner::{self, FenceState};
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

/// Sanitize a document body. The result is a fixed point:
/// `sanitize(&sanitize(s)) == sanitize(s)`.
pub fn sanitize(body: &str) -> String {
    let mut current = body.to_string();
    loop {
        let next = sanitize_once(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn sanitize_once(text: &str) -> String {
    let text = strip_code_statements(text);
    let text = strip_markup(&text);
    collapse_blank_lines(&text)
}

// ============================================================================
// Pass 1: import / export statements
// ============================================================================

static STATEMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*(import|export)\b").expect("valid regex"));

static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    // `import x from 'y'`, `import{ a } from "y"`, bare `import 'y'`
    Regex::new(r#"^[ \t]*import(?:\s|\{|['"])"#).expect("valid regex")
});

static EXPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[ \t]*export(?:[ \t]+(?:const|let|var|function|class|default|async|type|interface|enum|declare|abstract)\b|[ \t]*[{*])",
    )
    .expect("valid regex")
});

/// Remove `import` lines and top-level `export` declarations.
///
/// Every line whose first word is `import` goes, together with the rest of
/// a multi-line `{ ... }` specifier list. An `export` line is only removed
/// when a declaration keyword, `{` or `*` follows, so a wrapped sentence
/// starting with "export your notes" stays. The removal always runs to the
/// end of the line the statement ends on.
fn strip_code_statements(text: &str) -> String {
    let fences = scanner::fence_ranges(text);
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;

    for caps in STATEMENT_RE.captures_iter(text) {
        let Some(m) = caps.get(0) else { continue };
        if m.start() < cursor || scanner::fence_containing(&fences, m.start()).is_some() {
            continue;
        }
        let rest = &text[m.start()..];
        let is_statement = match &caps[1] {
            "import" => IMPORT_RE.is_match(rest),
            _ => EXPORT_RE.is_match(rest),
        };
        if !is_statement {
            continue;
        }
        let end = scanner::line_end(text, scanner::statement_end(text, m.start()));
        out.push_str(&text[cursor..m.start()]);
        cursor = scanner::consume_terminator(text, end);
    }
    out.push_str(&text[cursor..]);
    out
}

// ============================================================================
// Pass 2: components, HTML tags, MDX comments
// ============================================================================

#[derive(Debug)]
struct Tag<'a> {
    name: &'a str,
    closing: bool,
    self_closing: bool,
    end: usize,
}

impl Tag<'_> {
    /// Components and fragments take their content with them.
    fn is_component(&self) -> bool {
        self.name.is_empty() || self.name.starts_with(|c: char| c.is_ascii_uppercase())
    }
}

/// Parse a JSX/HTML tag starting at the `<` at `start`.
///
/// Names may contain `.`, `_` and `-` (`<Tabs.Item>`, `<my-element>`) but not
/// `:` or `@`, so Markdown autolinks like `<https://example.com>` are not
/// tags. Attribute values in quotes or braces may contain `>`.
fn parse_tag(text: &str, start: usize) -> Option<Tag<'_>> {
    let bytes = text.as_bytes();
    let mut i = start + 1;
    let closing = bytes.get(i) == Some(&b'/');
    if closing {
        i += 1;
    }

    if bytes.get(i) == Some(&b'>') {
        return Some(Tag {
            name: "",
            closing,
            self_closing: false,
            end: i + 1,
        });
    }
    if !bytes.get(i)?.is_ascii_alphabetic() {
        return None;
    }
    let name_start = i;
    while i < bytes.len()
        && (bytes[i].is_ascii_alphanumeric() || matches!(bytes[i], b'.' | b'_' | b'-'))
    {
        i += 1;
    }
    let name = &text[name_start..i];
    match bytes.get(i)? {
        b'>' | b'/' => {}
        b if b.is_ascii_whitespace() => {}
        _ => return None,
    }

    // Bare words after a lowercase name (`a <b then c> d`) read as prose.
    let attrs_start = i;
    let mut assigned = false;
    loop {
        match *bytes.get(i)? {
            b'"' | b'\'' => i = scanner::skip_string(bytes, i)?,
            b'{' => {
                assigned = true;
                i = scanner::matching_close(text, i)?;
            }
            b'=' => {
                assigned = true;
                i += 1;
            }
            b'<' => return None,
            b'>' => {
                let attrs = text[attrs_start..i].trim().trim_end_matches('/').trim();
                if !assigned && !attrs.is_empty() && bytes[name_start].is_ascii_lowercase() {
                    return None;
                }
                return Some(Tag {
                    name,
                    closing,
                    self_closing: bytes[i - 1] == b'/',
                    end: i + 1,
                });
            }
            _ => i += 1,
        }
    }
}

/// Offset just past a `{/* ... */}` comment starting at `start`.
fn mdx_comment_end(text: &str, start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = start + 1;
    while bytes.get(i)?.is_ascii_whitespace() {
        i += 1;
    }
    if !text[i..].starts_with("/*") {
        return None;
    }
    i = scanner::skip_comment(bytes, i)?;
    while bytes.get(i)?.is_ascii_whitespace() {
        i += 1;
    }
    (bytes[i] == b'}').then_some(i + 1)
}

/// Offset just past an inline code span opened at `start`, or past the
/// backtick run itself when it has no closing run on the same line.
fn skip_code_span(text: &str, start: usize) -> usize {
    let bytes = text.as_bytes();
    let run = bytes[start..].iter().take_while(|&&b| b == b'`').count();
    let line_end = text[start..].find('\n').map_or(text.len(), |p| start + p);
    let mut i = start + run;
    while i < line_end {
        if bytes[i] == b'`' {
            let close = bytes[i..line_end].iter().take_while(|&&b| b == b'`').count();
            if close == run {
                return i + close;
            }
            i += close;
        } else {
            i += 1;
        }
    }
    start + run
}

/// What the markup scanner found at a position.
enum Found<'a> {
    Skip(usize),
    Tag(Tag<'a>),
    Comment(usize),
}

fn scan_at<'a>(text: &'a str, fences: &[Range<usize>], i: usize) -> Option<Found<'a>> {
    if let Some(fence) = scanner::fence_containing(fences, i) {
        return Some(Found::Skip(fence.end));
    }
    match text.as_bytes()[i] {
        b'`' => Some(Found::Skip(skip_code_span(text, i))),
        b'<' => parse_tag(text, i).map(Found::Tag),
        b'{' => mdx_comment_end(text, i).map(Found::Comment),
        _ => None,
    }
}

/// Offset just past the tag closing the component opened before `from`.
fn find_closing(text: &str, fences: &[Range<usize>], from: usize, name: &str) -> Option<usize> {
    let mut depth = 1usize;
    let mut i = from;
    while i < text.len() {
        match scan_at(text, fences, i) {
            Some(Found::Skip(end)) | Some(Found::Comment(end)) => i = end,
            Some(Found::Tag(tag)) => {
                if tag.name == name {
                    if tag.closing {
                        depth -= 1;
                        if depth == 0 {
                            return Some(tag.end);
                        }
                    } else if !tag.self_closing {
                        depth += 1;
                    }
                }
                i = tag.end;
            }
            None => i += 1,
        }
    }
    None
}

fn strip_markup(text: &str) -> String {
    let fences = scanner::fence_ranges(text);
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut i = 0;

    while i < text.len() {
        let removed = match scan_at(text, &fences, i) {
            Some(Found::Skip(end)) => {
                i = end;
                continue;
            }
            Some(Found::Comment(end)) => end,
            Some(Found::Tag(tag)) if tag.is_component() && !tag.closing && !tag.self_closing => {
                // An unclosed component loses only its opening tag.
                find_closing(text, &fences, tag.end, tag.name).unwrap_or(tag.end)
            }
            Some(Found::Tag(tag)) => tag.end,
            None => {
                i += 1;
                continue;
            }
        };
        out.push_str(&text[copied..i]);
        i = removed;
        copied = removed;
    }
    out.push_str(&text[copied..]);
    out
}

// ============================================================================
// Pass 3: blank lines
// ============================================================================

const MAX_BLANK_LINES: usize = 2;

fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut fences = FenceState::default();
    let mut blank_run = 0;

    for line in text.lines() {
        if fences.in_code(line) {
            blank_run = 0;
            out.push_str(line);
            out.push('\n');
            continue;
        }
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run <= MAX_BLANK_LINES {
                out.push('\n');
            }
            continue;
        }
        blank_run = 0;
        out.push_str(line);
        out.push('\n');
    }

    out.trim().to_string()
}
