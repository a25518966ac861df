//! Byte-level scanning primitives shared by the block extractor and the
//! content sanitizer.
//!
//! Every structural character these helpers look at (`{`, `"`, `` ` ``, `\n`,
//! ...) is ASCII, and UTF-8 continuation bytes never collide with ASCII, so
//! scanning bytes and slicing the `&str` at the returned offsets is always on
//! a char boundary.
//!
//! ## String literals
//!
//! `'...'`, `"..."` and `` `...` `` are opaque; a backslash escapes the next
//! byte. Template literal substitutions (`` `${ { a: 1 } }` ``) are not
//! parsed: the whole template is skipped up to the next unescaped backtick,
//! so braces inside a substitution never affect depth. An unterminated string
//! makes the enclosing scan fail rather than guess.

use std::ops::Range;

/// Offset just past the string literal whose opening quote is at `start`.
pub(crate) fn skip_string(bytes: &[u8], start: usize) -> Option<usize> {
    let quote = *bytes.get(start)?;
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return Some(i + 1),
            // Plain quotes cannot span lines; an apostrophe in prose
            // must not swallow the rest of the document.
            b'\n' if quote != b'`' => return None,
            _ => i += 1,
        }
    }
    None
}

/// Offset just past a `//` or `/* */` comment starting at `start`.
pub(crate) fn skip_comment(bytes: &[u8], start: usize) -> Option<usize> {
    if bytes.get(start) != Some(&b'/') {
        return None;
    }
    match bytes.get(start + 1)? {
        b'/' => Some(
            bytes[start..]
                .iter()
                .position(|&b| b == b'\n')
                .map_or(bytes.len(), |p| start + p),
        ),
        b'*' => bytes[start + 2..]
            .windows(2)
            .position(|w| w == b"*/")
            .map(|p| start + 2 + p + 2),
        _ => None,
    }
}

/// Offset just past the bracket that balances the one at `open`.
///
/// `open` must point at `{`, `(` or `[`. Brackets of all three kinds share
/// one depth counter; string literals and comments are skipped. Returns
/// `None` when the input ends before depth returns to zero.
pub(crate) fn matching_close(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    if !matches!(bytes.get(open), Some(b'{' | b'(' | b'[')) {
        return None;
    }
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'\'' | b'"' | b'`' => {
                i = skip_string(bytes, i)?;
                continue;
            }
            b'/' => {
                if let Some(end) = skip_comment(bytes, i) {
                    i = end;
                    continue;
                }
            }
            b'{' | b'(' | b'[' => depth += 1,
            b'}' | b')' | b']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// End of the code statement beginning at `start`.
///
/// The statement ends at the first `;` or newline found at bracket depth
/// zero, so `export default function X() {\n ... \n}` spans until the
/// newline after its closing brace. When a bracket never closes, the
/// statement is only the line it starts on.
pub(crate) fn statement_end(text: &str, start: usize) -> usize {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'\'' | b'"' | b'`' => match skip_string(bytes, i) {
                Some(end) => {
                    i = end;
                    continue;
                }
                None => return line_end(text, i),
            },
            b'/' => {
                if let Some(end) = skip_comment(bytes, i) {
                    i = end;
                    continue;
                }
            }
            b'{' | b'(' | b'[' => depth += 1,
            b'}' | b')' | b']' => depth = depth.saturating_sub(1),
            b';' if depth == 0 => return i,
            b'\n' if depth == 0 => return i,
            _ => {}
        }
        i += 1;
    }
    if depth > 0 {
        return line_end(text, start);
    }
    bytes.len()
}

/// Consume an optional `;` plus trailing blanks and one line break after `pos`.
pub(crate) fn consume_terminator(text: &str, mut pos: usize) -> usize {
    let bytes = text.as_bytes();
    while matches!(bytes.get(pos), Some(b' ' | b'\t')) {
        pos += 1;
    }
    if bytes.get(pos) == Some(&b';') {
        pos += 1;
    }
    while matches!(bytes.get(pos), Some(b' ' | b'\t' | b'\r')) {
        pos += 1;
    }
    if bytes.get(pos) == Some(&b'\n') {
        pos += 1;
    }
    pos
}

/// Offset of the newline ending the line containing `from`, or end of text.
pub(crate) fn line_end(text: &str, from: usize) -> usize {
    text[from..].find('\n').map_or(text.len(), |p| from + p)
}

// ============================================================================
// Fenced code blocks
// ============================================================================

/// Opening fence of a line: the fence character and run length.
fn fence_marker(line: &str) -> Option<(u8, usize)> {
    let trimmed = line.trim_start();
    let first = *trimmed.as_bytes().first()?;
    if first != b'`' && first != b'~' {
        return None;
    }
    let run = trimmed.bytes().take_while(|&b| b == first).count();
    // A backtick fence's info string cannot itself contain backticks.
    if first == b'`' && trimmed[run..].contains('`') {
        return None;
    }
    (run >= 3).then_some((first, run))
}

fn closes_fence(line: &str, (ch, len): (u8, usize)) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= len && trimmed.bytes().all(|b| b == ch)
}

/// Tracks whether successive lines are inside a fenced code block.
#[derive(Debug, Default)]
pub(crate) struct FenceState {
    open: Option<(u8, usize)>,
}

impl FenceState {
    /// Feed the next line. Returns true if the line is a fence delimiter or
    /// sits inside a fenced block.
    pub(crate) fn in_code(&mut self, line: &str) -> bool {
        match self.open {
            Some(marker) => {
                if closes_fence(line, marker) {
                    self.open = None;
                }
                true
            }
            None => {
                self.open = fence_marker(line);
                self.open.is_some()
            }
        }
    }
}

/// Byte ranges of all fenced code blocks, delimiter lines included.
///
/// An unclosed fence runs to the end of the document, as in CommonMark.
pub(crate) fn fence_ranges(text: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut state = FenceState::default();
    let mut current: Option<usize> = None;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let inside = state.in_code(line);
        match (inside, current) {
            (true, None) => current = Some(offset),
            (false, Some(start)) => {
                ranges.push(start..offset);
                current = None;
            }
            _ => {}
        }
        offset += line.len();
        if inside && state.open.is_none() {
            if let Some(start) = current.take() {
                ranges.push(start..offset);
            }
        }
    }
    if let Some(start) = current {
        ranges.push(start..text.len());
    }
    ranges
}

/// The fence range containing `pos`, if any. `ranges` must be sorted.
pub(crate) fn fence_containing(ranges: &[Range<usize>], pos: usize) -> Option<&Range<usize>> {
    let idx = ranges.partition_point(|r| r.end <= pos);
    ranges.get(idx).filter(|r| r.start <= pos)
}
