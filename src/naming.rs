//! Display names derived from file names and category labels.
//!
//! Both the filename title fallback and the `## Category` headings of
//! `llms.txt` use the same rule: split on dashes, underscores and whitespace,
//! capitalize the first letter of each word, join with single spaces.
//!
//! - `my-awesome-post` → "My Awesome Post"
//! - `getting_started` → "Getting Started"
//! - `blog` → "Blog"
//! - `API-reference` → "API Reference" (existing capitals are kept)

use std::path::Path;

/// Title used when a file name has no usable characters at all.
pub const UNTITLED: &str = "Untitled";

/// Convert a dash/underscore separated name into a display title.
pub fn display_title(name: &str) -> String {
    name.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Display title from a file path's stem, e.g. `blog/my-post.mdx` → "My Post".
///
/// Never empty: falls back to [`UNTITLED`].
pub fn title_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let title = display_title(&stem);
    if title.is_empty() {
        UNTITLED.to_string()
    } else {
        title
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashes_become_capitalized_words() {
        assert_eq!(display_title("my-awesome-post"), "My Awesome Post");
    }

    #[test]
    fn underscores_and_mixed_separators() {
        assert_eq!(display_title("getting_started-guide"), "Getting Started Guide");
    }

    #[test]
    fn repeated_separators_collapse() {
        assert_eq!(display_title("--a__b  c-"), "A B C");
    }

    #[test]
    fn existing_capitals_kept() {
        assert_eq!(display_title("API-reference"), "API Reference");
    }

    #[test]
    fn single_word_category() {
        assert_eq!(display_title("blog"), "Blog");
        assert_eq!(display_title("apps"), "Apps");
    }

    #[test]
    fn non_ascii_first_letter() {
        assert_eq!(display_title("été-notes"), "Été Notes");
    }

    #[test]
    fn title_from_path_strips_extension() {
        assert_eq!(
            title_from_path(Path::new("/test/my-awesome-post.mdx")),
            "My Awesome Post"
        );
        assert_eq!(title_from_path(Path::new("blog/post.v2.md")), "Post.v2");
    }

    #[test]
    fn title_from_path_never_empty() {
        assert_eq!(title_from_path(Path::new("---.md")), UNTITLED);
        assert_eq!(title_from_path(Path::new("")), UNTITLED);
    }
}
