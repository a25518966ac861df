//! Index rendering and output writing.
//!
//! Stage 3 of the pipeline. Takes the processed records and writes:
//!
//! ```text
//! public/
//! ├── llms.txt                 # Grouped index of every file
//! └── md/
//!     ├── about.md             # Sanitized copy of content/about.mdx
//!     └── blog/
//!         └── hello-world.md
//! ```
//!
//! ## Index Format
//!
//! ```text
//! # Personal Website & Blog
//!
//! > Notes on software and photography
//!
//! ## Blog
//!
//! - [Apple Post](https://example.com/md/blog/apple.md): First paragraph...
//! - [Zebra Post](https://example.com/md/blog/zebra.md)
//!
//! ## Apps
//!
//! - [Timer](https://example.com/md/apps/timer.md): A tiny countdown timer.
//! ```
//!
//! Categories are listed in first-seen order of the input, except that
//! categories named in the configured priority list come first, in list
//! order. Within a category, entries sort by title ignoring case, with the
//! relative path as tie-breaker. Rendering is a pure function of its input,
//! so repeated runs produce identical bytes.

use crate::config::GenerationConfig;
use crate::naming;
use crate::types::ProcessedFile;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const INDEX_FILE_NAME: &str = "llms.txt";
pub const MARKDOWN_DIR: &str = "md";

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Files written by [`generate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    pub index_path: PathBuf,
    /// Rendition paths, in input order.
    pub markdown_files: Vec<PathBuf>,
}

/// A category section: name plus its entries, sorted.
#[derive(Debug)]
pub struct Section<'a> {
    pub category: &'a str,
    pub files: Vec<&'a ProcessedFile>,
}

/// Group records by category and order sections and entries.
pub fn sections<'a>(files: &'a [ProcessedFile], priority: &[String]) -> Vec<Section<'a>> {
    let mut sections: Vec<Section<'a>> = Vec::new();
    for file in files {
        match sections.iter_mut().find(|s| s.category == file.category) {
            Some(section) => section.files.push(file),
            None => sections.push(Section {
                category: &file.category,
                files: vec![file],
            }),
        }
    }

    // Stable: unlisted categories keep first-seen order behind listed ones.
    sections.sort_by_key(|s| {
        priority
            .iter()
            .position(|p| p == s.category)
            .unwrap_or(priority.len())
    });

    for section in &mut sections {
        section.files.sort_by(|a, b| {
            a.title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then_with(|| a.relative_path.cmp(&b.relative_path))
        });
    }
    sections
}

/// Render the `llms.txt` document.
pub fn render_llms_txt(files: &[ProcessedFile], config: &GenerationConfig) -> String {
    let base_url = config.base_url.trim_end_matches('/');
    let mut blocks = vec![format!("# {}", config.project_name)];
    if let Some(description) = &config.project_description {
        blocks.push(format!("> {description}"));
    }

    for section in sections(files, &config.categories) {
        blocks.push(format!("## {}", naming::display_title(section.category)));
        let entries: Vec<String> = section
            .files
            .iter()
            .map(|file| entry_line(file, base_url))
            .collect();
        blocks.push(entries.join("\n"));
    }

    let mut doc = blocks.join("\n\n");
    doc.push('\n');
    doc
}

/// One list item. Titles and descriptions come from free text, so every
/// whitespace run becomes a single space and brackets in the link text are
/// escaped.
fn entry_line(file: &ProcessedFile, base_url: &str) -> String {
    let title = link_text(&file.title);
    match &file.description {
        Some(description) => format!(
            "- [{}]({}{}): {}",
            title,
            base_url,
            file.url,
            single_line(description)
        ),
        None => format!("- [{}]({}{})", title, base_url, file.url),
    }
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn link_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in single_line(text).chars() {
        if matches!(ch, '\\' | '[' | ']') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Write `{output_root}/llms.txt`, replacing any existing file.
pub fn write_llms_txt(
    files: &[ProcessedFile],
    output_root: &Path,
    config: &GenerationConfig,
) -> Result<PathBuf, GenerateError> {
    let path = output_root.join(INDEX_FILE_NAME);
    write_file(&path, &render_llms_txt(files, config))?;
    Ok(path)
}

/// Write each record's sanitized content to `{output_root}/md/…`.
pub fn write_markdown_files(
    files: &[ProcessedFile],
    output_root: &Path,
) -> Result<Vec<PathBuf>, GenerateError> {
    files
        .iter()
        .map(|file| {
            let path = rendition_path(output_root, file);
            let mut content = file.content.trim_end().to_string();
            content.push('\n');
            write_file(&path, &content)?;
            Ok(path)
        })
        .collect()
}

/// On-disk location of a record's rendition, derived from its URL.
pub fn rendition_path(output_root: &Path, file: &ProcessedFile) -> PathBuf {
    file.url
        .split('/')
        .filter(|part| !part.is_empty())
        .fold(output_root.to_path_buf(), |path, part| path.join(part))
}

/// Stage 3: write all renditions, then the index.
pub fn generate(
    files: &[ProcessedFile],
    output_root: &Path,
    config: &GenerationConfig,
) -> Result<GenerateReport, GenerateError> {
    let markdown_files = write_markdown_files(files, output_root)?;
    let index_path = write_llms_txt(files, output_root, config)?;
    Ok(GenerateReport {
        index_path,
        markdown_files,
    })
}

fn write_file(path: &Path, content: &str) -> Result<(), GenerateError> {
    let to_error = |source| GenerateError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(to_error)?;
    }
    fs::write(path, content).map_err(to_error)?;
    debug!(path = %path.display(), bytes = content.len(), "wrote file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Metadata;
    use tempfile::TempDir;

    fn file(relative_path: &str, title: &str, category: &str, description: Option<&str>) -> ProcessedFile {
        let stem = relative_path.rsplit_once('.').map_or(relative_path, |(s, _)| s);
        ProcessedFile {
            relative_path: relative_path.to_string(),
            content: format!("# {title}\n\nBody of {title}."),
            metadata: Metadata::new(),
            title: title.to_string(),
            description: description.map(str::to_string),
            category: category.to_string(),
            url: format!("/md/{stem}.md"),
        }
    }

    fn config(base_url: &str) -> GenerationConfig {
        GenerationConfig {
            project_name: "Test Project".into(),
            project_description: Some("Test description".into()),
            base_url: base_url.into(),
            categories: Vec::new(),
        }
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    #[test]
    fn header_and_description_come_first() {
        let doc = render_llms_txt(&[], &config(""));
        assert_eq!(doc, "# Test Project\n\n> Test description\n");
    }

    #[test]
    fn description_line_omitted_when_absent() {
        let cfg = GenerationConfig {
            project_description: None,
            ..config("")
        };
        let doc = render_llms_txt(&[file("a.md", "A", "general", None)], &cfg);
        assert_eq!(doc, "# Test Project\n\n## General\n\n- [A](/md/a.md)\n");
    }

    #[test]
    fn full_document_layout() {
        let files = vec![
            file("blog/post1.mdx", "Post 1", "blog", Some("First post")),
            file("apps/app1.mdx", "App 1", "apps", Some("First app")),
        ];
        let doc = render_llms_txt(&files, &config("https://example.com"));
        assert_eq!(
            doc,
            "# Test Project\n\n\
             > Test description\n\n\
             ## Blog\n\n\
             - [Post 1](https://example.com/md/blog/post1.md): First post\n\n\
             ## Apps\n\n\
             - [App 1](https://example.com/md/apps/app1.md): First app\n"
        );
    }

    #[test]
    fn categories_in_first_seen_order() {
        let files = vec![
            file("blog/post1.mdx", "Post 1", "blog", None),
            file("apps/app1.mdx", "App 1", "apps", None),
            file("blog/post2.mdx", "Post 2", "blog", None),
        ];
        let doc = render_llms_txt(&files, &config(""));
        let blog = doc.find("## Blog").unwrap();
        let apps = doc.find("## Apps").unwrap();
        assert!(blog < apps);
        assert!(blog < doc.find("[Post 2]").unwrap());
        assert!(doc.find("[Post 2]").unwrap() < apps);
    }

    #[test]
    fn priority_list_orders_known_categories_first() {
        let files = vec![
            file("misc/a.md", "A", "misc", None),
            file("blog/b.md", "B", "blog", None),
            file("apps/c.md", "C", "apps", None),
            file("notes/d.md", "D", "notes", None),
        ];
        let cfg = GenerationConfig {
            categories: vec!["apps".into(), "blog".into(), "unused".into()],
            ..config("")
        };
        let order: Vec<&str> = sections(&files, &cfg.categories)
            .iter()
            .map(|s| s.category)
            .collect();
        assert_eq!(order, vec!["apps", "blog", "misc", "notes"]);
    }

    #[test]
    fn entries_sorted_by_title_ignoring_case() {
        let files = vec![
            file("blog/zebra.md", "Zebra Post", "blog", None),
            file("blog/apple.md", "Apple Post", "blog", None),
            file("blog/mango.md", "mango post", "blog", None),
        ];
        let doc = render_llms_txt(&files, &config(""));
        let apple = doc.find("Apple Post").unwrap();
        let mango = doc.find("mango post").unwrap();
        let zebra = doc.find("Zebra Post").unwrap();
        assert!(apple < mango && mango < zebra);
    }

    #[test]
    fn equal_titles_break_ties_by_path() {
        let files = vec![
            file("blog/b.md", "Same", "blog", None),
            file("blog/a.md", "same", "blog", None),
        ];
        let doc = render_llms_txt(&files, &config(""));
        assert!(doc.find("/md/blog/a.md").unwrap() < doc.find("/md/blog/b.md").unwrap());
    }

    #[test]
    fn category_heading_is_title_cased() {
        let files = vec![file("x/a.md", "A", "getting-started", None)];
        let doc = render_llms_txt(&files, &config(""));
        assert!(doc.contains("## Getting Started\n"));
    }

    #[test]
    fn entry_escapes_brackets_and_joins_lines() {
        let files = [file(
            "blog/draft.md",
            "A [draft] post",
            "blog",
            Some("line one\nline two"),
        )];
        let doc = render_llms_txt(&files, &config("https://x.dev"));
        assert!(doc.contains(
            "- [A \\[draft\\] post](https://x.dev/md/blog/draft.md): line one line two\n"
        ));
    }

    #[test]
    fn trailing_slash_on_base_url_is_dropped() {
        let files = vec![file("blog/post1.mdx", "Post 1", "blog", None)];
        let doc = render_llms_txt(&files, &config("https://example.com/"));
        assert!(doc.contains("[Post 1](https://example.com/md/blog/post1.md)"));
    }

    #[test]
    fn rendering_is_independent_of_input_order_within_category() {
        let a = file("blog/a.md", "Alpha", "blog", Some("x"));
        let b = file("blog/b.md", "Beta", "blog", None);
        let one = render_llms_txt(&[a.clone(), b.clone()], &config(""));
        let two = render_llms_txt(&[b, a], &config(""));
        assert_eq!(one, two);
    }

    // =========================================================================
    // Writing
    // =========================================================================

    #[test]
    fn generate_writes_renditions_and_index() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("public");
        let files = vec![
            file("blog/2024/post.mdx", "Post", "blog", None),
            file("about.md", "About", "general", None),
        ];

        let report = generate(&files, &out, &config("")).unwrap();

        assert_eq!(report.index_path, out.join("llms.txt"));
        assert_eq!(
            report.markdown_files,
            vec![out.join("md/blog/2024/post.md"), out.join("md/about.md")]
        );
        let rendition = fs::read_to_string(out.join("md/blog/2024/post.md")).unwrap();
        assert_eq!(rendition, "# Post\n\nBody of Post.\n");
        let index = fs::read_to_string(out.join("llms.txt")).unwrap();
        assert!(index.starts_with("# Test Project\n"));
    }

    #[test]
    fn existing_index_is_overwritten() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("llms.txt"), "stale content that is much longer").unwrap();
        write_llms_txt(&[], tmp.path(), &config("")).unwrap();
        let index = fs::read_to_string(tmp.path().join("llms.txt")).unwrap();
        assert_eq!(index, "# Test Project\n\n> Test description\n");
    }

    #[test]
    fn unwritable_output_is_error() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "not a dir").unwrap();
        let files = vec![file("a.md", "A", "general", None)];
        let result = generate(&files, &blocker, &config(""));
        assert!(matches!(result, Err(GenerateError::Write { .. })));
    }
}
