//! Shared types passed between pipeline stages.
//!
//! `SourceFile` is produced by [`scan`](crate::scan), `ProcessedFile` by
//! [`process`](crate::process), and both are consumed read-only by
//! [`generate`](crate::generate) and [`output`](crate::output).

use crate::metadata::Metadata;
use serde::Serialize;
use std::path::PathBuf;

/// The two supported source formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Mdx,
    Md,
}

impl SourceKind {
    /// Kind for a file extension, matched case-insensitively.
    pub fn from_extension(ext: &str) -> Option<Self> {
        if ext.eq_ignore_ascii_case("mdx") {
            Some(SourceKind::Mdx)
        } else if ext.eq_ignore_ascii_case("md") {
            Some(SourceKind::Md)
        } else {
            None
        }
    }
}

/// A discovered content file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFile {
    /// Absolute or root-joined path used for reading.
    #[serde(skip)]
    pub path: PathBuf,
    /// Path relative to the content root, always `/`-separated.
    pub relative_path: String,
    pub kind: SourceKind,
}

impl SourceFile {
    /// First path component when the file sits in a subdirectory.
    ///
    /// `blog/2024/post.mdx` → `Some("blog")`, `about.md` → `None`.
    pub fn top_level_dir(&self) -> Option<&str> {
        self.relative_path
            .split_once('/')
            .map(|(dir, _)| dir)
            .filter(|dir| !dir.is_empty())
    }

    /// Site URL of the rendered copy: `/md/{relative path with .md}`.
    pub fn url(&self) -> String {
        format!("/md/{}", self.output_relative_path())
    }

    /// Relative path of the rendered copy under `md/`.
    pub fn output_relative_path(&self) -> String {
        let stem_end = self
            .relative_path
            .rfind('.')
            .filter(|&dot| !self.relative_path[dot..].contains('/'))
            .unwrap_or(self.relative_path.len());
        format!("{}.md", &self.relative_path[..stem_end])
    }
}

/// One fully processed content file; the unit the index is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedFile {
    pub relative_path: String,
    /// Sanitized Markdown body.
    pub content: String,
    pub metadata: Metadata,
    /// Always non-empty.
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
    /// Site-relative URL, without the configured base URL.
    pub url: String,
}
