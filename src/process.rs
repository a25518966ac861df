//! Per-file transformation.
//!
//! Stage 2 of the pipeline. Each discovered file goes through the file
//! processor for its kind and comes out as a [`ProcessedFile`]:
//!
//! ```text
//! .mdx  →  export const metadata / YAML  →  parse  →  sanitize  ┐
//!                                                               ├→ infer title, description
//! .md   →  YAML frontmatter              →  parse  →  sanitize  ┘   attach category, url
//! ```
//!
//! The file processors ([`process_mdx`], [`process_md`]) are pure functions
//! over the file text and return only `{metadata, content}`. Title,
//! description, category and URL depend on the file's location and the run
//! configuration, so [`process_file`] attaches them.
//!
//! ## Category
//!
//! First non-empty of: `metadata.category` → top-level directory of the
//! relative path → the configured default category (for root-level files).
//!
//! ## Parallel Processing
//!
//! Files are independent, so [`process`] maps them on the global
//! [rayon](https://docs.rs/rayon) pool. Results are collected in input
//! order regardless of completion order; progress events carry the input
//! position.

use crate::frontmatter::{self, Extracted};
use crate::infer;
use crate::metadata::{Metadata, extract_metadata_values, resolve};
use crate::sanitize::sanitize;
use crate::types::{ProcessedFile, SourceFile, SourceKind};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Output of a file processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedContent {
    pub metadata: Metadata,
    /// Sanitized Markdown body.
    pub content: String,
}

/// Progress events emitted while processing.
#[derive(Debug, Clone)]
pub enum ProcessEvent {
    FileProcessed {
        /// 1-based position in discovery order.
        index: usize,
        relative_path: String,
        title: String,
        category: String,
    },
}

/// MDX processor: `export const metadata` first, YAML frontmatter as fallback.
pub fn process_mdx(source: &str) -> ProcessedContent {
    finish(frontmatter::extract_mdx_block(source))
}

/// Markdown processor: YAML frontmatter only.
pub fn process_md(source: &str) -> ProcessedContent {
    finish(frontmatter::extract_yaml_frontmatter(source))
}

fn finish(extracted: Extracted) -> ProcessedContent {
    debug!(kind = ?extracted.kind, "extracted metadata block");
    let metadata = if extracted.has_block() {
        extract_metadata_values(&extracted.block)
    } else {
        Metadata::new()
    };
    ProcessedContent {
        metadata,
        content: sanitize(&extracted.body),
    }
}

pub fn process_mdx_file(path: &Path) -> Result<ProcessedContent, ProcessError> {
    Ok(process_mdx(&read_source(path)?))
}

pub fn process_md_file(path: &Path) -> Result<ProcessedContent, ProcessError> {
    Ok(process_md(&read_source(path)?))
}

fn read_source(path: &Path) -> Result<String, ProcessError> {
    std::fs::read_to_string(path).map_err(|source| ProcessError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and transform one discovered file into its index record.
pub fn process_file(
    source: &SourceFile,
    default_category: &str,
) -> Result<ProcessedFile, ProcessError> {
    let ProcessedContent { metadata, content } = match source.kind {
        SourceKind::Mdx => process_mdx_file(&source.path)?,
        SourceKind::Md => process_md_file(&source.path)?,
    };

    let title = infer::extract_title(Path::new(&source.relative_path), &metadata, &content);
    let description = infer::extract_description(&metadata, &content);
    let category = resolve(&[
        metadata.category(),
        source.top_level_dir(),
        Some(default_category),
    ])
    .unwrap_or_else(|| default_category.to_string());

    Ok(ProcessedFile {
        relative_path: source.relative_path.clone(),
        url: source.url(),
        content,
        metadata,
        title,
        description,
        category,
    })
}

/// Process all discovered files, in parallel, preserving input order.
///
/// The first read failure aborts the stage.
pub fn process(
    sources: &[SourceFile],
    default_category: &str,
    progress: Option<Sender<ProcessEvent>>,
) -> Result<Vec<ProcessedFile>, ProcessError> {
    sources
        .par_iter()
        .enumerate()
        .map(|(i, source)| {
            let file = process_file(source, default_category)?;
            if let Some(tx) = &progress {
                tx.send(ProcessEvent::FileProcessed {
                    index: i + 1,
                    relative_path: file.relative_path.clone(),
                    title: file.title.clone(),
                    category: file.category.clone(),
                })
                .ok();
            }
            Ok(file)
        })
        .collect()
}
