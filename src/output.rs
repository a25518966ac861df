//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Every file is shown by its semantic identity (positional index and title)
//! with the source path as an indented context line, so the output reads as a
//! content inventory while still pointing back at specific files.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! 001 about.md
//! 002 blog/hello-world.mdx
//! Found 2 files (1 mdx, 1 md)
//! ```
//!
//! ## Process
//!
//! ```text
//! 002 Hello World [blog]
//!     Source: blog/hello-world.mdx
//! ```
//!
//! ## Check
//!
//! ```text
//! Blog
//!     001 Hello World
//!         Source: blog/hello-world.mdx
//!         Description: A first post about building this site
//! ```
//!
//! ## Generate
//!
//! ```text
//! 001 Hello World → md/blog/hello-world.md
//! Index → llms.txt
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::generate::{self, GenerateReport};
use crate::naming;
use crate::pipeline::BuildEvent;
use crate::process::ProcessEvent;
use crate::types::{ProcessedFile, SourceFile, SourceKind};
use std::path::Path;

/// Longest description preview shown by `check`.
const DESCRIPTION_PREVIEW_CHARS: usize = 60;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max).collect();
        format!("{}...", head)
    }
}

/// Path relative to `root` for display, falling back to the full path.
fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn count_label(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

/// Format the discovered file list with a per-kind summary.
pub fn format_scan_output(sources: &[SourceFile]) -> Vec<String> {
    let mut lines: Vec<String> = sources
        .iter()
        .enumerate()
        .map(|(i, source)| format!("{} {}", format_index(i + 1), source.relative_path))
        .collect();

    let mdx = sources
        .iter()
        .filter(|s| s.kind == SourceKind::Mdx)
        .count();
    lines.push(format!(
        "Found {} ({} mdx, {} md)",
        count_label(sources.len(), "file", "files"),
        mdx,
        sources.len() - mdx
    ));
    lines
}

// ============================================================================
// Stage 2: Process output
// ============================================================================

/// Format a single process progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::FileProcessed {
            index,
            relative_path,
            title,
            category,
        } => vec![
            format!("{} {} [{}]", format_index(*index), title, category),
            format!("{}Source: {}", indent(1), relative_path),
        ],
    }
}

// ============================================================================
// Build progress
// ============================================================================

/// Format one pipeline progress event: a `==>` stage header or stage lines.
pub fn format_build_event(event: &BuildEvent) -> Vec<String> {
    match event {
        BuildEvent::Scanning { content_dir } => {
            vec![format!("==> Scanning {}", content_dir.display())]
        }
        BuildEvent::Scanned { sources } => format_scan_output(sources),
        BuildEvent::Processing { count } => vec![format!("==> Processing {} files", count)],
        BuildEvent::File(event) => format_process_event(event),
        BuildEvent::Writing { output_dir } => {
            vec![format!("==> Writing {}", output_dir.display())]
        }
    }
}

/// Print a progress event to stdout.
pub fn print_build_event(event: &BuildEvent) {
    for line in format_build_event(event) {
        println!("{}", line);
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format processed records grouped the way `llms.txt` will group them.
pub fn format_check_output(files: &[ProcessedFile], priority: &[String]) -> Vec<String> {
    let mut lines = Vec::new();
    let sections = generate::sections(files, priority);
    let section_count = sections.len();
    for section in sections {
        lines.push(naming::display_title(section.category));
        for (i, file) in section.files.iter().enumerate() {
            lines.push(format!("{}{} {}", indent(1), format_index(i + 1), file.title));
            lines.push(format!("{}Source: {}", indent(2), file.relative_path));
            if let Some(description) = &file.description {
                lines.push(format!(
                    "{}Description: {}",
                    indent(2),
                    truncate_desc(description, DESCRIPTION_PREVIEW_CHARS)
                ));
            }
        }
    }
    lines.push(format!(
        "{} in {}",
        count_label(files.len(), "file", "files"),
        count_label(section_count, "category", "categories")
    ));
    lines
}

/// Print check output to stdout.
pub fn print_check_output(files: &[ProcessedFile], priority: &[String]) {
    for line in format_check_output(files, priority) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 3: Generate output
// ============================================================================

/// Format the written files, relative to the output directory.
pub fn format_generate_output(
    files: &[ProcessedFile],
    report: &GenerateReport,
    output_dir: &Path,
) -> Vec<String> {
    let mut lines: Vec<String> = files
        .iter()
        .zip(&report.markdown_files)
        .enumerate()
        .map(|(i, (file, path))| {
            format!(
                "{} {} \u{2192} {}",
                format_index(i + 1),
                file.title,
                display_relative(path, output_dir)
            )
        })
        .collect();
    lines.push(format!(
        "Index \u{2192} {}",
        display_relative(&report.index_path, output_dir)
    ));
    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(files: &[ProcessedFile], report: &GenerateReport, output_dir: &Path) {
    for line in format_generate_output(files, report, output_dir) {
        println!("{}", line);
    }
}

/// Final line of a successful build.
pub fn format_build_summary(report: &GenerateReport) -> String {
    format!(
        "\u{2713} Generated llms.txt and {} markdown files",
        report.markdown_files.len()
    )
}
