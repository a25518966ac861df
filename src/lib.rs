//! # get-llms-txt
//!
//! Turns a directory of Markdown and MDX content into files a language model
//! can read without a browser: a plain Markdown copy of every page, and one
//! `llms.txt` index listing them all, grouped by category.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! ```text
//! 1. Scan      content/        →  [SourceFile]     (filesystem → file list)
//! 2. Process   [SourceFile]    →  [ProcessedFile]  (metadata, sanitized body, title, description)
//! 3. Generate  [ProcessedFile] →  public/          (md/ renditions + llms.txt)
//! ```
//!
//! Stage 2 is where the work is. Each file goes through a small
//! text-transformation engine:
//!
//! - [`frontmatter`] finds the metadata block, either an
//!   `export const metadata = { ... }` statement or a `---` YAML block, and
//!   splits it from the body with a bracket- and string-aware scanner.
//! - [`metadata`] parses the block into a [`metadata::Metadata`] record.
//!   Malformed input never fails; it just yields fewer keys.
//! - [`sanitize`] strips imports, exports, JSX components and MDX comments
//!   while leaving ordinary Markdown, code fences included, untouched.
//! - [`infer`] resolves the title and description from metadata, then the
//!   document structure, then the file name.
//!
//! All of these are pure functions; only [`scan`], [`process`] and
//! [`generate`] touch the filesystem.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: walks the content directory for `.md` / `.mdx` files |
//! | [`process`] | Stage 2: MDX and Markdown file processors, run in parallel |
//! | [`generate`] | Stage 3: renders `llms.txt` and writes every output file |
//! | [`pipeline`] | Runs all three stages for one [`config::Config`] |
//! | [`config`] | Layered `llms.toml` loading, merging and validation |
//! | [`types`] | Records passed between stages (`SourceFile`, `ProcessedFile`) |
//! | [`metadata`] | Metadata record and the key/value block parser |
//! | [`frontmatter`] | Metadata block extraction |
//! | [`sanitize`] | MDX-to-Markdown cleanup |
//! | [`infer`] | Title and description inference |
//! | [`naming`] | File name and category display titles |
//! | [`output`] | CLI output formatting for each stage |

pub mod config;
pub mod frontmatter;
pub mod generate;
pub mod infer;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod sanitize;
pub mod scan;
pub mod types;

mod scanner;

#[cfg(test)]
pub(crate) mod test_helpers;
