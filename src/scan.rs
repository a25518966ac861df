//! Content discovery.
//!
//! Stage 1 of the pipeline. Walks the content directory recursively and
//! returns every `.md` / `.mdx` file it finds, in a deterministic order.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                         # Content root
//! ├── about.md                     # Root-level file → default category
//! ├── blog/                        # Top-level directory → category "blog"
//! │   ├── hello-world.mdx
//! │   └── 2024/
//! │       └── recap.md             # Nested deeper, still category "blog"
//! ├── apps/
//! │   └── timer.mdx
//! ├── .drafts/                     # Hidden: skipped
//! └── node_modules/                # Skipped
//! ```
//!
//! ## Ordering
//!
//! Entries are visited depth-first with siblings sorted by file name, so the
//! same tree always yields the same sequence. Later stages rely on this for
//! first-seen category ordering.
//!
//! Symlinks are followed; a broken link is an error, like any other entry
//! that cannot be read.

use crate::types::{SourceFile, SourceKind};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Content directory not found: {0}")]
    MissingContentDir(PathBuf),
    #[error("Failed to read {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Directory names skipped wherever they appear.
const SKIPPED_DIRS: &[&str] = &["node_modules"];

pub fn scan(root: &Path) -> Result<Vec<SourceFile>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::MissingContentDir(root.to_path_buf()));
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_skipped(e));

    for entry in walker {
        let entry = entry.map_err(|source| ScanError::Walk {
            path: source
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf()),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(kind) = entry
            .path()
            .extension()
            .and_then(|ext| SourceKind::from_extension(&ext.to_string_lossy()))
        else {
            continue;
        };
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };

        let relative_path = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        debug!(file = %relative_path, ?kind, "discovered content file");

        files.push(SourceFile {
            path: entry.path().to_path_buf(),
            relative_path,
            kind,
        });
    }

    Ok(files)
}

fn is_skipped(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    let skipped = name.starts_with('.')
        || (entry.file_type().is_dir() && SKIPPED_DIRS.contains(&&*name));
    if skipped {
        trace!(path = %entry.path().display(), "skipping entry");
    }
    skipped
}
