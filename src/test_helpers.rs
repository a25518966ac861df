//! Shared test utilities.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let sources = scan(tmp.path()).unwrap();
//! let files = process(&sources, "general", None).unwrap();
//!
//! let post = find_file(&files, "blog/hello-world.mdx");
//! assert_eq!(post.title, "Hello World");
//! assert_eq!(categories(&files), vec!["general", "apps", "blog"]);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::types::ProcessedFile;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Record lookups: panic with a clear message on miss
// =========================================================================

/// Find a processed file by relative path. Panics if not found.
pub fn find_file<'a>(files: &'a [ProcessedFile], relative_path: &str) -> &'a ProcessedFile {
    files
        .iter()
        .find(|f| f.relative_path == relative_path)
        .unwrap_or_else(|| {
            let paths: Vec<&str> = files.iter().map(|f| f.relative_path.as_str()).collect();
            panic!("file '{relative_path}' not found. Available: {paths:?}")
        })
}

/// Distinct categories in first-seen order.
pub fn categories(files: &[ProcessedFile]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for file in files {
        if !seen.contains(&file.category.as_str()) {
            seen.push(&file.category);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::process;
    use crate::scan::scan;

    #[test]
    fn fixtures_cover_every_category_kind() {
        let tmp = setup_fixtures();
        let sources = scan(tmp.path()).unwrap();
        let files = process(&sources, "general", None).unwrap();
        assert_eq!(categories(&files), vec!["general", "apps", "blog"]);
    }

    #[test]
    #[should_panic(expected = "not found")]
    fn find_file_panics_with_available_paths() {
        find_file(&[], "missing.md");
    }
}
