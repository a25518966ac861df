//! End-to-end runs of the full pipeline against the fixture content tree.

use get_llms_txt::config::Config;
use get_llms_txt::pipeline::{self, BuildError};
use get_llms_txt::scan::ScanError;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content")
}

fn config(output: &Path) -> Config {
    Config {
        content_dir: fixtures(),
        output_dir: Some(output.to_path_buf()),
        base_url: "https://example.com/".into(),
        project_name: "Test Site".into(),
        project_description: Some("Fixture content".into()),
        ..Config::default()
    }
}

#[test]
fn build_writes_expected_index() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("public");
    pipeline::build(&config(&out), tmp.path(), None).unwrap();

    let index = fs::read_to_string(out.join("llms.txt")).unwrap();
    assert_eq!(
        index,
        "# Test Site\n\
         \n\
         > Fixture content\n\
         \n\
         ## General\n\
         \n\
         - [About](https://example.com/md/about.md): Who writes this site and why it exists\n\
         \n\
         ## Apps\n\
         \n\
         - [Color Picker](https://example.com/md/apps/color-picker.md): Pick a color from anywhere on the screen and copy it as hex, rgb or hsl in one click.\n\
         - [Timer](https://example.com/md/apps/timer.md): A tiny countdown timer that lives in a browser tab.\n\
         \n\
         ## Blog\n\
         \n\
         - [Hello World](https://example.com/md/blog/hello-world.md): A first post about building this site\n\
         - [Year In Review](https://example.com/md/blog/2024/year-in-review.md): Looking back at twelve months of side projects, half-finished drafts, and a few things that actually shipped.\n"
    );
}

#[test]
fn build_writes_sanitized_renditions() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("public");
    let report = pipeline::build(&config(&out), tmp.path(), None).unwrap();

    assert_eq!(report.generated.markdown_files.len(), 5);
    assert!(!out.join("md/.drafts").exists());

    let post = fs::read_to_string(out.join("md/blog/hello-world.md")).unwrap();
    assert!(post.starts_with("# Hello World\n"));
    assert!(post.ends_with("Thanks for reading.\n"));
    assert!(!post.contains("import "));
    assert!(!post.contains("export "));
    assert!(!post.contains("<Callout"));
    assert!(!post.contains("written before the site had a design"));
    assert!(!post.contains("screenshots go here"));
    assert!(post.contains("```bash\nnpm run build\n```"));

    let timer = fs::read_to_string(out.join("md/apps/timer.md")).unwrap();
    assert!(!timer.contains("<Timer"));
    assert!(timer.contains("Start it, forget about it"));
}

#[test]
fn repeated_builds_are_byte_identical() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("public");
    let cfg = config(&out);

    pipeline::build(&cfg, tmp.path(), None).unwrap();
    let first = fs::read(out.join("llms.txt")).unwrap();
    pipeline::build(&cfg, tmp.path(), None).unwrap();
    let second = fs::read(out.join("llms.txt")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn priority_categories_reorder_sections() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("public");
    let cfg = Config {
        categories: vec!["blog".into()],
        ..config(&out)
    };
    pipeline::build(&cfg, tmp.path(), None).unwrap();

    let index = fs::read_to_string(out.join("llms.txt")).unwrap();
    let blog = index.find("## Blog").unwrap();
    let general = index.find("## General").unwrap();
    let apps = index.find("## Apps").unwrap();
    assert!(blog < general && general < apps);
}

#[test]
fn check_reports_records_without_writing() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("public");
    let files = pipeline::check(&config(&out), tmp.path(), None).unwrap();

    assert_eq!(files.len(), 5);
    assert!(!out.exists());
    let timer = files
        .iter()
        .find(|f| f.relative_path == "apps/timer.mdx")
        .unwrap();
    assert_eq!(timer.metadata.tags().map(|t| t.len()), Some(2));
}

#[test]
fn missing_content_dir_fails() {
    let tmp = TempDir::new().unwrap();
    let cfg = Config {
        content_dir: tmp.path().join("missing"),
        ..config(&tmp.path().join("public"))
    };
    let result = pipeline::build(&cfg, tmp.path(), None);
    assert!(matches!(
        result,
        Err(BuildError::Scan(ScanError::MissingContentDir(_)))
    ));
}
