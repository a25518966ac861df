//! Full-run orchestration: scan → process → generate.
//!
//! [`build`] and [`check`] are the only place the stages are sequenced. The
//! binary passes a [`BuildEvent`] channel to print progress between stages;
//! library users and tests pass `None`.

use crate::config::Config;
use crate::generate::{self, GenerateError, GenerateReport};
use crate::process::{self, ProcessError, ProcessEvent};
use crate::scan::{self, ScanError};
use crate::types::{ProcessedFile, SourceFile};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Sender};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Process(#[from] ProcessError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
}

/// Progress of a run, in the order the stages emit it.
#[derive(Debug, Clone)]
pub enum BuildEvent {
    Scanning { content_dir: PathBuf },
    Scanned { sources: Vec<SourceFile> },
    Processing { count: usize },
    File(ProcessEvent),
    Writing { output_dir: PathBuf },
}

/// Result of a completed build.
#[derive(Debug)]
pub struct BuildReport {
    pub output_dir: PathBuf,
    pub files: Vec<ProcessedFile>,
    pub generated: GenerateReport,
}

fn emit(progress: &Option<Sender<BuildEvent>>, event: BuildEvent) {
    if let Some(tx) = progress {
        tx.send(event).ok();
    }
}

/// Scan and process without writing anything.
///
/// Relative paths in `config` are resolved against `cwd`.
pub fn check(
    config: &Config,
    cwd: &Path,
    progress: Option<Sender<BuildEvent>>,
) -> Result<Vec<ProcessedFile>, BuildError> {
    let content_dir = cwd.join(&config.content_dir);
    emit(&progress, BuildEvent::Scanning {
        content_dir: content_dir.clone(),
    });
    let sources = scan::scan(&content_dir)?;
    info!(count = sources.len(), "discovered content files");
    emit(&progress, BuildEvent::Scanned {
        sources: sources.clone(),
    });
    emit(&progress, BuildEvent::Processing {
        count: sources.len(),
    });

    let files = match progress {
        Some(events) => std::thread::scope(|s| {
            let (tx, rx) = mpsc::channel();
            // Ends once `process` returns and drops `tx`.
            s.spawn(move || {
                for event in rx {
                    if events.send(BuildEvent::File(event)).is_err() {
                        break;
                    }
                }
            });
            process::process(&sources, &config.default_category, Some(tx))
        })?,
        None => process::process(&sources, &config.default_category, None)?,
    };
    Ok(files)
}

/// Run the whole pipeline, writing into `config`'s output directory.
///
/// Relative paths, and an unset output directory, are resolved against `cwd`.
pub fn build(
    config: &Config,
    cwd: &Path,
    progress: Option<Sender<BuildEvent>>,
) -> Result<BuildReport, BuildError> {
    let output_dir = cwd.join(config.resolved_output_dir(cwd));
    let files = check(config, cwd, progress.clone())?;
    emit(&progress, BuildEvent::Writing {
        output_dir: output_dir.clone(),
    });
    let generated = generate::generate(&files, &output_dir, &config.generation())?;
    info!(
        output = %output_dir.display(),
        files = generated.markdown_files.len(),
        "build complete"
    );
    Ok(BuildReport {
        output_dir,
        files,
        generated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use std::fs;

    #[test]
    fn check_writes_nothing() {
        let tmp = setup_fixtures();
        let config = Config {
            content_dir: tmp.path().to_path_buf(),
            output_dir: Some(tmp.path().join("public")),
            ..Config::default()
        };
        let files = check(&config, tmp.path(), None).unwrap();
        assert!(!files.is_empty());
        assert!(!tmp.path().join("public").exists());
    }

    #[test]
    fn build_resolves_relative_output_against_cwd() {
        let tmp = setup_fixtures();
        let content = tmp.path().to_path_buf();
        let cwd = tempfile::TempDir::new().unwrap();
        fs::create_dir(cwd.path().join("out")).unwrap();

        let config = Config {
            content_dir: content,
            ..Config::default()
        };
        let report = build(&config, cwd.path(), None).unwrap();

        assert_eq!(report.output_dir, cwd.path().join("out"));
        assert!(cwd.path().join("out/llms.txt").is_file());
        assert_eq!(report.generated.markdown_files.len(), report.files.len());
    }

    #[test]
    fn missing_content_dir_is_scan_error() {
        let cwd = tempfile::TempDir::new().unwrap();
        let config = Config {
            content_dir: cwd.path().join("content"),
            ..Config::default()
        };
        let result = build(&config, cwd.path(), None);
        assert!(matches!(result, Err(BuildError::Scan(ScanError::MissingContentDir(_)))));
    }

    #[test]
    fn build_emits_stage_events_in_order() {
        let tmp = setup_fixtures();
        let config = Config {
            content_dir: tmp.path().to_path_buf(),
            output_dir: Some(tmp.path().join("public")),
            ..Config::default()
        };
        let (tx, rx) = mpsc::channel();
        let report = build(&config, tmp.path(), Some(tx)).unwrap();
        let events: Vec<BuildEvent> = rx.into_iter().collect();

        assert!(matches!(events.first(), Some(BuildEvent::Scanning { .. })));
        let n = report.files.len();
        assert!(matches!(events.get(1), Some(BuildEvent::Scanned { sources }) if sources.len() == n));
        assert!(matches!(events.get(2), Some(BuildEvent::Processing { count }) if *count == n));
        let file_events = events
            .iter()
            .filter(|e| matches!(e, BuildEvent::File(_)))
            .count();
        assert_eq!(file_events, n);
        assert!(matches!(
            events.last(),
            Some(BuildEvent::Writing { output_dir }) if *output_dir == report.output_dir
        ));
    }
}
