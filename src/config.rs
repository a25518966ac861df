//! Generator configuration.
//!
//! Settings come from three layers, later layers overriding earlier ones:
//!
//! ```text
//! stock defaults  →  llms.toml (optional)  →  command-line flags
//! ```
//!
//! ## Config File
//!
//! `llms.toml` is read from the working directory, or from the path given
//! with `--config`. Every key is optional:
//!
//! ```toml
//! content_dir = "content"            # Source root
//! output_dir = "public"              # Default: "out" if it exists, else "public"
//! base_url = "https://example.com"   # Prefix for every link in llms.txt
//! project_name = "My Site"           # Index title
//! project_description = "Notes and projects"
//!
//! # Categories listed here come first in llms.txt, in this order.
//! # Unlisted categories follow in the order they are first seen.
//! categories = ["blog", "apps"]
//!
//! # Category of files directly in the content root.
//! default_category = "general"
//!
//! [processing]
//! max_processes = 4                  # Parallel workers (default: CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "llms.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Complete run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub content_dir: PathBuf,
    /// `None` means "decide at run time" (see [`Config::resolved_output_dir`]).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    pub base_url: String,
    pub project_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_description: Option<String>,
    /// Fixed priority order for category sections.
    pub categories: Vec<String>,
    /// Category of files that sit directly in the content root.
    pub default_category: String,
    pub processing: ProcessingConfig,
}

pub const DEFAULT_PROJECT_NAME: &str = "Personal Website & Blog";
pub const DEFAULT_CATEGORY: &str = "general";

impl Default for Config {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            output_dir: None,
            base_url: String::new(),
            project_name: DEFAULT_PROJECT_NAME.to_string(),
            project_description: None,
            categories: Vec::new(),
            default_category: DEFAULT_CATEGORY.to_string(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl Config {
    /// Validate values that deserialize fine but make no sense.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.project_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "project_name must not be empty".into(),
            ));
        }
        if self.default_category.trim().is_empty() {
            return Err(ConfigError::Validation(
                "default_category must not be empty".into(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for category in &self.categories {
            if category.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "categories must not contain empty names".into(),
                ));
            }
            if !seen.insert(category.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "category '{category}' is listed twice"
                )));
            }
        }
        Ok(())
    }

    /// Output directory, defaulting relative to `cwd`.
    ///
    /// A Next.js static export lands in `out/`; when that exists it is the
    /// natural target, otherwise `public/` is.
    pub fn resolved_output_dir(&self, cwd: &Path) -> PathBuf {
        match &self.output_dir {
            Some(dir) => dir.clone(),
            None if cwd.join("out").is_dir() => PathBuf::from("out"),
            None => PathBuf::from("public"),
        }
    }

    /// The subset of settings the index generator needs.
    pub fn generation(&self) -> GenerationConfig {
        GenerationConfig {
            project_name: self.project_name.clone(),
            project_description: self
                .project_description
                .clone()
                .filter(|d| !d.trim().is_empty()),
            base_url: self.base_url.trim_end_matches('/').to_string(),
            categories: self.categories.clone(),
        }
    }
}

/// Immutable settings for rendering `llms.txt`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationConfig {
    pub project_name: String,
    pub project_description: Option<String>,
    /// Prefix for every link, without a trailing slash.
    pub base_url: String,
    /// Fixed category priority; empty means first-seen order.
    pub categories: Vec<String>,
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel file-processing workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, at least 1
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Loading and merging
// =============================================================================

/// Command-line overrides; `None` leaves the lower layer in place.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub content_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub base_url: Option<String>,
    pub project_name: Option<String>,
    pub project_description: Option<String>,
}

impl Overrides {
    pub fn apply(self, config: &mut Config) {
        if let Some(dir) = self.content_dir {
            config.content_dir = dir;
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = Some(dir);
        }
        if let Some(url) = self.base_url {
            config.base_url = url;
        }
        if let Some(name) = self.project_name {
            config.project_name = name;
        }
        if let Some(description) = self.project_description {
            config.project_description = Some(description);
        }
    }
}

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(Config::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<Config, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: Config = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the full configuration: defaults, then the config file, then
/// command-line overrides. The result is validated after every layer.
pub fn load_config(file: &Path, overrides: Overrides) -> Result<Config, ConfigError> {
    let mut config = resolve_config(stock_defaults_value(), load_raw_config(file)?)?;
    overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `llms.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# get-llms-txt configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Command-line flags override them.
# Unknown keys will cause an error.

# Directory scanned recursively for .md and .mdx files.
content_dir = "content"

# Where llms.txt and the md/ copies are written.
# Default: "out" when that directory exists (Next.js static export),
# otherwise "public".
# output_dir = "public"

# Prefix for every link in llms.txt, e.g. "https://example.com".
base_url = ""

# First line of llms.txt: "# <project_name>".
project_name = "Personal Website & Blog"

# Optional "> <project_description>" line under the title.
# project_description = ""

# Category sections listed here come first, in this order.
# Categories not listed follow in the order they are first seen.
categories = []

# Category of files that sit directly in the content directory.
# Files in subdirectories use their top-level directory name, unless their
# metadata sets `category`.
default_category = "general"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel file-processing workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
