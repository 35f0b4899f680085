//! # Configuration Module
//!
//! This module provides configuration support for yearlint: the
//! `.yearlint.toml` file format, config file discovery, and the resolved
//! [`CheckOptions`] bundle handed to the validation pipeline.
//!
//! Configuration can be specified in a `.yearlint.toml` file or via the
//! `YEARLINT_CONFIG` environment variable. Command-line flags always win over
//! the config file, which wins over the built-in defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::classify::{PolicyKind, Severity};
use crate::selector::CheckScope;
use crate::verbose_log;

/// The default config file name.
pub const DEFAULT_CONFIG_FILENAME: &str = ".yearlint.toml";

/// Environment variable for specifying config file path.
pub const CONFIG_ENV_VAR: &str = "YEARLINT_CONFIG";

/// File extensions checked when neither the CLI nor the config file
/// specifies any.
pub const DEFAULT_FILE_EXTENSIONS: &[&str] = &["ts", "tsx"];

/// Exclude globs applied in addition to user-supplied patterns unless
/// `--no-exclude-defaults` is set.
pub const DEFAULT_EXCLUDES: &[&str] = &["**/node_modules/**", "**/lib/**", "**/dist/**", "**/bundle/**"];

/// Header pattern used when neither the CLI nor the config file overrides it.
pub const DEFAULT_HEADER_PATTERN: &str = r"Copyright \([cC]\) \d{4}(-\d{4})?";

/// Error type for configuration and root-resolution failures.
///
/// Every variant is raised before any file is validated.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The requested root path is not a directory.
  #[error("'{path}' is not a directory")]
  NotADirectory { path: PathBuf },

  /// The requested root path is not inside a git work tree.
  #[error("'{path}' is not part of a git repository")]
  NotAGitRepository { path: PathBuf },

  /// The root path could not be canonicalized.
  #[error("Failed to resolve root directory '{path}': {source}")]
  RootResolution { path: PathBuf, source: std::io::Error },

  /// The config file could not be read.
  #[error("Failed to read config file '{path}': {source}")]
  ReadError { path: PathBuf, source: std::io::Error },

  /// The config file contains invalid TOML.
  #[error("Failed to parse config file '{path}': {source}")]
  ParseError { path: PathBuf, source: toml::de::Error },

  /// The resolved extension list is empty.
  #[error("File extension list must not be empty")]
  EmptyExtensions,

  /// An extension entry is malformed.
  #[error("Invalid file extension '{extension}': {message}")]
  InvalidExtension { extension: String, message: String },

  /// The header pattern is not a valid regex.
  #[error("Invalid header pattern '{pattern}': {source}")]
  InvalidHeaderPattern { pattern: String, source: regex::Error },

  /// An exclude glob is malformed.
  #[error("Invalid exclude pattern '{pattern}': {source}")]
  InvalidExcludePattern { pattern: String, source: globset::Error },
}

/// Main configuration struct for yearlint.
///
/// This struct is loaded from a `.yearlint.toml` file and contains all
/// user-configurable options for header validation. Every field is optional;
/// absent fields fall back to the CLI flag or the built-in default.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
  /// File extensions to check, without the leading dot (e.g., "ts", "tsx").
  #[serde(default, rename = "file-extensions")]
  pub file_extensions: Option<Vec<String>>,

  /// Exclude globs applied in addition to the built-in defaults.
  #[serde(default)]
  pub exclude: Vec<String>,

  /// Whether the built-in exclude globs apply.
  #[serde(default, rename = "exclude-defaults")]
  pub exclude_defaults: Option<bool>,

  /// Regex used to locate the copyright header line.
  #[serde(default, rename = "header-pattern")]
  pub header_pattern: Option<String>,

  /// Which validation policy is active.
  #[serde(default)]
  pub policy: Option<PolicyKind>,

  /// Minimum severity to display.
  #[serde(default)]
  pub severity: Option<Severity>,
}

impl Config {
  /// Load configuration from a file.
  ///
  /// # Arguments
  ///
  /// * `path` - Path to the configuration file
  ///
  /// # Returns
  ///
  /// The loaded configuration, or an error if the file cannot be read or
  /// parsed.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    verbose_log!("Loading config from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
      path: path.to_path_buf(),
      source: e,
    })?;

    let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
      path: path.to_path_buf(),
      source: e,
    })?;

    config.validate()?;

    Ok(config)
  }

  /// Validate the configuration.
  ///
  /// Checks that extension entries are non-empty and don't include the
  /// leading dot.
  fn validate(&self) -> Result<(), ConfigError> {
    if let Some(ref extensions) = self.file_extensions {
      validate_extensions(extensions)?;
    }

    Ok(())
  }
}

/// Fully resolved settings for one validation run.
///
/// Built by merging CLI flags, the config file, and the built-in defaults,
/// in that order of precedence.
#[derive(Debug, Clone)]
pub struct CheckOptions {
  /// Which candidate set to validate.
  pub scope: CheckScope,

  /// File extensions to check, without the leading dot.
  pub file_extensions: Vec<String>,

  /// Exclude globs subtracted from the candidate set.
  pub excludes: Vec<String>,

  /// Regex used to locate the copyright header line.
  pub header_pattern: String,

  /// Which validation policy is active.
  pub policy: PolicyKind,

  /// Minimum severity to display.
  pub severity: Severity,
}

impl CheckOptions {
  /// Validate the merged options.
  ///
  /// # Errors
  ///
  /// Returns [`ConfigError::EmptyExtensions`] if no extensions are
  /// configured, or [`ConfigError::InvalidExtension`] for malformed entries.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.file_extensions.is_empty() {
      return Err(ConfigError::EmptyExtensions);
    }

    validate_extensions(&self.file_extensions)
  }
}

fn validate_extensions(extensions: &[String]) -> Result<(), ConfigError> {
  for ext in extensions {
    if ext.is_empty() {
      return Err(ConfigError::InvalidExtension {
        extension: ext.clone(),
        message: "extension cannot be empty".to_string(),
      });
    }

    if ext.starts_with('.') {
      return Err(ConfigError::InvalidExtension {
        extension: ext.clone(),
        message: "extension should not include leading dot".to_string(),
      });
    }
  }

  Ok(())
}

/// Discover the configuration file path.
///
/// The configuration file is discovered in the following order:
/// 1. Path specified via `--config` flag (passed as `explicit_path`)
/// 2. Path specified via `YEARLINT_CONFIG` environment variable
/// 3. `.yearlint.toml` in the root directory
///
/// # Arguments
///
/// * `explicit_path` - Optional explicit path from CLI flag
/// * `root` - The root directory of the validation run
///
/// # Returns
///
/// The path to the configuration file, or `None` if no config file is found.
pub fn discover_config_path(explicit_path: Option<&Path>, root: &Path) -> Option<PathBuf> {
  // 1. Explicit path from CLI takes highest priority
  if let Some(path) = explicit_path {
    if path.exists() {
      verbose_log!("Using explicit config path: {}", path.display());
      return Some(path.to_path_buf());
    }
    verbose_log!("Explicit config path does not exist: {}", path.display());
    return None;
  }

  // 2. Check environment variable
  if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
    let path = PathBuf::from(&env_path);
    if path.exists() {
      verbose_log!("Using config from {}: {}", CONFIG_ENV_VAR, path.display());
      return Some(path);
    }
    verbose_log!("{} path does not exist: {}", CONFIG_ENV_VAR, env_path);
  }

  // 3. Check root directory
  let root_config = root.join(DEFAULT_CONFIG_FILENAME);
  if root_config.exists() {
    verbose_log!("Using root config: {}", root_config.display());
    return Some(root_config);
  }

  verbose_log!("No config file found");
  None
}

/// Load configuration from the discovered path, or return `None`.
///
/// # Arguments
///
/// * `explicit_path` - Optional explicit path from CLI flag
/// * `root` - The root directory of the validation run
/// * `no_config` - If true, skip config file discovery entirely
///
/// # Returns
///
/// The loaded configuration, or `None` if no config file is found or
/// discovery is disabled.
pub fn load_config(explicit_path: Option<&Path>, root: &Path, no_config: bool) -> Result<Option<Config>> {
  if no_config {
    verbose_log!("Config file discovery disabled (--no-config)");
    return Ok(None);
  }

  match discover_config_path(explicit_path, root) {
    Some(path) => {
      let config = Config::load(&path).with_context(|| format!("Failed to load config from {}", path.display()))?;
      Ok(Some(config))
    }
    None => Ok(None),
  }
}
