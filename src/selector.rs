//! # Selector Module
//!
//! Resolves the candidate file set for a validation run: which files under
//! the root match the extension filter and survive the exclude globs, for a
//! given scope.
//!
//! Paths are produced relative to the root in discovery order; the reporter
//! owns the final display ordering.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::ValueEnum;
use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::debug;
use walkdir::WalkDir;

use crate::config::ConfigError;
use crate::git;

/// Which candidate set a run validates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CheckScope {
  /// Every matching file under the root.
  #[default]
  Full,

  /// Files with uncommitted working-tree changes (staged, unstaged,
  /// untracked).
  Changes,

  /// Files changed by the most recent commit.
  #[value(alias = "lastCommit")]
  LastCommit,
}

impl fmt::Display for CheckScope {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::Full => "full",
      Self::Changes => "changes",
      Self::LastCommit => "last-commit",
    };
    write!(f, "{name}")
  }
}

/// Resolves candidate files under a root directory.
#[derive(Debug)]
pub struct FileSelector {
  root: PathBuf,
  extensions: Vec<String>,
  excludes: GlobSet,
}

impl FileSelector {
  /// Build a selector for a root, an extension filter, and exclude globs.
  ///
  /// Extensions are matched case-insensitively. Exclude globs are matched
  /// against root-relative paths.
  ///
  /// # Errors
  ///
  /// Returns [`ConfigError::InvalidExcludePattern`] for a malformed glob.
  pub fn new(root: &Path, extensions: &[String], excludes: &[String]) -> Result<Self, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in excludes {
      let glob = Glob::new(pattern).map_err(|e| ConfigError::InvalidExcludePattern {
        pattern: pattern.clone(),
        source: e,
      })?;
      builder.add(glob);
    }

    let excludes = builder.build().map_err(|e| ConfigError::InvalidExcludePattern {
      pattern: e.glob().unwrap_or_default().to_string(),
      source: e,
    })?;

    Ok(Self {
      root: root.to_path_buf(),
      extensions: extensions.iter().map(|e| e.to_lowercase()).collect(),
      excludes,
    })
  }

  /// Resolve the candidate files for a scope.
  ///
  /// Returns root-relative paths in discovery order, with no duplicates.
  ///
  /// # Errors
  ///
  /// Fails when the git queries behind the `changes` and `last-commit`
  /// scopes fail.
  pub fn select(&self, scope: CheckScope) -> Result<Vec<PathBuf>> {
    let files = match scope {
      CheckScope::Full => self.walk_tree(),
      CheckScope::Changes => git::uncommitted_files(&self.root)?,
      CheckScope::LastCommit => git::last_commit_files(&self.root)?,
    };

    let mut seen = HashSet::new();
    let mut selected = Vec::new();

    for file in files {
      if !self.matches_extension(&file) || self.excludes.is_match(&file) {
        continue;
      }

      if seen.insert(file.clone()) {
        selected.push(file);
      }
    }

    Ok(selected)
  }

  /// Walk the full tree under the root, skipping `.git`.
  fn walk_tree(&self) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let walker = WalkDir::new(&self.root)
      .sort_by_file_name()
      .into_iter()
      .filter_entry(|entry| entry.file_name() != ".git");

    for entry in walker {
      let entry = match entry {
        Ok(entry) => entry,
        Err(e) => {
          debug!("Skipping unreadable entry: {e}");
          continue;
        }
      };

      if !entry.file_type().is_file() {
        continue;
      }

      if let Ok(rel) = entry.path().strip_prefix(&self.root) {
        files.push(rel.to_path_buf());
      }
    }

    files
  }

  fn matches_extension(&self, file: &Path) -> bool {
    let Some(ext) = file.extension().and_then(|e| e.to_str()) else {
      return false;
    };

    let ext = ext.to_lowercase();
    self.extensions.iter().any(|e| *e == ext)
  }
}
