//! # Workspace Module
//!
//! Resolves the root directory that yearlint operates on. The root must be a
//! directory inside a git work tree; the effective root is the work tree
//! itself so that history queries and relative paths line up with what git
//! reports.

use std::path::{Path, PathBuf};

use crate::config::ConfigError;
use crate::git;
use crate::verbose_log;

/// Resolve the effective root for a validation run.
///
/// Canonicalizes `path` and walks up to the enclosing git work tree.
///
/// # Errors
///
/// Fails when `path` is not a directory, cannot be canonicalized, or is not
/// inside a git repository.
pub fn resolve_root(path: &Path) -> Result<PathBuf, ConfigError> {
  if !path.is_dir() {
    return Err(ConfigError::NotADirectory {
      path: path.to_path_buf(),
    });
  }

  let canonical = path.canonicalize().map_err(|e| ConfigError::RootResolution {
    path: path.to_path_buf(),
    source: e,
  })?;

  match git::discover_work_tree(&canonical) {
    Some(root) => {
      verbose_log!("Resolved root to git work tree: {}", root.display());
      Ok(root)
    }
    None => Err(ConfigError::NotAGitRepository { path: canonical }),
  }
}
