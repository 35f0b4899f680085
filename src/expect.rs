//! # Expectation Module
//!
//! Derives the year range a file's header is expected to declare from the
//! file's git history and the scope of the run.
//!
//! The start year is always per file (first modification). The end year is
//! uniform across the batch for the `changes` and `last-commit` scopes, so
//! it is computed once up front instead of once per file; `full` scope
//! queries it per file. Files without history (not yet committed) fall back
//! to the current year on both ends.

use std::path::Path;

use anyhow::Result;
use chrono::{Datelike, Local};

use crate::git::GitHistory;
use crate::selector::CheckScope;

/// The year range a file's header is expected to declare.
///
/// `start == end` means the file's entire history fits within one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedYears {
  /// Year of the file's first modification.
  pub start: i32,

  /// Year of the file's (or batch's) last modification.
  pub end: i32,
}

/// Derives expected years for the files of one run.
pub struct ExpectationDeriver<'a> {
  history: &'a GitHistory,
  uniform_end: Option<i32>,
  current_year: i32,
}

impl<'a> ExpectationDeriver<'a> {
  /// Create a deriver for the given scope, precomputing the batch-uniform
  /// end year where the scope allows it.
  ///
  /// # Errors
  ///
  /// Fails when the history query for the uniform end year cannot run.
  pub fn new(history: &'a GitHistory, scope: CheckScope) -> Result<Self> {
    let current_year = Local::now().year();

    let uniform_end = match scope {
      CheckScope::Full => None,
      CheckScope::Changes => Some(current_year),
      CheckScope::LastCommit => Some(history.last_modification_year(None)?.unwrap_or(current_year)),
    };

    Ok(Self {
      history,
      uniform_end,
      current_year,
    })
  }

  /// Expected years for one file.
  ///
  /// # Errors
  ///
  /// Fails when a history query cannot run.
  pub fn expected_years(&self, file: &Path) -> Result<ExpectedYears> {
    let start = self.history.first_modification_year(file)?.unwrap_or(self.current_year);

    let end = match self.uniform_end {
      Some(end) => end,
      None => self.history.last_modification_year(Some(file))?.unwrap_or(self.current_year),
    };

    Ok(ExpectedYears { start, end })
  }
}
