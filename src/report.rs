//! # Report Module
//!
//! Validation results, their ordering and severity filtering, and the
//! `headerCheck.json` artifact.
//!
//! Every checked file produces exactly one [`ValidationResult`], passing
//! files included. The JSON artifact always carries the full unfiltered
//! list; the severity threshold only affects what the console shows.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::classify::{Classification, Severity, Violation};
use crate::expect::ExpectedYears;
use crate::header::DeclaredYears;

/// File name of the persisted JSON artifact.
pub const REPORT_FILENAME: &str = "headerCheck.json";

/// Declared and expected years for a file whose header parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearComparison {
  /// Start year the header currently declares.
  pub current_start_year: i32,

  /// End year the header currently declares, if it declares a range.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub current_end_year: Option<i32>,

  /// Start year the file's history expects.
  pub expected_start_year: i32,

  /// End year the file's history expects.
  pub expected_end_year: i32,
}

impl YearComparison {
  /// The years the header currently declares.
  pub const fn declared(&self) -> DeclaredYears {
    DeclaredYears {
      start: self.current_start_year,
      end: self.current_end_year,
    }
  }

  /// The years the file's history expects.
  pub const fn expected(&self) -> ExpectedYears {
    ExpectedYears {
      start: self.expected_start_year,
      end: self.expected_end_year,
    }
  }
}

/// The verdict for one validated file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
  /// Absolute path of the validated file.
  #[serde(with = "path_serialization")]
  pub file: PathBuf,

  /// How severe the verdict is.
  pub severity: Severity,

  /// What, if anything, is wrong with the header.
  pub violation: Violation,

  /// Year data, present when the header declared at least one year.
  #[serde(flatten)]
  pub years: Option<YearComparison>,
}

impl ValidationResult {
  /// Result for a file with no usable header.
  pub const fn without_years(file: PathBuf, violation: Violation, severity: Severity) -> Self {
    Self {
      file,
      severity,
      violation,
      years: None,
    }
  }

  /// Result for a file whose header declared years.
  pub const fn with_years(
    file: PathBuf,
    classification: Classification,
    declared: DeclaredYears,
    expected: ExpectedYears,
  ) -> Self {
    Self {
      file,
      severity: classification.severity,
      violation: classification.violation,
      years: Some(YearComparison {
        current_start_year: declared.start,
        current_end_year: declared.end,
        expected_start_year: expected.start,
        expected_end_year: expected.end,
      }),
    }
  }
}

/// Helper module for serializing/deserializing PathBuf
mod path_serialization {
  use std::path::PathBuf;

  use serde::{Deserialize, Deserializer, Serializer};

  pub fn serialize<S>(path: &std::path::Path, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    serializer.serialize_str(&path.to_string_lossy())
  }

  pub fn deserialize<'de, D>(deserializer: D) -> Result<PathBuf, D::Error>
  where
    D: Deserializer<'de>,
  {
    let s = String::deserialize(deserializer)?;
    Ok(PathBuf::from(s))
  }
}

/// Sort results ascending by path string.
///
/// Ordering is byte-wise over the whole rendered path, matching a plain
/// string sort rather than a component-wise one.
pub fn sort_results(results: &mut [ValidationResult]) {
  results.sort_by(|a, b| a.file.as_os_str().cmp(b.file.as_os_str()));
}

/// Results at or above the severity threshold.
///
/// `Error` shows only errors, `Warn` shows errors and warnings, `Ok` shows
/// everything.
pub fn filter_by_severity(results: &[ValidationResult], threshold: Severity) -> Vec<&ValidationResult> {
  results.iter().filter(|r| r.severity <= threshold).collect()
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationSummary {
  /// Total files checked.
  pub files_checked: usize,

  /// Results with error severity.
  pub errors: usize,

  /// Results with warn severity.
  pub warnings: usize,

  /// Results the severity filter displays.
  pub displayed: usize,
}

impl ValidationSummary {
  /// Tally results against a display threshold.
  pub fn from_results(results: &[ValidationResult], threshold: Severity) -> Self {
    let errors = results.iter().filter(|r| r.severity == Severity::Error).count();
    let warnings = results.iter().filter(|r| r.severity == Severity::Warn).count();
    let displayed = results.iter().filter(|r| r.severity <= threshold).count();

    Self {
      files_checked: results.len(),
      errors,
      warnings,
      displayed,
    }
  }

  /// Total violations regardless of the display filter.
  pub const fn violations(&self) -> usize {
    self.errors + self.warnings
  }
}

/// Write the full, unfiltered result list as pretty-printed JSON.
///
/// # Returns
///
/// The path of the written artifact.
///
/// # Errors
///
/// Fails when the artifact cannot be serialized or written.
pub fn write_json_report(root: &Path, results: &[ValidationResult]) -> Result<PathBuf> {
  let path = root.join(REPORT_FILENAME);

  let content = serde_json::to_string_pretty(results).with_context(|| "Failed to serialize validation results")?;
  fs::write(&path, content).with_context(|| format!("Failed to write report to {}", path.display()))?;

  Ok(path)
}
