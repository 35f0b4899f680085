//! # Output Module
//!
//! This module centralizes all user-facing output for the yearlint tool.
//! It provides consistent formatting, colors, and symbols for terminal
//! output.
//!
//! ## Design Goals
//!
//! - **Informative**: Show expected vs. actual years without requiring flags
//! - **Scannable**: Color results by severity
//! - **Scriptable**: Keep stdout predictable for piping/automation (`-q`
//!   prints bare paths only)

use std::path::Path;

use owo_colors::{OwoColorize, Stream};

use crate::classify::{Severity, Violation};
use crate::logging::is_quiet;
use crate::report::{ValidationResult, ValidationSummary};
use crate::selector::CheckScope;

/// Symbols used in output
pub mod symbols {
  /// Valid header / clean run
  pub const SUCCESS: &str = "\u{2713}"; // ✓
  /// Violations found
  pub const FAILURE: &str = "\u{2717}"; // ✗
  /// Header rewritten by the fixer
  pub const UPDATED: &str = "\u{21bb}"; // ↻
}

/// Print the initial "Checking N files..." message.
pub fn print_start(file_count: usize, scope: CheckScope) {
  if is_quiet() {
    return;
  }

  let files_word = if file_count == 1 { "file" } else { "files" };
  println!("Checking {file_count} {files_word} ({scope} scope)...");
}

/// Print the message for a run that selected no files.
pub fn print_no_candidates(scope: CheckScope) {
  if is_quiet() {
    return;
  }

  println!("No matching files found for the {scope} scope.");
}

/// Print a blank line for visual separation (respects quiet mode).
pub fn print_blank_line() {
  if !is_quiet() {
    println!();
  }
}

/// The human-readable message for one validation result.
pub fn violation_message(result: &ValidationResult) -> String {
  match result.violation {
    Violation::None => "OK".to_string(),
    Violation::NoOrMissingHeader => "No or invalid copyright header!".to_string(),
    Violation::NoYear => "Found copyright header but no year token!".to_string(),
    Violation::InvalidCopyrightYear => match &result.years {
      Some(years) => format!(
        "Invalid copyright year! Expected '{}' but is '{}'",
        years.expected().start,
        years.declared()
      ),
      None => "Invalid copyright year!".to_string(),
    },
    Violation::IncorrectCopyrightPeriod => match &result.years {
      Some(years) => format!(
        "Invalid copyright period! Expected '{}-{}' but is '{}'",
        years.expected().start,
        years.expected().end,
        years.declared()
      ),
      None => "Invalid copyright period!".to_string(),
    },
    Violation::InvalidEndYear => match &result.years {
      Some(years) => format!(
        "Invalid copyright end year! Expected '{}' but is '{}'",
        years.expected().end,
        years.declared()
      ),
      None => "Invalid copyright end year!".to_string(),
    },
  }
}

/// Print the filtered result list, numbered and colored by severity.
///
/// In quiet mode, prints bare relative paths only (for scripting).
pub fn print_results(results: &[&ValidationResult], root: &Path) {
  if is_quiet() {
    for result in results {
      println!("{}", make_relative_path(&result.file, Some(root)));
    }
    return;
  }

  for (index, result) in results.iter().enumerate() {
    let display_path = make_relative_path(&result.file, Some(root));
    let line = format!("{}. {}: {}", index + 1, display_path, violation_message(result));

    match result.severity {
      Severity::Error => println!("{}", line.if_supports_color(Stream::Stdout, |s| s.red())),
      Severity::Warn => println!("{}", line.if_supports_color(Stream::Stdout, |s| s.yellow())),
      Severity::Ok => println!("{}", line.if_supports_color(Stream::Stdout, |s| s.green())),
    }
  }
}

/// Print the success message for a run without violations.
pub fn print_all_ok() {
  if is_quiet() {
    return;
  }

  println!(
    "{} All copyright headers are valid.",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green())
  );
}

/// Print the validation summary.
///
/// Reports the total files checked, the violations found, and how many
/// results the severity filter displayed.
pub fn print_validation_summary(summary: &ValidationSummary, threshold: Severity) {
  if is_quiet() {
    return;
  }

  let files_word = if summary.files_checked == 1 { "file" } else { "files" };
  let violations = summary.violations();
  let violations_word = if violations == 1 { "violation" } else { "violations" };

  let line = format!(
    "Summary: {} {} checked, {} {} ({} errors, {} warnings)",
    summary.files_checked, files_word, violations, violations_word, summary.errors, summary.warnings
  );

  if violations > 0 {
    println!(
      "{} {}",
      symbols::FAILURE.if_supports_color(Stream::Stdout, |s| s.red()),
      line
    );
  } else {
    println!(
      "{} {}",
      symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
      line
    );
  }

  if summary.displayed < summary.files_checked {
    println!(
      "Displaying {} of {} results (minimum severity: {})",
      summary.displayed, summary.files_checked, threshold
    );
  }
}

/// Make a path relative to the root for display.
///
/// Falls back to a `..`-style relative path when the file is not under the
/// root, and to the path as given when no relation exists.
pub fn make_relative_path(path: &Path, root: Option<&Path>) -> String {
  if let Some(root) = root {
    if let Ok(stripped) = path.strip_prefix(root) {
      return stripped.to_string_lossy().to_string();
    }

    if let Some(diffed) = pathdiff::diff_paths(path, root) {
      return diffed.to_string_lossy().to_string();
    }
  }

  path.to_string_lossy().to_string()
}
