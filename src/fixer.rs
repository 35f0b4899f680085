//! # Fixer Module
//!
//! Rewrites invalid header year tokens in place and commits the result.
//!
//! The workflow is strictly phased: every fix is planned first (pure), the
//! planned rewrites are shown, then all plans are applied, then a single
//! commit is created containing only the files that were actually fixed.
//! The commit message doubles as the marker that history queries exclude,
//! so a fix commit never shifts the expectations of a later run.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use owo_colors::{OwoColorize, Stream};
use similar::{ChangeTag, TextDiff};

use crate::classify::{ClassifyPolicy, Severity};
use crate::git;
use crate::header::{HeaderPattern, year_range_regex};
use crate::logging::is_quiet;
use crate::output::{make_relative_path, symbols};
use crate::report::ValidationResult;
use crate::verbose_log;

/// Commit message for auto-fix commits.
///
/// History queries exclude commits carrying this message, so a fix commit
/// never masks a file's true origin date.
pub const AUTO_FIX_COMMIT_MESSAGE: &str = "Fix copyright header violations";

/// Yes/no confirmation gate for the fix workflow.
pub trait Confirmer {
  /// Ask the user a yes/no question; `false` skips the gated step.
  fn confirm(&self, question: &str) -> bool;
}

/// Confirms every question without prompting (`--auto-fix`).
pub struct AutoConfirm;

impl Confirmer for AutoConfirm {
  fn confirm(&self, _question: &str) -> bool {
    true
  }
}

/// Prompts on stdin; `y`/`yes` (case-insensitive) is affirmative, EOF or
/// anything else is a no.
pub struct InteractiveConfirm;

impl Confirmer for InteractiveConfirm {
  fn confirm(&self, question: &str) -> bool {
    print!("{} [y/N] ", question.if_supports_color(Stream::Stdout, |s| s.cyan()));
    let _ = std::io::stdout().flush();

    let mut answer = String::new();
    match std::io::stdin().lock().read_line(&mut answer) {
      Ok(0) | Err(_) => false,
      Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
    }
  }
}

/// One planned header rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixPlan {
  /// Absolute path of the file to rewrite.
  pub file: PathBuf,

  /// Root-relative path, used for display and for the commit.
  pub rel: PathBuf,

  /// Year token the header currently carries.
  pub old_token: String,

  /// Year token to write instead.
  pub new_token: String,
}

/// What the apply phase achieved.
#[derive(Debug, Default)]
pub struct FixOutcome {
  /// Root-relative paths of successfully rewritten files.
  pub fixed: Vec<PathBuf>,

  /// Number of files whose fix failed.
  pub failed: usize,
}

/// Plans and applies header year fixes.
pub struct Fixer<'a> {
  root: &'a Path,
  pattern: &'a HeaderPattern,
  policy: &'a dyn ClassifyPolicy,
}

impl<'a> Fixer<'a> {
  pub fn new(root: &'a Path, pattern: &'a HeaderPattern, policy: &'a dyn ClassifyPolicy) -> Self {
    Self { root, pattern, policy }
  }

  /// Plan fixes for every fixable result.
  ///
  /// Fixable means error severity with year data; missing-header and
  /// no-year results are never auto-fixed.
  pub fn plan(&self, results: &[ValidationResult]) -> Vec<FixPlan> {
    let mut plans = Vec::new();

    for result in results {
      if result.severity != Severity::Error {
        continue;
      }

      let Some(years) = &result.years else {
        continue;
      };

      let declared = years.declared();
      let fixed = self.policy.fixed_years(declared, years.expected());

      let rel = match result.file.strip_prefix(self.root) {
        Ok(rel) => rel.to_path_buf(),
        Err(_) => result.file.clone(),
      };

      plans.push(FixPlan {
        file: result.file.clone(),
        rel,
        old_token: declared.to_string(),
        new_token: fixed.to_string(),
      });
    }

    plans
  }

  /// Show the planned rewrites as header-line diffs.
  pub fn preview(&self, plans: &[FixPlan]) {
    if is_quiet() {
      return;
    }

    for plan in plans {
      println!(
        "{}: {} -> {}",
        make_relative_path(&plan.file, Some(self.root)),
        plan.old_token,
        plan.new_token
      );

      let Some((old_line, new_line)) = self.planned_line_change(plan) else {
        continue;
      };

      let diff = TextDiff::from_lines(&old_line, &new_line);
      for change in diff.iter_all_changes() {
        match change.tag() {
          ChangeTag::Delete => print!(
            "{}",
            format!("-{change}").if_supports_color(Stream::Stdout, |s| s.red())
          ),
          ChangeTag::Insert => print!(
            "{}",
            format!("+{change}").if_supports_color(Stream::Stdout, |s| s.green())
          ),
          ChangeTag::Equal => print!(" {change}"),
        }
      }
    }
  }

  /// The before/after header line for a plan, for display.
  fn planned_line_change(&self, plan: &FixPlan) -> Option<(String, String)> {
    let content = std::fs::read_to_string(&plan.file).ok()?;

    let span = self.pattern.header_line_span(&content)?;
    let old_line = format!("{}\n", &content[span]);

    let rewritten = rewrite_header_token(&content, self.pattern, &plan.old_token, &plan.new_token).ok()?;
    let new_span = self.pattern.header_line_span(&rewritten)?;
    let new_line = format!("{}\n", &rewritten[new_span]);

    Some((old_line, new_line))
  }

  /// Apply all plans, continuing past per-file failures.
  pub fn apply(&self, plans: &[FixPlan]) -> FixOutcome {
    let mut outcome = FixOutcome::default();

    for plan in plans {
      match self.apply_one(plan) {
        Ok(()) => {
          verbose_log!("Fixed {}", plan.rel.display());
          outcome.fixed.push(plan.rel.clone());
        }
        Err(e) => {
          eprintln!(
            "Failed to fix {}: {e:#}",
            make_relative_path(&plan.file, Some(self.root))
          );
          outcome.failed += 1;
        }
      }
    }

    outcome
  }

  fn apply_one(&self, plan: &FixPlan) -> Result<()> {
    let content =
      std::fs::read_to_string(&plan.file).with_context(|| format!("Failed to read file: {}", plan.file.display()))?;

    let rewritten = rewrite_header_token(&content, self.pattern, &plan.old_token, &plan.new_token)?;

    std::fs::write(&plan.file, rewritten)
      .with_context(|| format!("Failed to write file: {}", plan.file.display()))?;

    Ok(())
  }

  /// Print what the apply phase did.
  pub fn print_outcome(&self, outcome: &FixOutcome) {
    if is_quiet() {
      return;
    }

    let count = outcome.fixed.len();
    let files_word = if count == 1 { "file" } else { "files" };
    println!(
      "{} Updated {count} {files_word}",
      symbols::UPDATED.if_supports_color(Stream::Stdout, |s| s.yellow())
    );

    if outcome.failed > 0 {
      let failed_word = if outcome.failed == 1 { "file" } else { "files" };
      println!(
        "{} {} {failed_word} could not be fixed",
        symbols::FAILURE.if_supports_color(Stream::Stdout, |s| s.red()),
        outcome.failed
      );
    }
  }

  /// Stage the fixed files and create the single auto-fix commit.
  ///
  /// # Errors
  ///
  /// Fails when staging or committing fails.
  pub fn commit(&self, fixed: &[PathBuf]) -> Result<()> {
    git::commit_files(self.root, fixed, AUTO_FIX_COMMIT_MESSAGE)
  }
}

/// Rewrite the first year token of the header line in `content`.
///
/// # Errors
///
/// Fails when no header line is present, when the line carries no year
/// token, or when the token does not match `old_token` (the file changed
/// since planning).
pub fn rewrite_header_token(
  content: &str,
  pattern: &HeaderPattern,
  old_token: &str,
  new_token: &str,
) -> Result<String> {
  let Some(span) = pattern.header_line_span(content) else {
    bail!("no copyright header line found");
  };

  let line = &content[span.clone()];
  let Some(token) = year_range_regex().find(line) else {
    bail!("no year token found on the header line");
  };

  if token.as_str() != old_token {
    bail!("expected year token '{}' but found '{}'", old_token, token.as_str());
  }

  let token_start = span.start + token.start();
  let token_end = span.start + token.end();

  let mut rewritten = String::with_capacity(content.len() + new_token.len());
  rewritten.push_str(&content[..token_start]);
  rewritten.push_str(new_token);
  rewritten.push_str(&content[token_end..]);

  Ok(rewritten)
}
