//! # Check Command
//!
//! This module implements the header year validation command. This is the
//! default command when no subcommand is specified.
//!
//! A run proceeds in phases: resolve the root to its git work tree, load
//! and merge configuration, select candidate files, derive expected years
//! from git history, classify every header, report, and optionally fix and
//! commit.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Args;
use tracing::debug;

use crate::classify::{PolicyKind, Severity, Violation};
use crate::config::{
  CheckOptions, Config, DEFAULT_EXCLUDES, DEFAULT_FILE_EXTENSIONS, DEFAULT_HEADER_PATTERN, load_config,
};
use crate::expect::ExpectationDeriver;
use crate::fixer::{AUTO_FIX_COMMIT_MESSAGE, AutoConfirm, Confirmer, Fixer, InteractiveConfirm};
use crate::git::GitHistory;
use crate::header::{HeaderPattern, HeaderScan};
use crate::info_log;
use crate::logging::{ColorMode, init_tracing, set_quiet, set_verbose};
use crate::output::{
  print_all_ok, print_blank_line, print_no_candidates, print_results, print_start, print_validation_summary,
};
use crate::report::{ValidationResult, ValidationSummary, filter_by_severity, sort_results, write_json_report};
use crate::selector::{CheckScope, FileSelector};
use crate::shell::ShellOptions;
use crate::verbose_log;
use crate::workspace::resolve_root;

/// Arguments for the check command
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
  /// Directory to validate. The run root resolves to the git work tree
  /// containing it.
  #[arg(default_value = ".", value_name = "DIR")]
  pub root_dir: PathBuf,

  /// Which files to check: the full tree, files with uncommitted changes,
  /// or the files of the last commit
  #[arg(long = "type", short = 't', value_enum, default_value_t = CheckScope::Full, value_name = "SCOPE")]
  pub scope: CheckScope,

  /// File extensions to check, without the leading dot (comma-separated or
  /// repeatable)
  #[arg(long, short = 'f', value_delimiter = ',', value_name = "EXT")]
  pub file_extensions: Vec<String>,

  /// Glob patterns to exclude, applied on top of the built-in defaults
  /// (repeatable)
  #[arg(long, short = 'e', value_name = "GLOB")]
  pub exclude: Vec<String>,

  /// Do not apply the built-in exclude patterns
  #[arg(long)]
  pub no_exclude_defaults: bool,

  /// Regex used to locate the copyright header line
  #[arg(long, short = 'p', value_name = "REGEX")]
  pub header_pattern: Option<String>,

  /// Which validation policy to apply
  #[arg(long, value_enum, value_name = "POLICY")]
  pub policy: Option<PolicyKind>,

  /// Minimum severity to display (error shows the least, ok shows
  /// everything)
  #[arg(long, short = 's', value_enum, value_name = "LEVEL")]
  pub severity: Option<Severity>,

  /// Write a headerCheck.json report with every result into the root
  #[arg(long, short = 'j')]
  pub json: bool,

  /// Offer to fix invalid years even when stdin is not a terminal
  #[arg(long)]
  pub fix: bool,

  /// Fix invalid years and commit the result without prompting
  #[arg(long, short = 'a')]
  pub auto_fix: bool,

  /// Exit non-zero when any error-severity violation is found
  #[arg(long)]
  pub strict: bool,

  /// Path to config file (default: .yearlint.toml in the root)
  #[arg(long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Ignore config file even if present
  #[arg(long)]
  pub no_config: bool,

  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except errors and bare result paths
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Control when to use colored output (auto, never, always)
  #[arg(
    long,
    value_name = "WHEN",
    num_args = 0..=1,
    default_value_t = ColorMode::Auto,
    default_missing_value = "always",
    value_enum
  )]
  pub colors: ColorMode,
}

/// Merge CLI flags over the config file over the built-in defaults.
///
/// Exclude patterns are the one additive setting: the built-in defaults
/// (unless disabled), the config file's patterns, and the CLI's patterns
/// all apply together.
fn merge_options(args: &CheckArgs, config: Option<&Config>) -> CheckOptions {
  let file_extensions = if args.file_extensions.is_empty() {
    config
      .and_then(|c| c.file_extensions.clone())
      .unwrap_or_else(|| DEFAULT_FILE_EXTENSIONS.iter().map(|e| (*e).to_string()).collect())
  } else {
    args.file_extensions.clone()
  };

  let use_default_excludes = if args.no_exclude_defaults {
    false
  } else {
    config.and_then(|c| c.exclude_defaults).unwrap_or(true)
  };

  let mut excludes = Vec::new();
  if use_default_excludes {
    excludes.extend(DEFAULT_EXCLUDES.iter().map(|e| (*e).to_string()));
  }
  if let Some(config) = config {
    excludes.extend(config.exclude.iter().cloned());
  }
  excludes.extend(args.exclude.iter().cloned());

  CheckOptions {
    scope: args.scope,
    file_extensions,
    excludes,
    header_pattern: args
      .header_pattern
      .clone()
      .or_else(|| config.and_then(|c| c.header_pattern.clone()))
      .unwrap_or_else(|| DEFAULT_HEADER_PATTERN.to_string()),
    policy: args.policy.or_else(|| config.and_then(|c| c.policy)).unwrap_or_default(),
    severity: args
      .severity
      .or_else(|| config.and_then(|c| c.severity))
      .unwrap_or_default(),
  }
}

/// Run the check command with the given arguments
pub fn run_check(args: CheckArgs) -> Result<()> {
  // Initialize tracing subscriber for structured logging
  init_tracing(args.quiet, args.verbose);

  // Set verbose mode for output formatting and the log macros
  if args.verbose > 0 {
    set_verbose();
  } else if args.quiet {
    set_quiet();
  }
  args.colors.apply();

  // Resolve the run root to the enclosing git work tree
  let root = match resolve_root(&args.root_dir) {
    Ok(root) => root,
    Err(e) => {
      eprintln!("ERROR: {e}");
      process::exit(1);
    }
  };
  debug!("Using root: {}", root.display());

  // Load configuration file if present
  let config = match load_config(args.config.as_deref(), &root, args.no_config) {
    Ok(config) => config,
    Err(e) => {
      eprintln!("ERROR: {e:#}");
      process::exit(1);
    }
  };

  let options = merge_options(&args, config.as_ref());
  if let Err(e) = options.validate() {
    eprintln!("ERROR: {e}");
    process::exit(1);
  }
  debug!("Effective options: {options:?}");

  let pattern = match HeaderPattern::new(&options.header_pattern) {
    Ok(pattern) => pattern,
    Err(e) => {
      eprintln!("ERROR: {e}");
      process::exit(1);
    }
  };

  let selector = match FileSelector::new(&root, &options.file_extensions, &options.excludes) {
    Ok(selector) => selector,
    Err(e) => {
      eprintln!("ERROR: {e}");
      process::exit(1);
    }
  };

  let candidates = selector.select(options.scope)?;
  if candidates.is_empty() {
    print_no_candidates(options.scope);
    return Ok(());
  }

  print_start(candidates.len(), options.scope);

  // History queries are non-fatal and exclude earlier auto-fix commits, so
  // a fix commit never shifts the expectations of a later run.
  let history = GitHistory::new(
    &root,
    ShellOptions { silent: true, fatal: false },
    Some(AUTO_FIX_COMMIT_MESSAGE.to_string()),
  );
  let deriver = ExpectationDeriver::new(&history, options.scope)?;
  let policy = options.policy.policy();

  let total = candidates.len();
  let mut results = Vec::with_capacity(total);

  for (index, rel) in candidates.iter().enumerate() {
    verbose_log!("[{} of {}] Validating {}", index + 1, total, rel.display());

    let file = root.join(rel);
    let scan = match pattern.scan_file(&file) {
      Ok(scan) => scan,
      Err(e) => {
        debug!("Failed to read {}: {e:#}", file.display());
        HeaderScan::Missing
      }
    };

    let result = match scan {
      HeaderScan::Missing => ValidationResult::without_years(file, Violation::NoOrMissingHeader, Severity::Error),
      HeaderScan::NoYear => ValidationResult::without_years(file, Violation::NoYear, Severity::Error),
      HeaderScan::Years(declared) => {
        let expected = deriver.expected_years(rel)?;
        let classification = policy.classify(rel, declared, expected, &history)?;
        ValidationResult::with_years(file, classification, declared, expected)
      }
    };

    results.push(result);
  }

  sort_results(&mut results);

  let summary = ValidationSummary::from_results(&results, options.severity);
  let displayed = filter_by_severity(&results, options.severity);

  print_blank_line();
  if displayed.is_empty() {
    if summary.violations() == 0 {
      print_all_ok();
    }
  } else {
    print_results(&displayed, &root);
  }

  print_blank_line();
  print_validation_summary(&summary, options.severity);

  if args.json {
    let report_path = write_json_report(&root, &results)?;
    info_log!("Generated JSON report at {}", report_path.display());
  }

  // Fix workflow. Without --fix or --auto-fix it only engages when stdin
  // is a terminal, so plain CI runs stay read-only.
  let fixer = Fixer::new(&root, &pattern, policy);
  let plans = fixer.plan(&results);

  if !plans.is_empty() && (args.auto_fix || args.fix || std::io::stdin().is_terminal()) {
    print_blank_line();
    fixer.preview(&plans);

    let confirmer: &dyn Confirmer = if args.auto_fix { &AutoConfirm } else { &InteractiveConfirm };

    let files_word = if plans.len() == 1 { "file" } else { "files" };
    if confirmer.confirm(&format!("Fix {} {files_word}?", plans.len())) {
      let outcome = fixer.apply(&plans);
      fixer.print_outcome(&outcome);

      if !outcome.fixed.is_empty() && confirmer.confirm("Commit the fixed files?") {
        fixer.commit(&outcome.fixed)?;
        info_log!("Committed {} fixed file(s)", outcome.fixed.len());
      }
    }
  }

  if args.strict && summary.errors > 0 {
    debug!("Strict mode: exiting non-zero with {} error(s)", summary.errors);
    process::exit(1);
  }

  Ok(())
}
