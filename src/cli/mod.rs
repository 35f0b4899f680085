//! # CLI Module
//!
//! This module contains the command-line interface implementation.
//! It uses clap for argument parsing; the check command is the default
//! when no subcommand is given, so `yearlint .` and `yearlint check .`
//! are equivalent.

mod check;

pub use check::{CheckArgs, run_check};
use clap::builder::styling::{AnsiColor, Color, Style, Styles};
use clap::{Parser, Subcommand};

const CUSTOM_STYLES: Styles = Styles::styled()
  .header(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .usage(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))).bold())
  .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
  .error(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))).bold())
  .valid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
  .invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))));

/// Version string shown by `--version`, including build metadata when the
/// binary was built from a git checkout.
fn version() -> String {
  let hash = env!("GIT_HASH");
  let date = env!("GIT_DATE");

  if hash.is_empty() {
    env!("CARGO_PKG_VERSION").to_string()
  } else if date.is_empty() {
    format!("{} ({hash})", env!("CARGO_PKG_VERSION"))
  } else {
    format!("{} ({hash} {date})", env!("CARGO_PKG_VERSION"))
  }
}

/// Top-level CLI arguments
#[derive(Parser, Debug)]
#[command(
  version = version(),
  about,
  styles = CUSTOM_STYLES,
  after_help = "Examples:
  # Check copyright header years across the whole repository
  yearlint

  # Check only files touched by uncommitted changes
  yearlint --type changes

  # Show warnings as well as errors
  yearlint --severity warn

  # Write a headerCheck.json report into the repository root
  yearlint --json

  # Fix invalid years and commit the result without prompting
  yearlint --auto-fix

  # Validate only the end year against the repository's last commit
  yearlint --type last-commit --policy end-year-only

  # Use a custom header pattern and extension set
  yearlint --header-pattern \"Copyright [0-9]{4}\" --file-extensions ts,tsx,js

  # Fail CI when any error-severity violation remains
  yearlint --strict
",
  help_template = "{before-help}{name} v{version}
{about-section}
{usage-heading} {usage}

{all-args}{after-help}
"
)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Option<Command>,

  #[command(flatten)]
  pub check_args: CheckArgs,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
  /// Validate copyright header years against git history (default)
  Check(CheckArgs),
}

impl Cli {
  /// Parse CLI arguments and return the Cli struct
  pub fn parse_args() -> Self {
    Self::parse()
  }

  /// Get the effective check arguments, whether from a subcommand or top-level
  pub fn get_check_args(self) -> CheckArgs {
    match self.command {
      Some(Command::Check(args)) => args,
      None => self.check_args,
    }
  }
}
