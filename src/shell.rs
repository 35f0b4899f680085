//! # Shell Module
//!
//! This module wraps external command execution behind an explicit
//! configuration object. Callers construct a [`ProcessRunner`] with the
//! [`ShellOptions`] they want and thread it through; nothing here touches
//! global state, so two collaborators can run commands with different
//! fatality or silence settings in the same process.

use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};
use tracing::debug;

/// Options controlling how external commands are run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellOptions {
  /// When set, the command line is not echoed and stderr is only surfaced
  /// through tracing instead of being passed through to the terminal.
  pub silent: bool,
  /// When set, a non-zero exit status becomes an `Err` carrying the command
  /// line and captured stderr. When unset, the caller inspects
  /// [`CommandOutput::status`] itself.
  pub fatal: bool,
}

impl Default for ShellOptions {
  fn default() -> Self {
    Self { silent: true, fatal: true }
  }
}

/// Captured result of a finished command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
  /// Captured stdout, lossily decoded as UTF-8.
  pub stdout: String,
  /// Exit status code; `-1` if the process was terminated by a signal.
  pub status: i32,
}

impl CommandOutput {
  /// Whether the command exited with status zero.
  pub const fn success(&self) -> bool {
    self.status == 0
  }

  /// Stdout split into non-empty trimmed lines.
  pub fn lines(&self) -> Vec<&str> {
    self.stdout.lines().map(str::trim).filter(|l| !l.is_empty()).collect()
  }
}

/// Runs external commands with an explicit per-instance configuration.
#[derive(Debug, Clone, Copy)]
pub struct ProcessRunner {
  options: ShellOptions,
}

impl ProcessRunner {
  pub const fn new(options: ShellOptions) -> Self {
    Self { options }
  }

  /// Run `program` with `args` in the `cwd` directory, capturing stdout.
  ///
  /// # Errors
  ///
  /// Always fails if the program cannot be spawned. With
  /// [`ShellOptions::fatal`] set, a non-zero exit status is also an error;
  /// otherwise it is reported through [`CommandOutput::status`].
  pub fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<CommandOutput> {
    if !self.options.silent {
      eprintln!("> {} {}", program, args.join(" "));
    }
    debug!("running {} {:?} in {}", program, args, cwd.display());

    let output = Command::new(program)
      .args(args)
      .current_dir(cwd)
      .output()
      .with_context(|| format!("Failed to execute {program}"))?;

    let status = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr);

    if !stderr.is_empty() {
      if self.options.silent {
        debug!("{} stderr: {}", program, stderr.trim_end());
      } else {
        eprint!("{stderr}");
      }
    }

    if self.options.fatal && status != 0 {
      bail!(
        "{} {} exited with status {}: {}",
        program,
        args.join(" "),
        status,
        stderr.trim_end()
      );
    }

    Ok(CommandOutput { stdout, status })
  }
}
