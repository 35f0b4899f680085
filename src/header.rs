//! # Header Module
//!
//! Locates copyright header lines and extracts the year tokens they declare.
//!
//! The header pattern is configurable; the default matches
//! `Copyright (c) <year>` and `Copyright (C) <year>-<year>` style lines. Only
//! the first matching line of a bounded file prefix is examined, since
//! headers live at the top of a file.

use std::fmt;
use std::io::Read as _;
use std::ops::Range;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

use crate::config::ConfigError;

/// Maximum number of bytes to read when scanning for a header.
/// 8KB is sufficient for any realistic file preamble.
pub const HEADER_READ_LIMIT: usize = 8 * 1024;

/// Matches a single 4-digit year token.
static YEAR_TOKEN_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\d{4}").expect("year token regex must compile"));

/// Matches a year or year range token (`2019` or `2019-2023`).
static YEAR_RANGE_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\d{4}(-\d{4})?").expect("year range regex must compile"));

/// The year or year range a header declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclaredYears {
  /// First year token on the header line.
  pub start: i32,

  /// Second year token, if the header declares a range.
  pub end: Option<i32>,
}

impl fmt::Display for DeclaredYears {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.end {
      Some(end) => write!(f, "{}-{}", self.start, end),
      None => write!(f, "{}", self.start),
    }
  }
}

/// Outcome of scanning a file's prefix for a copyright header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderScan {
  /// No line matched the header pattern.
  Missing,

  /// A line matched but carried no 4-digit year token.
  NoYear,

  /// A line matched and declared these years.
  Years(DeclaredYears),
}

/// A compiled header pattern.
///
/// Wraps the user-configurable header regex and knows how to pull declared
/// years off the matched line.
#[derive(Debug, Clone)]
pub struct HeaderPattern {
  regex: Regex,
}

impl HeaderPattern {
  /// Compile a header pattern.
  ///
  /// # Errors
  ///
  /// Returns [`ConfigError::InvalidHeaderPattern`] if the regex does not
  /// compile.
  pub fn new(pattern: &str) -> Result<Self, ConfigError> {
    let regex = Regex::new(pattern).map_err(|e| ConfigError::InvalidHeaderPattern {
      pattern: pattern.to_string(),
      source: e,
    })?;

    Ok(Self { regex })
  }

  /// The source pattern this matcher was compiled from.
  pub fn as_str(&self) -> &str {
    self.regex.as_str()
  }

  /// Byte range of the first line matching the header pattern.
  ///
  /// The range covers the whole line containing the match start, without the
  /// trailing newline.
  pub fn header_line_span(&self, content: &str) -> Option<Range<usize>> {
    let m = self.regex.find(content)?;
    let line_start = content[..m.start()].rfind('\n').map_or(0, |i| i + 1);
    let line_end = content[m.start()..].find('\n').map_or(content.len(), |i| m.start() + i);
    Some(line_start..line_end)
  }

  /// Scan content for a header and extract its declared years.
  ///
  /// Year tokens are read off the matched line only: the first token is the
  /// start year, the second (if present) the end year, and any further
  /// tokens are ignored.
  pub fn scan(&self, content: &str) -> HeaderScan {
    let Some(span) = self.header_line_span(content) else {
      return HeaderScan::Missing;
    };

    let line = &content[span];
    let mut years = YEAR_TOKEN_REGEX
      .find_iter(line)
      .filter_map(|m| m.as_str().parse::<i32>().ok());

    match years.next() {
      Some(start) => HeaderScan::Years(DeclaredYears { start, end: years.next() }),
      None => HeaderScan::NoYear,
    }
  }

  /// Scan the prefix of a file on disk.
  ///
  /// Reads at most [`HEADER_READ_LIMIT`] bytes; invalid UTF-8 in the prefix
  /// is replaced rather than treated as an error.
  ///
  /// # Errors
  ///
  /// Fails only if the file cannot be opened or read.
  pub fn scan_file(&self, path: &Path) -> Result<HeaderScan> {
    let file = std::fs::File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;

    let mut buf = Vec::with_capacity(HEADER_READ_LIMIT);
    file
      .take(HEADER_READ_LIMIT as u64)
      .read_to_end(&mut buf)
      .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let content = String::from_utf8_lossy(&buf);
    Ok(self.scan(&content))
  }
}

/// Regex matching a header's year token (`2019` or `2019-2023`).
///
/// The fixer uses this to locate the substring it rewrites.
pub fn year_range_regex() -> &'static Regex {
  &YEAR_RANGE_REGEX
}
