//! # Classifier Module
//!
//! The decision procedures that turn a file's declared header years and its
//! derived expectation into a violation verdict.
//!
//! Two policies exist because the rules changed over the project's life:
//! [`FullRangePolicy`] validates both start and end year and keeps a warn
//! tier for headers whose only discrepancy is a start year predating the git
//! history, while [`EndYearOnlyPolicy`] is a binary end-year check. The
//! active policy is selected per run via [`PolicyKind`].

use std::fmt;
use std::path::Path;

use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::expect::ExpectedYears;
use crate::header::DeclaredYears;

/// What a validation found wrong with a file's header.
///
/// Exactly one kind applies per file. `None` is a first-class value so that
/// passing files flow through the same reporting path as failing ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Violation {
  /// The header is correct.
  None,

  /// No line matched the header pattern.
  NoOrMissingHeader,

  /// A header line matched but carried no year token.
  NoYear,

  /// A single-year header declares the wrong year.
  InvalidCopyrightYear,

  /// A range header declares the wrong period.
  IncorrectCopyrightPeriod,

  /// The end year is wrong (end-year-only policy).
  InvalidEndYear,
}

/// How severe a validation result is.
///
/// The ordering is used for display filtering: a threshold of `Warn` shows
/// everything at `Warn` or more severe, so `Error` sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  /// The header is wrong and should be fixed.
  #[default]
  Error,

  /// The header is suspicious but explainable.
  Warn,

  /// The header is correct.
  Ok,
}

impl fmt::Display for Severity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::Error => "error",
      Self::Warn => "warn",
      Self::Ok => "ok",
    };
    write!(f, "{name}")
  }
}

/// A violation kind paired with how severe it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
  pub violation: Violation,
  pub severity: Severity,
}

impl Classification {
  const OK: Self = Self {
    violation: Violation::None,
    severity: Severity::Ok,
  };

  const fn new(violation: Violation, severity: Severity) -> Self {
    Self { violation, severity }
  }
}

/// Answers whether a file was part of the repository's initial import.
///
/// The classifier only consults this for its corner cases, so
/// implementations may resolve the answer lazily per file.
pub trait Provenance {
  /// True when the file's first commit is one of the repository's root
  /// commits.
  ///
  /// # Errors
  ///
  /// Fails when the underlying history query cannot run.
  fn is_initial_contribution(&self, file: &Path) -> Result<bool>;
}

/// A header year validation strategy.
pub trait ClassifyPolicy {
  /// Classify a file's declared years against the derived expectation.
  ///
  /// # Errors
  ///
  /// Fails only when a corner case needs provenance and the query fails.
  fn classify(
    &self,
    file: &Path,
    declared: DeclaredYears,
    expected: ExpectedYears,
    provenance: &dyn Provenance,
  ) -> Result<Classification>;

  /// The corrected years a fix should write for this file.
  fn fixed_years(&self, declared: DeclaredYears, expected: ExpectedYears) -> DeclaredYears;
}

/// Which validation policy is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
  /// Validate both start and end year, with the initial-contribution warn
  /// tier.
  #[default]
  FullRange,

  /// Validate only the end year, as a binary pass/fail.
  EndYearOnly,
}

impl PolicyKind {
  /// The policy implementation for this kind.
  pub fn policy(self) -> &'static dyn ClassifyPolicy {
    match self {
      Self::FullRange => &FullRangePolicy,
      Self::EndYearOnly => &EndYearOnlyPolicy,
    }
  }
}

impl fmt::Display for PolicyKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::FullRange => "full-range",
      Self::EndYearOnly => "end-year-only",
    };
    write!(f, "{name}")
  }
}

/// Start and end year validation with the initial-contribution exception.
///
/// A repository's first commit frequently imports files whose header year
/// predates the git history itself. Such headers must not be flagged as
/// errors; files added later with the same stale shape get a warning.
pub struct FullRangePolicy;

impl FullRangePolicy {
  /// Decision procedure for files whose entire history is a single year.
  fn classify_single_year(
    file: &Path,
    declared: DeclaredYears,
    expected: ExpectedYears,
    provenance: &dyn Provenance,
  ) -> Result<Classification> {
    match declared.end {
      None if declared.start == expected.start => Ok(Classification::OK),
      None => Ok(Classification::new(Violation::InvalidCopyrightYear, Severity::Error)),
      Some(declared_end) if declared_end == expected.start && declared.start < expected.start => {
        if provenance.is_initial_contribution(file)? {
          Ok(Classification::OK)
        } else {
          Ok(Classification::new(Violation::InvalidCopyrightYear, Severity::Warn))
        }
      }
      Some(_) => Ok(Classification::new(Violation::InvalidCopyrightYear, Severity::Error)),
    }
  }

  /// Decision procedure when the expectation spans more than one year.
  fn classify_range(
    file: &Path,
    declared: DeclaredYears,
    expected: ExpectedYears,
    provenance: &dyn Provenance,
  ) -> Result<Classification> {
    let Some(declared_end) = declared.end else {
      return Ok(Classification::new(Violation::IncorrectCopyrightPeriod, Severity::Error));
    };

    if declared.start == expected.start && declared_end == expected.end {
      return Ok(Classification::OK);
    }

    if declared_end == expected.end && declared.start < expected.end {
      if provenance.is_initial_contribution(file)? {
        return Ok(Classification::OK);
      }
      return Ok(Classification::new(Violation::IncorrectCopyrightPeriod, Severity::Warn));
    }

    Ok(Classification::new(Violation::IncorrectCopyrightPeriod, Severity::Error))
  }
}

impl ClassifyPolicy for FullRangePolicy {
  fn classify(
    &self,
    file: &Path,
    declared: DeclaredYears,
    expected: ExpectedYears,
    provenance: &dyn Provenance,
  ) -> Result<Classification> {
    if expected.start == expected.end {
      Self::classify_single_year(file, declared, expected, provenance)
    } else {
      Self::classify_range(file, declared, expected, provenance)
    }
  }

  fn fixed_years(&self, declared: DeclaredYears, expected: ExpectedYears) -> DeclaredYears {
    // Never narrow a header to start later than it already claims.
    let start = declared.start.min(expected.start);

    if start == expected.end {
      DeclaredYears { start, end: None }
    } else {
      DeclaredYears {
        start,
        end: Some(expected.end),
      }
    }
  }
}

/// End-year-only binary validation.
///
/// Start year correctness and the warn tier are ignored by design; a header
/// passes when its effective end year (the declared end, or the single
/// declared year) equals the expectation.
pub struct EndYearOnlyPolicy;

impl ClassifyPolicy for EndYearOnlyPolicy {
  fn classify(
    &self,
    _file: &Path,
    declared: DeclaredYears,
    expected: ExpectedYears,
    _provenance: &dyn Provenance,
  ) -> Result<Classification> {
    let effective_end = declared.end.unwrap_or(declared.start);

    if effective_end == expected.end {
      Ok(Classification::OK)
    } else {
      Ok(Classification::new(Violation::InvalidEndYear, Severity::Error))
    }
  }

  fn fixed_years(&self, declared: DeclaredYears, expected: ExpectedYears) -> DeclaredYears {
    if declared.start < expected.end {
      DeclaredYears {
        start: declared.start,
        end: Some(expected.end),
      }
    } else {
      DeclaredYears {
        start: expected.end,
        end: None,
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  struct FixedProvenance(bool);

  impl Provenance for FixedProvenance {
    fn is_initial_contribution(&self, _file: &Path) -> Result<bool> {
      Ok(self.0)
    }
  }

  struct UnreachableProvenance;

  impl Provenance for UnreachableProvenance {
    fn is_initial_contribution(&self, _file: &Path) -> Result<bool> {
      panic!("provenance should not be queried for this case");
    }
  }

  struct FailingProvenance;

  impl Provenance for FailingProvenance {
    fn is_initial_contribution(&self, _file: &Path) -> Result<bool> {
      anyhow::bail!("history query failed");
    }
  }

  fn declared(start: i32, end: Option<i32>) -> DeclaredYears {
    DeclaredYears { start, end }
  }

  fn expected(start: i32, end: i32) -> ExpectedYears {
    ExpectedYears { start, end }
  }

  fn classify_full(d: DeclaredYears, e: ExpectedYears, provenance: &dyn Provenance) -> Classification {
    FullRangePolicy
      .classify(Path::new("src/a.ts"), d, e, provenance)
      .expect("classification should succeed")
  }

  fn classify_end_only(d: DeclaredYears, e: ExpectedYears) -> Classification {
    EndYearOnlyPolicy
      .classify(Path::new("src/a.ts"), d, e, &UnreachableProvenance)
      .expect("classification should succeed")
  }

  #[test]
  fn test_single_year_exact_match() {
    let result = classify_full(declared(2022, None), expected(2022, 2022), &UnreachableProvenance);
    assert_eq!(result, Classification::OK);
  }

  #[test]
  fn test_single_year_mismatch() {
    let result = classify_full(declared(2021, None), expected(2022, 2022), &UnreachableProvenance);
    assert_eq!(
      result,
      Classification::new(Violation::InvalidCopyrightYear, Severity::Error)
    );
  }

  #[test]
  fn test_single_year_stale_range_warns() {
    let result = classify_full(declared(2020, Some(2022)), expected(2022, 2022), &FixedProvenance(false));
    assert_eq!(
      result,
      Classification::new(Violation::InvalidCopyrightYear, Severity::Warn)
    );
  }

  #[test]
  fn test_single_year_stale_range_initial_contribution_passes() {
    let result = classify_full(declared(2020, Some(2022)), expected(2022, 2022), &FixedProvenance(true));
    assert_eq!(result, Classification::OK);
  }

  #[test]
  fn test_single_year_unexpected_range_is_error() {
    // End year declared but not matching the one expected year.
    let result = classify_full(declared(2022, Some(2023)), expected(2022, 2022), &UnreachableProvenance);
    assert_eq!(
      result,
      Classification::new(Violation::InvalidCopyrightYear, Severity::Error)
    );

    // "2022-2022" is still the wrong shape for a one-year history.
    let result = classify_full(declared(2022, Some(2022)), expected(2022, 2022), &UnreachableProvenance);
    assert_eq!(
      result,
      Classification::new(Violation::InvalidCopyrightYear, Severity::Error)
    );
  }

  #[test]
  fn test_range_exact_match() {
    let result = classify_full(declared(2020, Some(2023)), expected(2020, 2023), &UnreachableProvenance);
    assert_eq!(result, Classification::OK);
  }

  #[test]
  fn test_range_wrong_end_year() {
    let result = classify_full(declared(2020, Some(2022)), expected(2020, 2023), &UnreachableProvenance);
    assert_eq!(
      result,
      Classification::new(Violation::IncorrectCopyrightPeriod, Severity::Error)
    );
  }

  #[test]
  fn test_range_expected_but_single_declared() {
    let result = classify_full(declared(2020, None), expected(2020, 2023), &UnreachableProvenance);
    assert_eq!(
      result,
      Classification::new(Violation::IncorrectCopyrightPeriod, Severity::Error)
    );
  }

  #[test]
  fn test_range_early_start_warns() {
    let result = classify_full(declared(2019, Some(2023)), expected(2020, 2023), &FixedProvenance(false));
    assert_eq!(
      result,
      Classification::new(Violation::IncorrectCopyrightPeriod, Severity::Warn)
    );
  }

  #[test]
  fn test_range_early_start_initial_contribution_passes() {
    let result = classify_full(declared(2019, Some(2023)), expected(2020, 2023), &FixedProvenance(true));
    assert_eq!(result, Classification::OK);
  }

  #[test]
  fn test_range_late_start_with_matching_end_warns() {
    // Start inside the expected window still lands in the warn branch as
    // long as the end year matches.
    let result = classify_full(declared(2021, Some(2023)), expected(2020, 2023), &FixedProvenance(false));
    assert_eq!(
      result,
      Classification::new(Violation::IncorrectCopyrightPeriod, Severity::Warn)
    );
  }

  #[test]
  fn test_provenance_error_propagates() {
    let result = FullRangePolicy.classify(
      Path::new("src/a.ts"),
      declared(2019, Some(2023)),
      expected(2020, 2023),
      &FailingProvenance,
    );
    assert!(result.is_err());
  }

  #[test]
  fn test_end_year_only_matches() {
    let result = classify_end_only(declared(2020, Some(2023)), expected(2021, 2023));
    assert_eq!(result, Classification::OK);
  }

  #[test]
  fn test_end_year_only_single_year_counts_as_end() {
    let result = classify_end_only(declared(2023, None), expected(2020, 2023));
    assert_eq!(result, Classification::OK);
  }

  #[test]
  fn test_end_year_only_mismatch() {
    let result = classify_end_only(declared(2020, None), expected(2020, 2023));
    assert_eq!(result, Classification::new(Violation::InvalidEndYear, Severity::Error));
  }

  #[test]
  fn test_end_year_only_ignores_start_year() {
    let result = classify_end_only(declared(1999, Some(2023)), expected(2020, 2023));
    assert_eq!(result, Classification::OK);
  }

  #[test]
  fn test_full_range_fixed_years_keeps_earliest_start() {
    let fixed = FullRangePolicy.fixed_years(declared(2021, None), expected(2019, 2023));
    assert_eq!(fixed, declared(2019, Some(2023)));

    let fixed = FullRangePolicy.fixed_years(declared(2018, Some(2020)), expected(2019, 2023));
    assert_eq!(fixed, declared(2018, Some(2023)));
  }

  #[test]
  fn test_full_range_fixed_years_collapses_single_year() {
    let fixed = FullRangePolicy.fixed_years(declared(2024, None), expected(2023, 2023));
    assert_eq!(fixed, declared(2023, None));
  }

  #[test]
  fn test_end_year_only_fixed_years() {
    let fixed = EndYearOnlyPolicy.fixed_years(declared(2020, None), expected(2020, 2023));
    assert_eq!(fixed, declared(2020, Some(2023)));

    let fixed = EndYearOnlyPolicy.fixed_years(declared(2024, Some(2025)), expected(2020, 2023));
    assert_eq!(fixed, declared(2023, None));

    let fixed = EndYearOnlyPolicy.fixed_years(declared(2023, Some(2022)), expected(2020, 2023));
    assert_eq!(fixed, declared(2023, None));
  }

  #[test]
  fn test_severity_ordering() {
    assert!(Severity::Error < Severity::Warn);
    assert!(Severity::Warn < Severity::Ok);
  }

  #[test]
  fn test_violation_serializes_camel_case() {
    let as_json = |v: Violation| serde_json::to_value(v).expect("serialize violation");

    assert_eq!(as_json(Violation::None), "none");
    assert_eq!(as_json(Violation::NoOrMissingHeader), "noOrMissingHeader");
    assert_eq!(as_json(Violation::NoYear), "noYear");
    assert_eq!(as_json(Violation::InvalidCopyrightYear), "invalidCopyrightYear");
    assert_eq!(as_json(Violation::IncorrectCopyrightPeriod), "incorrectCopyrightPeriod");
    assert_eq!(as_json(Violation::InvalidEndYear), "invalidEndYear");
  }

  #[test]
  fn test_severity_serializes_lowercase() {
    assert_eq!(
      serde_json::to_value(Severity::Error).expect("serialize severity"),
      "error"
    );
    assert_eq!(serde_json::to_value(Severity::Ok).expect("serialize severity"), "ok");
  }

  #[test]
  fn test_policy_kind_display() {
    assert_eq!(PolicyKind::FullRange.to_string(), "full-range");
    assert_eq!(PolicyKind::EndYearOnly.to_string(), "end-year-only");
  }
}
