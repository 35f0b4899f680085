//! # yearlint
//!
//! A tool that validates the copyright year ranges in source file headers against git history.
//!
//! `yearlint` derives the expected years for every file from its first and last commits, classifies
//! each header against a validation policy, and reports violations with severities. Invalid years
//! can be rewritten in place and committed in a single auto-fix commit that later runs ignore when
//! reading history.
//!
//! ## Features
//!
//! * Validate the whole repository, only uncommitted changes, or only the last commit
//! * Expected years derived from git history, following renames
//! * Initial-contribution detection so files imported with the first commit keep their years
//! * Configurable header pattern, extension filter, and exclude globs
//! * Machine-readable `headerCheck.json` report
//! * Auto-fix mode that rewrites year tokens and commits the result
//!
//! ## Usage as a Library
//!
//! This crate can be used as a library in your Rust projects:
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use yearlint::classify::PolicyKind;
//! use yearlint::expect::ExpectationDeriver;
//! use yearlint::git::GitHistory;
//! use yearlint::header::{HeaderPattern, HeaderScan};
//! use yearlint::selector::CheckScope;
//! use yearlint::shell::ShellOptions;
//!
//! fn main() -> anyhow::Result<()> {
//!     let root = Path::new(".");
//!     let pattern = HeaderPattern::new(r"Copyright \([cC]\) \d{4}(-\d{4})?")?;
//!
//!     let history = GitHistory::new(root, ShellOptions { silent: true, fatal: false }, None);
//!     let deriver = ExpectationDeriver::new(&history, CheckScope::Full)?;
//!     let policy = PolicyKind::FullRange.policy();
//!
//!     let file = Path::new("src/index.ts");
//!     if let HeaderScan::Years(declared) = pattern.scan_file(&root.join(file))? {
//!         let expected = deriver.expected_years(file)?;
//!         let classification = policy.classify(file, declared, expected, &history)?;
//!         println!("{:?} ({:?})", classification.violation, classification.severity);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! * [`selector`] - Candidate file selection for the three check scopes
//! * [`expect`] - Expected year derivation from git history
//! * [`classify`] - Validation policies, violations, and severities
//! * [`fixer`] - Year token rewriting and the auto-fix commit
//!
//! [`selector`]: crate::selector
//! [`expect`]: crate::expect
//! [`classify`]: crate::classify
//! [`fixer`]: crate::fixer

// Re-export modules for public API
pub mod classify;
pub mod cli;
pub mod config;
pub mod expect;
pub mod fixer;
pub mod git;
pub mod header;
pub mod logging;
pub mod output;
pub mod report;
pub mod selector;
pub mod shell;
pub mod workspace;

// Re-export macros
// Note: We don't re-export the macros here since they're already defined in the logging module
// and would cause redefinition errors
