mod common;

use std::fs;
use std::path::Path;

use anyhow::Result;
use chrono::{Datelike, Local};
use common::{git_commit_dated, init_git_repo, is_git_available, run_git, write_and_commit_dated};
use tempfile::tempdir;
use yearlint::expect::ExpectationDeriver;
use yearlint::git::GitHistory;
use yearlint::selector::CheckScope;
use yearlint::shell::ShellOptions;

const FIX_MARKER: &str = "Fix copyright header violations";

fn history(root: &Path, exclude: Option<&str>) -> GitHistory {
  GitHistory::new(
    root,
    ShellOptions { silent: true, fatal: false },
    exclude.map(ToString::to_string),
  )
}

#[test]
fn test_modification_years_from_dated_commits() -> Result<()> {
  if !is_git_available() {
    println!("Skipping git test because git command is not available");
    return Ok(());
  }

  let temp_dir = tempdir()?;
  init_git_repo(temp_dir.path())?;

  write_and_commit_dated(temp_dir.path(), "a.ts", "one\n", "Add a", "2020-06-15 12:00:00 +0000")?;
  write_and_commit_dated(temp_dir.path(), "a.ts", "two\n", "Update a", "2022-06-15 12:00:00 +0000")?;

  let history = history(temp_dir.path(), None);

  assert_eq!(history.first_modification_year(Path::new("a.ts"))?, Some(2020));
  assert_eq!(history.last_modification_year(Some(Path::new("a.ts")))?, Some(2022));
  assert_eq!(history.last_modification_year(None)?, Some(2022));

  Ok(())
}

#[test]
fn test_first_modification_year_follows_renames() -> Result<()> {
  if !is_git_available() {
    println!("Skipping git test because git command is not available");
    return Ok(());
  }

  let temp_dir = tempdir()?;
  init_git_repo(temp_dir.path())?;

  write_and_commit_dated(temp_dir.path(), "old.ts", "content\n", "Add old", "2019-06-15 12:00:00 +0000")?;
  run_git(temp_dir.path(), &["mv", "old.ts", "new.ts"])?;
  git_commit_dated(temp_dir.path(), "Rename old to new", "2021-06-15 12:00:00 +0000")?;

  let history = history(temp_dir.path(), None);

  assert_eq!(history.first_modification_year(Path::new("new.ts"))?, Some(2019));

  Ok(())
}

#[test]
fn test_file_without_history_has_no_years() -> Result<()> {
  if !is_git_available() {
    println!("Skipping git test because git command is not available");
    return Ok(());
  }

  let temp_dir = tempdir()?;
  init_git_repo(temp_dir.path())?;
  write_and_commit_dated(temp_dir.path(), "a.ts", "one\n", "Add a", "2020-06-15 12:00:00 +0000")?;

  // Present on disk, never committed
  fs::write(temp_dir.path().join("untracked.ts"), "new\n")?;

  let history = history(temp_dir.path(), None);

  assert_eq!(history.first_modification_year(Path::new("untracked.ts"))?, None);
  assert_eq!(history.last_modification_year(Some(Path::new("untracked.ts")))?, None);

  Ok(())
}

#[test]
fn test_fix_commits_are_excluded_from_per_file_queries() -> Result<()> {
  if !is_git_available() {
    println!("Skipping git test because git command is not available");
    return Ok(());
  }

  let temp_dir = tempdir()?;
  init_git_repo(temp_dir.path())?;

  write_and_commit_dated(temp_dir.path(), "a.ts", "one\n", "Add a", "2020-06-15 12:00:00 +0000")?;
  write_and_commit_dated(temp_dir.path(), "a.ts", "two\n", FIX_MARKER, "2023-06-15 12:00:00 +0000")?;

  let excluding = history(temp_dir.path(), Some(FIX_MARKER));
  let plain = history(temp_dir.path(), None);

  // Per-file queries skip the fix commit; without the marker they see it.
  assert_eq!(excluding.last_modification_year(Some(Path::new("a.ts")))?, Some(2020));
  assert_eq!(plain.last_modification_year(Some(Path::new("a.ts")))?, Some(2023));

  // The repository-wide query never excludes.
  assert_eq!(excluding.last_modification_year(None)?, Some(2023));

  Ok(())
}

#[test]
fn test_initial_contribution_detection() -> Result<()> {
  if !is_git_available() {
    println!("Skipping git test because git command is not available");
    return Ok(());
  }

  let temp_dir = tempdir()?;
  init_git_repo(temp_dir.path())?;

  write_and_commit_dated(temp_dir.path(), "first.ts", "one\n", "Initial commit", "2018-06-15 12:00:00 +0000")?;
  write_and_commit_dated(temp_dir.path(), "later.ts", "two\n", "Add later", "2020-06-15 12:00:00 +0000")?;

  let history = history(temp_dir.path(), None);

  assert!(history.is_initial_contribution(Path::new("first.ts"))?);
  assert!(!history.is_initial_contribution(Path::new("later.ts"))?);
  assert!(!history.is_initial_contribution(Path::new("never-committed.ts"))?);

  Ok(())
}

#[test]
fn test_deriver_full_scope_uses_per_file_window() -> Result<()> {
  if !is_git_available() {
    println!("Skipping git test because git command is not available");
    return Ok(());
  }

  let temp_dir = tempdir()?;
  init_git_repo(temp_dir.path())?;

  write_and_commit_dated(temp_dir.path(), "a.ts", "one\n", "Add a", "2020-06-15 12:00:00 +0000")?;
  write_and_commit_dated(temp_dir.path(), "a.ts", "two\n", "Update a", "2022-06-15 12:00:00 +0000")?;

  let history = history(temp_dir.path(), None);
  let deriver = ExpectationDeriver::new(&history, CheckScope::Full)?;

  let expected = deriver.expected_years(Path::new("a.ts"))?;
  assert_eq!(expected.start, 2020);
  assert_eq!(expected.end, 2022);

  Ok(())
}

#[test]
fn test_deriver_changes_scope_ends_at_current_year() -> Result<()> {
  if !is_git_available() {
    println!("Skipping git test because git command is not available");
    return Ok(());
  }

  let temp_dir = tempdir()?;
  init_git_repo(temp_dir.path())?;

  write_and_commit_dated(temp_dir.path(), "a.ts", "one\n", "Add a", "2020-06-15 12:00:00 +0000")?;

  let history = history(temp_dir.path(), None);
  let deriver = ExpectationDeriver::new(&history, CheckScope::Changes)?;

  let expected = deriver.expected_years(Path::new("a.ts"))?;
  assert_eq!(expected.start, 2020);
  assert_eq!(expected.end, Local::now().year());

  Ok(())
}

#[test]
fn test_deriver_last_commit_scope_is_uniform() -> Result<()> {
  if !is_git_available() {
    println!("Skipping git test because git command is not available");
    return Ok(());
  }

  let temp_dir = tempdir()?;
  init_git_repo(temp_dir.path())?;

  write_and_commit_dated(temp_dir.path(), "a.ts", "one\n", "Add a", "2020-06-15 12:00:00 +0000")?;
  write_and_commit_dated(temp_dir.path(), "b.ts", "two\n", "Add b", "2022-06-15 12:00:00 +0000")?;

  let history = history(temp_dir.path(), None);
  let deriver = ExpectationDeriver::new(&history, CheckScope::LastCommit)?;

  // Both files share the repository's last commit year as their end year.
  let a = deriver.expected_years(Path::new("a.ts"))?;
  let b = deriver.expected_years(Path::new("b.ts"))?;
  assert_eq!(a.start, 2020);
  assert_eq!(a.end, 2022);
  assert_eq!(b.start, 2022);
  assert_eq!(b.end, 2022);

  Ok(())
}

#[test]
fn test_deriver_falls_back_to_current_year_without_history() -> Result<()> {
  if !is_git_available() {
    println!("Skipping git test because git command is not available");
    return Ok(());
  }

  let temp_dir = tempdir()?;
  init_git_repo(temp_dir.path())?;
  write_and_commit_dated(temp_dir.path(), "a.ts", "one\n", "Add a", "2020-06-15 12:00:00 +0000")?;

  fs::write(temp_dir.path().join("untracked.ts"), "new\n")?;

  let history = history(temp_dir.path(), None);
  let deriver = ExpectationDeriver::new(&history, CheckScope::Full)?;

  let current_year = Local::now().year();
  let expected = deriver.expected_years(Path::new("untracked.ts"))?;
  assert_eq!(expected.start, current_year);
  assert_eq!(expected.end, current_year);

  Ok(())
}
