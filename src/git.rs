//! # Git Module
//!
//! This module contains all git access for the yearlint tool. Structural
//! operations (work-tree discovery, status, HEAD diffs, staging and
//! committing) go through libgit2. History mining (first/last modification
//! dates, root commits) shells out to `git log` via [`ProcessRunner`],
//! because libgit2 has no equivalent of `--follow` or `--invert-grep`.

use std::cell::OnceCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use git2::{Delta, Repository, StatusOptions};

use crate::shell::{CommandOutput, ProcessRunner, ShellOptions};
use crate::verbose_log;

/// Discover the git work tree containing `path`, if any.
///
/// Returns the work-tree root directory, or `None` when `path` is not inside
/// a (non-bare) git repository.
pub fn discover_work_tree(path: &Path) -> Option<PathBuf> {
  let repo = Repository::discover(path).ok()?;
  repo.workdir().map(Path::to_path_buf)
}

/// Gets the list of files with uncommitted changes in the repository at
/// `root`.
///
/// Covers staged, unstaged and untracked files; deletions are not reported
/// since a deleted file has no header left to validate. Paths are relative
/// to the work-tree root.
///
/// # Errors
///
/// Returns an error if the repository cannot be opened or the status query
/// fails.
pub fn uncommitted_files(root: &Path) -> Result<Vec<PathBuf>> {
  let repo = Repository::open(root).with_context(|| format!("Failed to open git repository at {}", root.display()))?;

  let mut status_opts = StatusOptions::new();
  status_opts.include_untracked(true).recurse_untracked_dirs(true);

  let statuses = repo
    .statuses(Some(&mut status_opts))
    .with_context(|| "Failed to get git status")?;

  let mut seen = HashSet::new();
  let mut changed = Vec::new();

  for entry in statuses.iter() {
    if let Some(path) = entry.path() {
      let status = entry.status();

      if status.is_wt_modified()
        || status.is_wt_new()
        || status.is_wt_renamed()
        || status.is_index_modified()
        || status.is_index_new()
        || status.is_index_renamed()
      {
        verbose_log!("Uncommitted file: {}", path);
        let path = PathBuf::from(path);
        if seen.insert(path.clone()) {
          changed.push(path);
        }
      }
    }
  }

  Ok(changed)
}

/// Gets the list of files touched by the most recent commit.
///
/// Diffs `HEAD` against its first parent (or against the empty tree for a
/// root commit). Deleted files are skipped. Paths are relative to the
/// work-tree root.
///
/// # Errors
///
/// Returns an error if the repository cannot be opened, `HEAD` cannot be
/// resolved, or the diff fails.
pub fn last_commit_files(root: &Path) -> Result<Vec<PathBuf>> {
  let repo = Repository::open(root).with_context(|| format!("Failed to open git repository at {}", root.display()))?;

  let head_commit = repo
    .head()
    .with_context(|| "Failed to get HEAD reference")?
    .peel_to_commit()
    .with_context(|| "Failed to get HEAD commit")?;

  let head_tree = head_commit.tree().with_context(|| "Failed to get tree for HEAD commit")?;

  let parent_tree = if head_commit.parent_count() > 0 {
    let parent = head_commit.parent(0).with_context(|| "Failed to get parent of HEAD")?;
    Some(parent.tree().with_context(|| "Failed to get tree for parent commit")?)
  } else {
    None
  };

  let diff = repo
    .diff_tree_to_tree(parent_tree.as_ref(), Some(&head_tree), None)
    .with_context(|| "Failed to diff HEAD against its parent")?;

  let mut seen = HashSet::new();
  let mut changed = Vec::new();

  diff
    .foreach(
      &mut |delta, _| {
        if delta.status() != Delta::Deleted
          && let Some(new_file) = delta.new_file().path()
        {
          verbose_log!("File in last commit: {}", new_file.display());
          let path = new_file.to_path_buf();
          if seen.insert(path.clone()) {
            changed.push(path);
          }
        }
        true
      },
      None,
      None,
      None,
    )
    .with_context(|| "Failed to process diff")?;

  Ok(changed)
}

/// Stages the given work-tree-relative files and creates a single commit on
/// `HEAD` with the given message.
///
/// The author/committer signature comes from the repository configuration.
///
/// # Errors
///
/// Returns an error if staging or committing fails, or if the repository has
/// no usable signature configured.
pub fn commit_files(root: &Path, files: &[PathBuf], message: &str) -> Result<()> {
  let repo = Repository::open(root).with_context(|| format!("Failed to open git repository at {}", root.display()))?;

  let mut index = repo.index().with_context(|| "Failed to access git index")?;
  for file in files {
    index
      .add_path(file)
      .with_context(|| format!("Failed to stage {}", file.display()))?;
  }
  index.write().with_context(|| "Failed to write git index")?;

  let tree_id = index.write_tree().with_context(|| "Failed to write tree from index")?;
  let tree = repo.find_tree(tree_id).with_context(|| "Failed to find written tree")?;

  let signature = repo
    .signature()
    .with_context(|| "Failed to build a commit signature (configure user.name and user.email)")?;

  let head_commit = repo
    .head()
    .with_context(|| "Failed to get HEAD reference")?
    .peel_to_commit()
    .with_context(|| "Failed to get HEAD commit")?;

  repo
    .commit(Some("HEAD"), &signature, &signature, message, &tree, &[&head_commit])
    .with_context(|| "Failed to create commit")?;

  verbose_log!("Committed {} files: {}", files.len(), message);
  Ok(())
}

/// Read-only git history queries for a single repository, run as `git log`
/// subprocesses through an explicit [`ProcessRunner`] configuration.
///
/// Queries run non-fatally: a failing or empty query maps to `None` and the
/// caller decides on a fallback (the expectation deriver substitutes the
/// current year). Per-file date queries follow renames and exclude commits
/// whose message contains `exclude_message`, so auto-fix commits never
/// shift a file's observed modification window.
pub struct GitHistory {
  root: PathBuf,
  runner: ProcessRunner,
  exclude_message: Option<String>,
  root_commits: OnceCell<Vec<String>>,
}

impl GitHistory {
  pub fn new(root: &Path, options: ShellOptions, exclude_message: Option<String>) -> Self {
    Self {
      root: root.to_path_buf(),
      runner: ProcessRunner::new(options),
      exclude_message,
      root_commits: OnceCell::new(),
    }
  }

  fn run_git(&self, args: &[String]) -> Result<CommandOutput> {
    let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
    self.runner.run("git", &arg_refs, &self.root)
  }

  fn grep_exclude_args(&self) -> Vec<String> {
    match &self.exclude_message {
      Some(marker) => vec![
        format!("--grep={marker}"),
        "--invert-grep".to_string(),
        "--fixed-strings".to_string(),
      ],
      None => Vec::new(),
    }
  }

  /// Year of the first commit touching `file` (renames followed, auto-fix
  /// commits excluded), or `None` when the file has no history.
  pub fn first_modification_year(&self, file: &Path) -> Result<Option<i32>> {
    let mut args: Vec<String> = ["log", "--follow", "--format=%cd", "--date=format:%Y"]
      .map(String::from)
      .to_vec();
    args.extend(self.grep_exclude_args());
    args.push("--".to_string());
    args.push(file.to_string_lossy().into_owned());

    let output = self.run_git(&args)?;
    if !output.success() {
      return Ok(None);
    }
    // git log lists newest first; the oldest commit is the last line
    Ok(output.lines().last().and_then(|year| year.parse().ok()))
  }

  /// Year of the most recent commit touching `file`, or of the most recent
  /// commit in the repository when `file` is `None`.
  ///
  /// The per-file form excludes auto-fix commits; the repository-wide form
  /// does not, matching how the uniform last-commit end year has always been
  /// derived.
  pub fn last_modification_year(&self, file: Option<&Path>) -> Result<Option<i32>> {
    let mut args: Vec<String> = ["log", "-1", "--format=%cd", "--date=format:%Y"]
      .map(String::from)
      .to_vec();
    if let Some(file) = file {
      args.extend(self.grep_exclude_args());
      args.push("--".to_string());
      args.push(file.to_string_lossy().into_owned());
    }

    let output = self.run_git(&args)?;
    if !output.success() {
      return Ok(None);
    }
    Ok(output.lines().first().and_then(|year| year.parse().ok()))
  }

  /// Hash of the first commit touching `file` (renames followed), or `None`
  /// when the file has no history.
  pub fn first_commit(&self, file: &Path) -> Result<Option<String>> {
    let args: Vec<String> = vec![
      "log".to_string(),
      "--follow".to_string(),
      "--format=%H".to_string(),
      "--".to_string(),
      file.to_string_lossy().into_owned(),
    ];

    let output = self.run_git(&args)?;
    if !output.success() {
      return Ok(None);
    }
    Ok(output.lines().last().map(ToString::to_string))
  }

  /// Hashes of the repository's root commits (no parents), memoized for the
  /// lifetime of this instance. A repository normally has exactly one; more
  /// can exist after histories were merged.
  pub fn root_commits(&self) -> Result<&[String]> {
    if let Some(commits) = self.root_commits.get() {
      return Ok(commits);
    }

    let args: Vec<String> = ["rev-list", "--max-parents=0", "HEAD"].map(String::from).to_vec();
    let output = self.run_git(&args)?;
    let commits = if output.success() {
      output.lines().iter().map(ToString::to_string).collect()
    } else {
      Vec::new()
    };
    Ok(self.root_commits.get_or_init(|| commits))
  }

  /// Whether `file` entered the repository with its very first commit.
  ///
  /// Files whose header predates the git history are exempted from strict
  /// start-year severity when they trace back to the initial import; a file
  /// with no determinable first commit is not.
  pub fn is_initial_contribution(&self, file: &Path) -> Result<bool> {
    let Some(first) = self.first_commit(file)? else {
      return Ok(false);
    };
    Ok(self.root_commits()?.iter().any(|commit| *commit == first))
  }
}

impl crate::classify::Provenance for GitHistory {
  fn is_initial_contribution(&self, file: &Path) -> Result<bool> {
    GitHistory::is_initial_contribution(self, file)
  }
}
