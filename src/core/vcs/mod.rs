pub mod system_git;
mod system_git_ops;

pub use system_git::SystemGit;

use crate::core::error::CutResult;
use serde::Serialize;

/// Result of pushing the release branch
///
/// `UpToDate` and `RemoteAlreadyHasBranch` are the tolerated re-run cases;
/// every other rejection (authentication, missing remote, hooks) is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PushOutcome {
  /// New commits were sent
  Pushed,
  /// Remote branch already points at our commit
  UpToDate,
  /// Remote branch exists with history we don't have
  RemoteAlreadyHasBranch,
}

/// Working-tree operations the release pipeline needs from version control
///
/// Status and diff output are returned raw so the verifier can parse them
/// without touching git.
pub trait WorkingTree {
  /// `git status --porcelain` output
  fn status_porcelain(&self) -> CutResult<String>;

  /// `git diff --unified=0` output for one path against the index
  fn diff_unified_zero(&self, path: &str) -> CutResult<String>;

  /// Configure commit author name and email for this repository
  fn set_identity(&self, name: &str, email: &str) -> CutResult<()>;

  fn branch_exists(&self, branch: &str) -> CutResult<bool>;

  fn checkout_branch(&self, branch: &str) -> CutResult<()>;

  fn create_and_checkout_branch(&self, branch: &str) -> CutResult<()>;

  /// Stage exactly these paths
  fn stage(&self, paths: &[&str]) -> CutResult<()>;

  /// Whether the index differs from HEAD
  fn has_staged_changes(&self) -> CutResult<bool>;

  fn commit(&self, message: &str) -> CutResult<()>;

  /// Push with upstream tracking
  fn push(&self, remote: &str, branch: &str) -> CutResult<PushOutcome>;
}
