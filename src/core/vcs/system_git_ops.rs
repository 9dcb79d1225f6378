//! WorkingTree operations for SystemGit (status, diff, branches, push)

use super::system_git::{SystemGit, command_failed};
use super::{PushOutcome, WorkingTree};
use crate::core::error::{CutError, CutResult, GitError};

impl WorkingTree for SystemGit {
  fn status_porcelain(&self) -> CutResult<String> {
    self.run(&["status", "--porcelain"])
  }

  fn diff_unified_zero(&self, path: &str) -> CutResult<String> {
    self.run(&["diff", "--unified=0", "--", path])
  }

  fn set_identity(&self, name: &str, email: &str) -> CutResult<()> {
    self.run(&["config", "user.name", name])?;
    self.run(&["config", "user.email", email])?;
    Ok(())
  }

  fn branch_exists(&self, branch: &str) -> CutResult<bool> {
    let reference = format!("refs/heads/{}", branch);
    let output = self.output(&["rev-parse", "--verify", "--quiet", &reference])?;
    Ok(output.status.success())
  }

  fn checkout_branch(&self, branch: &str) -> CutResult<()> {
    self.run(&["checkout", branch])?;
    Ok(())
  }

  fn create_and_checkout_branch(&self, branch: &str) -> CutResult<()> {
    self.run(&["checkout", "-b", branch])?;
    Ok(())
  }

  fn stage(&self, paths: &[&str]) -> CutResult<()> {
    let mut args = vec!["add", "--"];
    args.extend_from_slice(paths);
    self.run(&args)?;
    Ok(())
  }

  fn has_staged_changes(&self) -> CutResult<bool> {
    let args = ["diff", "--cached", "--quiet"];
    let output = self.output(&args)?;
    match output.status.code() {
      Some(0) => Ok(false),
      Some(1) => Ok(true),
      _ => Err(command_failed(&args, &output)),
    }
  }

  fn commit(&self, message: &str) -> CutResult<()> {
    self.run(&["commit", "-m", message])?;
    Ok(())
  }

  fn push(&self, remote: &str, branch: &str) -> CutResult<PushOutcome> {
    let output = self.output(&["push", "--set-upstream", remote, branch])?;
    let stderr = String::from_utf8_lossy(&output.stderr);

    classify_push(output.status.success(), &stderr).map_err(|reason| {
      CutError::Git(GitError::PushFailed {
        remote: remote.to_string(),
        branch: branch.to_string(),
        reason,
      })
    })
  }
}

impl SystemGit {
  /// `(sha, author email)` for every commit reachable from HEAD
  ///
  /// An unborn branch yields an empty list rather than an error.
  pub fn author_emails(&self) -> CutResult<Vec<(String, String)>> {
    let args = ["log", "--pretty=format:%H %ae"];
    let output = self.output(&args)?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("does not have any commits") {
        return Ok(vec![]);
      }
      return Err(command_failed(&args, &output));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(
      stdout
        .lines()
        .filter_map(|line| line.split_once(' '))
        .map(|(sha, email)| (sha.to_string(), email.trim().to_string()))
        .collect(),
    )
  }
}

/// Decide whether a push result is acceptable
///
/// A rejected non-fast-forward means the branch already exists remotely from
/// an earlier run. Anything else that failed is returned as the reason.
pub(crate) fn classify_push(success: bool, stderr: &str) -> Result<PushOutcome, String> {
  if success {
    if stderr.contains("Everything up-to-date") {
      return Ok(PushOutcome::UpToDate);
    }
    return Ok(PushOutcome::Pushed);
  }

  let rejected = stderr.contains("[rejected]");
  let diverged = stderr.contains("non-fast-forward") || stderr.contains("fetch first");
  if rejected && diverged {
    return Ok(PushOutcome::RemoteAlreadyHasBranch);
  }

  Err(stderr.trim().to_string())
}
