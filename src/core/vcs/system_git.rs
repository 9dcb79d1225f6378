//! System git backend - shells out to the `git` binary
//!
//! Every call runs in an isolated environment against the repository's
//! top-level directory, so paths handed to git are always root-relative.

use crate::core::error::{CutError, CutResult, GitError, ResultExt};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Git backend using system git (zero crate dependencies)
pub struct SystemGit {
  /// Working tree root
  pub(crate) work_tree: PathBuf,
}

impl SystemGit {
  /// Open the git repository containing `path`
  ///
  /// This performs ONE subprocess call to find the top-level directory.
  pub fn open(path: &Path) -> CutResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(CutError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(CutError::message(format!("Failed to open git repository: {}", stderr)));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let work_tree = PathBuf::from(stdout.trim());
    tracing::debug!(work_tree = %work_tree.display(), "opened repository");

    Ok(Self { work_tree })
  }

  /// Working tree root
  pub fn work_tree(&self) -> &Path {
    &self.work_tree
  }

  /// Run git and return trimmed-right stdout, failing on a non-zero exit
  pub(crate) fn run(&self, args: &[&str]) -> CutResult<String> {
    let output = self.output(args)?;

    if !output.status.success() {
      return Err(command_failed(args, &output));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
  }

  /// Run git and hand back the raw output, whatever the exit status
  pub(crate) fn output(&self, args: &[&str]) -> CutResult<Output> {
    tracing::debug!(command = %format!("git {}", args.join(" ")), "running git");
    self
      .git_cmd()
      .args(args)
      .output()
      .with_context(|| format!("Failed to execute git {}", args.first().copied().unwrap_or_default()))
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to the repository root
  /// - Clears environment variables
  /// - Whitelists only PATH, HOME and the SSH agent socket
  /// - Adds safe configuration overrides
  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.work_tree);

    // Isolated environment (don't trust global config)
    cmd.env_clear();
    for key in ["PATH", "HOME", "SSH_AUTH_SOCK"] {
      if let Ok(value) = std::env::var(key) {
        cmd.env(key, value);
      }
    }

    // Force safe behavior (override user config)
    cmd.arg("-c").arg("advice.detachedHead=false");
    cmd.arg("-c").arg("core.quotePath=false"); // Don't escape non-ASCII
    cmd.arg("-c").arg("color.ui=false");
    cmd.arg("-c").arg("diff.noprefix=false");

    cmd
  }
}

pub(crate) fn command_failed(args: &[&str], output: &Output) -> CutError {
  CutError::Git(GitError::CommandFailed {
    command: format!("git {}", args.join(" ")),
    stderr: String::from_utf8_lossy(&output.stderr).to_string(),
  })
}
