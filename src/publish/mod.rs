//! Release publishing: branch, commit, push, pull request
//!
//! Publishing is idempotent per branch. Re-running on a version that was
//! already published reuses the branch, finds nothing to commit, tolerates
//! the existing remote branch and the existing pull request, and succeeds.

pub mod github;

pub use github::{GitHubClient, PullRequest, PullRequestApi, PullRequestOutcome};

use serde::Serialize;

use crate::core::error::{CutError, CutResult};
use crate::core::vcs::{PushOutcome, WorkingTree};
use crate::manifest::ReleaseKind;

/// Publisher progress; each run moves strictly forward
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PublishState {
  Start,
  BranchReady,
  Committed,
  Pushed,
  PrRequested,
  Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchAction {
  Created,
  Reused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitOutcome {
  Committed,
  /// Staged tree already matches the branch (re-run)
  NothingToCommit,
}

/// Where and as whom a release is published
#[derive(Debug, Clone)]
pub struct PublishTarget<'a> {
  pub kind: ReleaseKind,
  pub version: &'a str,
  /// Root-relative git paths to stage
  pub paths: [&'a str; 2],
  pub author_name: &'a str,
  pub author_email: &'a str,
  /// Push and PR settings; `None` stops after the local commit
  pub remote: Option<RemoteTarget<'a>>,
}

#[derive(Debug, Clone)]
pub struct RemoteTarget<'a> {
  pub remote: &'a str,
  pub repository: &'a str,
  pub base: &'a str,
}

/// What publishing did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishReport {
  pub branch: String,
  pub branch_action: BranchAction,
  pub commit: CommitOutcome,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub push: Option<PushOutcome>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub pull_request: Option<PullRequestOutcome>,
}

/// Drives the branch -> commit -> push -> PR sequence
pub struct ReleasePublisher<'a> {
  tree: &'a dyn WorkingTree,
  api: Option<&'a dyn PullRequestApi>,
  state: PublishState,
}

impl<'a> ReleasePublisher<'a> {
  pub fn new(tree: &'a dyn WorkingTree, api: Option<&'a dyn PullRequestApi>) -> Self {
    Self {
      tree,
      api,
      state: PublishState::Start,
    }
  }

  pub fn state(&self) -> PublishState {
    self.state
  }

  fn advance(&mut self, next: PublishState) {
    debug_assert!(next > self.state, "publish state must move forward");
    tracing::debug!(from = ?self.state, to = ?next, "publish state");
    self.state = next;
  }

  pub fn publish(&mut self, target: &PublishTarget<'_>) -> CutResult<PublishReport> {
    let branch = target.kind.branch_name(target.version);

    // Staged first: an existing branch holding the same edit only checks out
    // cleanly when the index already matches it
    self.tree.stage(&target.paths)?;
    let branch_action = self.prepare_branch(&branch)?;
    self.advance(PublishState::BranchReady);

    let commit = self.commit(target)?;
    self.advance(PublishState::Committed);

    let mut report = PublishReport {
      branch,
      branch_action,
      commit,
      push: None,
      pull_request: None,
    };

    let Some(remote) = &target.remote else {
      self.advance(PublishState::Done);
      return Ok(report);
    };

    let push = self.tree.push(remote.remote, &report.branch)?;
    if push == PushOutcome::RemoteAlreadyHasBranch {
      tracing::warn!(branch = %report.branch, "remote branch already exists with other history; leaving it as is");
    }
    report.push = Some(push);
    self.advance(PublishState::Pushed);

    let api = self
      .api
      .ok_or_else(|| CutError::message("Pull request requested but no API client is configured"))?;
    let request = PullRequest {
      title: target.kind.pull_request_title(target.version),
      head: report.branch.clone(),
      base: remote.base.to_string(),
      body: target.kind.pull_request_body(target.version),
    };
    let outcome = api.create_pull_request(remote.repository, &request)?;
    if outcome == PullRequestOutcome::AlreadyExists {
      tracing::warn!(head = %request.head, "pull request already exists");
    }
    report.pull_request = Some(outcome);
    self.advance(PublishState::PrRequested);

    self.advance(PublishState::Done);
    Ok(report)
  }

  fn prepare_branch(&self, branch: &str) -> CutResult<BranchAction> {
    if self.tree.branch_exists(branch)? {
      self.tree.checkout_branch(branch)?;
      Ok(BranchAction::Reused)
    } else {
      self.tree.create_and_checkout_branch(branch)?;
      Ok(BranchAction::Created)
    }
  }

  fn commit(&self, target: &PublishTarget<'_>) -> CutResult<CommitOutcome> {
    self.tree.set_identity(target.author_name, target.author_email)?;

    if !self.tree.has_staged_changes()? {
      tracing::info!("nothing staged, skipping commit");
      return Ok(CommitOutcome::NothingToCommit);
    }

    self.tree.commit(&target.kind.commit_message(target.version))?;
    Ok(CommitOutcome::Committed)
  }
}
