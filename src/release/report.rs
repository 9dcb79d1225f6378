use serde::Serialize;

use crate::core::vcs::PushOutcome;
use crate::manifest::ReleaseKind;
use crate::publish::{BranchAction, CommitOutcome, PublishReport, PullRequestOutcome};
use crate::verify::LinePair;

/// Everything a release run did, for humans and `--json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseReport {
  pub kind: ReleaseKind,
  pub previous_version: String,
  pub version: String,
  pub changed_line: LinePair,
  #[serde(flatten)]
  pub publish: PublishReport,
}

impl ReleaseReport {
  /// Print a human summary in the style of the step output
  pub fn print(&self) {
    println!();
    println!("✅ Release {} v{} prepared", self.kind, self.version);
    println!("   Version: {} -> {}", self.previous_version, self.version);
    println!(
      "   Branch:  {} ({})",
      self.publish.branch,
      match self.publish.branch_action {
        BranchAction::Created => "created",
        BranchAction::Reused => "reused",
      }
    );
    println!(
      "   Commit:  {}",
      match self.publish.commit {
        CommitOutcome::Committed => "committed",
        CommitOutcome::NothingToCommit => "nothing to commit",
      }
    );

    match self.publish.push {
      Some(PushOutcome::Pushed) => println!("   Push:    pushed"),
      Some(PushOutcome::UpToDate) => println!("   Push:    already up to date"),
      Some(PushOutcome::RemoteAlreadyHasBranch) => println!("   Push:    remote branch already exists, left untouched"),
      None => {}
    }

    match &self.publish.pull_request {
      Some(PullRequestOutcome::Created { url: Some(url), .. }) => println!("   PR:      opened {}", url),
      Some(PullRequestOutcome::Created { number: Some(n), .. }) => println!("   PR:      opened #{}", n),
      Some(PullRequestOutcome::Created { .. }) => println!("   PR:      opened"),
      Some(PullRequestOutcome::AlreadyExists) => println!("   PR:      already exists"),
      None => {
        println!();
        println!("Next steps (local run, nothing pushed):");
        println!("  git push --set-upstream origin {}", self.publish.branch);
      }
    }
  }
}
