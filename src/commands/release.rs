//! `cargo cut bump` and `cargo cut rc`

use chrono::Utc;

use crate::build::CommandBuild;
use crate::core::config::Environment;
use crate::core::error::CutResult;
use crate::publish::{GitHubClient, PullRequestApi};
use crate::release::{ReleaseOptions, ReleasePipeline};

/// Run one release pipeline from the current directory
pub fn run_release(options: ReleaseOptions, json: bool) -> CutResult<()> {
  let (git, config) = super::open_repository()?;
  let env = Environment::from_env();
  let build = CommandBuild::new(&config.build, git.work_tree())?;

  // Client only exists when publishing; credentials are checked again in preflight
  let client = match options.create_pull_request {
    true => {
      let (token, _) = env.credentials()?;
      Some(GitHubClient::new(env.api_url(&config), token, config.api_timeout())?)
    }
    false => None,
  };

  if !json {
    println!("🚀 cargo cut {} in {}", options.kind, git.work_tree().display());
    println!();
  }

  let pipeline = ReleasePipeline {
    root: git.work_tree(),
    config: &config,
    env: &env,
    tree: &git,
    build: &build,
    api: client.as_ref().map(|c| c as &dyn PullRequestApi),
  };
  let report = pipeline.run(options, Utc::now())?;

  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
  } else {
    report.print();
  }

  Ok(())
}
