use chrono::{DateTime, Utc};
use std::path::Path;

use super::ReleaseReport;
use crate::build::BuildStep;
use crate::core::config::{CutConfig, Environment};
use crate::core::error::{ConfigError, CutError, CutResult};
use crate::core::vcs::WorkingTree;
use crate::manifest::{ReleaseKind, VersionEdit, edit_manifest, read_manifest_version};
use crate::publish::{PublishTarget, PullRequestApi, ReleasePublisher, RemoteTarget};
use crate::utils::path_to_git_format;
use crate::verify::{ChangeSet, verify_change_set};

/// Per-run switches from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseOptions {
  pub kind: ReleaseKind,
  /// Push the branch and open a pull request after committing
  pub create_pull_request: bool,
  /// Suppress step output (used for `--json`)
  pub quiet: bool,
}

/// One release run over a repository and its collaborators
pub struct ReleasePipeline<'a> {
  pub root: &'a Path,
  pub config: &'a CutConfig,
  pub env: &'a Environment,
  pub tree: &'a dyn WorkingTree,
  pub build: &'a dyn BuildStep,
  pub api: Option<&'a dyn PullRequestApi>,
}

impl ReleasePipeline<'_> {
  pub fn run(&self, options: ReleaseOptions, now: DateTime<Utc>) -> CutResult<ReleaseReport> {
    let say = |line: String| {
      if !options.quiet {
        println!("{}", line);
      }
    };

    // Same spelling as `git status` so the change-set gate compares like with like
    let (manifest_rel, lockfile_rel) = self
      .config
      .repo_paths()
      .map_err(|reason| CutError::with_help(reason, "Fix `manifest`/`lockfile` in cut.toml."))?;
    let manifest_path = self.root.join(&manifest_rel);
    let manifest = path_to_git_format(&manifest_rel);
    let lockfile = path_to_git_format(&lockfile_rel);

    self.preflight(&manifest_path, options)?;

    // 1. Edit
    let edit = VersionEdit::for_kind(options.kind, now);
    let change = edit_manifest(&manifest_path, &edit)?;
    say(format!("📝 {}: {} -> {}", manifest, change.previous, change.version));

    // 2. Build
    say(format!("🔨 Running `{}`", self.build.describe()));
    self.build.run()?;

    // 3. Verify
    let pair = verify_change_set(self.tree, &manifest, &lockfile)?;
    say(format!("🔍 Only {} and {} changed, by the same line", manifest, lockfile));
    say(format!("   - {}", pair.removed));
    say(format!("   + {}", pair.added));

    // 4. Read back
    let version = read_manifest_version(&manifest_path)?;
    tracing::info!(%version, "version read back from manifest");

    // 5. Publish
    let author_email = self.env.actor_email();
    let remote = match options.create_pull_request {
      true => Some(RemoteTarget {
        remote: &self.config.remote,
        repository: self.env.credentials()?.1,
        base: self.env.base(self.config),
      }),
      false => None,
    };
    let target = PublishTarget {
      kind: options.kind,
      version: &version,
      paths: [&manifest, &lockfile],
      author_name: self.env.actor(),
      author_email: &author_email,
      remote,
    };

    let branch = options.kind.branch_name(&version);
    say(format!("🌿 Publishing on {}", branch));
    let mut publisher = ReleasePublisher::new(self.tree, self.api);
    let publish = publisher.publish(&target)?;
    tracing::info!(state = ?publisher.state(), "release published");

    Ok(ReleaseReport {
      kind: options.kind,
      previous_version: change.previous,
      version,
      changed_line: pair,
      publish,
    })
  }

  /// Preconditions checked before anything is written
  fn preflight(&self, manifest_path: &Path, options: ReleaseOptions) -> CutResult<()> {
    if !manifest_path.is_file() {
      return Err(CutError::Config(ConfigError::ManifestNotFound {
        path: manifest_path.to_path_buf(),
      }));
    }

    if options.create_pull_request {
      self.env.credentials()?;
      if self.api.is_none() {
        return Err(CutError::message("Pull request requested but no API client is configured"));
      }
    }

    let dirty = ChangeSet::parse_porcelain(&self.tree.status_porcelain()?);
    if !dirty.is_empty() {
      return Err(CutError::Config(ConfigError::DirtyWorkingTree { paths: dirty.paths() }));
    }

    Ok(())
  }
}
