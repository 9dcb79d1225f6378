//! CLI commands for cargo-cut
//!
//! ## Release pipeline
//! - **bump**: patch release (`X.Y.Z` -> `X.Y.Z+1`)
//! - **rc**: release candidate (`X.Y.Z` -> `X.Y.Z-rc.<stamp>`)
//!
//! ## Inspection & checks
//! - **show**: print the manifest's package version
//! - **version-check**: compare the local version with the registry
//! - **email-check**: reject commits authored with a test email domain
//!
//! Each command opens the repository from the current directory and loads
//! `cut.toml` from its root.

pub mod email_check;
pub mod release;
pub mod show;
pub mod version_check;

pub use email_check::run_email_check;
pub use release::run_release;
pub use show::run_show;
pub use version_check::run_version_check;

use crate::core::config::CutConfig;
use crate::core::error::CutResult;
use crate::core::vcs::SystemGit;
use std::env;

/// Repository at the current directory plus its configuration
pub(crate) fn open_repository() -> CutResult<(SystemGit, CutConfig)> {
  let cwd = env::current_dir()?;
  let git = SystemGit::open(&cwd)?;
  let config = CutConfig::load(git.work_tree())?;
  tracing::debug!(root = %git.work_tree().display(), ?config, "repository opened");
  Ok((git, config))
}
