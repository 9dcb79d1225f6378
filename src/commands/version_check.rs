//! `cargo cut version-check`
//!
//! Refuses to continue when the manifest version is not ahead of the newest
//! stable version already on the registry.

use serde::Deserialize;
use std::time::Duration;

use crate::core::error::{ApiError, CutError, CutResult, ValidationError};
use crate::manifest::PackageInfo;

#[derive(Deserialize)]
struct CrateResponse {
  #[serde(rename = "crate")]
  krate: CrateSummary,
}

#[derive(Deserialize)]
struct CrateSummary {
  max_stable_version: Option<String>,
}

pub fn run_version_check() -> CutResult<()> {
  let (git, config) = super::open_repository()?;
  let package = PackageInfo::load(&git.work_tree().join(&config.manifest))?;

  println!("🔍 Checking {} v{} against {}", package.name, package.version, config.registry_url);

  let remote = fetch_max_stable_version(&config.registry_url, &package.name, config.api_timeout())?;
  match remote {
    Some(remote) => {
      ensure_newer(&package.version, &remote)?;
      println!("✅ Local version {} is newer than published {}", package.version, remote);
    }
    None => println!("✅ No stable release of {} published yet", package.name),
  }

  Ok(())
}

/// Newest stable version the registry reports for `name`
pub fn fetch_max_stable_version(registry_url: &str, name: &str, timeout: Duration) -> CutResult<Option<String>> {
  let url = format!("{}/{}", registry_url.trim_end_matches('/'), name);
  tracing::debug!(%url, "GET registry crate");

  let client = reqwest::blocking::Client::builder()
    .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
    .timeout(timeout)
    .build()?;
  let response = client.get(&url).send()?;

  let status = response.status();
  if !status.is_success() {
    return Err(CutError::Api(ApiError::Registry {
      url,
      status: status.as_u16(),
    }));
  }

  let body = response.text()?;
  let parsed: CrateResponse = serde_json::from_str(&body).map_err(|e| {
    CutError::Api(ApiError::Transport {
      reason: format!("unexpected registry response from {}: {}", url, e),
    })
  })?;
  Ok(parsed.krate.max_stable_version)
}

/// `local` must be strictly greater than `remote`
pub fn ensure_newer(local: &str, remote: &str) -> CutResult<()> {
  let local_version = semver::Version::parse(local)?;
  let remote_version = semver::Version::parse(remote)?;

  if local_version <= remote_version {
    return Err(CutError::Validation(ValidationError::VersionNotNewer {
      local: local.to_string(),
      remote: remote.to_string(),
    }));
  }
  Ok(())
}
