//! Reads the package version back from the manifest text

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use super::sections::{SectionTracker, lines};
use crate::core::error::{CutResult, ManifestError, ResultExt};

static VERSION_VALUE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r#"^\s*version\s*=\s*"([^"]+)""#).expect("Invalid regex pattern for version value"));

/// First quoted `version` value inside `[package]`
pub fn read_version(doc: &str) -> Result<String, ManifestError> {
  let mut tracker = SectionTracker::package();

  for line in lines(doc) {
    if tracker.observe(line.body)
      && let Some(caps) = VERSION_VALUE.captures(line.body)
    {
      return Ok(caps[1].to_string());
    }
  }

  if tracker.seen() {
    Err(ManifestError::VersionNotFound)
  } else {
    Err(ManifestError::PackageSectionNotFound)
  }
}

/// Read the version from the manifest on disk
pub fn read_manifest_version(path: &Path) -> CutResult<String> {
  let content =
    std::fs::read_to_string(path).with_context(|| format!("Failed to read manifest {}", path.display()))?;
  let version = read_version(&content).with_context(|| format!("While reading {}", path.display()))?;
  Ok(version)
}
