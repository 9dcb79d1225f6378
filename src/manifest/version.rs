//! Version identifiers and the two ways a release derives a new one

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::core::error::ManifestError;

/// Numeric `major.minor.patch` core of a package version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionTriple {
  pub major: u64,
  pub minor: u64,
  pub patch: u64,
}

impl VersionTriple {
  pub fn new(major: u64, minor: u64, patch: u64) -> Self {
    Self { major, minor, patch }
  }

  /// Parse the leading triple of a version, ignoring any `-`/`+` suffix
  pub fn parse(version: &str) -> Result<Self, ManifestError> {
    let core = version.split(['-', '+']).next().unwrap_or_default();
    let out_of_range = || ManifestError::VersionOutOfRange {
      version: version.to_string(),
    };

    let mut parts = core.split('.');
    let mut component = || -> Result<u64, ManifestError> {
      let digits = parts.next().ok_or(ManifestError::VersionNotFound)?;
      if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ManifestError::VersionNotFound);
      }
      digits.parse().map_err(|_| out_of_range())
    };

    let triple = Self::new(component()?, component()?, component()?);
    if parts.next().is_some() {
      return Err(ManifestError::VersionNotFound);
    }
    Ok(triple)
  }

  /// Next patch release, checked against overflow
  pub fn bump_patch(self) -> Option<Self> {
    Some(Self {
      patch: self.patch.checked_add(1)?,
      ..self
    })
  }
}

impl fmt::Display for VersionTriple {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
  }
}

/// Which release a run cuts; names the branch, commit and PR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseKind {
  /// Patch bump (`X.Y.Z` -> `X.Y.Z+1`)
  Bump,
  /// Release candidate (`X.Y.Z` -> `X.Y.Z-rc.<timestamp>`)
  Rc,
}

impl ReleaseKind {
  pub fn as_str(self) -> &'static str {
    match self {
      ReleaseKind::Bump => "bump",
      ReleaseKind::Rc => "rc",
    }
  }

  /// `chore/<kind>-v<version>`
  pub fn branch_name(self, version: &str) -> String {
    format!("chore/{}-v{}", self.as_str(), version)
  }

  pub fn commit_message(self, version: &str) -> String {
    format!("{}: Cargo to v{}", self.as_str(), version)
  }

  pub fn pull_request_title(self, version: &str) -> String {
    format!("v{}", version)
  }

  pub fn pull_request_body(self, version: &str) -> String {
    let what = match self {
      ReleaseKind::Bump => "patch",
      ReleaseKind::Rc => "rc",
    };
    format!("Automated {} bump to v{}.", what, version)
  }
}

impl fmt::Display for ReleaseKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// How the editor rewrites the version it finds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionEdit {
  /// Increment patch, drop any suffix
  Patch,
  /// Keep the triple, append `-rc.<stamp>`
  ReleaseCandidate { stamp: String },
}

impl VersionEdit {
  /// Edit for a release kind; rc stamps are taken from `now`
  pub fn for_kind(kind: ReleaseKind, now: DateTime<Utc>) -> Self {
    match kind {
      ReleaseKind::Bump => VersionEdit::Patch,
      ReleaseKind::Rc => VersionEdit::ReleaseCandidate { stamp: rc_stamp(now) },
    }
  }

  /// New version text for an existing triple
  pub fn apply(&self, current: VersionTriple) -> Result<String, ManifestError> {
    match self {
      VersionEdit::Patch => current
        .bump_patch()
        .map(|next| next.to_string())
        .ok_or_else(|| ManifestError::VersionOutOfRange {
          version: current.to_string(),
        }),
      VersionEdit::ReleaseCandidate { stamp } => Ok(format!("{}-rc.{}", current, stamp)),
    }
  }
}

/// UTC timestamp at second precision, `YYYYMMDDHHMMSS`
pub fn rc_stamp(now: DateTime<Utc>) -> String {
  now.format("%Y%m%d%H%M%S").to_string()
}
