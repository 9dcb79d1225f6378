//! Manifest editing and reading
//!
//! Both directions scan line by line with a shared [`sections::SectionTracker`] rather
//! than round-tripping through a TOML document, so an edit can only ever
//! change the bytes of the version line itself.

pub mod editor;
pub mod reader;
pub mod sections;
pub mod version;

pub use editor::edit_manifest;
pub use reader::read_manifest_version;
pub use version::{ReleaseKind, VersionEdit};

use crate::core::error::{CutResult, ManifestError, ResultExt};
use std::path::Path;

/// Name and version of the package, as a TOML parser sees them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
  pub name: String,
  pub version: String,
}

impl PackageInfo {
  /// Parse `[package]` with toml_edit (used where full TOML semantics matter)
  pub fn parse(doc: &str) -> CutResult<Self> {
    let doc: toml_edit::DocumentMut = doc.parse()?;
    let package = doc
      .get("package")
      .and_then(|p| p.as_table_like())
      .ok_or(ManifestError::PackageSectionNotFound)?;

    let name = package
      .get("name")
      .and_then(|v| v.as_str())
      .ok_or(ManifestError::PackageNameNotFound)?;
    let version = package
      .get("version")
      .and_then(|v| v.as_str())
      .ok_or(ManifestError::VersionNotFound)?;

    Ok(Self {
      name: name.to_string(),
      version: version.to_string(),
    })
  }

  pub fn load(path: &Path) -> CutResult<Self> {
    let content =
      std::fs::read_to_string(path).with_context(|| format!("Failed to read manifest {}", path.display()))?;
    Self::parse(&content).with_context(|| format!("While parsing {}", path.display()))
  }
}
