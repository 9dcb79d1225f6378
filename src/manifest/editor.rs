//! In-place rewrite of the `[package]` version line

use regex::Regex;
use serde::Serialize;
use std::path::Path;
use std::sync::LazyLock;

use super::sections::{SectionTracker, lines};
use super::version::{VersionEdit, VersionTriple};
use crate::core::error::{ConfigError, CutError, CutResult, ManifestError, ResultExt};

/// `version = "X.Y.Z[-suffix]"` with the prefix and the closing quote onwards captured
static VERSION_LINE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"^(\s*version\s*=\s*")(\d+\.\d+\.\d+)((?:[-+][^"]*)?)(".*)$"#).expect("Invalid regex pattern for version line")
});

/// Result of editing one manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionChange {
  /// Version text before the edit, suffix included
  pub previous: String,
  /// Version text written by the edit
  pub version: String,
  /// 1-based line number of the rewritten line
  pub line: usize,
}

/// Rewrite the first `[package]` version line of `doc`
///
/// Only that line changes; its prefix, quote style, trailing comment and
/// line terminator are kept. Every other byte is copied through.
pub fn set_version(doc: &str, edit: &VersionEdit) -> Result<(String, VersionChange), ManifestError> {
  let mut tracker = SectionTracker::package();
  let mut out = String::with_capacity(doc.len() + 24);
  let mut change = None;

  for (index, line) in lines(doc).enumerate() {
    let inside = tracker.observe(line.body);

    if change.is_none()
      && inside
      && let Some(caps) = VERSION_LINE.captures(line.body)
    {
      let current = VersionTriple::parse(&caps[2])?;
      let version = edit.apply(current)?;

      out.push_str(&caps[1]);
      out.push_str(&version);
      out.push_str(&caps[4]);
      out.push_str(line.ending);

      change = Some(VersionChange {
        previous: format!("{}{}", &caps[2], &caps[3]),
        version,
        line: index + 1,
      });
      continue;
    }

    out.push_str(line.body);
    out.push_str(line.ending);
  }

  match change {
    Some(change) => Ok((out, change)),
    None if !tracker.seen() => Err(ManifestError::PackageSectionNotFound),
    None => Err(ManifestError::VersionNotFound),
  }
}

/// Apply `edit` to the manifest at `path`, overwriting only that file
pub fn edit_manifest(path: &Path, edit: &VersionEdit) -> CutResult<VersionChange> {
  if !path.is_file() {
    return Err(CutError::Config(ConfigError::ManifestNotFound {
      path: path.to_path_buf(),
    }));
  }

  let content =
    std::fs::read_to_string(path).with_context(|| format!("Failed to read manifest {}", path.display()))?;
  let (updated, change) = set_version(&content, edit).with_context(|| format!("While editing {}", path.display()))?;

  std::fs::write(path, updated).with_context(|| format!("Failed to write manifest {}", path.display()))?;
  tracing::info!(
    path = %path.display(),
    from = %change.previous,
    to = %change.version,
    line = change.line,
    "rewrote package version"
  );

  Ok(change)
}
