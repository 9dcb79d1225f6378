//! `cargo cut show`

use serde::Serialize;

use crate::core::error::CutResult;
use crate::manifest::read_manifest_version;

#[derive(Serialize)]
struct ShownVersion<'a> {
  manifest: &'a str,
  version: &'a str,
}

/// Print the `[package]` version of the configured manifest
pub fn run_show(json: bool) -> CutResult<()> {
  let (git, config) = super::open_repository()?;
  let version = read_manifest_version(&git.work_tree().join(&config.manifest))?;

  if json {
    let shown = ShownVersion {
      manifest: &config.manifest.to_string_lossy(),
      version: &version,
    };
    println!("{}", serde_json::to_string_pretty(&shown)?);
  } else {
    println!("{}", version);
  }

  Ok(())
}
