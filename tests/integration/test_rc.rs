//! Tests for `cargo cut rc`

use crate::helpers::*;
use anyhow::Result;

/// `X.Y.Z-rc.` followed by a 14-digit UTC stamp
fn is_rc_of(version: &str, base: &str) -> bool {
  let Some(stamp) = version.strip_prefix(&format!("{}-rc.", base)) else {
    return false;
  };
  stamp.len() == 14 && stamp.chars().all(|c| c.is_ascii_digit())
}

#[test]
fn test_rc_appends_timestamp() -> Result<()> {
  let repo = TestRepo::new("1.2.3")?;

  let output = run_cargo_cut(&repo.path, &["cut", "rc", "--json"], &[])?;
  let report: serde_json::Value = serde_json::from_str(&stdout(&output))?;

  let version = report["version"].as_str().unwrap_or_default().to_string();
  assert!(is_rc_of(&version, "1.2.3"), "unexpected rc version {}", version);
  assert_eq!(report["kind"], "rc");
  assert_eq!(report["branch"], format!("chore/rc-v{}", version));

  assert_eq!(repo.current_branch()?, format!("chore/rc-v{}", version));
  assert_eq!(repo.git_log(1)?, vec![format!("rc: Cargo to v{}", version)]);
  assert!(repo.read_file("Cargo.lock")?.contains(&format!("version = \"{}\"", version)));

  Ok(())
}

#[test]
fn test_rc_replaces_existing_suffix() -> Result<()> {
  let repo = TestRepo::new("2.0.0-beta.1")?;

  let output = run_cargo_cut(&repo.path, &["cut", "rc", "--json"], &[])?;
  let report: serde_json::Value = serde_json::from_str(&stdout(&output))?;

  assert_eq!(report["previous_version"], "2.0.0-beta.1");
  let version = report["version"].as_str().unwrap_or_default();
  assert!(is_rc_of(version, "2.0.0"), "unexpected rc version {}", version);

  Ok(())
}

#[test]
fn test_bump_after_rc_drops_suffix() -> Result<()> {
  let repo = TestRepo::new("1.2.3")?;

  run_cargo_cut(&repo.path, &["cut", "rc"], &[])?;
  let output = run_cargo_cut(&repo.path, &["cut", "bump", "--json"], &[])?;
  let report: serde_json::Value = serde_json::from_str(&stdout(&output))?;

  assert_eq!(report["version"], "1.2.4");
  assert_eq!(repo.current_branch()?, "chore/bump-v1.2.4");

  Ok(())
}
