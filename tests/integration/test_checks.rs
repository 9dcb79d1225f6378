//! Tests for `show`, `version-check` and `email-check`

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_show_prints_version() -> Result<()> {
  let repo = TestRepo::new("3.1.4")?;

  let output = run_cargo_cut(&repo.path, &["cut", "show"], &[])?;
  assert_eq!(stdout(&output).trim(), "3.1.4");

  let output = run_cargo_cut(&repo.path, &["cut", "show", "--json"], &[])?;
  let shown: serde_json::Value = serde_json::from_str(&stdout(&output))?;
  assert_eq!(shown["version"], "3.1.4");
  assert_eq!(shown["manifest"], "Cargo.toml");

  Ok(())
}

#[test]
fn test_show_from_subdirectory() -> Result<()> {
  let repo = TestRepo::new("0.1.0")?;

  let output = run_cargo_cut(&repo.path.join("src"), &["cut", "show"], &[])?;
  assert_eq!(stdout(&output).trim(), "0.1.0");

  Ok(())
}

#[test]
fn test_show_outside_git_repository() -> Result<()> {
  let dir = tempfile::TempDir::new()?;

  let output = cargo_cut(dir.path(), &["cut", "show"], &[])?;
  assert_ne!(output.status.code(), Some(0));

  Ok(())
}

fn with_registry(repo: &TestRepo, registry: &FakeGitHub) -> Result<()> {
  repo.write_file(
    "cut.toml",
    &format!("{}registry_url = \"{}/api/v1/crates\"\n", LOCKFILE_BUILD, registry.url),
  )
}

#[test]
fn test_version_check_newer_passes() -> Result<()> {
  let repo = TestRepo::new("1.2.4")?;
  let registry = FakeGitHub::start(vec![(200, r#"{"crate":{"max_stable_version":"1.2.3"}}"#.to_string())])?;
  with_registry(&repo, &registry)?;

  run_cargo_cut(&repo.path, &["cut", "version-check"], &[])?;

  let requests = registry.requests();
  assert_eq!(requests.len(), 1);
  assert_eq!(requests[0].url, "/api/v1/crates/demo");

  Ok(())
}

#[test]
fn test_version_check_same_version_fails() -> Result<()> {
  let repo = TestRepo::new("1.2.3")?;
  let registry = FakeGitHub::start(vec![(200, r#"{"crate":{"max_stable_version":"1.2.3"}}"#.to_string())])?;
  with_registry(&repo, &registry)?;

  let output = cargo_cut(&repo.path, &["cut", "version-check"], &[])?;

  assert_eq!(output.status.code(), Some(3));
  assert!(stderr(&output).contains("1.2.3"));

  Ok(())
}

#[test]
fn test_version_check_unpublished_crate() -> Result<()> {
  let repo = TestRepo::new("0.1.0")?;
  let registry = FakeGitHub::start(vec![(404, r#"{"errors":[{"detail":"Not Found"}]}"#.to_string())])?;
  with_registry(&repo, &registry)?;

  let output = cargo_cut(&repo.path, &["cut", "version-check"], &[])?;

  assert_eq!(output.status.code(), Some(2));
  assert!(stderr(&output).contains("404"));

  Ok(())
}

#[test]
fn test_email_check_clean_history() -> Result<()> {
  let repo = TestRepo::new("1.0.0")?;
  repo.commit_as("dev@company.io", "Second commit")?;

  let output = run_cargo_cut(&repo.path, &["cut", "email-check"], &[])?;
  assert!(stdout(&output).contains("2 commit(s)"));

  Ok(())
}

#[test]
fn test_email_check_finds_test_domain() -> Result<()> {
  let repo = TestRepo::new("1.0.0")?;
  repo.commit_as("ci@example.com", "From a test fixture")?;

  let output = cargo_cut(&repo.path, &["cut", "email-check"], &[])?;

  assert_eq!(output.status.code(), Some(3));
  assert!(stderr(&output).contains("ci@example.com"));

  Ok(())
}

#[test]
fn test_email_check_custom_domain() -> Result<()> {
  let repo = TestRepo::new("1.0.0")?;

  let output = cargo_cut(&repo.path, &["cut", "email-check", "--domain", "@company.io"], &[])?;
  assert_eq!(output.status.code(), Some(3));

  Ok(())
}

#[test]
fn test_email_check_without_commits() -> Result<()> {
  let dir = tempfile::TempDir::new()?;
  git(dir.path(), &["init", "--initial-branch=main"])?;

  let output = cargo_cut(dir.path(), &["cut", "email-check"], &[])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("No commits found"));

  Ok(())
}
