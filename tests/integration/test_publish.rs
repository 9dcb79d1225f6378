//! Tests for `--create-pull-request` against a bare remote and a fake GitHub API

use crate::helpers::*;
use anyhow::Result;

fn created(number: u64) -> (u16, String) {
  (
    201,
    format!(
      r#"{{"number":{n},"html_url":"https://github.com/acme/demo/pull/{n}","state":"open"}}"#,
      n = number
    ),
  )
}

fn already_exists() -> (u16, String) {
  (
    422,
    r#"{"message":"Validation Failed","errors":[{"resource":"PullRequest","code":"custom","message":"A pull request already exists for acme:chore/bump-v1.2.4."}]}"#
      .to_string(),
  )
}

fn remote_branch(repo: &TestRepo, branch: &str) -> Result<String> {
  git_stdout(&repo.remote_path(), &["rev-parse", &format!("refs/heads/{}", branch)])
}

#[test]
fn test_publish_pushes_and_opens_pull_request() -> Result<()> {
  let repo = TestRepo::new("1.2.3")?.with_remote()?;
  let api = FakeGitHub::start(vec![created(7)])?;
  let env = ci_env(&api);

  let output = run_cargo_cut(&repo.path, &["cut", "bump", "--create-pull-request"], &env_refs(&env))?;
  assert!(stdout(&output).contains("pull/7"), "stdout: {}", stdout(&output));

  let local = git_stdout(&repo.path, &["rev-parse", "HEAD"])?;
  assert_eq!(remote_branch(&repo, "chore/bump-v1.2.4")?, local);

  let requests = api.requests();
  assert_eq!(requests.len(), 1);
  assert_eq!(requests[0].method, "POST");
  assert_eq!(requests[0].url, "/repos/acme/demo/pulls");
  assert_eq!(requests[0].authorization.as_deref(), Some("Bearer t0ken"));

  let body: serde_json::Value = serde_json::from_str(&requests[0].body)?;
  assert_eq!(body["title"], "v1.2.4");
  assert_eq!(body["head"], "chore/bump-v1.2.4");
  assert_eq!(body["base"], "main");
  assert_eq!(body["body"], "Automated patch bump to v1.2.4.");

  Ok(())
}

#[test]
fn test_rerun_from_fresh_checkout_succeeds() -> Result<()> {
  let repo = TestRepo::new("1.2.3")?.with_remote()?;
  let api = FakeGitHub::start(vec![created(7), already_exists()])?;
  let env = ci_env(&api);

  run_cargo_cut(&repo.path, &["cut", "bump", "--create-pull-request"], &env_refs(&env))?;

  // Second CI job: a fresh clone of main, same version, branch already published
  let clone = repo.clone_remote("rerun")?;
  let output = run_cargo_cut(&clone, &["cut", "bump", "--create-pull-request", "--json"], &env_refs(&env))?;
  let report: serde_json::Value = serde_json::from_str(&stdout(&output))?;

  assert_eq!(report["version"], "1.2.4");
  assert_eq!(report["branch_action"], "created");
  assert_eq!(report["pull_request"]["status"], "already_exists");
  let push = report["push"].as_str().unwrap_or_default();
  assert!(
    push == "remote_already_has_branch" || push == "up_to_date",
    "unexpected push outcome {}",
    push
  );
  assert_eq!(api.requests().len(), 2);

  Ok(())
}

#[test]
fn test_rerun_in_same_checkout_reuses_branch() -> Result<()> {
  let repo = TestRepo::new("1.2.3")?.with_remote()?;
  let api = FakeGitHub::start(vec![created(7), already_exists()])?;
  let env = ci_env(&api);

  run_cargo_cut(&repo.path, &["cut", "bump", "--create-pull-request"], &env_refs(&env))?;
  let published = git_stdout(&repo.path, &["rev-parse", "HEAD"])?;
  git(&repo.path, &["checkout", "--quiet", "main"])?;

  let output = run_cargo_cut(&repo.path, &["cut", "bump", "--create-pull-request", "--json"], &env_refs(&env))?;
  let report: serde_json::Value = serde_json::from_str(&stdout(&output))?;

  assert_eq!(report["branch_action"], "reused");
  assert_eq!(report["commit"], "nothing_to_commit");
  assert_eq!(report["push"], "up_to_date");
  assert_eq!(report["pull_request"]["status"], "already_exists");
  assert_eq!(git_stdout(&repo.path, &["rev-parse", "HEAD"])?, published);
  assert_eq!(remote_branch(&repo, "chore/bump-v1.2.4")?, published);

  Ok(())
}

#[test]
fn test_missing_token_fails_before_any_change() -> Result<()> {
  let repo = TestRepo::new("1.2.3")?.with_remote()?;
  let api = FakeGitHub::start(vec![])?;
  let env: Vec<(&'static str, String)> = ci_env(&api)
    .into_iter()
    .filter(|(key, _)| *key != "GITHUB_TOKEN")
    .collect();

  let output = cargo_cut(&repo.path, &["cut", "bump", "--create-pull-request"], &env_refs(&env))?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("GITHUB_TOKEN"));
  assert!(repo.status()?.is_empty());
  assert_eq!(repo.current_branch()?, "main");
  assert!(api.requests().is_empty());

  Ok(())
}

#[test]
fn test_api_error_is_reported() -> Result<()> {
  let repo = TestRepo::new("1.2.3")?.with_remote()?;
  let api = FakeGitHub::start(vec![(500, r#"{"message":"Server Error"}"#.to_string())])?;
  let env = ci_env(&api);

  let output = cargo_cut(&repo.path, &["cut", "bump", "--create-pull-request"], &env_refs(&env))?;

  assert_eq!(output.status.code(), Some(2));
  assert!(stderr(&output).contains("500"));
  // Branch was pushed before the API call; re-running finishes the job
  assert!(remote_branch(&repo, "chore/bump-v1.2.4").is_ok());

  Ok(())
}
