//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use tempfile::TempDir;

/// Build command used in test repositories: fast, offline, and rewrites the lockfile
pub const LOCKFILE_BUILD: &str = r#"build = ["cargo", "generate-lockfile", "--offline"]
"#;

/// A single-package repository with one commit on `main`
pub struct TestRepo {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestRepo {
  /// Package `demo` at `version`, with its lockfile and a `cut.toml` committed
  pub fn new(version: &str) -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().join("demo");
    std::fs::create_dir_all(path.join("src"))?;

    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@company.io"])?;

    std::fs::write(
      path.join("Cargo.toml"),
      format!(
        r#"[package]
name = "demo"
version = "{}"
edition = "2021"

[dependencies]
"#,
        version
      ),
    )?;
    std::fs::write(path.join("src/lib.rs"), "pub fn demo() {}\n")?;
    std::fs::write(path.join(".gitignore"), "/target\n")?;
    std::fs::write(path.join("cut.toml"), LOCKFILE_BUILD)?;

    cargo(&path, &["generate-lockfile", "--offline"])?;

    git(&path, &["add", "."])?;
    git(&path, &["commit", "-m", "Initial commit"])?;

    Ok(Self { _root: root, path })
  }

  /// Attach a bare repository as `origin` and push `main` to it
  pub fn with_remote(self) -> Result<Self> {
    let remote = self.remote_path();
    git(self._root.path(), &["init", "--bare", "--initial-branch=main", "remote.git"])?;
    git(&self.path, &["remote", "add", "origin", &remote.to_string_lossy()])?;
    git(&self.path, &["push", "--quiet", "origin", "main"])?;
    Ok(self)
  }

  pub fn remote_path(&self) -> PathBuf {
    self._root.path().join("remote.git")
  }

  /// Fresh clone of the remote's `main`, inside the same temp root
  pub fn clone_remote(&self, name: &str) -> Result<PathBuf> {
    let remote = self.remote_path();
    git(self._root.path(), &["clone", "--quiet", &remote.to_string_lossy(), name])?;
    let path = self._root.path().join(name);
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@company.io"])?;
    Ok(path)
  }

  /// Commit everything with a specific author email
  pub fn commit_as(&self, email: &str, message: &str) -> Result<()> {
    git(&self.path, &["add", "."])?;
    let author = format!("Someone <{}>", email);
    git(&self.path, &["commit", "--allow-empty", "--author", &author, "-m", message])?;
    Ok(())
  }

  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }

  pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
    std::fs::write(self.path.join(path), content)?;
    Ok(())
  }

  pub fn current_branch(&self) -> Result<String> {
    git_stdout(&self.path, &["rev-parse", "--abbrev-ref", "HEAD"])
  }

  /// Subject lines, newest first
  pub fn git_log(&self, n: usize) -> Result<Vec<String>> {
    let out = git_stdout(&self.path, &["log", &format!("-{}", n), "--pretty=format:%s"])?;
    Ok(out.lines().map(String::from).collect())
  }

  pub fn status(&self) -> Result<String> {
    git_stdout(&self.path, &["status", "--porcelain"])
  }
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

pub fn git_stdout(cwd: &Path, args: &[&str]) -> Result<String> {
  let output = git(cwd, args)?;
  Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn cargo(cwd: &Path, args: &[&str]) -> Result<Output> {
  let cargo = std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_string());
  let output = Command::new(cargo)
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run cargo")?;

  if !output.status.success() {
    anyhow::bail!(
      "cargo {} failed\n{}",
      args.join(" "),
      String::from_utf8_lossy(&output.stderr)
    );
  }

  Ok(output)
}

/// Run the binary with a controlled environment, returning output whatever the exit code
pub fn cargo_cut(cwd: &Path, args: &[&str], env: &[(&str, &str)]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_cargo-cut");

  let mut command = Command::new(bin);
  command.current_dir(cwd).args(args);
  for var in [
    "GITHUB_ACTOR",
    "GITHUB_TOKEN",
    "GITHUB_REPOSITORY",
    "GITHUB_REF_NAME",
    "GITHUB_API_URL",
    "RUST_LOG",
    "HTTP_PROXY",
    "http_proxy",
    "ALL_PROXY",
    "all_proxy",
  ] {
    command.env_remove(var);
  }
  for (key, value) in env {
    command.env(key, value);
  }

  command.output().context("Failed to run cargo-cut")
}

/// Like [`cargo_cut`] but fails unless the command exits 0
pub fn run_cargo_cut(cwd: &Path, args: &[&str], env: &[(&str, &str)]) -> Result<Output> {
  let output = cargo_cut(cwd, args, env)?;

  if !output.status.success() {
    anyhow::bail!(
      "cargo-cut command failed: cargo cut {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      String::from_utf8_lossy(&output.stdout),
      String::from_utf8_lossy(&output.stderr)
    );
  }

  Ok(output)
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).to_string()
}

/// A request the fake API received
#[derive(Debug, Clone)]
pub struct RecordedRequest {
  pub method: String,
  pub url: String,
  pub authorization: Option<String>,
  pub body: String,
}

/// Local HTTP server answering with scripted `(status, body)` pairs in order
pub struct FakeGitHub {
  pub url: String,
  requests: Arc<Mutex<Vec<RecordedRequest>>>,
  _handle: JoinHandle<()>,
}

impl FakeGitHub {
  pub fn start(responses: Vec<(u16, String)>) -> Result<Self> {
    let server = tiny_http::Server::http("127.0.0.1:0").map_err(|e| anyhow::anyhow!("failed to bind fake API: {}", e))?;
    let port = server
      .server_addr()
      .to_ip()
      .context("server is not bound to an IP address")?
      .port();
    let requests = Arc::new(Mutex::new(Vec::new()));

    let recorded = Arc::clone(&requests);
    let handle = thread::spawn(move || {
      for (status, body) in responses {
        let Ok(mut request) = server.recv() else {
          return;
        };
        let mut content = String::new();
        let _ = request.as_reader().read_to_string(&mut content);
        let authorization = request
          .headers()
          .iter()
          .find(|h| h.field.equiv("Authorization"))
          .map(|h| h.value.to_string());
        recorded.lock().unwrap().push(RecordedRequest {
          method: request.method().to_string(),
          url: request.url().to_string(),
          authorization,
          body: content,
        });
        let response = tiny_http::Response::from_string(body).with_status_code(status);
        let _ = request.respond(response);
      }
    });

    Ok(Self {
      url: format!("http://127.0.0.1:{}", port),
      requests,
      _handle: handle,
    })
  }

  pub fn requests(&self) -> Vec<RecordedRequest> {
    self.requests.lock().unwrap().clone()
  }
}

/// Environment for a publishing run against `api`
pub fn ci_env(api: &FakeGitHub) -> Vec<(&'static str, String)> {
  vec![
    ("GITHUB_ACTOR", "octocat".to_string()),
    ("GITHUB_TOKEN", "t0ken".to_string()),
    ("GITHUB_REPOSITORY", "acme/demo".to_string()),
    ("GITHUB_REF_NAME", "main".to_string()),
    ("GITHUB_API_URL", api.url.clone()),
  ]
}

/// Borrow a `(key, String)` list as `(key, &str)`
pub fn env_refs<'a>(env: &'a [(&'static str, String)]) -> Vec<(&'a str, &'a str)> {
  env.iter().map(|(k, v)| (*k, v.as_str())).collect()
}
