use crate::core::error::{ConfigError, CutError, CutResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

/// Configuration for cargo-cut
/// Searched in order: cut.toml, .cut.toml, .cargo/cut.toml, .config/cut.toml
///
/// Every field has a default, so a repository without a config file behaves
/// like a plain single-package Cargo project released through GitHub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CutConfig {
  /// Manifest to edit, relative to the repository root
  pub manifest: PathBuf,

  /// Lockfile regenerated by the build, relative to the repository root
  pub lockfile: PathBuf,

  /// Build command (program followed by arguments)
  pub build: Vec<String>,

  /// Remote the release branch is pushed to
  pub remote: String,

  /// Base branch for pull requests when GITHUB_REF_NAME is unset
  pub base: String,

  /// GitHub REST API root (GITHUB_API_URL takes precedence)
  pub api_url: String,

  /// Timeout for the pull request call
  pub api_timeout_secs: u64,

  /// Registry crate endpoint used by `version-check`
  pub registry_url: String,

  /// Author email suffix rejected by `email-check`
  pub test_email_domain: String,
}

impl Default for CutConfig {
  fn default() -> Self {
    Self {
      manifest: PathBuf::from("Cargo.toml"),
      lockfile: PathBuf::from("Cargo.lock"),
      build: vec!["cargo".to_string(), "build".to_string()],
      remote: "origin".to_string(),
      base: "main".to_string(),
      api_url: "https://api.github.com".to_string(),
      api_timeout_secs: 30,
      registry_url: "https://crates.io/api/v1/crates".to_string(),
      test_email_domain: "@example.com".to_string(),
    }
  }
}

impl CutConfig {
  /// Find config file in search order: cut.toml, .cut.toml, .cargo/cut.toml, .config/cut.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("cut.toml"),
      path.join(".cut.toml"),
      path.join(".cargo").join("cut.toml"),
      path.join(".config").join("cut.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from the repository root, falling back to defaults when no file exists
  pub fn load(path: &Path) -> CutResult<Self> {
    let Some(config_path) = Self::find_config_path(path) else {
      tracing::debug!(root = %path.display(), "no cut.toml found, using defaults");
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let mut config = Self::parse(&content).with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    let invalid = |reason| {
      CutError::Config(ConfigError::Invalid {
        path: config_path.clone(),
        reason,
      })
    };
    config.validate().map_err(invalid)?;
    let (manifest, lockfile) = config.repo_paths().map_err(invalid)?;
    config.manifest = manifest;
    config.lockfile = lockfile;

    tracing::debug!(path = %config_path.display(), "loaded config");
    Ok(config)
  }

  /// Parse config text without validating it
  pub fn parse(content: &str) -> CutResult<Self> {
    Ok(toml_edit::de::from_str(content)?)
  }

  /// Validate field combinations that serde cannot express
  pub fn validate(&self) -> Result<(), String> {
    if self.build.first().is_none_or(|program| program.trim().is_empty()) {
      return Err("`build` must name a program to run".to_string());
    }
    self.repo_paths()?;
    if self.api_timeout_secs == 0 {
      return Err("`api_timeout_secs` must be greater than zero".to_string());
    }
    if self.remote.trim().is_empty() {
      return Err("`remote` must not be empty".to_string());
    }
    Ok(())
  }

  /// `manifest` and `lockfile` in the root-relative form git reports them
  ///
  /// Both must stay inside the repository and name different files.
  pub fn repo_paths(&self) -> Result<(PathBuf, PathBuf), String> {
    let manifest = normalize_repo_path(&self.manifest).map_err(|e| format!("`manifest` {}", e))?;
    let lockfile = normalize_repo_path(&self.lockfile).map_err(|e| format!("`lockfile` {}", e))?;
    if manifest == lockfile {
      return Err("`manifest` and `lockfile` must be different files".to_string());
    }
    Ok((manifest, lockfile))
  }

  pub fn api_timeout(&self) -> Duration {
    Duration::from_secs(self.api_timeout_secs)
  }
}

/// Drop `.` segments and resolve `..` without touching the filesystem
///
/// Absolute paths and paths that climb above the repository root are errors.
fn normalize_repo_path(path: &Path) -> Result<PathBuf, String> {
  let mut normalized = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::Normal(part) => normalized.push(part),
      Component::ParentDir => {
        if !normalized.pop() {
          return Err(format!("escapes the repository root: {}", path.display()));
        }
      }
      Component::RootDir | Component::Prefix(_) => {
        return Err(format!("must be relative to the repository root: {}", path.display()));
      }
    }
  }

  if normalized.as_os_str().is_empty() {
    return Err(format!("does not name a file: {}", path.display()));
  }
  Ok(normalized)
}

/// Fallback commit identity when GITHUB_ACTOR is unset
pub const DEFAULT_ACTOR: &str = "github-actions[bot]";

/// Process environment consumed by the pipeline, captured once at startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
  pub actor: Option<String>,
  pub token: Option<String>,
  pub repository: Option<String>,
  pub ref_name: Option<String>,
  pub api_url: Option<String>,
}

impl Environment {
  pub fn from_env() -> Self {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  /// Build from an arbitrary lookup; empty values count as unset
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    Self {
      actor: get("GITHUB_ACTOR"),
      token: get("GITHUB_TOKEN"),
      repository: get("GITHUB_REPOSITORY"),
      ref_name: get("GITHUB_REF_NAME"),
      api_url: get("GITHUB_API_URL"),
    }
  }

  /// Commit author name
  pub fn actor(&self) -> &str {
    self.actor.as_deref().unwrap_or(DEFAULT_ACTOR)
  }

  /// Commit author email derived from the actor
  pub fn actor_email(&self) -> String {
    format!("{}@users.noreply.github.com", self.actor())
  }

  /// Pull request base: GITHUB_REF_NAME, then config, then `main`
  pub fn base<'a>(&'a self, config: &'a CutConfig) -> &'a str {
    match self.ref_name.as_deref() {
      Some(base) => base,
      None if !config.base.trim().is_empty() => &config.base,
      None => "main",
    }
  }

  pub fn api_url<'a>(&'a self, config: &'a CutConfig) -> &'a str {
    self.api_url.as_deref().unwrap_or(config.api_url.as_str()).trim_end_matches('/')
  }

  /// Token and repository, both required before any network call
  pub fn credentials(&self) -> CutResult<(&str, &str)> {
    let token = self.token.as_deref().ok_or_else(|| missing("GITHUB_TOKEN"))?;
    let repository = self.repository.as_deref().ok_or_else(|| missing("GITHUB_REPOSITORY"))?;
    Ok((token, repository))
  }
}

fn missing(var: &str) -> CutError {
  CutError::Config(ConfigError::MissingEnv { var: var.to_string() })
}
