//! Error types for cargo-cut with contextual messages and exit codes
//!
//! Every failure in the release pipeline is fatal, so errors carry enough
//! state to explain what was observed (the offending path set, the line
//! counts, the mismatched pairs) plus an optional hint for the operator.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for cargo-cut
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, missing env, malformed manifest)
  User,
  /// System error (git, network, I/O)
  System,
  /// Validation failure (diff invariants, registry check, email audit)
  Validation,
  /// Exit code propagated from an external tool (the build step)
  Tool(i32),
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    match self {
      ExitCode::User => 1,
      ExitCode::System => 2,
      ExitCode::Validation => 3,
      ExitCode::Tool(code) => code,
    }
  }
}

/// Main error type for cargo-cut
#[derive(Debug)]
pub enum CutError {
  /// Configuration and environment errors
  Config(ConfigError),

  /// Manifest structure errors
  Manifest(ManifestError),

  /// Git operation errors
  Git(GitError),

  /// Diff verification failures
  Invariant(InvariantError),

  /// Build step failures
  Build(BuildError),

  /// Pull request API failures
  Api(ApiError),

  /// Registry and history audits
  Validation(ValidationError),

  /// I/O errors
  Io(io::Error),

  /// Another error annotated with what was being attempted
  Context { context: String, source: Box<CutError> },

  /// Generic error with message and optional help
  Message { message: String, help: Option<String> },
}

impl CutError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    CutError::Message {
      message: msg.into(),
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    CutError::Message {
      message: msg.into(),
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    CutError::Context {
      context: ctx.into(),
      source: Box::new(self),
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      CutError::Config(_) | CutError::Manifest(_) => ExitCode::User,
      CutError::Git(_) | CutError::Api(_) | CutError::Io(_) => ExitCode::System,
      CutError::Invariant(_) | CutError::Validation(_) => ExitCode::Validation,
      CutError::Build(e) => e.exit_code(),
      CutError::Context { source, .. } => source.exit_code(),
      CutError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      CutError::Config(e) => e.help_message(),
      CutError::Manifest(e) => e.help_message(),
      CutError::Git(e) => e.help_message(),
      CutError::Invariant(e) => e.help_message(),
      CutError::Api(e) => e.help_message(),
      CutError::Validation(e) => e.help_message(),
      CutError::Context { source, .. } => source.help_message(),
      CutError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for CutError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CutError::Config(e) => write!(f, "{}", e),
      CutError::Manifest(e) => write!(f, "{}", e),
      CutError::Git(e) => write!(f, "{}", e),
      CutError::Invariant(e) => write!(f, "{}", e),
      CutError::Build(e) => write!(f, "{}", e),
      CutError::Api(e) => write!(f, "{}", e),
      CutError::Validation(e) => write!(f, "{}", e),
      CutError::Io(e) => write!(f, "I/O error: {}", e),
      CutError::Context { context, source } => write!(f, "{}\n{}", context, source),
      CutError::Message { message, .. } => write!(f, "{}", message),
    }
  }
}

impl std::error::Error for CutError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      CutError::Io(e) => Some(e),
      CutError::Context { source, .. } => Some(source.as_ref()),
      _ => None,
    }
  }
}

impl From<io::Error> for CutError {
  fn from(err: io::Error) -> Self {
    CutError::Io(err)
  }
}

impl From<ManifestError> for CutError {
  fn from(err: ManifestError) -> Self {
    CutError::Manifest(err)
  }
}

impl From<InvariantError> for CutError {
  fn from(err: InvariantError) -> Self {
    CutError::Invariant(err)
  }
}

impl From<toml_edit::TomlError> for CutError {
  fn from(err: toml_edit::TomlError) -> Self {
    CutError::message(format!("TOML parse error: {}", err))
  }
}

impl From<toml_edit::de::Error> for CutError {
  fn from(err: toml_edit::de::Error) -> Self {
    CutError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for CutError {
  fn from(err: serde_json::Error) -> Self {
    CutError::message(format!("JSON error: {}", err))
  }
}

impl From<semver::Error> for CutError {
  fn from(err: semver::Error) -> Self {
    CutError::message(format!("Invalid version: {}", err))
  }
}

impl From<reqwest::Error> for CutError {
  fn from(err: reqwest::Error) -> Self {
    CutError::Api(ApiError::Transport {
      reason: err.to_string(),
    })
  }
}

/// Configuration and environment errors
#[derive(Debug)]
pub enum ConfigError {
  /// Required environment variable is unset or empty
  MissingEnv { var: String },

  /// cut.toml failed validation
  Invalid { path: PathBuf, reason: String },

  /// Manifest file does not exist
  ManifestNotFound { path: PathBuf },

  /// Working tree had changes before the run started
  DirtyWorkingTree { paths: Vec<String> },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::MissingEnv { var } if var == "GITHUB_TOKEN" => {
        Some("Export a token with `contents: write` and `pull-requests: write` permissions.".to_string())
      }
      ConfigError::MissingEnv { var } if var == "GITHUB_REPOSITORY" => {
        Some("Set GITHUB_REPOSITORY to `owner/repo`.".to_string())
      }
      ConfigError::DirtyWorkingTree { .. } => Some("Commit or stash local changes before cutting a release.".to_string()),
      ConfigError::ManifestNotFound { .. } => {
        Some("Run from the repository root or set `manifest` in cut.toml.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::MissingEnv { var } => write!(f, "Missing required environment variable: {}", var),
      ConfigError::Invalid { path, reason } => {
        write!(f, "Invalid configuration in {}: {}", path.display(), reason)
      }
      ConfigError::ManifestNotFound { path } => write!(f, "Manifest not found: {}", path.display()),
      ConfigError::DirtyWorkingTree { paths } => {
        write!(f, "Working tree is not clean (changed: {})", paths.join(", "))
      }
    }
  }
}

/// Manifest structure errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestError {
  /// No `[package]` header anywhere in the document
  PackageSectionNotFound,

  /// `[package]` exists but has no recognizable version line
  VersionNotFound,

  /// `[package]` has no `name` (registry check only)
  PackageNameNotFound,

  /// A version component does not fit in 64 bits
  VersionOutOfRange { version: String },
}

impl ManifestError {
  fn help_message(&self) -> Option<String> {
    match self {
      ManifestError::VersionNotFound => Some(
        "The package version must be a literal like `version = \"1.2.3\"`; workspace-inherited versions are not edited."
          .to_string(),
      ),
      _ => None,
    }
  }
}

impl fmt::Display for ManifestError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ManifestError::PackageSectionNotFound => write!(f, "No [package] section in manifest"),
      ManifestError::VersionNotFound => write!(f, "Could not find version in [package] section of manifest"),
      ManifestError::PackageNameNotFound => write!(f, "Could not find name in [package] section of manifest"),
      ManifestError::VersionOutOfRange { version } => write!(f, "Version component out of range: {}", version),
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },

  /// Push failed
  PushFailed {
    remote: String,
    branch: String,
    reason: String,
  },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::PushFailed { reason, .. } => {
        let reason = reason.to_lowercase();
        if reason.contains("permission denied") || reason.contains("403") || reason.contains("authentication") {
          Some("Check that the token or SSH key used by git can push to this repository.".to_string())
        } else {
          None
        }
      }
      GitError::RepoNotFound { path } => Some(format!("Run inside a git checkout (looked in {})", path.display())),
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
      GitError::PushFailed { remote, branch, reason } => {
        write!(f, "Push to {}/{} failed: {}", remote, branch, reason)
      }
    }
  }
}

/// Diff verification failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantError {
  /// Something other than exactly the manifest and lockfile changed
  UnexpectedChangeSet { expected: Vec<String>, actual: Vec<String> },

  /// A file's zero-context diff is not one removed plus one added line
  LineCount {
    path: String,
    added: usize,
    removed: usize,
  },

  /// The manifest and lockfile changed different lines
  MismatchedPair {
    manifest: (String, String),
    lockfile: (String, String),
  },
}

impl InvariantError {
  fn help_message(&self) -> Option<String> {
    match self {
      InvariantError::UnexpectedChangeSet { .. } | InvariantError::MismatchedPair { .. } => Some(
        "The build changed more than the version. Inspect `git diff`, fix the build environment, then reset and retry."
          .to_string(),
      ),
      InvariantError::LineCount { .. } => None,
    }
  }
}

impl fmt::Display for InvariantError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      InvariantError::UnexpectedChangeSet { expected, actual } => write!(
        f,
        "Only {} may change (got: {{{}}})",
        expected.join(" and "),
        actual.join(", ")
      ),
      InvariantError::LineCount { path, added, removed } => write!(
        f,
        "{}: expected exactly one added and one removed line (added {}, removed {})",
        path, added, removed
      ),
      InvariantError::MismatchedPair { manifest, lockfile } => write!(
        f,
        "Changed line in manifest and lockfile are not identical\n  manifest: {:?} -> {:?}\n  lockfile: {:?} -> {:?}",
        manifest.0, manifest.1, lockfile.0, lockfile.1
      ),
    }
  }
}

/// Build step failures
#[derive(Debug)]
pub enum BuildError {
  /// Build command could not be started
  Spawn { command: String, reason: String },

  /// Build command exited unsuccessfully (`None` when killed by a signal)
  Failed { command: String, code: Option<i32> },
}

impl BuildError {
  fn exit_code(&self) -> ExitCode {
    match self {
      BuildError::Failed { code: Some(code), .. } if *code != 0 => ExitCode::Tool(*code),
      _ => ExitCode::System,
    }
  }
}

impl fmt::Display for BuildError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BuildError::Spawn { command, reason } => write!(f, "Failed to run build `{}`: {}", command, reason),
      BuildError::Failed { command, code: Some(code) } => {
        write!(f, "Build `{}` failed with exit code {}", command, code)
      }
      BuildError::Failed { command, code: None } => write!(f, "Build `{}` was terminated by a signal", command),
    }
  }
}

/// Pull request API failures
#[derive(Debug, Clone)]
pub enum ApiError {
  /// Non-success status other than "already exists"
  Status { status: u16, body: String },

  /// Request never produced a response
  Transport { reason: String },

  /// Crate registry answered with a non-success status
  Registry { url: String, status: u16 },
}

impl ApiError {
  fn help_message(&self) -> Option<String> {
    match self {
      ApiError::Status { status: 401, .. } | ApiError::Status { status: 403, .. } => {
        Some("The token was rejected. Check GITHUB_TOKEN and its repository permissions.".to_string())
      }
      ApiError::Status { status: 404, .. } => Some("Check GITHUB_REPOSITORY (`owner/repo`) and token scope.".to_string()),
      ApiError::Registry { status: 404, .. } => {
        Some("Check the package name, or `registry_url` in cut.toml.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Status { status, body } => write!(f, "GitHub API returned {}\n{}", status, body),
      ApiError::Transport { reason } => write!(f, "HTTP request failed: {}", reason),
      ApiError::Registry { url, status } => write!(f, "Registry returned {} for {}", status, url),
    }
  }
}

/// Registry and history audit failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
  /// Local version is not newer than the latest published one
  VersionNotNewer { local: String, remote: String },

  /// A commit was authored with a test-only email address
  TestEmailFound { email: String, commit: String },
}

impl ValidationError {
  fn help_message(&self) -> Option<String> {
    match self {
      ValidationError::VersionNotNewer { .. } => Some("Run `cargo cut bump` before publishing.".to_string()),
      ValidationError::TestEmailFound { .. } => {
        Some("Rewrite the offending commit's author before merging.".to_string())
      }
    }
  }
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ValidationError::VersionNotNewer { local, remote } => {
        write!(f, "{} <= {}, bump Cargo.toml", local, remote)
      }
      ValidationError::TestEmailFound { email, commit } => {
        write!(f, "Testing email {} found in commit {}", email, commit)
      }
    }
  }
}

/// Result type alias for cargo-cut
pub type CutResult<T> = Result<T, CutError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> CutResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> CutResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<CutError>,
{
  fn context(self, ctx: impl Into<String>) -> CutResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> CutResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &CutError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
