//! Build step that regenerates the lockfile from the edited manifest

use crate::core::error::{BuildError, CutError, CutResult};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Something that regenerates the lockfile deterministically
pub trait BuildStep {
  /// Human-readable command line, for messages
  fn describe(&self) -> String;

  /// Run to completion; any failure aborts the release
  fn run(&self) -> CutResult<()>;
}

/// Runs a configured command in the repository root
///
/// Its stdout goes to our stderr so `--json` output stays parseable.
pub struct CommandBuild {
  program: String,
  args: Vec<String>,
  cwd: PathBuf,
}

impl CommandBuild {
  /// `command` is the program followed by its arguments
  pub fn new(command: &[String], cwd: &Path) -> CutResult<Self> {
    let (program, args) = command
      .split_first()
      .ok_or_else(|| CutError::message("Build command is empty"))?;
    Ok(Self {
      program: program.clone(),
      args: args.to_vec(),
      cwd: cwd.to_path_buf(),
    })
  }
}

impl BuildStep for CommandBuild {
  fn describe(&self) -> String {
    std::iter::once(self.program.as_str())
      .chain(self.args.iter().map(String::as_str))
      .collect::<Vec<_>>()
      .join(" ")
  }

  fn run(&self) -> CutResult<()> {
    let command = self.describe();
    tracing::debug!(%command, cwd = %self.cwd.display(), "running build");

    let status = Command::new(&self.program)
      .args(&self.args)
      .current_dir(&self.cwd)
      .stdout(std::io::stderr())
      .status()
      .map_err(|e| {
        CutError::Build(BuildError::Spawn {
          command: command.clone(),
          reason: e.to_string(),
        })
      })?;

    if !status.success() {
      return Err(CutError::Build(BuildError::Failed {
        command,
        code: status.code(),
      }));
    }

    Ok(())
  }
}
