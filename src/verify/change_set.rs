//! Changed-path enumeration from `git status --porcelain`

use std::collections::BTreeSet;

use crate::utils::unquote_git_path;

/// Paths reported as changed in the working tree (staged, unstaged or untracked)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
  paths: BTreeSet<String>,
}

impl ChangeSet {
  /// Parse porcelain v1 output; renames contribute their new path
  pub fn parse_porcelain(output: &str) -> Self {
    let paths = output
      .lines()
      .filter(|line| line.len() > 3 && !line.trim().is_empty())
      .map(|line| {
        let entry = &line[3..];
        let path = entry.split_once(" -> ").map_or(entry, |(_, to)| to);
        unquote_git_path(path.trim())
      })
      .collect();
    Self { paths }
  }

  pub fn is_empty(&self) -> bool {
    self.paths.is_empty()
  }

  /// Whether exactly these paths changed, no more and no fewer
  pub fn is_exactly(&self, expected: &[&str]) -> bool {
    self.paths.len() == expected.len() && expected.iter().all(|p| self.paths.contains(*p))
  }

  /// Sorted paths
  pub fn paths(&self) -> Vec<String> {
    self.paths.iter().cloned().collect()
  }
}
