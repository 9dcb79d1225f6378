//! Added/removed lines of a zero-context unified diff

use serde::Serialize;

use crate::core::error::InvariantError;

/// Added and removed lines of one file's diff, markers stripped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineDelta {
  pub added: Vec<String>,
  pub removed: Vec<String>,
}

/// The single `(removed, added)` change of a file, whitespace-trimmed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinePair {
  pub removed: String,
  pub added: String,
}

impl LinePair {
  pub fn into_tuple(self) -> (String, String) {
    (self.removed, self.added)
  }
}

impl LineDelta {
  /// Parse `git diff --unified=0` output
  ///
  /// File headers (`diff`, `index`, mode lines, `---`/`+++`) only appear
  /// before a file's first `@@` hunk header, so a `+`/`-` line is content
  /// only once a hunk is open. This keeps a removed line that itself starts
  /// with `--` from being mistaken for a header.
  pub fn parse(diff: &str) -> Self {
    let mut delta = Self::default();
    let mut in_hunk = false;

    for line in diff.lines() {
      if line.starts_with("diff ") {
        in_hunk = false;
        continue;
      }
      if line.starts_with("@@") {
        in_hunk = true;
        continue;
      }
      if !in_hunk {
        continue;
      }
      if let Some(added) = line.strip_prefix('+') {
        delta.added.push(added.to_string());
      } else if let Some(removed) = line.strip_prefix('-') {
        delta.removed.push(removed.to_string());
      }
      // Context lines and "\ No newline at end of file" markers carry no change
    }

    delta
  }

  /// The one trimmed pair, or the shape violation for `path`
  pub fn single_pair(&self, path: &str) -> Result<LinePair, InvariantError> {
    match (self.removed.as_slice(), self.added.as_slice()) {
      ([removed], [added]) => Ok(LinePair {
        removed: removed.trim().to_string(),
        added: added.trim().to_string(),
      }),
      _ => Err(InvariantError::LineCount {
        path: path.to_string(),
        added: self.added.len(),
        removed: self.removed.len(),
      }),
    }
  }
}
