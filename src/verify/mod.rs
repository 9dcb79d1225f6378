//! Post-build verification of the working tree
//!
//! After the build regenerates the lockfile, the tree must show:
//!
//! 1. exactly two changed paths, the manifest and the lockfile;
//! 2. a one-line-out, one-line-in zero-context diff for each;
//! 3. the same `(removed, added)` pair in both files.
//!
//! Anything else means the build moved dependency state besides the version,
//! and the release stops there.

pub mod change_set;
pub mod line_delta;

pub use change_set::ChangeSet;
pub use line_delta::{LineDelta, LinePair};

use crate::core::error::{CutResult, InvariantError};
use crate::core::vcs::WorkingTree;

/// Check the tree and return the version line pair both files share
pub fn verify_change_set(tree: &dyn WorkingTree, manifest: &str, lockfile: &str) -> CutResult<LinePair> {
  let changed = ChangeSet::parse_porcelain(&tree.status_porcelain()?);
  if !changed.is_exactly(&[manifest, lockfile]) {
    return Err(
      InvariantError::UnexpectedChangeSet {
        expected: vec![manifest.to_string(), lockfile.to_string()],
        actual: changed.paths(),
      }
      .into(),
    );
  }
  tracing::debug!(manifest, lockfile, "change set matches");

  let manifest_pair = LineDelta::parse(&tree.diff_unified_zero(manifest)?).single_pair(manifest)?;
  let lockfile_pair = LineDelta::parse(&tree.diff_unified_zero(lockfile)?).single_pair(lockfile)?;

  if manifest_pair != lockfile_pair {
    return Err(
      InvariantError::MismatchedPair {
        manifest: manifest_pair.into_tuple(),
        lockfile: lockfile_pair.into_tuple(),
      }
      .into(),
    );
  }

  tracing::info!(removed = %manifest_pair.removed, added = %manifest_pair.added, "diff verified");
  Ok(manifest_pair)
}
