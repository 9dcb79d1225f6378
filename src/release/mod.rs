//! Release pipeline: edit -> build -> verify -> read back -> publish
//!
//! # Invariants
//!
//! 1. **All or nothing**: any stage failing stops the run with a non-zero
//!    exit; nothing is pushed after a failed check.
//! 2. **Only the version moves**: the verifier proves the build changed the
//!    manifest and lockfile by the same single line and nothing else.
//! 3. **Idempotent publish**: existing branch, empty commit, existing remote
//!    branch and existing pull request are outcomes, not errors.

pub mod pipeline;
pub mod report;

pub use pipeline::{ReleaseOptions, ReleasePipeline};
pub use report::ReleaseReport;
