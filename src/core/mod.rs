//! Core building blocks shared by every cargo-cut command
//!
//! - **config**: cut.toml parsing and the captured process environment
//! - **error**: error types with exit codes and contextual help
//! - **vcs**: git operations behind the `WorkingTree` trait (SystemGit)

pub mod config;
pub mod error;
pub mod vcs;
