//! `cargo cut email-check`

use crate::core::error::{CutError, CutResult, ValidationError};

/// Audit every commit reachable from HEAD for a test-domain author email
pub fn run_email_check(domain: Option<String>) -> CutResult<()> {
  let (git, config) = super::open_repository()?;
  let domain = domain.unwrap_or(config.test_email_domain);

  let commits = git.author_emails()?;
  if commits.is_empty() {
    return Err(CutError::with_help(
      "No commits found",
      "Commit at least once before running the email check.",
    ));
  }

  println!("🔍 Checking {} commit(s) for author emails ending in {}", commits.len(), domain);

  if let Some((commit, email)) = find_test_email(&commits, &domain) {
    return Err(CutError::Validation(ValidationError::TestEmailFound {
      email: email.clone(),
      commit: commit.clone(),
    }));
  }

  println!("✅ No commits authored with {}", domain);
  Ok(())
}

/// First `(commit, email)` whose email ends with `domain`, ignoring ASCII case
pub fn find_test_email<'a>(commits: &'a [(String, String)], domain: &str) -> Option<&'a (String, String)> {
  let domain = domain.to_ascii_lowercase();
  commits
    .iter()
    .find(|(_, email)| email.to_ascii_lowercase().ends_with(&domain))
}
