//! GitHub pull request creation over the REST API

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::error::{ApiError, CutError, CutResult};

/// JSON body of `POST /repos/{owner}/{repo}/pulls`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequest {
  pub title: String,
  pub head: String,
  pub base: String,
  pub body: String,
}

/// How a pull request request ended, when it did not fail
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PullRequestOutcome {
  /// A new pull request was opened
  Created { number: Option<u64>, url: Option<String> },
  /// GitHub answered 422: a pull request for this head already exists
  AlreadyExists,
}

/// Opens pull requests on a hosting platform
pub trait PullRequestApi {
  /// `repository` is `owner/repo`
  fn create_pull_request(&self, repository: &str, request: &PullRequest) -> CutResult<PullRequestOutcome>;
}

/// Status code GitHub uses for "validation failed", including a duplicate PR
const UNPROCESSABLE_ENTITY: u16 = 422;

#[derive(Deserialize)]
struct CreatedPullRequest {
  number: Option<u64>,
  html_url: Option<String>,
}

/// Map an API response onto an outcome
///
/// 2xx is `Created`, 422 is `AlreadyExists`, anything else is an error that
/// carries the response body so the operator sees GitHub's explanation.
pub fn classify_response(status: u16, body: &str) -> CutResult<PullRequestOutcome> {
  match status {
    200..=299 => {
      let created: Option<CreatedPullRequest> = serde_json::from_str(body).ok();
      Ok(PullRequestOutcome::Created {
        number: created.as_ref().and_then(|c| c.number),
        url: created.and_then(|c| c.html_url),
      })
    }
    UNPROCESSABLE_ENTITY => Ok(PullRequestOutcome::AlreadyExists),
    _ => Err(CutError::Api(ApiError::Status {
      status,
      body: body.to_string(),
    })),
  }
}

/// Blocking GitHub REST client authenticated with a bearer token
pub struct GitHubClient {
  client: reqwest::blocking::Client,
  api_url: String,
  token: String,
}

impl GitHubClient {
  pub fn new(api_url: &str, token: &str, timeout: Duration) -> CutResult<Self> {
    let client = reqwest::blocking::Client::builder()
      .timeout(timeout)
      .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
      .build()?;

    Ok(Self {
      client,
      api_url: api_url.trim_end_matches('/').to_string(),
      token: token.to_string(),
    })
  }

  fn pulls_url(&self, repository: &str) -> String {
    format!("{}/repos/{}/pulls", self.api_url, repository)
  }
}

impl PullRequestApi for GitHubClient {
  fn create_pull_request(&self, repository: &str, request: &PullRequest) -> CutResult<PullRequestOutcome> {
    let url = self.pulls_url(repository);
    tracing::debug!(%url, head = %request.head, base = %request.base, "creating pull request");

    let response = self
      .client
      .post(&url)
      .bearer_auth(&self.token)
      .header(reqwest::header::ACCEPT, "application/vnd.github+json")
      .header("X-GitHub-Api-Version", "2022-11-28")
      .json(request)
      .send()?;

    let status = response.status().as_u16();
    let body = response.text().unwrap_or_default();
    tracing::debug!(status, "pull request response");

    classify_response(status, &body)
  }
}
