//! Gateways for pull request activity through Octocrab.
//!
//! This module provides trait-based gateways for communicating with the
//! GitHub API. The trait-based design enables mocking in tests while the
//! Octocrab implementations handle real HTTP requests. `ActivityGateway`
//! is the data source producing the three raw activity streams;
//! `ReplayGateway` is the data sink accepting synthesized reviews.

mod activity;
mod error_mapping;
mod replay;

#[cfg(test)]
mod tests;

pub use activity::OctocrabActivityGateway;
pub use replay::OctocrabReplayGateway;

use async_trait::async_trait;
use http::Uri;
use octocrab::Octocrab;

use crate::github::error::MirrorError;
use crate::github::locator::{PersonalAccessToken, PullRequestLocator};
use crate::github::models::{IssueComment, LineComment, ParentRepository, ReviewVerdict};
use crate::synthesis::ReplayRequest;

use error_mapping::map_octocrab_error;

/// Builds the authenticated Octocrab client both gateways wrap.
///
/// # Errors
///
/// Returns [`MirrorError::InvalidUrl`] when `api_base` is not a valid URI,
/// or the mapped Octocrab error when client construction fails.
fn build_client(token: &PersonalAccessToken, api_base: &str) -> Result<Octocrab, MirrorError> {
    let base_uri: Uri = api_base
        .parse()
        .map_err(|error| MirrorError::InvalidUrl(format!("{api_base}: {error}")))?;

    Octocrab::builder()
        .personal_token(token.as_ref())
        .base_uri(base_uri)
        .map_err(|error| map_octocrab_error("configure client", &error))?
        .build()
        .map_err(|error| map_octocrab_error("build client", &error))
}

/// Gateway producing the raw activity streams of a pull request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivityGateway: Send + Sync {
    /// Fetch all inline review comments for the pull request.
    async fn list_line_comments(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<Vec<LineComment>, MirrorError>;

    /// Fetch all top-level issue comments for the pull request.
    async fn list_issue_comments(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<Vec<IssueComment>, MirrorError>;

    /// Fetch all review verdicts submitted on the pull request.
    async fn list_review_verdicts(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<Vec<ReviewVerdict>, MirrorError>;

    /// Fetch the login of the pull request author, when present.
    async fn pull_request_author(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<Option<String>, MirrorError>;

    /// Fetch the parent repository of the locator's repository, when the
    /// repository is a fork.
    async fn parent_repository(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<Option<ParentRepository>, MirrorError>;
}

/// Gateway accepting synthesized reviews for replay.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReplayGateway: Send + Sync {
    /// Post one synthesized review, with all of its thread comments, as a
    /// single atomic review creation on the mirror pull request.
    async fn create_review(
        &self,
        locator: &PullRequestLocator,
        request: &ReplayRequest,
    ) -> Result<(), MirrorError>;
}
