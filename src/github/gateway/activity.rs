//! Octocrab-backed source gateway for the three activity streams.

use async_trait::async_trait;
use octocrab::{Octocrab, Page};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::github::error::MirrorError;
use crate::github::locator::{PersonalAccessToken, PullRequestLocator};
use crate::github::models::{
    ApiIssueComment, ApiPullRequest, ApiRepository, ApiReview, ApiReviewComment, IssueComment,
    LineComment, ParentRepository, ReviewVerdict,
};

use super::error_mapping::map_octocrab_error;
use super::{ActivityGateway, build_client};

/// Gateway loading pull request activity through Octocrab.
pub struct OctocrabActivityGateway {
    client: Octocrab,
}

impl OctocrabActivityGateway {
    /// Creates a new gateway for the given token and API base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the Octocrab client cannot be built.
    pub fn new(token: &PersonalAccessToken, api_base: &str) -> Result<Self, MirrorError> {
        let client = build_client(token, api_base)?;
        Ok(Self { client })
    }

    /// Fetches every page of a paginated listing and converts the
    /// deserialised records into domain values.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError`] for authentication failures, rate limiting,
    /// network errors, or malformed responses, for the first request and for
    /// any subsequent page fetched via [`Octocrab::all_pages`].
    async fn list_all<Api, Domain>(
        &self,
        operation: &str,
        route: String,
    ) -> Result<Vec<Domain>, MirrorError>
    where
        Api: DeserializeOwned,
        Domain: From<Api>,
    {
        let page: Page<Api> = self
            .client
            .get(route, None::<&()>)
            .await
            .map_err(|error| map_octocrab_error(operation, &error))?;

        let records = self
            .client
            .all_pages(page)
            .await
            .map_err(|error| map_octocrab_error(operation, &error))?;

        debug!(operation, count = records.len(), "fetched activity stream");
        Ok(records.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl ActivityGateway for OctocrabActivityGateway {
    async fn list_line_comments(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<Vec<LineComment>, MirrorError> {
        self.list_all::<ApiReviewComment, _>("review comments", locator.review_comments_path())
            .await
    }

    async fn list_issue_comments(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<Vec<IssueComment>, MirrorError> {
        self.list_all::<ApiIssueComment, _>("issue comments", locator.issue_comments_path())
            .await
    }

    async fn list_review_verdicts(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<Vec<ReviewVerdict>, MirrorError> {
        self.list_all::<ApiReview, _>("reviews", locator.reviews_path())
            .await
    }

    async fn pull_request_author(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<Option<String>, MirrorError> {
        let pull_request: ApiPullRequest = self
            .client
            .get(locator.pull_request_path(), None::<&()>)
            .await
            .map_err(|error| map_octocrab_error("pull request", &error))?;

        Ok(pull_request.user.and_then(|user| user.login))
    }

    async fn parent_repository(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<Option<ParentRepository>, MirrorError> {
        let repository: ApiRepository = self
            .client
            .get(locator.repository_path(), None::<&()>)
            .await
            .map_err(|error| map_octocrab_error("repository", &error))?;

        Ok(repository.parent.map(|parent| ParentRepository {
            owner: parent.owner.login,
            name: parent.name,
        }))
    }
}
