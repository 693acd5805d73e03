//! Octocrab-backed sink gateway posting synthesized reviews.

use async_trait::async_trait;
use octocrab::Octocrab;
use tracing::debug;

use crate::github::error::MirrorError;
use crate::github::locator::{PersonalAccessToken, PullRequestLocator};
use crate::synthesis::ReplayRequest;

use super::error_mapping::map_octocrab_error;
use super::{ReplayGateway, build_client};

/// Gateway creating reviews on the mirror pull request through Octocrab.
pub struct OctocrabReplayGateway {
    client: Octocrab,
}

impl OctocrabReplayGateway {
    /// Creates a new gateway for the given token and API base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the Octocrab client cannot be built.
    pub fn new(token: &PersonalAccessToken, api_base: &str) -> Result<Self, MirrorError> {
        let client = build_client(token, api_base)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ReplayGateway for OctocrabReplayGateway {
    async fn create_review(
        &self,
        locator: &PullRequestLocator,
        request: &ReplayRequest,
    ) -> Result<(), MirrorError> {
        let _response: serde_json::Value = self
            .client
            .post(locator.reviews_path(), Some(request))
            .await
            .map_err(|error| map_octocrab_error("create review", &error))?;

        debug!(
            event = request.event.as_str(),
            comments = request.comments.len(),
            "replayed review group"
        );
        Ok(())
    }
}
