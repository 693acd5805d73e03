//! GitHub boundary: locators, typed models, and Octocrab gateways.
//!
//! This module wraps Octocrab to parse pull request URLs, validate
//! personal access tokens, fetch the three raw activity streams of a
//! pull request (review comments, issue comments, review verdicts), and
//! post synthesized reviews to a mirror pull request. Errors are mapped
//! into user-friendly variants so callers never see Octocrab internals.

pub mod error;
pub mod gateway;
pub mod locator;
pub mod models;

pub use error::MirrorError;
pub use gateway::{
    ActivityGateway, OctocrabActivityGateway, OctocrabReplayGateway, ReplayGateway,
};
pub use locator::{
    PersonalAccessToken, PullRequestLocator, PullRequestNumber, RepositoryName, RepositoryOwner,
};
pub use models::{
    Author, DiffSide, IssueComment, LineComment, ParentRepository, ReviewVerdict,
};

#[cfg(test)]
pub use gateway::{MockActivityGateway, MockReplayGateway};
