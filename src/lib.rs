//! Fresheyes library crate mirroring pull request review activity.
//!
//! Given the review comments, issue comments, and review verdicts of a
//! source pull request, the library reconstructs the original reply
//! threads, synthesizes anonymized summary text, and replays each review
//! as a fresh review on a mirror pull request. The reconstruction and
//! synthesis core is pure; GitHub access goes through trait-based
//! gateways wrapping Octocrab so callers can substitute mocks.

pub mod config;
pub mod github;
pub mod mirror;
pub mod synthesis;

pub use config::FresheyesConfig;
pub use github::{
    ActivityGateway, MirrorError, OctocrabActivityGateway, OctocrabReplayGateway,
    PersonalAccessToken, PullRequestLocator, ReplayGateway,
};
pub use mirror::{MirrorReport, MirrorRun};
