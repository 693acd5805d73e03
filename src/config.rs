//! Application configuration loaded from CLI, environment, and files.
//!
//! Values merge from command-line arguments, environment variables, and
//! configuration files using ortho-config's layered approach, with
//! precedence (lowest to highest): defaults, `.fresheyes.toml` in the
//! current directory, home directory, or XDG config directory,
//! `FRESHEYES_*` environment variables, then CLI arguments.
//!
//! ```toml
//! mirror_pr_url = "https://github.com/fork/repo/pull/3"
//! source_pr = 42
//! token = "ghp_example"
//! ```

use std::env;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::github::error::MirrorError;

/// Application configuration supporting CLI, environment, and file
/// sources.
///
/// # Environment Variables
///
/// - `FRESHEYES_MIRROR_PR_URL` or `--mirror-pr-url`: mirror pull request URL
/// - `FRESHEYES_SOURCE_PR` or `--source-pr`: source pull request number
/// - `FRESHEYES_TOKEN`, `GITHUB_TOKEN`, or `--token`: authentication token
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "FRESHEYES",
    discovery(
        dotfile_name = ".fresheyes.toml",
        config_file_name = "fresheyes.toml",
        app_name = "fresheyes"
    )
)]
pub struct FresheyesConfig {
    /// URL of the mirror pull request that receives the replayed reviews.
    ///
    /// Can be provided via:
    /// - CLI: `--mirror-pr-url <URL>` or `-m <URL>`
    /// - Environment: `FRESHEYES_MIRROR_PR_URL`
    /// - Config file: `mirror_pr_url = "..."`
    #[ortho_config(cli_short = 'm')]
    pub mirror_pr_url: Option<String>,

    /// Number of the source pull request on the mirror's parent
    /// repository.
    ///
    /// Can be provided via:
    /// - CLI: `--source-pr <NUMBER>` or `-s <NUMBER>`
    /// - Environment: `FRESHEYES_SOURCE_PR`
    /// - Config file: `source_pr = 42`
    #[ortho_config(cli_short = 's')]
    pub source_pr: Option<u64>,

    /// Personal access token for GitHub API authentication.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `FRESHEYES_TOKEN` or `GITHUB_TOKEN` (legacy)
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,
}

impl FresheyesConfig {
    /// Resolves the token from configuration or the legacy `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::MissingToken`] when no token source provides
    /// a value.
    pub fn resolve_token(&self) -> Result<String, MirrorError> {
        self.token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .ok_or(MirrorError::MissingToken)
    }

    /// Returns the mirror pull request URL or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::MissingMirrorPullRequestUrl`] when no URL is
    /// configured.
    pub fn require_mirror_pr_url(&self) -> Result<&str, MirrorError> {
        self.mirror_pr_url
            .as_deref()
            .ok_or(MirrorError::MissingMirrorPullRequestUrl)
    }

    /// Returns the source pull request number or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::MissingSourcePullRequestNumber`] when no
    /// number is configured.
    pub const fn require_source_pr(&self) -> Result<u64, MirrorError> {
        match self.source_pr {
            Some(number) => Ok(number),
            None => Err(MirrorError::MissingSourcePullRequestNumber),
        }
    }
}
