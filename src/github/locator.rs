//! URL parsing and identity wrappers for pull request mirroring.

use url::Url;

use super::error::MirrorError;

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    pub(crate) fn new(value: &str) -> Result<Self, MirrorError> {
        if value.is_empty() {
            return Err(MirrorError::MissingPathSegments);
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(String);

impl RepositoryName {
    pub(crate) fn new(value: &str) -> Result<Self, MirrorError> {
        if value.is_empty() {
            return Err(MirrorError::MissingPathSegments);
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Pull request number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullRequestNumber(u64);

impl PullRequestNumber {
    pub(crate) const fn new(value: u64) -> Result<Self, MirrorError> {
        if value == 0 {
            return Err(MirrorError::InvalidPullRequestNumber);
        }
        Ok(Self(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `MirrorError::MissingToken` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, MirrorError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(MirrorError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

/// Derives the GitHub API base URL from a parsed URL.
fn derive_api_base(parsed: &Url) -> Result<Url, MirrorError> {
    let host = parsed
        .host_str()
        .ok_or_else(|| MirrorError::InvalidUrl("URL must include a host".to_owned()))?;

    if host.eq_ignore_ascii_case("github.com") {
        return Url::parse("https://api.github.com")
            .map_err(|error| MirrorError::InvalidUrl(error.to_string()));
    }

    let authority = if host.contains(':') {
        format!("[{host}]")
    } else {
        host.to_owned()
    };
    let mut api_url = Url::parse(&format!("{scheme}://{authority}", scheme = parsed.scheme()))
        .map_err(|error| MirrorError::InvalidUrl(error.to_string()))?;

    api_url
        .set_port(parsed.port())
        .map_err(|()| MirrorError::InvalidUrl("invalid port".to_owned()))?;
    api_url.set_path("api/v3");
    Ok(api_url)
}

/// Parsed pull request URL and derived API base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestLocator {
    api_base: Url,
    owner: RepositoryOwner,
    repository: RepositoryName,
    number: PullRequestNumber,
}

impl PullRequestLocator {
    /// Parses a GitHub pull request URL in the form
    /// `https://github.com/<owner>/<repo>/pull/<number>`.
    ///
    /// # Errors
    ///
    /// Returns `MirrorError::InvalidUrl` when parsing fails,
    /// `MissingPathSegments` when the URL path is not
    /// `/owner/repo/pull/<number>`, and `InvalidPullRequestNumber` when the
    /// final segment is not a positive integer.
    pub fn parse(input: &str) -> Result<Self, MirrorError> {
        let parsed =
            Url::parse(input).map_err(|error| MirrorError::InvalidUrl(error.to_string()))?;

        let mut segments = parsed
            .path_segments()
            .ok_or(MirrorError::MissingPathSegments)?;

        let owner_segment = segments.next().ok_or(MirrorError::MissingPathSegments)?;
        let repository_segment = segments.next().ok_or(MirrorError::MissingPathSegments)?;
        let marker = segments.next().ok_or(MirrorError::MissingPathSegments)?;
        let number_segment = segments.next().ok_or(MirrorError::MissingPathSegments)?;

        if marker != "pull" || number_segment.is_empty() {
            return Err(MirrorError::MissingPathSegments);
        }

        let owner = RepositoryOwner::new(owner_segment)?;
        let repository = RepositoryName::new(repository_segment)?;
        let number = number_segment
            .parse::<u64>()
            .map_err(|_| MirrorError::InvalidPullRequestNumber)
            .and_then(PullRequestNumber::new)?;

        let api_base = derive_api_base(&parsed)?;

        Ok(Self {
            api_base,
            owner,
            repository,
            number,
        })
    }

    /// Builds a locator from already-validated parts, keeping the API base
    /// of an existing locator. Used to address the source pull request once
    /// the mirror's parent repository is known.
    ///
    /// # Errors
    ///
    /// Returns `MirrorError::MissingPathSegments` when owner or repository
    /// is empty, or `InvalidPullRequestNumber` for a zero number.
    pub fn from_parts(
        api_base: Url,
        owner: &str,
        repository: &str,
        number: u64,
    ) -> Result<Self, MirrorError> {
        Ok(Self {
            api_base,
            owner: RepositoryOwner::new(owner)?,
            repository: RepositoryName::new(repository)?,
            number: PullRequestNumber::new(number)?,
        })
    }

    /// API base URL derived from the pull request host.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    /// Pull request number.
    #[must_use]
    pub const fn number(&self) -> PullRequestNumber {
        self.number
    }

    pub(crate) fn pull_request_path(&self) -> String {
        format!(
            "/repos/{}/{}/pulls/{}",
            self.owner.as_str(),
            self.repository.as_str(),
            self.number.get()
        )
    }

    pub(crate) fn repository_path(&self) -> String {
        format!("/repos/{}/{}", self.owner.as_str(), self.repository.as_str())
    }

    pub(crate) fn issue_comments_path(&self) -> String {
        format!(
            "/repos/{}/{}/issues/{}/comments",
            self.owner.as_str(),
            self.repository.as_str(),
            self.number.get()
        )
    }

    pub(crate) fn review_comments_path(&self) -> String {
        format!(
            "/repos/{}/{}/pulls/{}/comments",
            self.owner.as_str(),
            self.repository.as_str(),
            self.number.get()
        )
    }

    pub(crate) fn reviews_path(&self) -> String {
        format!(
            "/repos/{}/{}/pulls/{}/reviews",
            self.owner.as_str(),
            self.repository.as_str(),
            self.number.get()
        )
    }
}
