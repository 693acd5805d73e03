//! Data models for pull request activity records.
//!
//! This module contains domain models for the three raw activity streams
//! of a pull request: inline review comments, top-level issue comments,
//! and review verdicts. Types prefixed with `Api` are internal
//! deserialisation targets that convert into public domain types;
//! optionality is decided here, once, at the data-source boundary rather
//! than checked throughout the synthesis core. `id` and the creation
//! timestamp are required: a record missing either is malformed upstream
//! and fails deserialisation.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// The author of an activity record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Author {
    /// Account login, when the account still exists.
    pub login: Option<String>,
    /// Account kind as reported by GitHub (e.g. `User`, `Bot`).
    pub kind: Option<String>,
}

impl Author {
    /// Whether the login matches `name`, compared case-insensitively.
    #[must_use]
    pub fn login_is(&self, name: &str) -> bool {
        self.login
            .as_deref()
            .is_some_and(|login| login.eq_ignore_ascii_case(name))
    }

    /// Whether GitHub classifies the account as a bot.
    #[must_use]
    pub fn is_bot(&self) -> bool {
        self.kind
            .as_deref()
            .is_some_and(|kind| kind.eq_ignore_ascii_case("bot"))
    }
}

/// Which side of the diff a review comment anchors to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffSide {
    /// The deletion side of the diff.
    Left,
    /// The addition side of the diff.
    Right,
}

impl DiffSide {
    fn from_api(value: &str) -> Option<Self> {
        match value {
            "LEFT" => Some(Self::Left),
            "RIGHT" => Some(Self::Right),
            _ => None,
        }
    }
}

/// Inline review comment anchored to a line of the diff.
///
/// `line` is `None` when the anchor no longer exists in the current diff:
/// the comment is outdated and excluded from line grouping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineComment {
    /// Comment identifier.
    pub id: u64,
    /// Identifier of the thread head this comment replies to, if any.
    pub in_reply_to_id: Option<u64>,
    /// Identifier of the review submission this comment belongs to.
    pub review_id: Option<u64>,
    /// Line number in the current diff, absent when outdated.
    pub line: Option<u32>,
    /// File path the comment is attached to.
    pub path: Option<String>,
    /// Comment body, possibly empty.
    pub body: String,
    /// Commit SHA the comment was made against.
    pub commit_sha: Option<String>,
    /// Diff side the comment anchors to.
    pub side: Option<DiffSide>,
    /// HTML URL of the original comment.
    pub html_url: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Comment author.
    pub author: Author,
}

/// Top-level comment on the pull request as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueComment {
    /// Comment identifier.
    pub id: u64,
    /// Comment body, possibly empty.
    pub body: String,
    /// HTML URL of the original comment.
    pub html_url: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Comment author.
    pub author: Author,
}

/// One review submission event: approve, request changes, or comment.
///
/// `state` carries the verbatim API value; the synthesis core remaps it
/// to the replay vocabulary and treats unrecognised values explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewVerdict {
    /// Review identifier.
    pub id: u64,
    /// Verbatim review state (e.g. `APPROVED`, `CHANGES_REQUESTED`).
    pub state: String,
    /// Review body, possibly empty.
    pub body: String,
    /// HTML URL of the original review.
    pub html_url: String,
    /// Submission timestamp.
    pub submitted_at: DateTime<Utc>,
    /// Commit SHA the review was submitted against.
    pub commit_sha: Option<String>,
    /// Review author.
    pub author: Author,
}

/// Parent repository of a fork, used to locate the source pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentRepository {
    /// Owner login of the parent repository.
    pub owner: String,
    /// Name of the parent repository.
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiUser {
    pub(super) login: Option<String>,
    #[serde(rename = "type")]
    pub(super) kind: Option<String>,
}

impl From<Option<ApiUser>> for Author {
    fn from(value: Option<ApiUser>) -> Self {
        value.map_or_else(Self::default, |user| Self {
            login: user.login,
            kind: user.kind,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiReviewComment {
    pub(super) id: u64,
    pub(super) in_reply_to_id: Option<u64>,
    pub(super) pull_request_review_id: Option<u64>,
    pub(super) line: Option<u32>,
    pub(super) path: Option<String>,
    pub(super) body: Option<String>,
    pub(super) commit_id: Option<String>,
    pub(super) side: Option<String>,
    pub(super) html_url: String,
    pub(super) created_at: DateTime<Utc>,
    pub(super) user: Option<ApiUser>,
}

impl From<ApiReviewComment> for LineComment {
    fn from(value: ApiReviewComment) -> Self {
        Self {
            id: value.id,
            in_reply_to_id: value.in_reply_to_id,
            review_id: value.pull_request_review_id,
            line: value.line,
            path: value.path,
            body: value.body.unwrap_or_default(),
            commit_sha: value.commit_id,
            side: value.side.as_deref().and_then(DiffSide::from_api),
            html_url: value.html_url,
            created_at: value.created_at,
            author: value.user.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiIssueComment {
    pub(super) id: u64,
    pub(super) body: Option<String>,
    pub(super) html_url: String,
    pub(super) created_at: DateTime<Utc>,
    pub(super) user: Option<ApiUser>,
}

impl From<ApiIssueComment> for IssueComment {
    fn from(value: ApiIssueComment) -> Self {
        Self {
            id: value.id,
            body: value.body.unwrap_or_default(),
            html_url: value.html_url,
            created_at: value.created_at,
            author: value.user.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiReview {
    pub(super) id: u64,
    pub(super) state: String,
    pub(super) body: Option<String>,
    pub(super) html_url: String,
    pub(super) submitted_at: DateTime<Utc>,
    pub(super) commit_id: Option<String>,
    pub(super) user: Option<ApiUser>,
}

impl From<ApiReview> for ReviewVerdict {
    fn from(value: ApiReview) -> Self {
        Self {
            id: value.id,
            state: value.state,
            body: value.body.unwrap_or_default(),
            html_url: value.html_url,
            submitted_at: value.submitted_at,
            commit_sha: value.commit_id,
            author: value.user.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiRepository {
    pub(super) parent: Option<ApiParentRepository>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiParentRepository {
    pub(super) name: String,
    pub(super) owner: ApiRepositoryOwner,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiRepositoryOwner {
    pub(super) login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiPullRequest {
    pub(super) user: Option<ApiUser>,
}
