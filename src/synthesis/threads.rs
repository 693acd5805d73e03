//! Reply-thread reconstruction and verdict grouping.
//!
//! Inline comments arrive as flat records joined by foreign-key-style
//! fields: `in_reply_to_id` links a reply to its thread head, and the
//! head's `review_id` links the thread to the review verdict it
//! originated from. Both joins run over indexes built once per call
//! rather than repeated linear scans. Reply chains are single-level by
//! contract: the upstream service records the thread root as every
//! reply's parent, so a reply to a reply arrives as a sibling of the
//! head and is kept that way.

use std::collections::HashMap;

use serde::Serialize;

use crate::github::models::{LineComment, ReviewVerdict};

/// Review event vocabulary accepted by the replay sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewAction {
    /// The review approved the changes.
    Approve,
    /// The review requested changes.
    RequestChanges,
    /// The review commented without a verdict.
    Comment,
}

impl ReviewAction {
    /// Remaps a source verdict state to the replay vocabulary. Returns
    /// `None` for unrecognised states; the caller decides how to handle
    /// the degenerate verdict.
    #[must_use]
    pub fn from_state(state: &str) -> Option<Self> {
        match state {
            "APPROVED" => Some(Self::Approve),
            "CHANGES_REQUESTED" => Some(Self::RequestChanges),
            "COMMENTED" => Some(Self::Comment),
            _ => None,
        }
    }

    /// The replay event name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approve => "APPROVE",
            Self::RequestChanges => "REQUEST_CHANGES",
            Self::Comment => "COMMENT",
        }
    }

    /// The past-tense verb used in synthesized verdict bodies.
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Approve => "approved",
            Self::RequestChanges => "requested changes",
            Self::Comment => "commented",
        }
    }
}

/// A thread head together with its direct replies, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thread {
    /// The comment opening the thread; never a reply itself.
    pub head: LineComment,
    /// Comments replying to the head, in arrival order.
    pub replies: Vec<LineComment>,
}

impl Thread {
    /// The head followed by its replies.
    #[must_use]
    pub fn values(&self) -> Vec<&LineComment> {
        std::iter::once(&self.head).chain(&self.replies).collect()
    }
}

/// A review verdict paired with every thread it originated.
///
/// `action` is the verdict state remapped to the replay vocabulary;
/// `None` marks an unrecognised source state. The degenerate verdict
/// still participates in grouping, but carries no usable replay event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewGroup {
    /// The originating verdict.
    pub verdict: ReviewVerdict,
    /// Remapped replay event, absent for unrecognised states.
    pub action: Option<ReviewAction>,
    /// Threads whose heads belong to this verdict. Never empty: groups
    /// without threads are dropped entirely.
    pub threads: Vec<Thread>,
}

/// One comment of a replay request: the path and body of a thread head.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayComment {
    /// File path of the thread head.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Body of the thread head.
    pub body: String,
}

/// A review creation request for the mirror pull request.
///
/// Only each thread's head contributes a comment; reply chains and the
/// narrative synthesis are computed separately and are not part of this
/// replay call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayRequest {
    /// Body of the originating verdict.
    pub body: String,
    /// Commit SHA of the originating verdict.
    #[serde(rename = "commit_id", skip_serializing_if = "Option::is_none")]
    pub commit_sha: Option<String>,
    /// Replay event.
    pub event: ReviewAction,
    /// One entry per thread, drawn from the thread head.
    pub comments: Vec<ReplayComment>,
}

impl ReviewGroup {
    /// Builds the replay request for this group, or `None` when the
    /// verdict state never mapped to a replay event.
    #[must_use]
    pub fn replay_request(&self) -> Option<ReplayRequest> {
        let event = self.action?;
        Some(ReplayRequest {
            body: self.verdict.body.clone(),
            commit_sha: self.verdict.commit_sha.clone(),
            event,
            comments: self
                .threads
                .iter()
                .map(|thread| ReplayComment {
                    path: thread.head.path.clone(),
                    body: thread.head.body.clone(),
                })
                .collect(),
        })
    }
}

/// Reconstructs reply threads and associates each with its originating
/// verdict.
///
/// Thread heads are comments with no `in_reply_to_id`; replies attach to
/// the head whose id they name, in arrival order. Group order follows
/// the supplied verdicts; thread order within a group follows the order
/// of matching heads. Groups with no threads are dropped.
#[must_use]
pub fn group_threads_by_verdict(
    line_comments: &[LineComment],
    verdicts: &[ReviewVerdict],
) -> Vec<ReviewGroup> {
    if verdicts.is_empty() {
        return Vec::new();
    }

    let mut replies_by_head: HashMap<u64, Vec<LineComment>> = HashMap::new();
    for comment in line_comments {
        if let Some(head_id) = comment.in_reply_to_id {
            replies_by_head
                .entry(head_id)
                .or_default()
                .push(comment.clone());
        }
    }

    let mut threads_by_review: HashMap<u64, Vec<Thread>> = HashMap::new();
    for comment in line_comments {
        if comment.in_reply_to_id.is_some() {
            continue;
        }
        let Some(review_id) = comment.review_id else {
            continue;
        };
        let thread = Thread {
            head: comment.clone(),
            replies: replies_by_head.remove(&comment.id).unwrap_or_default(),
        };
        threads_by_review.entry(review_id).or_default().push(thread);
    }

    verdicts
        .iter()
        .filter_map(|verdict| {
            let threads = threads_by_review.remove(&verdict.id).unwrap_or_default();
            if threads.is_empty() {
                return None;
            }
            Some(ReviewGroup {
                verdict: verdict.clone(),
                action: ReviewAction::from_state(&verdict.state),
                threads,
            })
        })
        .collect()
}
