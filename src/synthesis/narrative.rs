//! Narrative synthesis over the mixed issue-level discussion.
//!
//! The narrative collapses every issue-level entry of the source pull
//! request (top-level comments, outdated line comments, and review
//! verdicts) into one anonymized sentence counting reviewers, bots, and
//! the author. The sentence is user-visible on the mirror pull request,
//! so the wording, including its spacing quirks, is part of the external
//! contract.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::github::models::{Author, IssueComment, LineComment, ReviewVerdict};

use super::{SynthesizedComment, SynthesizedKind};

/// Login of the recognised automation account whose records are counted
/// as bot activity regardless of the account kind GitHub reports.
pub const AUTOMATION_LOGIN: &str = "DrahtBot";

/// A uniform view over any issue-level record entering the narrative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscussionRecord {
    /// Record author.
    pub author: Author,
    /// Record body, possibly empty.
    pub body: String,
    /// Creation (or submission) timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<&IssueComment> for DiscussionRecord {
    fn from(comment: &IssueComment) -> Self {
        Self {
            author: comment.author.clone(),
            body: comment.body.clone(),
            created_at: comment.created_at,
        }
    }
}

impl From<&LineComment> for DiscussionRecord {
    fn from(comment: &LineComment) -> Self {
        Self {
            author: comment.author.clone(),
            body: comment.body.clone(),
            created_at: comment.created_at,
        }
    }
}

impl From<&ReviewVerdict> for DiscussionRecord {
    fn from(verdict: &ReviewVerdict) -> Self {
        Self {
            author: verdict.author.clone(),
            body: verdict.body.clone(),
            created_at: verdict.submitted_at,
        }
    }
}

impl DiscussionRecord {
    fn is_automation(&self) -> bool {
        self.author.login_is(AUTOMATION_LOGIN) || self.author.is_bot()
    }

    fn is_regular(&self, pr_author: &str) -> bool {
        !self.author.login_is(pr_author) && !self.is_automation()
    }

    fn has_body(&self) -> bool {
        !self.body.trim().is_empty()
    }

    fn lowercase_login(&self) -> Option<String> {
        self.author.login.as_deref().map(str::to_lowercase)
    }
}

/// Synthesizes the single narrative entry representing the issue-level
/// discussion.
///
/// Counts distinct non-author, non-bot reviewers and distinct bot logins
/// with non-blank bodies, then composes one sentence with matching
/// grammar. When no non-bot commenter exists but reviewers are present,
/// the reviewer-count wording is suppressed (a review without comment).
/// The entry's timestamp comes from the first record; an empty input
/// falls back to the current time, the sole clock use in synthesis.
#[must_use]
pub fn narrative_comment(records: &[DiscussionRecord], pr_author: &str) -> SynthesizedComment {
    let has_bot = records.iter().any(DiscussionRecord::is_automation);
    let author_present = records.iter().any(|r| r.author.login_is(pr_author));

    let authors = records
        .iter()
        .filter(|r| r.is_regular(pr_author))
        .filter_map(DiscussionRecord::lowercase_login)
        .collect::<HashSet<_>>()
        .len();
    let unique_bots = records
        .iter()
        .filter(|r| r.is_automation() && r.has_body())
        .filter_map(DiscussionRecord::lowercase_login)
        .collect::<HashSet<_>>()
        .len();
    let non_bot_comment_count = records
        .iter()
        .filter(|r| r.is_regular(pr_author) && r.has_body())
        .count();
    let all_non_empty = records.iter().filter(|r| r.has_body()).count();

    let review_without_comment = non_bot_comment_count == 0 && authors >= 1;
    let suppress_reviewers = review_without_comment || authors == 0;

    let was_were = if all_non_empty <= 1 { "was" } else { "were" };
    let comment_word = if all_non_empty == 1 { "comment" } else { "comments" };
    let reviewers_word = match authors {
        _ if suppress_reviewers => "",
        1 => "reviewer",
        _ => "reviewers",
    };
    let author_count = if suppress_reviewers {
        String::new()
    } else {
        format!(" {authors}")
    };
    let bot_phrase = if has_bot {
        let bots = if unique_bots == 1 {
            "1 bot".to_owned()
        } else {
            format!("{unique_bots} bots")
        };
        if author_present {
            format!(", {bots}")
        } else if suppress_reviewers {
            bots
        } else {
            format!("and {bots}")
        }
    } else {
        String::new()
    };
    let author_clause = if author_present { "and the author" } else { "" };

    let body = format!(
        "There {was_were} {all_non_empty} {comment_word} left by{author_count} \
         {reviewers_word}{bot_phrase} {author_clause} for this pull request"
    );

    SynthesizedComment {
        body,
        commit_sha: None,
        path: None,
        side: None,
        line: None,
        created_at: records.first().map_or_else(Utc::now, |r| r.created_at),
        kind: SynthesizedKind::Issue,
    }
}
