//! Aggregation of the three activity streams into one ordered list.

use crate::github::models::{IssueComment, LineComment, ReviewVerdict};

use super::body::line_group_body;
use super::grouping::group_by_line;
use super::narrative::{DiscussionRecord, narrative_comment};
use super::{SynthesizedComment, SynthesizedKind};

/// Composes grouping, body synthesis, and narrative synthesis into one
/// chronologically ordered list of synthesized comments.
///
/// Line comments are grouped by diff line and each group becomes one
/// review-kind entry carrying the earliest member's metadata, sorted
/// ascending by that timestamp. Issue comments, outdated line comments,
/// and verdicts together form the narrative input; the single narrative
/// entry is prepended to the sorted review entries.
///
/// This list is a separate output from the thread reconstruction that
/// drives replay; the two are not reconciled.
#[must_use]
pub fn synthesize_activity(
    line_comments: &[LineComment],
    issue_comments: &[IssueComment],
    verdicts: &[ReviewVerdict],
    pr_author: &str,
) -> Vec<SynthesizedComment> {
    let groups = group_by_line(line_comments);

    let mut review_entries: Vec<SynthesizedComment> = groups
        .by_line
        .iter()
        .filter_map(|(line, group)| {
            let synthesized = line_group_body(group)?;
            Some(SynthesizedComment {
                body: synthesized.body,
                commit_sha: synthesized.earliest.commit_sha.clone(),
                path: synthesized.earliest.path.clone(),
                side: synthesized.earliest.side,
                line: Some(*line),
                created_at: synthesized.earliest.created_at,
                kind: SynthesizedKind::Review,
            })
        })
        .collect();
    review_entries.sort_by_key(|entry| entry.created_at);

    let discussion: Vec<DiscussionRecord> = issue_comments
        .iter()
        .map(DiscussionRecord::from)
        .chain(groups.outdated.iter().map(DiscussionRecord::from))
        .chain(verdicts.iter().map(DiscussionRecord::from))
        .collect();
    let narrative = narrative_comment(&discussion, pr_author);

    let mut entries = Vec::with_capacity(review_entries.len() + 1);
    entries.push(narrative);
    entries.append(&mut review_entries);
    entries
}
