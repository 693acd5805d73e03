//! Summary body generation for replayed records.
//!
//! The generated wording is user-visible on the mirror pull request and
//! therefore part of the external contract: templates, bullet formatting,
//! and timestamp rendering are reproduced exactly, spacing quirks
//! included.

use chrono::{DateTime, Utc};

use crate::github::models::LineComment;

use super::threads::ReviewAction;

/// Notice prefixed to comments whose diff anchor no longer exists.
const OUTDATED_NOTICE: &str = "This is an **OUTDATED** review comment  as the original pull request may have been rebased or force-pushed\n";

/// Renders a timestamp as `YYYY/MM/DD, HH:MM:SS UTC`, zero-padded, using
/// UTC fields rather than locale-dependent formatting.
#[must_use]
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y/%m/%d, %H:%M:%S UTC").to_string()
}

/// One bullet line referencing the original record.
fn bullet(html_url: &str, timestamp: &DateTime<Utc>) -> String {
    format!(
        "- comment link `{html_url}` at {time}",
        time = format_timestamp(timestamp)
    )
}

/// Synthesized body for a group of line comments, plus the earliest
/// member as the representative metadata source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineGroupBody {
    /// Generated summary text.
    pub body: String,
    /// Earliest comment in the group by creation time.
    pub earliest: LineComment,
}

/// Synthesizes the summary body for one line group.
///
/// The lead-in is singular exactly when the group has one member; the
/// representative comment is the earliest by `created_at`. Returns `None`
/// for an empty group.
#[must_use]
pub fn line_group_body(group: &[LineComment]) -> Option<LineGroupBody> {
    let earliest = group.iter().min_by_key(|c| c.created_at)?.clone();

    let lead = if group.len() == 1 {
        "An author".to_owned()
    } else {
        format!("{count} authors", count = group.len())
    };
    let bullets = group
        .iter()
        .map(|c| bullet(&c.html_url, &c.created_at))
        .collect::<Vec<_>>()
        .join("\n");

    Some(LineGroupBody {
        body: format!("{lead} commented here with:\n\n{bullets}."),
        earliest,
    })
}

/// Synthesizes the summary body for a single issue or outdated comment.
///
/// When `outdated` is set the body begins with the fixed OUTDATED notice;
/// otherwise the generic lead-in is used.
#[must_use]
pub fn single_comment_body(html_url: &str, created_at: &DateTime<Utc>, outdated: bool) -> String {
    let lead = if outdated {
        OUTDATED_NOTICE
    } else {
        "An author commented here with:"
    };

    format!(
        "{lead}\n\n{line}.",
        line = bullet(html_url, created_at)
    )
}

/// Synthesizes the summary body for a review verdict.
///
/// An unmapped action renders an empty verb, preserving the original
/// template's degenerate output rather than failing.
#[must_use]
pub fn verdict_body(
    html_url: &str,
    submitted_at: &DateTime<Utc>,
    action: Option<ReviewAction>,
) -> String {
    let verb = action.map_or("", ReviewAction::verb);

    format!(
        "An author reviewed and {verb} here with:\n\n{line}.",
        line = bullet(html_url, submitted_at)
    )
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::rstest;

    use crate::github::models::Author;

    use super::*;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 7, hour, minute, 5)
            .single()
            .expect("valid date")
    }

    fn comment(id: u64, created_at: DateTime<Utc>) -> LineComment {
        LineComment {
            id,
            in_reply_to_id: None,
            review_id: None,
            line: Some(5),
            path: Some("src/lib.rs".to_owned()),
            body: "text".to_owned(),
            commit_sha: None,
            side: None,
            html_url: format!("https://example.com/c/{id}"),
            created_at,
            author: Author::default(),
        }
    }

    #[rstest]
    fn timestamp_is_zero_padded_utc() {
        assert_eq!(format_timestamp(&at(4, 9)), "2024/03/07, 04:09:05 UTC");
    }

    #[rstest]
    fn single_member_group_uses_singular_lead() {
        let group = vec![comment(1, at(10, 0))];
        let synthesized = line_group_body(&group).expect("group is non-empty");
        assert_eq!(
            synthesized.body,
            "An author commented here with:\n\n\
             - comment link `https://example.com/c/1` at 2024/03/07, 10:00:05 UTC."
        );
    }

    #[rstest]
    fn multi_member_group_counts_members_and_picks_earliest() {
        let group = vec![comment(1, at(11, 0)), comment(2, at(9, 30))];
        let synthesized = line_group_body(&group).expect("group is non-empty");
        assert!(
            synthesized.body.starts_with("2 authors commented here with:\n\n"),
            "got: {body}",
            body = synthesized.body
        );
        assert!(
            synthesized.body.contains(
                "- comment link `https://example.com/c/1` at 2024/03/07, 11:00:05 UTC\n\
                 - comment link `https://example.com/c/2` at 2024/03/07, 09:30:05 UTC."
            ),
            "bullets keep encounter order and terminate with a period"
        );
        assert_eq!(synthesized.earliest.id, 2, "representative is the earliest");
    }

    #[rstest]
    fn empty_group_synthesizes_nothing() {
        assert_eq!(line_group_body(&[]), None);
    }

    #[rstest]
    fn outdated_comment_body_begins_with_notice() {
        let body = single_comment_body("https://example.com/c/9", &at(8, 0), true);
        assert!(body.starts_with(OUTDATED_NOTICE), "got: {body}");
        assert!(body.ends_with("- comment link `https://example.com/c/9` at 2024/03/07, 08:00:05 UTC."));
    }

    #[rstest]
    fn plain_comment_body_uses_generic_lead() {
        let body = single_comment_body("https://example.com/c/9", &at(8, 0), false);
        assert!(body.starts_with("An author commented here with:\n\n"));
    }

    #[rstest]
    #[case::approve(Some(ReviewAction::Approve), "approved")]
    #[case::request_changes(Some(ReviewAction::RequestChanges), "requested changes")]
    #[case::comment(Some(ReviewAction::Comment), "commented")]
    fn verdict_body_maps_action_to_verb(
        #[case] action: Option<ReviewAction>,
        #[case] verb: &str,
    ) {
        let body = verdict_body("https://example.com/r/1", &at(12, 0), action);
        assert!(
            body.starts_with(&format!("An author reviewed and {verb} here with:\n\n")),
            "got: {body}"
        );
    }

    #[rstest]
    fn verdict_body_keeps_empty_verb_for_unmapped_action() {
        let body = verdict_body("https://example.com/r/1", &at(12, 0), None);
        assert!(
            body.starts_with("An author reviewed and  here with:\n\n"),
            "unmapped verdicts keep the degenerate double space: {body}"
        );
    }
}
