//! Partitioning of inline comments into line groups and outdated entries.

use std::collections::BTreeMap;

use crate::github::models::LineComment;

/// Inline comments partitioned by anchor state.
///
/// Every comment lands in exactly one place: keyed by its diff line when
/// still anchored, or in `outdated` when its anchor no longer exists
/// (`line` is absent). Encounter order is preserved within each group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineGroups {
    /// Active comments grouped by diff line.
    pub by_line: BTreeMap<u32, Vec<LineComment>>,
    /// Comments whose anchor line no longer exists in the current diff.
    pub outdated: Vec<LineComment>,
}

/// Partitions inline comments into line groups and outdated entries.
///
/// An empty input is not an error and yields empty structures.
#[must_use]
pub fn group_by_line(comments: &[LineComment]) -> LineGroups {
    let mut groups = LineGroups::default();

    for comment in comments {
        match comment.line {
            Some(line) => groups
                .by_line
                .entry(line)
                .or_default()
                .push(comment.clone()),
            None => groups.outdated.push(comment.clone()),
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    use crate::github::models::Author;

    use super::*;

    fn comment(id: u64, line: Option<u32>) -> LineComment {
        LineComment {
            id,
            in_reply_to_id: None,
            review_id: None,
            line,
            path: Some("src/lib.rs".to_owned()),
            body: format!("comment {id}"),
            commit_sha: Some("abc123".to_owned()),
            side: None,
            html_url: format!("https://example.com/c/{id}"),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("valid date"),
            author: Author::default(),
        }
    }

    #[rstest]
    fn empty_input_yields_empty_structures() {
        let groups = group_by_line(&[]);
        assert!(groups.by_line.is_empty());
        assert!(groups.outdated.is_empty());
    }

    #[rstest]
    fn groups_by_line_preserving_encounter_order() {
        let comments = vec![
            comment(1, Some(5)),
            comment(2, Some(9)),
            comment(3, Some(5)),
        ];
        let groups = group_by_line(&comments);

        let ids: Vec<u64> = groups
            .by_line
            .get(&5)
            .map(|group| group.iter().map(|c| c.id).collect())
            .unwrap_or_default();
        assert_eq!(ids, vec![1, 3], "encounter order within a line group");
        assert_eq!(groups.by_line.len(), 2);
        assert!(groups.outdated.is_empty());
    }

    #[rstest]
    fn outdated_comments_never_appear_in_line_groups() {
        let comments = vec![comment(1, None), comment(2, Some(7)), comment(3, None)];
        let groups = group_by_line(&comments);

        let outdated_ids: Vec<u64> = groups.outdated.iter().map(|c| c.id).collect();
        assert_eq!(outdated_ids, vec![1, 3]);
        for (line, group) in &groups.by_line {
            for member in group {
                assert_eq!(member.line, Some(*line), "group key matches member line");
            }
        }
    }
}
