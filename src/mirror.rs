//! Orchestration of one mirroring run.
//!
//! A run fetches the three activity streams of the source pull request,
//! reconstructs review threads, synthesizes summary text, and replays one
//! review per group on the mirror pull request. Replay calls fan out
//! concurrently and their outcomes stay independent: one group failing
//! never prevents the others from being attempted.

use futures::future::join_all;
use tracing::{info, warn};

use crate::github::error::MirrorError;
use crate::github::gateway::{ActivityGateway, ReplayGateway};
use crate::github::locator::PullRequestLocator;
use crate::synthesis::{SynthesizedComment, group_threads_by_verdict, synthesize_activity};

/// The outcome of replaying one review group.
#[derive(Debug)]
pub struct GroupOutcome {
    /// Identifier of the originating verdict.
    pub verdict_id: u64,
    /// Result of the replay call for this group.
    pub result: Result<(), MirrorError>,
}

/// Summary of a completed mirroring run.
#[derive(Debug)]
pub struct MirrorReport {
    /// Per-group replay outcomes, in group order.
    pub outcomes: Vec<GroupOutcome>,
    /// Verdict ids skipped because their state never mapped to a replay
    /// event.
    pub skipped_verdicts: Vec<u64>,
    /// The chronological narrative and per-line synthesized entries.
    /// Computed for inspection; not posted by the replay path.
    pub synthesized: Vec<SynthesizedComment>,
}

impl MirrorReport {
    /// Number of groups replayed successfully.
    #[must_use]
    pub fn replayed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Number of groups whose replay failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }
}

/// Mirrors the review activity of a source pull request onto a mirror
/// pull request, using an activity gateway as source and a replay
/// gateway as sink.
pub struct MirrorRun<'gateways, Activity, Replay>
where
    Activity: ActivityGateway,
    Replay: ReplayGateway,
{
    activity: &'gateways Activity,
    replay: &'gateways Replay,
}

impl<'gateways, Activity, Replay> MirrorRun<'gateways, Activity, Replay>
where
    Activity: ActivityGateway,
    Replay: ReplayGateway,
{
    /// Creates a new run over the provided gateways.
    #[must_use]
    pub const fn new(activity: &'gateways Activity, replay: &'gateways Replay) -> Self {
        Self { activity, replay }
    }

    /// Resolves the source pull request locator from the mirror's parent
    /// repository.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::MissingParentRepository`] when the mirror
    /// repository is not a fork, aborting the run before any synthesis,
    /// or any gateway error from the repository lookup.
    pub async fn resolve_source(
        &self,
        mirror: &PullRequestLocator,
        source_number: u64,
    ) -> Result<PullRequestLocator, MirrorError> {
        let parent = self.activity.parent_repository(mirror).await?.ok_or_else(|| {
            MirrorError::MissingParentRepository {
                owner: mirror.owner().as_str().to_owned(),
                repository: mirror.repository().as_str().to_owned(),
            }
        })?;

        PullRequestLocator::from_parts(
            mirror.api_base().clone(),
            &parent.owner,
            &parent.name,
            source_number,
        )
    }

    /// Runs one mirroring pass from `source` to `mirror`.
    ///
    /// # Errors
    ///
    /// Returns a [`MirrorError`] when fetching any of the activity streams
    /// fails. Replay failures do not fail the run; they surface as
    /// per-group outcomes in the report.
    pub async fn run(
        &self,
        source: &PullRequestLocator,
        mirror: &PullRequestLocator,
    ) -> Result<MirrorReport, MirrorError> {
        let pr_author = self
            .activity
            .pull_request_author(source)
            .await?
            .unwrap_or_default();
        let line_comments = self.activity.list_line_comments(source).await?;
        let issue_comments = self.activity.list_issue_comments(source).await?;
        let verdicts = self.activity.list_review_verdicts(source).await?;

        let synthesized =
            synthesize_activity(&line_comments, &issue_comments, &verdicts, &pr_author);
        let groups = group_threads_by_verdict(&line_comments, &verdicts);
        info!(
            groups = groups.len(),
            synthesized = synthesized.len(),
            "reconstructed source activity"
        );

        let mut skipped_verdicts = Vec::new();
        let mut requests = Vec::new();
        for group in &groups {
            match group.replay_request() {
                Some(request) => requests.push((group.verdict.id, request)),
                None => {
                    warn!(
                        verdict_id = group.verdict.id,
                        state = %group.verdict.state,
                        "skipping group with unrecognised verdict state"
                    );
                    skipped_verdicts.push(group.verdict.id);
                }
            }
        }

        let outcomes = join_all(requests.iter().map(|(verdict_id, request)| async move {
            GroupOutcome {
                verdict_id: *verdict_id,
                result: self.replay.create_review(mirror, request).await,
            }
        }))
        .await;

        Ok(MirrorReport {
            outcomes,
            skipped_verdicts,
            synthesized,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use mockall::predicate::always;
    use rstest::rstest;

    use crate::github::gateway::{MockActivityGateway, MockReplayGateway};
    use crate::github::models::{Author, LineComment, ParentRepository, ReviewVerdict};

    use super::*;

    fn mirror_locator() -> PullRequestLocator {
        PullRequestLocator::parse("https://github.com/fork/repo/pull/3")
            .expect("mirror locator should parse")
    }

    fn source_locator() -> PullRequestLocator {
        PullRequestLocator::parse("https://github.com/upstream/repo/pull/42")
            .expect("source locator should parse")
    }

    fn head_comment(id: u64, review_id: u64) -> LineComment {
        LineComment {
            id,
            in_reply_to_id: None,
            review_id: Some(review_id),
            line: Some(5),
            path: Some("src/lib.rs".to_owned()),
            body: format!("comment {id}"),
            commit_sha: None,
            side: None,
            html_url: format!("u{id}"),
            created_at: Utc
                .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
                .single()
                .expect("valid date"),
            author: Author::default(),
        }
    }

    fn verdict(id: u64, state: &str) -> ReviewVerdict {
        ReviewVerdict {
            id,
            state: state.to_owned(),
            body: format!("review {id}"),
            html_url: format!("r{id}"),
            submitted_at: Utc
                .with_ymd_and_hms(2024, 1, 1, 0, 5, 0)
                .single()
                .expect("valid date"),
            commit_sha: None,
            author: Author::default(),
        }
    }

    fn activity_with(
        line_comments: Vec<LineComment>,
        verdicts: Vec<ReviewVerdict>,
    ) -> MockActivityGateway {
        let mut activity = MockActivityGateway::new();
        activity
            .expect_pull_request_author()
            .returning(|_| Ok(Some("satoshi".to_owned())));
        activity
            .expect_list_line_comments()
            .returning(move |_| Ok(line_comments.clone()));
        activity
            .expect_list_issue_comments()
            .returning(|_| Ok(Vec::new()));
        activity
            .expect_list_review_verdicts()
            .returning(move |_| Ok(verdicts.clone()));
        activity
    }

    #[rstest]
    #[tokio::test]
    async fn missing_parent_repository_is_fatal() {
        let mut activity = MockActivityGateway::new();
        activity.expect_parent_repository().returning(|_| Ok(None));
        let replay = MockReplayGateway::new();

        let run = MirrorRun::new(&activity, &replay);
        let result = run.resolve_source(&mirror_locator(), 42).await;
        assert!(
            matches!(result, Err(MirrorError::MissingParentRepository { .. })),
            "expected MissingParentRepository, got {result:?}"
        );
    }

    #[rstest]
    #[tokio::test]
    async fn resolves_source_from_parent_repository() {
        let mut activity = MockActivityGateway::new();
        activity.expect_parent_repository().returning(|_| {
            Ok(Some(ParentRepository {
                owner: "upstream".to_owned(),
                name: "repo".to_owned(),
            }))
        });
        let replay = MockReplayGateway::new();

        let run = MirrorRun::new(&activity, &replay);
        let source = run
            .resolve_source(&mirror_locator(), 42)
            .await
            .expect("parent lookup should succeed");
        assert_eq!(source.owner().as_str(), "upstream");
        assert_eq!(source.number().get(), 42);
    }

    #[rstest]
    #[tokio::test]
    async fn one_failing_group_does_not_prevent_the_others() {
        let activity = activity_with(
            vec![head_comment(1, 10), head_comment(2, 20)],
            vec![verdict(10, "APPROVED"), verdict(20, "COMMENTED")],
        );
        let mut replay = MockReplayGateway::new();
        replay
            .expect_create_review()
            .with(always(), always())
            .times(2)
            .returning(|_, request| {
                if request.body == "review 10" {
                    Err(MirrorError::Api {
                        message: "boom".to_owned(),
                    })
                } else {
                    Ok(())
                }
            });

        let run = MirrorRun::new(&activity, &replay);
        let report = run
            .run(&source_locator(), &mirror_locator())
            .await
            .expect("run should complete despite a replay failure");

        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.replayed(), 1);
        assert_eq!(report.failed(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn unmapped_verdict_states_are_skipped_not_replayed() {
        let activity = activity_with(
            vec![head_comment(1, 10), head_comment(2, 20)],
            vec![verdict(10, "PENDING"), verdict(20, "APPROVED")],
        );
        let mut replay = MockReplayGateway::new();
        replay.expect_create_review().times(1).returning(|_, _| Ok(()));

        let run = MirrorRun::new(&activity, &replay);
        let report = run
            .run(&source_locator(), &mirror_locator())
            .await
            .expect("run should complete");

        assert_eq!(report.skipped_verdicts, vec![10]);
        assert_eq!(report.replayed(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn empty_streams_produce_an_empty_replay_and_one_narrative_entry() {
        let activity = activity_with(Vec::new(), Vec::new());
        let replay = MockReplayGateway::new();

        let run = MirrorRun::new(&activity, &replay);
        let report = run
            .run(&source_locator(), &mirror_locator())
            .await
            .expect("run should complete");

        assert!(report.outcomes.is_empty());
        assert_eq!(report.synthesized.len(), 1, "narrative entry only");
    }
}
