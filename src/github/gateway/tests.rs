//! Tests for the Octocrab gateway implementations.

type FixtureResult<T> = Result<T, Box<dyn std::error::Error>>;

use rstest::{fixture, rstest};
use tokio::runtime::Runtime;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::github::error::MirrorError;
use crate::github::locator::{PersonalAccessToken, PullRequestLocator};
use crate::synthesis::{ReplayComment, ReplayRequest, ReviewAction};

use super::{
    ActivityGateway, OctocrabActivityGateway, OctocrabReplayGateway, ReplayGateway,
};

trait BlocksOnRuntime {
    fn runtime(&self) -> &Runtime;

    fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime().block_on(future)
    }
}

struct GatewayFixture {
    runtime: Runtime,
    server: MockServer,
    locator: PullRequestLocator,
    activity: OctocrabActivityGateway,
    replay: OctocrabReplayGateway,
}

impl BlocksOnRuntime for GatewayFixture {
    fn runtime(&self) -> &Runtime {
        &self.runtime
    }
}

#[fixture]
fn gateway_fixture() -> FixtureResult<GatewayFixture> {
    let token = PersonalAccessToken::new("valid-token")?;
    let runtime = Runtime::new()?;
    let server = runtime.block_on(MockServer::start());
    let locator = PullRequestLocator::parse(&format!("{}/owner/repo/pull/42", server.uri()))?;
    let api_base = format!("{}/api/v3", server.uri());
    let _guard = runtime.enter();
    let activity = OctocrabActivityGateway::new(&token, &api_base)?;
    let replay = OctocrabReplayGateway::new(&token, &api_base)?;
    Ok(GatewayFixture {
        runtime,
        server,
        locator,
        activity,
        replay,
    })
}

#[rstest]
fn list_line_comments_maps_records(gateway_fixture: FixtureResult<GatewayFixture>) {
    let fixture = gateway_fixture.expect("fixture should succeed");

    let response = ResponseTemplate::new(200).set_body_json(serde_json::json!([
        {
            "id": 1,
            "in_reply_to_id": null,
            "pull_request_review_id": 10,
            "line": 5,
            "path": "src/main.rs",
            "body": "First comment",
            "commit_id": "abc123",
            "side": "RIGHT",
            "html_url": "https://example.com/c/1",
            "created_at": "2024-01-01T00:00:00Z",
            "user": { "login": "alice", "type": "User" }
        },
        {
            "id": 2,
            "in_reply_to_id": 1,
            "pull_request_review_id": null,
            "line": null,
            "path": "src/main.rs",
            "body": "Outdated reply",
            "commit_id": "abc123",
            "side": null,
            "html_url": "https://example.com/c/2",
            "created_at": "2024-01-01T01:00:00Z",
            "user": { "login": "bob", "type": "User" }
        }
    ]));

    fixture.block_on(
        Mock::given(method("GET"))
            .and(path("/api/v3/repos/owner/repo/pulls/42/comments"))
            .respond_with(response)
            .mount(&fixture.server),
    );

    let comments = fixture
        .block_on(fixture.activity.list_line_comments(&fixture.locator))
        .expect("request should succeed");

    assert_eq!(comments.len(), 2, "expected two comments");
    let first = comments.first().expect("should have first comment");
    assert_eq!(first.id, 1);
    assert_eq!(first.review_id, Some(10));
    assert_eq!(first.line, Some(5));
    let second = comments.get(1).expect("should have second comment");
    assert_eq!(second.in_reply_to_id, Some(1));
    assert_eq!(second.line, None, "null line marks the comment outdated");
}

#[rstest]
fn list_review_verdicts_keeps_verbatim_state(gateway_fixture: FixtureResult<GatewayFixture>) {
    let fixture = gateway_fixture.expect("fixture should succeed");

    let response = ResponseTemplate::new(200).set_body_json(serde_json::json!([
        {
            "id": 10,
            "state": "CHANGES_REQUESTED",
            "body": "Please fix",
            "html_url": "https://example.com/r/10",
            "submitted_at": "2024-01-01T00:05:00Z",
            "commit_id": "abc123",
            "user": { "login": "carol", "type": "User" }
        }
    ]));

    fixture.block_on(
        Mock::given(method("GET"))
            .and(path("/api/v3/repos/owner/repo/pulls/42/reviews"))
            .respond_with(response)
            .mount(&fixture.server),
    );

    let verdicts = fixture
        .block_on(fixture.activity.list_review_verdicts(&fixture.locator))
        .expect("request should succeed");

    let verdict = verdicts.first().expect("should have one verdict");
    assert_eq!(verdict.state, "CHANGES_REQUESTED");
    assert_eq!(verdict.body, "Please fix");
}

#[rstest]
fn parent_repository_resolves_fork_linkage(gateway_fixture: FixtureResult<GatewayFixture>) {
    let fixture = gateway_fixture.expect("fixture should succeed");

    let response = ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "id": 99,
        "name": "repo",
        "parent": {
            "name": "repo",
            "owner": { "login": "upstream" }
        }
    }));

    fixture.block_on(
        Mock::given(method("GET"))
            .and(path("/api/v3/repos/owner/repo"))
            .respond_with(response)
            .mount(&fixture.server),
    );

    let parent = fixture
        .block_on(fixture.activity.parent_repository(&fixture.locator))
        .expect("request should succeed")
        .expect("repository is a fork");

    assert_eq!(parent.owner, "upstream");
    assert_eq!(parent.name, "repo");
}

#[rstest]
fn create_review_posts_replay_vocabulary(gateway_fixture: FixtureResult<GatewayFixture>) {
    let fixture = gateway_fixture.expect("fixture should succeed");

    let expected_body = serde_json::json!({
        "event": "APPROVE",
        "comments": [{ "path": "src/lib.rs", "body": "head comment" }]
    });
    fixture.block_on(
        Mock::given(method("POST"))
            .and(path("/api/v3/repos/owner/repo/pulls/42/reviews"))
            .and(body_partial_json(&expected_body))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": 1})))
            .expect(1)
            .mount(&fixture.server),
    );

    let request = ReplayRequest {
        body: "review body".to_owned(),
        commit_sha: Some("abc123".to_owned()),
        event: ReviewAction::Approve,
        comments: vec![ReplayComment {
            path: Some("src/lib.rs".to_owned()),
            body: "head comment".to_owned(),
        }],
    };

    fixture
        .block_on(fixture.replay.create_review(&fixture.locator, &request))
        .expect("replay should succeed");
}

#[rstest]
fn rejected_token_maps_to_authentication_error(gateway_fixture: FixtureResult<GatewayFixture>) {
    let fixture = gateway_fixture.expect("fixture should succeed");

    fixture.block_on(
        Mock::given(method("GET"))
            .and(path("/api/v3/repos/owner/repo/pulls/42/comments"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "message": "Bad credentials"
            })))
            .mount(&fixture.server),
    );

    let result = fixture.block_on(fixture.activity.list_line_comments(&fixture.locator));
    assert!(
        matches!(result, Err(MirrorError::Authentication { .. })),
        "expected Authentication, got {result:?}"
    );
}

#[rstest]
fn malformed_api_base_is_rejected_at_construction() -> FixtureResult<()> {
    let token = PersonalAccessToken::new("valid-token")?;

    let result = OctocrabActivityGateway::new(&token, "not a uri");
    assert!(
        matches!(result, Err(MirrorError::InvalidUrl(ref message)) if message.contains("not a uri")),
        "the rejected base should be named in the error"
    );
    Ok(())
}
