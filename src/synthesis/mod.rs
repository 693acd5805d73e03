//! Comment-thread reconstruction and text synthesis.
//!
//! The synthesis core is a set of pure transformations over the three raw
//! activity streams of a pull request: inline review comments are
//! partitioned by diff line, reply threads are reconstructed from flat
//! foreign-keyed records, and deterministic, anonymized summary text is
//! generated for replay on a mirror pull request. No function here
//! performs I/O or mutates shared state; empty input degrades to empty
//! output rather than an error.

pub mod aggregate;
pub mod body;
pub mod grouping;
pub mod narrative;
pub mod threads;

use chrono::{DateTime, Utc};

use crate::github::models::DiffSide;

pub use aggregate::synthesize_activity;
pub use body::{line_group_body, single_comment_body, verdict_body};
pub use grouping::{LineGroups, group_by_line};
pub use narrative::{DiscussionRecord, narrative_comment};
pub use threads::{
    ReplayComment, ReplayRequest, ReviewAction, ReviewGroup, Thread, group_threads_by_verdict,
};

/// Which kind of record a synthesized comment replays as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesizedKind {
    /// Replays as a top-level issue comment.
    Issue,
    /// Replays as an inline review comment.
    Review,
}

/// A synthesized summary comment carrying enough metadata to be replayed
/// as either an issue comment or a line comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedComment {
    /// Generated summary text.
    pub body: String,
    /// Commit SHA of the representative record, when line-anchored.
    pub commit_sha: Option<String>,
    /// File path of the representative record, when line-anchored.
    pub path: Option<String>,
    /// Diff side of the representative record, when line-anchored.
    pub side: Option<DiffSide>,
    /// Diff line the group was keyed by, when line-anchored.
    pub line: Option<u32>,
    /// Timestamp of the earliest record in the group.
    pub created_at: DateTime<Utc>,
    /// Replay kind.
    pub kind: SynthesizedKind,
}
