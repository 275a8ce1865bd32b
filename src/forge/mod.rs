//! Merge request and issue tracker queries
//!
//! - [gh::GhCli]: the GitHub command line client, JSON output
//! - [mock::MockForge]: in-memory data for tests

pub mod gh;
pub mod mock;

pub use gh::GhCli;
pub use mock::MockForge;

use crate::domain::{Issue, MergeRequest, MergeRequestDetail, State};
use crate::error::Result;

/// Source of merge request and issue metadata
pub trait Forge {
    /// List merge requests in `state`
    fn merge_requests(&self, state: State) -> Result<Vec<MergeRequest>>;

    /// List issues in `state`, or in any state when `None`
    fn issues(&self, state: Option<State>) -> Result<Vec<Issue>>;

    /// Extended text of one merge request, `None` if the forge has no such
    /// request
    fn merge_request_detail(&self, number: u64) -> Result<Option<MergeRequestDetail>>;
}
