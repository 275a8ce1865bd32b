//! Domain logic - pure rules independent of any command invocation

pub mod branch;
pub mod changelog;
pub mod merge_request;
pub mod remote;
pub mod semver;

pub use branch::{is_release_branch, sanitize_branch_name, RELEASE_LABEL};
pub use changelog::{parse_log, CommitEntry};
pub use merge_request::{DetailCommit, Issue, MergeRequest, MergeRequestDetail, State};
pub use remote::{normalize_remote_url, project_name};
pub use semver::{compare, Identifier, SemanticVersion};
