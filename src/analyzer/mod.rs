//! Unreleased change analysis: commits → merge requests → issues

pub mod correlation;
pub mod history;
pub mod rules;

pub use correlation::{
    correlate, unreleased_commits, CorrelatedCommit, LinkedMergeRequest, UnreleasedChanges,
};
pub use history::ReleaseHistory;
pub use rules::{CorrelationRules, ISSUE_REF_PATTERN, RELEASE_TAG_PATTERN};
