use std::fmt;

/// Non-fatal conditions met while gathering build information.
/// The affected step degrades to "nothing found" and the run goes on.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No tag matches the version pattern; versions start from v0.0.0
    NoMatchingTag { pattern: String },
    /// Checkout has truncated history and the unshallow fetch failed
    ShallowCheckout,
    /// A merge request references an issue unknown to the forge
    UnmatchedIssue { merge_request: u64, issue: u64 },
    /// Extended detail of a merge request could not be fetched
    DetailUnavailable { merge_request: u64, reason: String },
    /// The release notes contain no section for a version
    NoReleaseNotes { version: String },
    /// Release build conditions are not met
    NotReleaseBuild { reason: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoMatchingTag { pattern } => {
                write!(f, "No tag matches '{}', versioning from v0.0.0", pattern)
            }
            BoundaryWarning::ShallowCheckout => {
                write!(f, "Checkout is shallow; commit distance may be wrong")
            }
            BoundaryWarning::UnmatchedIssue {
                merge_request,
                issue,
            } => write!(
                f,
                "Merge request #{} references unknown issue #{}",
                merge_request, issue
            ),
            BoundaryWarning::DetailUnavailable {
                merge_request,
                reason,
            } => write!(
                f,
                "Cannot read details of merge request #{}: {}",
                merge_request, reason
            ),
            BoundaryWarning::NoReleaseNotes { version } => {
                write!(f, "No release notes section for '{}'", version)
            }
            BoundaryWarning::NotReleaseBuild { reason } => {
                write!(f, "Not a release build: {}", reason)
            }
        }
    }
}
