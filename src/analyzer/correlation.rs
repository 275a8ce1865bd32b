use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use tracing::{debug, warn};

use crate::analyzer::CorrelationRules;
use crate::boundary::BoundaryWarning;
use crate::domain::{CommitEntry, Issue, MergeRequest};
use crate::error::Result;
use crate::forge::Forge;

/// A commit paired with the merge request it merged, if any
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelatedCommit {
    pub entry: CommitEntry,
    pub merge_request: Option<u64>,
}

/// A merge request paired with the issues it claims to close
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkedMergeRequest {
    pub merge_request: MergeRequest,
    /// Ascending, deduplicated
    pub issues: Vec<u64>,
}

/// Everything merged since the last release tag
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UnreleasedChanges {
    /// Commits newer than the last release tag, most recent first
    pub commits: Vec<CorrelatedCommit>,
    /// Merge requests in discovery order
    pub merge_requests: Vec<LinkedMergeRequest>,
    /// Referenced issues known to the forge, ascending by number
    pub issues: Vec<Issue>,
    #[serde(skip)]
    pub warnings: Vec<BoundaryWarning>,
}

impl UnreleasedChanges {
    /// Union of issue numbers across all merge requests, ascending
    pub fn issue_numbers(&self) -> Vec<u64> {
        self.merge_requests
            .iter()
            .flat_map(|mr| mr.issues.iter().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}

/// Commits newer than the most recent release tag.
///
/// `log` is most recent first. The first commit carrying a release tag and
/// everything older is excluded; without such a commit the whole log is
/// returned.
pub fn unreleased_commits<'a>(log: &'a [CommitEntry], rules: &CorrelationRules) -> &'a [CommitEntry] {
    let end = log
        .iter()
        .position(|c| c.tags.iter().any(|t| rules.is_release_tag(t)))
        .unwrap_or(log.len());
    &log[..end]
}

/// Correlate the commit log with merge requests and the issues they close.
///
/// Merge requests are joined on their merge-commit hash. Issue links come
/// from [`CorrelationRules::issue_refs`] over each request's title, body,
/// comments and commit messages. A request whose detail cannot be read is
/// kept with no issues and a warning. Only fatal errors abort.
pub fn correlate<F: Forge>(
    log: &[CommitEntry],
    merge_requests: &[MergeRequest],
    issues: &[Issue],
    forge: &F,
    rules: &CorrelationRules,
) -> Result<UnreleasedChanges> {
    let unreleased = unreleased_commits(log, rules);
    debug!(
        "{} of {} commits are unreleased",
        unreleased.len(),
        log.len()
    );

    let by_hash: HashMap<&str, &MergeRequest> = merge_requests
        .iter()
        .filter_map(|mr| mr.merge_commit.as_deref().map(|h| (h, mr)))
        .collect();

    let mut changes = UnreleasedChanges::default();
    let mut found: Vec<&MergeRequest> = Vec::new();

    for entry in unreleased {
        let mr = by_hash.get(entry.hash.as_str()).copied();
        if let Some(mr) = mr {
            if !found.iter().any(|seen| seen.number == mr.number) {
                found.push(mr);
            }
        }
        changes.commits.push(CorrelatedCommit {
            entry: entry.clone(),
            merge_request: mr.map(|mr| mr.number),
        });
    }

    for mr in found {
        let linked = match forge.merge_request_detail(mr.number) {
            Ok(Some(detail)) => rules.issue_refs(detail.text_fragments()),
            Ok(None) => {
                warn!("merge request #{} has no detail", mr.number);
                changes.warnings.push(BoundaryWarning::DetailUnavailable {
                    merge_request: mr.number,
                    reason: "not found".to_string(),
                });
                Vec::new()
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!("skipping detail of merge request #{}: {}", mr.number, e);
                changes.warnings.push(BoundaryWarning::DetailUnavailable {
                    merge_request: mr.number,
                    reason: e.to_string(),
                });
                Vec::new()
            }
        };
        changes.merge_requests.push(LinkedMergeRequest {
            merge_request: mr.clone(),
            issues: linked,
        });
    }

    let known: HashMap<u64, &Issue> = issues.iter().map(|i| (i.number, i)).collect();
    for number in changes.issue_numbers() {
        match known.get(&number) {
            Some(issue) => changes.issues.push((*issue).clone()),
            None => {
                debug!("issue #{} is not known to the forge", number);
                if let Some(mr) = changes
                    .merge_requests
                    .iter()
                    .find(|mr| mr.issues.contains(&number))
                {
                    changes.warnings.push(BoundaryWarning::UnmatchedIssue {
                        merge_request: mr.merge_request.number,
                        issue: number,
                    });
                }
            }
        }
    }

    Ok(changes)
}
