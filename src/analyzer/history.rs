use std::cell::OnceCell;

use tracing::{debug, warn};

use crate::analyzer::{correlate, CorrelationRules, UnreleasedChanges};
use crate::domain::{parse_log, CommitEntry, Issue, MergeRequest, State};
use crate::error::Result;
use crate::forge::Forge;
use crate::vcs::Vcs;

/// Commit log, merge requests and issues for one invocation.
///
/// Each list is fetched on first use and cached until [`ReleaseHistory::reset`].
pub struct ReleaseHistory<'a, V: Vcs, F: Forge> {
    vcs: &'a V,
    forge: &'a F,
    rules: CorrelationRules,
    reference: String,
    limit: usize,
    commits: OnceCell<Vec<CommitEntry>>,
    merge_requests: OnceCell<Vec<MergeRequest>>,
    issues: OnceCell<Vec<Issue>>,
}

impl<'a, V: Vcs, F: Forge> ReleaseHistory<'a, V, F> {
    /// History of HEAD, at most `limit` commits deep
    pub fn new(vcs: &'a V, forge: &'a F, limit: usize) -> Self {
        ReleaseHistory {
            vcs,
            forge,
            rules: CorrelationRules::default(),
            reference: String::new(),
            limit,
            commits: OnceCell::new(),
            merge_requests: OnceCell::new(),
            issues: OnceCell::new(),
        }
    }

    /// Walk `reference` instead of HEAD
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = reference.into();
        self
    }

    pub fn with_rules(mut self, rules: CorrelationRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn reset(&mut self) {
        self.commits = OnceCell::new();
        self.merge_requests = OnceCell::new();
        self.issues = OnceCell::new();
    }

    /// Decorated commit log, most recent first
    pub fn commits(&self) -> Result<&[CommitEntry]> {
        if let Some(commits) = self.commits.get() {
            return Ok(commits.as_slice());
        }
        let commits = parse_log(&self.vcs.log(&self.reference, self.limit)?);
        debug!("loaded {} commits", commits.len());
        Ok(self.commits.get_or_init(|| commits).as_slice())
    }

    /// Merged merge requests; empty when the forge output is unusable
    pub fn merge_requests(&self) -> Result<&[MergeRequest]> {
        if let Some(mrs) = self.merge_requests.get() {
            return Ok(mrs.as_slice());
        }
        let mrs = or_skip("merge requests", self.forge.merge_requests(State::Merged))?;
        debug!("loaded {} merged merge requests", mrs.len());
        Ok(self.merge_requests.get_or_init(|| mrs).as_slice())
    }

    /// Issues in any state; empty when the forge output is unusable
    pub fn issues(&self) -> Result<&[Issue]> {
        if let Some(issues) = self.issues.get() {
            return Ok(issues.as_slice());
        }
        let issues = or_skip("issues", self.forge.issues(None))?;
        debug!("loaded {} issues", issues.len());
        Ok(self.issues.get_or_init(|| issues).as_slice())
    }

    /// Correlate the cached lists; recomputed on every call
    pub fn unreleased(&self) -> Result<UnreleasedChanges> {
        correlate(
            self.commits()?,
            self.merge_requests()?,
            self.issues()?,
            self.forge,
            &self.rules,
        )
    }
}

fn or_skip<T>(what: &str, listed: Result<Vec<T>>) -> Result<Vec<T>> {
    match listed {
        Ok(items) => Ok(items),
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            warn!("skipping {}: {}", what, e);
            Ok(Vec::new())
        }
    }
}
