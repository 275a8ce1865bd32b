//! Release gating
//!
//! A build becomes a release only when every condition holds:
//!
//! 1. release builds are enabled ([`crate::config::RELEASE_FLAG`] or `--release`)
//! 2. the checkout is on a release branch
//! 3. no tracked file is modified
//! 4. the newest releasable notes version is newer than the latest tag
//!
//! A releasable version is a full `v<major>.<minor>.<patch>` label. Off the
//! default branch it must also belong to the branch's line, so `v1.2` only
//! ever releases `v1.2.*`.
//!
//! The release is then cut by tagging HEAD with that version and
//! recomputing the build information.

use std::cmp::Ordering;

use tracing::{info, warn};

use crate::analyzer::CorrelationRules;
use crate::boundary::BoundaryWarning;
use crate::domain::{compare, is_release_branch};
use crate::error::Result;
use crate::facts::BuildInfo;
use crate::release_notes::ReleaseNotes;
use crate::vcs::Vcs;

/// Outcome of the release checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseDecision {
    /// Tag HEAD with `version`
    Cut { version: String },
    /// Keep the intermediate version
    Skip { reason: String },
}

impl ReleaseDecision {
    fn skip(reason: impl Into<String>) -> Self {
        ReleaseDecision::Skip {
            reason: reason.into(),
        }
    }

    /// Warning describing a skipped release
    pub fn warning(&self) -> Option<BoundaryWarning> {
        match self {
            ReleaseDecision::Cut { .. } => None,
            ReleaseDecision::Skip { reason } => Some(BoundaryWarning::NotReleaseBuild {
                reason: reason.clone(),
            }),
        }
    }
}

/// Newest version in `notes` that may be released from `branch`
pub fn release_candidate<'a>(
    notes: &'a ReleaseNotes,
    branch: &str,
    default_branch: &str,
) -> Option<&'a str> {
    let rules = CorrelationRules::default();
    let line = format!("{}.", branch);
    notes.versions().into_iter().find(|version| {
        rules.is_release_tag(version) && (branch == default_branch || version.starts_with(&line))
    })
}

/// Check whether the current checkout should be released
pub fn evaluate_release<V: Vcs>(
    info: &BuildInfo<V>,
    enabled: bool,
    notes: &ReleaseNotes,
) -> Result<ReleaseDecision> {
    if !enabled {
        return Ok(ReleaseDecision::skip("release builds are not enabled"));
    }

    let facts = info.facts()?;
    if !is_release_branch(&facts.branch, &facts.tag, info.default_branch()) {
        return Ok(ReleaseDecision::skip(format!(
            "'{}' is not a release branch",
            facts.branch
        )));
    }
    if !facts.is_clean() {
        return Ok(ReleaseDecision::skip("working tree has local modifications"));
    }

    let Some(latest) = release_candidate(notes, &facts.branch, info.default_branch()) else {
        return Ok(ReleaseDecision::skip(format!(
            "release notes list no release version for branch '{}'",
            facts.branch
        )));
    };
    if compare(latest, &facts.tag) != Ordering::Greater {
        return Ok(ReleaseDecision::skip(format!(
            "release notes version {} is not newer than tag {}",
            latest, facts.tag
        )));
    }

    Ok(ReleaseDecision::Cut {
        version: latest.to_string(),
    })
}

/// Evaluate the release conditions and cut the release when they hold.
///
/// Returns the decision taken. After a cut the cached build information is
/// recomputed, so [`BuildInfo::version`] reports the new tag.
pub fn prepare_release<V: Vcs>(
    info: &mut BuildInfo<V>,
    enabled: bool,
    notes: &ReleaseNotes,
) -> Result<ReleaseDecision> {
    let decision = evaluate_release(info, enabled, notes)?;
    let ReleaseDecision::Cut { version } = &decision else {
        return Ok(decision);
    };

    info!("Tagging release {}", version);
    if !info.vcs().create_annotated_tag(version)? {
        warn!("creating tag {} failed", version);
        return Ok(ReleaseDecision::skip(format!("cannot create tag {}", version)));
    }
    info.reset();
    Ok(decision)
}
