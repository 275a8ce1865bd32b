//! Build version synthesis
//!
//! Turns repository facts into a version string that sorts, under semver
//! precedence, strictly between the last release tag and the next one:
//!
//! ```text
//! v0.6.1
//!     v0.6.1-feature-x.3.g6ede8cd    <-- synthesized, patch bumped
//! v0.6.0                             <-- last tag
//! ```

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::{is_release_branch, SemanticVersion, RELEASE_LABEL};

/// Base version used when no tag matches
pub const ZERO_VERSION: &str = "v0.0.0";
/// Branch label used when the repository yields no describe output at all
pub const NO_BRANCH: &str = "none";
/// Short hash label used when the repository yields no describe output at all
pub const ZERO_HASH: &str = "g0000000";

/// Snapshot of the repository state that drives version synthesis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryFacts {
    /// Latest matching version tag, or [ZERO_VERSION]
    pub tag: String,
    /// Sanitized branch label
    pub branch: String,
    /// Commits since `tag`
    pub distance: u64,
    /// Short hash label, `g`-prefixed
    pub hash: String,
    /// Whether any tracked file differs from the last commit, deletions included
    pub modified: bool,
    /// `mXXXXXXXX` fragment, present whenever `modified` is set
    pub mtag: Option<String>,
}

impl RepositoryFacts {
    /// Whether no tracked file differs from the last commit
    pub fn is_clean(&self) -> bool {
        !self.modified
    }
}

/// Interpreted output of `describe --always --tags --long`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Describe {
    /// `<tag>-<distance>-g<hash>`
    Tagged {
        tag: String,
        distance: u64,
        hash: String,
    },
    /// Only an abbreviated hash: no tag matched
    Untagged { abbrev: String },
    /// No output: not a repository, or no commits
    Empty,
}

impl Describe {
    /// Parse describe output.
    ///
    /// The output is split from the right so tags that contain `-`
    /// (`v1.0.0-rc1-3-g1234abc`) keep their full name.
    pub fn parse(output: &str) -> Self {
        let output = output.trim();
        if output.is_empty() {
            return Describe::Empty;
        }

        let parts: Vec<&str> = output.rsplitn(3, '-').collect();
        if let [hash, distance, tag] = parts.as_slice() {
            if let Ok(distance) = distance.parse::<u64>() {
                return Describe::Tagged {
                    tag: tag.to_string(),
                    distance,
                    hash: hash.to_string(),
                };
            }
        }

        if parts.len() == 1 {
            return Describe::Untagged {
                abbrev: output.to_string(),
            };
        }

        Describe::Empty
    }
}

/// Format the local-modification fragment from a unix timestamp
pub fn format_mtag(secs: u64) -> String {
    format!("m{:08x}", secs)
}

/// Latest modification time of `paths` (relative to `root`), as an mtag.
///
/// Returns `None` when no path exists, which also covers a clean tree.
pub fn modification_tag(root: &Path, paths: &[String]) -> Option<String> {
    paths
        .iter()
        .filter_map(|p| std::fs::metadata(root.join(p)).ok())
        .filter_map(|m| m.modified().ok())
        .filter_map(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
        .max()
        .map(format_mtag)
}

/// mtag for the current time, used when every changed path is gone
pub fn current_mtag() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format_mtag(secs)
}

/// Synthesize the build version string.
///
/// The patch is bumped when there are commits since the tag or local
/// modifications. On a release branch the branch label becomes `rc`, and a
/// clean checkout sitting exactly on the tag gets the bare tag back.
///
/// # Example
/// ```
/// use git_buildinfo::version::{synthesize_version, RepositoryFacts};
///
/// let facts = RepositoryFacts {
///     tag: "v0.6.0".into(),
///     branch: "feature-x".into(),
///     distance: 3,
///     hash: "g6ede8cd".into(),
///     modified: false,
///     mtag: None,
/// };
/// assert_eq!(synthesize_version(&facts, "master"), "v0.6.1-feature-x.3.g6ede8cd");
/// ```
pub fn synthesize_version(facts: &RepositoryFacts, default_branch: &str) -> String {
    let version = if facts.distance > 0 || facts.modified {
        SemanticVersion::parse(&facts.tag).bump_patch().to_string()
    } else {
        facts.tag.clone()
    };

    let branch = if is_release_branch(&facts.branch, &version, default_branch) {
        RELEASE_LABEL
    } else {
        facts.branch.as_str()
    };

    if branch == RELEASE_LABEL && facts.distance == 0 && !facts.modified {
        return version;
    }

    let distance = facts.distance.to_string();
    let mut fragments = vec![branch, distance.as_str(), facts.hash.as_str()];
    if let Some(mtag) = &facts.mtag {
        fragments.push(mtag);
    }
    format!("{}-{}", version, fragments.join("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts(tag: &str, branch: &str, distance: u64, mtag: Option<&str>) -> RepositoryFacts {
        RepositoryFacts {
            tag: tag.to_string(),
            branch: branch.to_string(),
            distance,
            hash: "g6ede8cd".to_string(),
            modified: mtag.is_some(),
            mtag: mtag.map(str::to_string),
        }
    }

    #[test]
    fn test_feature_branch_with_commits() {
        let f = facts("v0.6.0", "feature-x", 3, None);
        assert_eq!(synthesize_version(&f, "master"), "v0.6.1-feature-x.3.g6ede8cd");
    }

    #[test]
    fn test_clean_tagged_default_branch() {
        let f = facts("v0.6.0", "master", 0, None);
        assert_eq!(synthesize_version(&f, "master"), "v0.6.0");
    }

    #[test]
    fn test_default_branch_with_commits_is_rc() {
        let f = facts("v0.6.0", "master", 2, None);
        assert_eq!(synthesize_version(&f, "master"), "v0.6.1-rc.2.g6ede8cd");
    }

    #[test]
    fn test_modified_tree_on_tag() {
        let f = facts("v0.6.0", "master", 0, Some("m5f3e2a10"));
        assert_eq!(
            synthesize_version(&f, "master"),
            "v0.6.1-rc.0.g6ede8cd.m5f3e2a10"
        );
    }

    #[test]
    fn test_modified_flag_alone_bumps_and_dirties() {
        let mut f = facts("v0.6.0", "master", 0, None);
        f.modified = true;
        assert!(!f.is_clean());
        assert_eq!(synthesize_version(&f, "master"), "v0.6.1-rc.0.g6ede8cd");
    }

    #[test]
    fn test_current_mtag_shape() {
        let tag = current_mtag();
        assert!(tag.starts_with('m'));
        assert!(tag.len() >= 9);
    }

    #[test]
    fn test_feature_branch_on_tag_keeps_zero_distance() {
        let f = facts("v0.6.0", "feature-x", 0, None);
        assert_eq!(synthesize_version(&f, "master"), "v0.6.0-feature-x.0.g6ede8cd");
    }

    #[test]
    fn test_maintenance_branch_is_rc() {
        let f = facts("v1.2.3", "v1.2", 4, None);
        assert_eq!(synthesize_version(&f, "master"), "v1.2.4-rc.4.g6ede8cd");
    }

    #[test]
    fn test_prerelease_tag_is_dropped_when_bumped() {
        let f = facts("v1.0.0-rc1", "feature", 1, None);
        assert_eq!(synthesize_version(&f, "master"), "v1.0.1-feature.1.g6ede8cd");
    }

    #[test]
    fn test_describe_tagged() {
        assert_eq!(
            Describe::parse("v0.6.0-3-g6ede8cd"),
            Describe::Tagged {
                tag: "v0.6.0".into(),
                distance: 3,
                hash: "g6ede8cd".into()
            }
        );
    }

    #[test]
    fn test_describe_tag_with_hyphen() {
        assert_eq!(
            Describe::parse("v1.0.0-rc1-0-gabcdef0"),
            Describe::Tagged {
                tag: "v1.0.0-rc1".into(),
                distance: 0,
                hash: "gabcdef0".into()
            }
        );
    }

    #[test]
    fn test_describe_untagged_and_empty() {
        assert_eq!(
            Describe::parse("6ede8cd"),
            Describe::Untagged {
                abbrev: "6ede8cd".into()
            }
        );
        assert_eq!(Describe::parse(""), Describe::Empty);
        assert_eq!(Describe::parse("a-b"), Describe::Empty);
    }

    #[test]
    fn test_format_mtag() {
        assert_eq!(format_mtag(0x5f3e2a10), "m5f3e2a10");
        assert_eq!(format_mtag(1), "m00000001");
    }

    #[test]
    fn test_modification_tag_uses_latest_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        let paths = vec!["a.txt".to_string(), "missing.txt".to_string()];

        let tag = modification_tag(dir.path(), &paths).unwrap();
        assert!(tag.starts_with('m'));
        assert_eq!(tag.len(), 9);

        assert_eq!(modification_tag(dir.path(), &["missing.txt".to_string()]), None);
        assert_eq!(modification_tag(dir.path(), &[]), None);
    }
}
