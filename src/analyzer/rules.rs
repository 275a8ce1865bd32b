use std::collections::BTreeSet;

use regex::Regex;

use crate::error::{BuildInfoError, Result};

/// Tags that mark a published release: `v<major>.<minor>.<patch>` exactly
pub const RELEASE_TAG_PATTERN: &str = r"^v\d+\.\d+\.\d+$";

/// Issue-closing keyword followed by `#<number>`
pub const ISSUE_REF_PATTERN: &str =
    r"(?i)\b(?:close|closes|closed|fix|fixes|fixed|resolve|resolves|resolved):?\s+#(\d+)\b";

/// Patterns that drive change correlation
#[derive(Debug, Clone)]
pub struct CorrelationRules {
    release_tag: Regex,
    issue_ref: Regex,
}

impl CorrelationRules {
    /// Build rules from custom patterns.
    ///
    /// `issue_ref` must capture the issue number in group 1.
    pub fn new(release_tag: &str, issue_ref: &str) -> Result<Self> {
        let release_tag = Regex::new(release_tag)
            .map_err(|e| BuildInfoError::config(format!("invalid release tag pattern: {}", e)))?;
        let issue_ref = Regex::new(issue_ref)
            .map_err(|e| BuildInfoError::config(format!("invalid issue pattern: {}", e)))?;
        Ok(CorrelationRules {
            release_tag,
            issue_ref,
        })
    }

    pub fn is_release_tag(&self, tag: &str) -> bool {
        self.release_tag.is_match(tag)
    }

    /// Issue numbers referenced by closing keywords across `fragments`,
    /// deduplicated and ascending.
    ///
    /// This is a text heuristic. References phrased without one of the
    /// keywords are missed, and a keyword that happens to precede `#<n>` in
    /// unrelated prose is picked up.
    pub fn issue_refs<'a, I>(&self, fragments: I) -> Vec<u64>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut found = BTreeSet::new();
        for fragment in fragments {
            for caps in self.issue_ref.captures_iter(fragment) {
                if let Some(n) = caps.get(1).and_then(|m| m.as_str().parse::<u64>().ok()) {
                    found.insert(n);
                }
            }
        }
        found.into_iter().collect()
    }
}

impl Default for CorrelationRules {
    fn default() -> Self {
        CorrelationRules {
            release_tag: Regex::new(RELEASE_TAG_PATTERN).expect("static regex"),
            issue_ref: Regex::new(ISSUE_REF_PATTERN).expect("static regex"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_tag_is_exact() {
        let rules = CorrelationRules::default();
        assert!(rules.is_release_tag("v1.2.0"));
        assert!(rules.is_release_tag("v10.20.30"));
        assert!(!rules.is_release_tag("v1.2.0-rc1"));
        assert!(!rules.is_release_tag("1.2.0"));
        assert!(!rules.is_release_tag("v1.2"));
    }

    #[test]
    fn test_issue_refs_require_keyword() {
        let rules = CorrelationRules::default();
        assert_eq!(
            rules.issue_refs(["Fixes #12 and closes #7, see also #99"]),
            vec![7, 12]
        );
    }

    #[test]
    fn test_issue_refs_deduplicated_across_fragments() {
        let rules = CorrelationRules::default();
        assert_eq!(
            rules.issue_refs(["resolves #3", "RESOLVED #3", "fixed #1"]),
            vec![1, 3]
        );
    }

    #[test]
    fn test_issue_refs_all_keywords() {
        let rules = CorrelationRules::default();
        let text = "close #1 closes #2 closed #3 fix #4 fixes #5 fixed #6 \
                    resolve #7 resolves #8 resolved #9";
        assert_eq!(rules.issue_refs([text]), (1..=9).collect::<Vec<_>>());
    }

    #[test]
    fn test_issue_refs_word_bounded() {
        let rules = CorrelationRules::default();
        assert!(rules.issue_refs(["prefix #4", "hotfixes #5"]).is_empty());
        assert_eq!(rules.issue_refs(["Fixes: #8"]), vec![8]);
    }

    #[test]
    fn test_custom_rules() {
        let rules = CorrelationRules::new(r"^release-\d+$", r"(?i)\bfixes\s+GH-(\d+)").unwrap();
        assert!(rules.is_release_tag("release-4"));
        assert_eq!(rules.issue_refs(["fixes GH-42"]), vec![42]);
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let err = CorrelationRules::new("(", ISSUE_REF_PATTERN).unwrap_err();
        assert!(err.to_string().contains("release tag pattern"));
    }
}
