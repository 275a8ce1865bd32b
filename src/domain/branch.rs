use regex::Regex;
use std::sync::OnceLock;

/// Label used in place of the branch name on release branches
pub const RELEASE_LABEL: &str = "rc";

fn unsafe_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("static regex"))
}

/// Replace every run of characters outside `[A-Za-z0-9._-]` with a single `-`
pub fn sanitize_branch_name(name: &str) -> String {
    unsafe_chars().replace_all(name.trim(), "-").into_owned()
}

/// Check if builds from `branch` belong to a release line.
///
/// That is the default branch, or a maintenance branch whose name is a
/// dotted prefix of `version` (`v1` or `v1.2` for `v1.2.4`).
pub fn is_release_branch(branch: &str, version: &str, default_branch: &str) -> bool {
    branch == default_branch || version.starts_with(&format!("{}.", branch))
}
