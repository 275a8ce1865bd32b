use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

fn ssh_remote_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^git@(?P<host>[^:]+):(?P<path>.+?)(?:\.git)?/?$").expect("static regex")
    })
}

/// Turn an scp-style SSH remote into a browsable HTTPS URL.
///
/// `git@github.com:owner/repo.git` becomes `https://github.com/owner/repo/`.
/// Hosts ending in `github.com` (SSH host aliases such as
/// `work.github.com`) are collapsed to `github.com`. Anything else is
/// returned untouched.
pub fn normalize_remote_url(remote: &str) -> String {
    let Some(caps) = ssh_remote_re().captures(remote.trim()) else {
        return remote.trim().to_string();
    };

    let mut host = &caps["host"];
    if host.ends_with("github.com") {
        host = "github.com";
    }
    format!("https://{}/{}/", host, &caps["path"])
}

/// Project name: basename of the remote, or of `fallback_dir` without one
pub fn project_name(remote: &str, fallback_dir: &Path) -> String {
    let base = remote
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or("")
        .trim_end_matches(".git");
    if !base.is_empty() {
        return base.to_string();
    }

    fallback_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
