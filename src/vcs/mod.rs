//! Version control query layer
//!
//! Everything git-buildinfo knows about the repository comes from running the
//! `git` command line and reading its trimmed output. The [Vcs] trait is the
//! seam between that text stream and the facts provider:
//!
//! - [git::GitCli]: runs the real executable
//! - [mock::MockVcs]: canned responses for tests
//!
//! A query that runs but fails (non-zero exit) yields empty text, exactly like
//! a query with no output. Only an executable that cannot be spawned is
//! reported as an error.

pub mod git;
pub mod mock;

pub use git::GitCli;
pub use mock::MockVcs;

use crate::error::Result;

/// Glob used with `describe --match`.
///
/// glob(7) cannot express three dot-separated numbers, so this enforces three
/// dot-separated groups that each start with a digit.
pub const VERSION_TAG_GLOB: &str = "v[0-9]*.[0-9]*.[0-9]*";

/// Tab-separated hash, ref decorations and subject
pub const LOG_FORMAT: &str = "--format=%H%x09%D%x09%s";

/// Runs version control subcommands
pub trait Vcs {
    /// Run a subcommand and return its trimmed standard output.
    ///
    /// # Returns
    /// * `Ok(String)` - Trimmed stdout, empty if the command failed
    /// * `Err` - If the executable could not be started
    fn query(&self, args: &[&str]) -> Result<String>;

    /// Run a subcommand for its side effect, returning whether it succeeded
    fn run(&self, args: &[&str]) -> Result<bool>;

    /// Full hash of HEAD
    fn head_commit(&self) -> Result<String> {
        self.query(&["rev-parse", "HEAD"])
    }

    /// Repository root directory
    fn toplevel(&self) -> Result<String> {
        self.query(&["rev-parse", "--show-toplevel"])
    }

    /// Abbreviated name of the checked out branch
    fn current_branch(&self) -> Result<String> {
        self.query(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    fn is_shallow(&self) -> Result<bool> {
        Ok(self.query(&["rev-parse", "--is-shallow-repository"])? == "true")
    }

    fn remote_url(&self, remote: &str) -> Result<String> {
        self.query(&["remote", "get-url", remote])
    }

    /// `describe --always --tags --long` restricted to [VERSION_TAG_GLOB]
    fn describe(&self) -> Result<String> {
        self.query(&[
            "describe",
            "--always",
            "--tags",
            "--long",
            "--match",
            VERSION_TAG_GLOB,
        ])
    }

    /// Number of commits reachable from HEAD
    fn commit_count(&self) -> Result<u64> {
        Ok(self
            .query(&["rev-list", "--count", "HEAD"])?
            .parse()
            .unwrap_or(0))
    }

    /// Porcelain v2 status of tracked files
    fn status(&self) -> Result<String> {
        self.query(&["status", "--porcelain=2", "--untracked-files=no"])
    }

    /// Decorated log of `reference` (HEAD when empty), one
    /// `hash<TAB>decorations<TAB>subject` line per commit
    fn log(&self, reference: &str, limit: usize) -> Result<String> {
        let max_count = format!("--max-count={}", limit);
        let mut args = vec!["log", LOG_FORMAT];
        if !reference.is_empty() {
            args.push(reference);
        }
        args.push(&max_count);
        self.query(&args)
    }

    /// Fetch full history and tags into a shallow checkout
    fn unshallow(&self) -> Result<bool> {
        self.run(&["fetch", "--prune", "--tags", "--unshallow"])
    }

    /// Create an annotated tag on HEAD
    fn create_annotated_tag(&self, name: &str) -> Result<bool> {
        self.run(&["tag", "-a", name, "-m", ""])
    }
}

/// Split porcelain v2 status output into the paths of changed entries.
///
/// The path is the last space-separated field; for renames the original path
/// follows a tab and is dropped.
pub fn changed_paths(status: &str) -> Vec<String> {
    status
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .filter_map(|l| l.split(' ').filter(|f| !f.is_empty()).last())
        .filter_map(|f| f.split('\t').next())
        .map(str::to_string)
        .collect()
}
