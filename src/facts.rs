//! Lazily computed, resettable build information for one invocation.

use std::cell::{OnceCell, RefCell};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::boundary::BoundaryWarning;
use crate::domain::{normalize_remote_url, project_name, sanitize_branch_name};
use crate::error::Result;
use crate::vcs::{changed_paths, Vcs, VERSION_TAG_GLOB};
use crate::version::{
    current_mtag, modification_tag, synthesize_version, Describe, RepositoryFacts, NO_BRANCH,
    ZERO_HASH, ZERO_VERSION,
};

#[derive(Default)]
struct Cache {
    commit: OnceCell<String>,
    dir: OnceCell<String>,
    branch: OnceCell<String>,
    remote: OnceCell<String>,
    name: OnceCell<String>,
    facts: OnceCell<RepositoryFacts>,
    version: OnceCell<String>,
    warnings: RefCell<Vec<BoundaryWarning>>,
}

fn memo<'a, T>(cell: &'a OnceCell<T>, init: impl FnOnce() -> Result<T>) -> Result<&'a T> {
    if let Some(value) = cell.get() {
        return Ok(value);
    }
    let value = init()?;
    Ok(cell.get_or_init(|| value))
}

/// Build information about the repository in which the tool runs.
///
/// Every value is computed on first access and cached until [`BuildInfo::reset`].
/// Construct one per invocation and pass it to whatever needs it.
pub struct BuildInfo<V: Vcs> {
    vcs: V,
    default_branch: String,
    remote_name: String,
    cache: Cache,
}

impl<V: Vcs> BuildInfo<V> {
    /// Create a provider over `vcs`, treating `default_branch` as the main
    /// release line
    pub fn new(vcs: V, default_branch: impl Into<String>) -> Self {
        BuildInfo {
            vcs,
            default_branch: default_branch.into(),
            remote_name: "origin".to_string(),
            cache: Cache::default(),
        }
    }

    /// Use a remote other than `origin` for [`BuildInfo::remote`]
    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote_name = remote.into();
        self
    }

    /// The underlying query layer
    pub fn vcs(&self) -> &V {
        &self.vcs
    }

    pub fn default_branch(&self) -> &str {
        &self.default_branch
    }

    /// Drop every cached value so the next access recomputes it.
    ///
    /// Needed after creating a release tag.
    pub fn reset(&mut self) {
        debug!("resetting cached build information");
        self.cache = Cache::default();
    }

    /// Fetch the missing history if the checkout is shallow.
    ///
    /// Commit distances are meaningless on a truncated history.
    pub fn ensure_full_history(&self) -> Result<()> {
        if !self.vcs.is_shallow()? {
            return Ok(());
        }

        info!("Fetching missing information from remote ...");
        if !self.vcs.unshallow()? {
            warn!("unshallow fetch failed");
            self.push_warning(BoundaryWarning::ShallowCheckout);
        }
        Ok(())
    }

    /// Full hash of HEAD
    pub fn commit(&self) -> Result<&str> {
        memo(&self.cache.commit, || self.vcs.head_commit()).map(String::as_str)
    }

    /// Repository root
    pub fn dir(&self) -> Result<&str> {
        memo(&self.cache.dir, || self.vcs.toplevel()).map(String::as_str)
    }

    /// Sanitized current branch name
    pub fn branch(&self) -> Result<&str> {
        memo(&self.cache.branch, || {
            Ok(sanitize_branch_name(&self.vcs.current_branch()?))
        })
        .map(String::as_str)
    }

    /// Browsable URL of the configured remote
    pub fn remote(&self) -> Result<&str> {
        memo(&self.cache.remote, || {
            Ok(normalize_remote_url(&self.vcs.remote_url(&self.remote_name)?))
        })
        .map(String::as_str)
    }

    /// Project name derived from the remote or the working directory
    pub fn name(&self) -> Result<&str> {
        memo(&self.cache.name, || {
            let cwd = std::env::current_dir().unwrap_or_default();
            Ok(project_name(self.remote()?, &cwd))
        })
        .map(String::as_str)
    }

    /// Tag, distance, hash and modification state of the checkout
    pub fn facts(&self) -> Result<&RepositoryFacts> {
        memo(&self.cache.facts, || self.compute_facts())
    }

    /// Local-modification fragment, `None` on a clean tree
    pub fn mtag(&self) -> Result<Option<&str>> {
        Ok(self.facts()?.mtag.as_deref())
    }

    /// Synthesized build version
    pub fn version(&self) -> Result<&str> {
        memo(&self.cache.version, || {
            let version = synthesize_version(self.facts()?, &self.default_branch);
            debug!("synthesized version {}", version);
            Ok(version)
        })
        .map(String::as_str)
    }

    /// Warnings raised while computing cached values
    pub fn warnings(&self) -> Vec<BoundaryWarning> {
        self.cache.warnings.borrow().clone()
    }

    fn push_warning(&self, warning: BoundaryWarning) {
        self.cache.warnings.borrow_mut().push(warning);
    }

    fn compute_facts(&self) -> Result<RepositoryFacts> {
        let (tag, branch, distance, hash) = match Describe::parse(&self.vcs.describe()?) {
            Describe::Tagged {
                tag,
                distance,
                hash,
            } => (tag, self.branch()?.to_string(), distance, hash),
            Describe::Untagged { abbrev } => {
                warn!("no tag matches {}", VERSION_TAG_GLOB);
                self.push_warning(BoundaryWarning::NoMatchingTag {
                    pattern: VERSION_TAG_GLOB.to_string(),
                });
                (
                    ZERO_VERSION.to_string(),
                    self.branch()?.to_string(),
                    self.vcs.commit_count()?,
                    format!("g{}", abbrev),
                )
            }
            Describe::Empty => {
                warn!("describe returned nothing; is this a repository with commits?");
                (
                    ZERO_VERSION.to_string(),
                    NO_BRANCH.to_string(),
                    0,
                    ZERO_HASH.to_string(),
                )
            }
        };

        let paths = changed_paths(&self.vcs.status()?);
        let modified = !paths.is_empty();
        let mtag = if modified {
            Some(self.compute_mtag(&paths)?)
        } else {
            None
        };

        Ok(RepositoryFacts {
            tag,
            branch,
            distance,
            hash,
            modified,
            mtag,
        })
    }

    fn compute_mtag(&self, paths: &[String]) -> Result<String> {
        let dir = self.dir()?;
        let root: PathBuf = if dir.is_empty() {
            PathBuf::from(".")
        } else {
            Path::new(dir).to_path_buf()
        };
        Ok(modification_tag(&root, paths).unwrap_or_else(|| {
            debug!("no changed path exists on disk, stamping with the current time");
            current_mtag()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vcs::MockVcs;

    const DESCRIBE: &str = "describe --always --tags --long --match v[0-9]*.[0-9]*.[0-9]*";

    fn tagged_repo(describe: &str, branch: &str) -> MockVcs {
        MockVcs::new()
            .respond(DESCRIBE, describe)
            .respond("rev-parse --abbrev-ref HEAD", branch)
            .respond("rev-parse HEAD", "6ede8cd0123456789abcdef0123456789abcdef0")
    }

    #[test]
    fn test_version_on_feature_branch() {
        let info = BuildInfo::new(tagged_repo("v0.6.0-3-g6ede8cd", "feature/x"), "master");
        assert_eq!(info.version().unwrap(), "v0.6.1-feature-x.3.g6ede8cd");
        assert!(info.warnings().is_empty());
    }

    #[test]
    fn test_version_on_clean_tag() {
        let info = BuildInfo::new(tagged_repo("v0.6.0-0-g6ede8cd", "master"), "master");
        assert_eq!(info.version().unwrap(), "v0.6.0");
    }

    #[test]
    fn test_untagged_repo_counts_all_commits() {
        let vcs = MockVcs::new()
            .respond(DESCRIBE, "6ede8cd")
            .respond("rev-parse --abbrev-ref HEAD", "dev")
            .respond("rev-list --count HEAD", "17");
        let info = BuildInfo::new(vcs, "master");

        assert_eq!(info.version().unwrap(), "v0.0.1-dev.17.g6ede8cd");
        assert!(matches!(
            info.warnings().as_slice(),
            [BoundaryWarning::NoMatchingTag { .. }]
        ));
    }

    #[test]
    fn test_empty_repo_uses_sentinels() {
        let info = BuildInfo::new(MockVcs::new(), "master");
        let facts = info.facts().unwrap();
        assert_eq!(facts.tag, "v0.0.0");
        assert_eq!(facts.branch, "none");
        assert_eq!(facts.hash, "g0000000");
        assert_eq!(info.version().unwrap(), "v0.0.0-none.0.g0000000");
    }

    #[test]
    fn test_values_are_memoized_until_reset() {
        let mut info = BuildInfo::new(tagged_repo("v0.6.0-2-g6ede8cd", "master"), "master");
        assert_eq!(info.version().unwrap(), "v0.6.1-rc.2.g6ede8cd");
        assert_eq!(info.version().unwrap(), "v0.6.1-rc.2.g6ede8cd");
        assert_eq!(info.vcs().call_count(DESCRIBE), 1);

        info.vcs().set(DESCRIBE, "v0.7.0-0-g6ede8cd");
        assert_eq!(info.version().unwrap(), "v0.6.1-rc.2.g6ede8cd");

        info.reset();
        assert_eq!(info.version().unwrap(), "v0.7.0");
        assert_eq!(info.vcs().call_count(DESCRIBE), 2);
    }

    #[test]
    fn test_modified_files_add_mtag() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("lib.rs"), "fn main() {}").unwrap();

        let vcs = tagged_repo("v0.6.0-0-g6ede8cd", "master")
            .respond("rev-parse --show-toplevel", &dir.path().to_string_lossy())
            .respond(
                "status --porcelain=2 --untracked-files=no",
                "1 .M N... 100644 100644 100644 aaaa aaaa lib.rs",
            );
        let info = BuildInfo::new(vcs, "master");

        let mtag = info.mtag().unwrap().unwrap().to_string();
        assert!(mtag.starts_with('m'));
        assert_eq!(
            info.version().unwrap(),
            format!("v0.6.1-rc.0.g6ede8cd.{}", mtag)
        );
    }

    #[test]
    fn test_deleted_file_marks_tree_modified() {
        let dir = tempfile::tempdir().unwrap();
        let vcs = tagged_repo("v0.6.0-0-g6ede8cd", "master")
            .respond("rev-parse --show-toplevel", &dir.path().to_string_lossy())
            .respond(
                "status --porcelain=2 --untracked-files=no",
                "1 .D N... 100644 100644 000000 aaaa aaaa gone.rs",
            );
        let info = BuildInfo::new(vcs, "master");

        let facts = info.facts().unwrap();
        assert!(facts.modified);
        assert!(!facts.is_clean());
        let mtag = info.mtag().unwrap().unwrap().to_string();
        assert!(info.version().unwrap().ends_with(&format!(".{}", mtag)));
        assert!(info.version().unwrap().starts_with("v0.6.1-rc.0.g6ede8cd."));
    }

    #[test]
    fn test_remote_and_name() {
        let vcs = MockVcs::new().respond("remote get-url origin", "git@github.com:org/tool.git");
        let info = BuildInfo::new(vcs, "master");
        assert_eq!(info.remote().unwrap(), "https://github.com/org/tool/");
        assert_eq!(info.name().unwrap(), "tool");
    }

    #[test]
    fn test_custom_remote_name() {
        let vcs = MockVcs::new().respond("remote get-url upstream", "https://example.com/x/y");
        let info = BuildInfo::new(vcs, "master").with_remote("upstream");
        assert_eq!(info.remote().unwrap(), "https://example.com/x/y");
    }

    #[test]
    fn test_shallow_checkout_is_unshallowed() {
        let vcs = MockVcs::new().respond("rev-parse --is-shallow-repository", "true");
        let info = BuildInfo::new(vcs, "master");
        info.ensure_full_history().unwrap();
        assert_eq!(info.vcs().call_count("fetch --prune --tags --unshallow"), 1);
    }

    #[test]
    fn test_full_checkout_is_left_alone() {
        let vcs = MockVcs::new().respond("rev-parse --is-shallow-repository", "false");
        let info = BuildInfo::new(vcs, "master");
        info.ensure_full_history().unwrap();
        assert_eq!(info.vcs().call_count("fetch --prune --tags --unshallow"), 0);
    }
}
