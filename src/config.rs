use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BuildInfoError, Result};
use crate::release_notes::MatchMode;

/// Name of the per-project configuration file
pub const CONFIG_FILE: &str = "buildinfo.toml";

/// Environment flag that allows cutting a release tag
pub const RELEASE_FLAG: &str = "ENABLE_RELEASE_BUILD";

/// Complete configuration for git-buildinfo.
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Branch whose builds are release candidates
    #[serde(default = "default_branch")]
    pub default_branch: String,

    /// Remote used for the source URL and project name
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Release notes document, relative to the working directory
    #[serde(default = "default_release_notes")]
    pub release_notes: PathBuf,

    /// Where generated artifacts are written
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default)]
    pub forge: ForgeConfig,

    #[serde(default)]
    pub vcs: VcsConfig,

    #[serde(default)]
    pub release_notes_match: ReleaseNotesMatchConfig,

    #[serde(default)]
    pub summary: SummaryConfig,
}

fn default_branch() -> String {
    "master".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_release_notes() -> PathBuf {
    PathBuf::from("RELEASES.md")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("build")
}

fn default_forge_command() -> String {
    "gh".to_string()
}

fn default_vcs_command() -> String {
    "git".to_string()
}

fn default_limit() -> usize {
    100
}

fn default_summary_env() -> String {
    "GITHUB_STEP_SUMMARY".to_string()
}

/// Merge request and issue tracker CLI
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ForgeConfig {
    #[serde(default = "default_forge_command")]
    pub command: String,

    /// Maximum number of merge requests or issues listed
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        ForgeConfig {
            command: default_forge_command(),
            limit: default_limit(),
        }
    }
}

/// Version control CLI
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct VcsConfig {
    #[serde(default = "default_vcs_command")]
    pub command: String,

    /// Maximum number of log entries scanned for unreleased changes
    #[serde(default = "default_limit")]
    pub log_limit: usize,
}

impl Default for VcsConfig {
    fn default() -> Self {
        VcsConfig {
            command: default_vcs_command(),
            log_limit: default_limit(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct ReleaseNotesMatchConfig {
    #[serde(default)]
    pub mode: MatchMode,
}

/// Build summary output
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SummaryConfig {
    /// Environment variable naming the file the summary is appended to
    #[serde(default = "default_summary_env")]
    pub env: String,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        SummaryConfig {
            env: default_summary_env(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_branch: default_branch(),
            remote: default_remote(),
            release_notes: default_release_notes(),
            output_dir: default_output_dir(),
            forge: ForgeConfig::default(),
            vcs: VcsConfig::default(),
            release_notes_match: ReleaseNotesMatchConfig::default(),
            summary: SummaryConfig::default(),
        }
    }
}

impl Config {
    /// Parse a TOML document
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| BuildInfoError::config(e.to_string()))
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `buildinfo.toml` in current directory
/// 3. `.buildinfo.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let path = match config_path {
        Some(path) => Some(PathBuf::from(path)),
        None => locate_config(),
    };

    match path {
        Some(path) => {
            tracing::debug!("loading configuration from {}", path.display());
            let text = fs::read_to_string(&path).map_err(|e| {
                BuildInfoError::config(format!("cannot read {}: {}", path.display(), e))
            })?;
            Config::from_toml(&text)
        }
        None => Ok(Config::default()),
    }
}

fn locate_config() -> Option<PathBuf> {
    let local = Path::new(".").join(CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }
    dirs::config_dir()
        .map(|dir| dir.join(format!(".{}", CONFIG_FILE)))
        .filter(|path| path.exists())
}

/// Whether the environment variable `name` holds a truthy value.
///
/// Accepts `1`, `t`, `true`, `y` and `yes`, ignoring case and surrounding
/// whitespace. Unset or anything else is false.
pub fn check_env_true(name: &str) -> bool {
    env::var(name)
        .map(|value| is_truthy(&value))
        .unwrap_or(false)
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "t" | "true" | "y" | "yes"
    )
}
