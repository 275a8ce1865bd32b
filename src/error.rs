use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for git-buildinfo operations
#[derive(Error, Debug)]
pub enum BuildInfoError {
    #[error("Cannot execute '{command}': {source}")]
    CommandUnavailable {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot read release notes '{}': {source}", path.display())]
    ReleaseNotes {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Forge output error: {0}")]
    Forge(String),

    #[error("JSON decoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-buildinfo
pub type Result<T> = std::result::Result<T, BuildInfoError>;

impl BuildInfoError {
    /// Create a command error for an executable that could not be spawned
    pub fn command_unavailable(command: impl Into<String>, source: std::io::Error) -> Self {
        BuildInfoError::CommandUnavailable {
            command: command.into(),
            source,
        }
    }

    /// Create a release notes error for a document that cannot be read
    pub fn release_notes(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BuildInfoError::ReleaseNotes {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        BuildInfoError::Config(msg.into())
    }

    /// Create a forge error with context
    pub fn forge(msg: impl Into<String>) -> Self {
        BuildInfoError::Forge(msg.into())
    }

    /// Whether the error must abort the run.
    ///
    /// Only a missing executable or an unreadable release notes document are
    /// fatal; everything else is logged and the affected step skipped.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BuildInfoError::CommandUnavailable { .. } | BuildInfoError::ReleaseNotes { .. }
        )
    }
}
