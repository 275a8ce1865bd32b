pub mod analyzer;
pub mod boundary;
pub mod cli;
pub mod command;
pub mod config;
pub mod domain;
pub mod error;
pub mod facts;
pub mod forge;
pub mod release;
pub mod release_notes;
pub mod report;
pub mod ui;
pub mod vcs;
pub mod version;

pub use error::{BuildInfoError, Result};
pub use facts::BuildInfo;
