//! Command workflows behind the binary's subcommands

pub mod orchestration;

pub use orchestration::{ReleaseNotesArgs, ReleaseNotesResult, Workflow, ANNOUNCEMENT_FILE};
