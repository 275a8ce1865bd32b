//! Main workflow orchestration logic
//!
//! Each subcommand is a method on [`Workflow`], which owns the configuration
//! and the collaborators for one invocation. `main.rs` only parses arguments,
//! builds the workflow and prints results, so everything here runs against
//! mock collaborators in tests.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::analyzer::{CorrelationRules, ReleaseHistory, UnreleasedChanges};
use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::CommitEntry;
use crate::facts::BuildInfo;
use crate::forge::Forge;
use crate::release::{prepare_release, ReleaseDecision};
use crate::release_notes::{Announcement, ReleaseNotes};
use crate::report::{format_summary_table, record_summary, SummaryValue};
use crate::ui;
use crate::vcs::Vcs;

/// File written by the release-notes workflow inside the output directory
pub const ANNOUNCEMENT_FILE: &str = "release_notes.md";

/// Options of the release-notes workflow
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseNotesArgs {
    /// Cut a release when the gating conditions hold
    pub release: bool,
    /// Heading printed before the notes as `<heading> <version>`
    pub heading: Option<String>,
    /// File whose content is appended under `## Checksums`
    pub checksums: Option<PathBuf>,
    /// Write here instead of `<output_dir>/release_notes.md`
    pub output: Option<PathBuf>,
}

/// Result of a release-notes workflow run
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseNotesResult {
    /// Version the announcement was written for
    pub version: String,
    /// Where the announcement was written
    pub path: PathBuf,
    pub decision: ReleaseDecision,
    /// Whether the build summary was recorded
    pub summary_recorded: bool,
}

/// One invocation: configuration plus collaborators
pub struct Workflow<V: Vcs, F: Forge> {
    config: Config,
    info: BuildInfo<V>,
    forge: F,
}

impl<V: Vcs, F: Forge> Workflow<V, F> {
    pub fn new(config: Config, vcs: V, forge: F) -> Self {
        let info = BuildInfo::new(vcs, config.default_branch.clone())
            .with_remote(config.remote.clone());
        Workflow {
            config,
            info,
            forge,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn build_info(&self) -> &BuildInfo<V> {
        &self.info
    }

    /// Warnings collected by the facts provider so far
    pub fn warnings(&self) -> Vec<BoundaryWarning> {
        self.info.warnings()
    }

    /// Synthesized version of the checkout
    pub fn version(&self) -> Result<String> {
        self.info.ensure_full_history()?;
        Ok(self.info.version()?.to_string())
    }

    /// Module/Version/Source block
    pub fn info(&self) -> Result<String> {
        self.info.ensure_full_history()?;
        Ok(ui::format_build_info(
            self.info.name()?,
            self.info.version()?,
            self.info.remote()?,
            self.info.commit()?,
        ))
    }

    /// Decorated log of `reference`, or HEAD when `None`
    pub fn log(&self, reference: Option<&str>) -> Result<Vec<CommitEntry>> {
        let history = self.history(reference);
        Ok(history.commits()?.to_vec())
    }

    /// Commits, merge requests and issues since the last release tag
    pub fn unreleased(&self, reference: Option<&str>) -> Result<UnreleasedChanges> {
        self.info.ensure_full_history()?;
        let changes = self.history(reference).unreleased()?;
        for warning in &changes.warnings {
            warn!("{}", warning);
        }
        Ok(changes)
    }

    /// Cut a release if allowed, then write the announcement and record the
    /// build summary.
    pub fn release_notes(&mut self, args: &ReleaseNotesArgs) -> Result<ReleaseNotesResult> {
        let notes = ReleaseNotes::load(&self.config.release_notes)?;
        self.info.ensure_full_history()?;

        let enabled = args.release || crate::config::check_env_true(crate::config::RELEASE_FLAG);
        let decision = prepare_release(&mut self.info, enabled, &notes)?;
        match &decision {
            ReleaseDecision::Cut { version } => {
                ui::display_success(&format!("Created release tag {}", version))
            }
            ReleaseDecision::Skip { reason } => info!("not releasing: {}", reason),
        }

        let version = self.info.version()?.to_string();
        if notes.find(&version, self.config.release_notes_match.mode).is_none() {
            ui::display_boundary_warning(&BoundaryWarning::NoReleaseNotes {
                version: version.clone(),
            });
        }

        let checksums = match &args.checksums {
            Some(path) => Some(
                fs::read_to_string(path)
                    .with_context(|| format!("Cannot read checksums from {}", path.display()))?,
            ),
            None => None,
        };
        let announcement = Announcement {
            heading: args.heading.as_deref(),
            notes: Some(&notes),
            checksums: checksums.as_deref(),
            mode: self.config.release_notes_match.mode,
        };

        let path = args
            .output
            .clone()
            .unwrap_or_else(|| self.config.output_dir.join(ANNOUNCEMENT_FILE));
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create {}", parent.display()))?;
        }
        fs::write(&path, announcement.render(&version))
            .with_context(|| format!("Cannot write {}", path.display()))?;
        info!("release notes written to {}", path.display());

        let summary_recorded = record_summary(&self.config.summary.env, &self.summary()?)?;

        Ok(ReleaseNotesResult {
            version,
            path,
            decision,
            summary_recorded,
        })
    }

    /// Build summary table for the current checkout
    pub fn summary(&self) -> Result<String> {
        let mut rows: Vec<(&str, SummaryValue)> = vec![
            ("Module", self.info.name()?.into()),
            ("Version", self.info.version()?.into()),
            ("Branch", self.info.branch()?.into()),
            ("Commit", self.info.commit()?.into()),
        ];
        let warnings: Vec<String> = self.info.warnings().iter().map(|w| w.to_string()).collect();
        if !warnings.is_empty() {
            rows.push(("Warnings", warnings.into()));
        }
        Ok(format_summary_table(&rows))
    }

    fn history(&self, reference: Option<&str>) -> ReleaseHistory<'_, V, F> {
        ReleaseHistory::new(self.info.vcs(), &self.forge, self.config.vcs.log_limit)
            .with_reference(reference.unwrap_or_default())
            .with_rules(CorrelationRules::default())
    }
}
