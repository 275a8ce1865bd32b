use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use git_buildinfo::cli::{ReleaseNotesArgs, Workflow};
use git_buildinfo::config;
use git_buildinfo::forge::GhCli;
use git_buildinfo::report::{format_unreleased, record_summary};
use git_buildinfo::ui;
use git_buildinfo::vcs::GitCli;

#[derive(Parser)]
#[command(
    name = "git-buildinfo",
    version,
    about = "Derive build versions and release information from a git checkout"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, global = true, help = "Branch whose builds are release candidates")]
    default_branch: Option<String>,

    #[arg(short, long, global = true, help = "Log external commands and decisions")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the synthesized build version
    Version,

    /// Print module name, version and source URL
    Info {
        #[arg(long, help = "Also append the build summary table")]
        summary: bool,
    },

    /// Print the decorated commit log
    Log {
        /// Revision to walk instead of HEAD
        reference: Option<String>,
    },

    /// List merge requests and issues since the last release tag
    Unreleased {
        /// Revision to walk instead of HEAD
        reference: Option<String>,

        #[arg(long, help = "Print JSON instead of markdown")]
        json: bool,
    },

    /// Cut a release if allowed and write the release announcement
    ReleaseNotes {
        #[arg(long, help = "Release even when ENABLE_RELEASE_BUILD is not set")]
        release: bool,

        #[arg(long, help = "Heading printed before the notes")]
        heading: Option<String>,

        #[arg(long, help = "File appended under a Checksums section")]
        checksums: Option<PathBuf>,

        #[arg(short, long, help = "Output file [default: <output_dir>/release_notes.md]")]
        output: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = config::load_config(args.config.as_deref())?;
    if let Some(branch) = args.default_branch {
        config.default_branch = branch;
    }

    let vcs = GitCli::new(config.vcs.command.clone());
    let forge = GhCli::new(config.forge.command.clone(), config.forge.limit);
    let mut workflow = Workflow::new(config, vcs, forge);

    match args.command {
        Command::Version => {
            let version = workflow.version()?;
            ui::display_boundary_warnings(&workflow.warnings());
            ui::display_output(&version);
        }
        Command::Info { summary } => {
            let text = workflow.info()?;
            ui::display_boundary_warnings(&workflow.warnings());
            ui::display_output(&text);
            if summary {
                let env_name = workflow.config().summary.env.clone();
                let table = workflow.summary()?;
                if record_summary(&env_name, &table)? {
                    ui::display_success(&format!("Summary recorded in ${}", env_name));
                } else {
                    ui::display_output(&table);
                }
            }
        }
        Command::Log { reference } => {
            for entry in workflow.log(reference.as_deref())? {
                ui::display_output(&ui::format_commit_line(
                    &entry.hash,
                    &entry.refs,
                    &entry.tags,
                    &entry.message,
                ));
            }
        }
        Command::Unreleased { reference, json } => {
            let changes = workflow.unreleased(reference.as_deref())?;
            ui::display_boundary_warnings(&workflow.warnings());
            ui::display_boundary_warnings(&changes.warnings);
            if json {
                ui::display_output(&serde_json::to_string_pretty(&changes)?);
            } else {
                ui::display_output(&format_unreleased(&changes));
            }
        }
        Command::ReleaseNotes {
            release,
            heading,
            checksums,
            output,
        } => {
            ui::display_status("Preparing release notes ...");
            let result = workflow.release_notes(&ReleaseNotesArgs {
                release,
                heading,
                checksums,
                output,
            })?;
            ui::display_boundary_warnings(&workflow.warnings());
            if let Some(warning) = result.decision.warning() {
                ui::display_boundary_warning(&warning);
            }
            ui::display_success(&format!(
                "Release notes for {} written to {}",
                result.version,
                result.path.display()
            ));
            ui::display_output(&result.version);
        }
    }

    Ok(())
}
