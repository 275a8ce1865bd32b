//! Subprocess plumbing shared by the version control and forge clients

use std::path::Path;
use std::process::{Command, Output};

use tracing::debug;

use crate::error::{BuildInfoError, Result};

/// Run `program` with `args`, optionally from `workdir`.
///
/// An executable that cannot be spawned is a [`BuildInfoError::CommandUnavailable`];
/// a non-zero exit is not an error here.
pub fn run_command(program: &str, args: &[&str], workdir: Option<&Path>) -> Result<Output> {
    let command_line = format!("{} {}", program, args.join(" "));
    debug!("running {}", command_line);

    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(dir) = workdir {
        cmd.current_dir(dir);
    }

    cmd.output()
        .map_err(|e| BuildInfoError::command_unavailable(command_line, e))
}

/// Trimmed stdout of a finished command, or empty text if it failed
pub fn stdout_or_empty(program: &str, args: &[&str], output: &Output) -> String {
    if !output.status.success() {
        debug!(
            "{} {} exited with {}: {}",
            program,
            args.join(" "),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
        return String::new();
    }
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// [`run_command`] then [`stdout_or_empty`]
pub fn query_command(program: &str, args: &[&str], workdir: Option<&Path>) -> Result<String> {
    let output = run_command(program, args, workdir)?;
    Ok(stdout_or_empty(program, args, &output))
}
