use std::path::{Path, PathBuf};

use crate::command::{query_command, run_command};
use crate::error::Result;

/// Runs the `git` executable
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
    workdir: Option<PathBuf>,
}

impl GitCli {
    /// Use `program` (usually `git`) from `PATH` in the current directory
    pub fn new(program: impl Into<String>) -> Self {
        GitCli {
            program: program.into(),
            workdir: None,
        }
    }

    /// Run every command from `dir` instead of the current directory
    pub fn in_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.workdir = Some(dir.as_ref().to_path_buf());
        self
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

impl super::Vcs for GitCli {
    fn query(&self, args: &[&str]) -> Result<String> {
        query_command(&self.program, args, self.workdir.as_deref())
    }

    fn run(&self, args: &[&str]) -> Result<bool> {
        Ok(run_command(&self.program, args, self.workdir.as_deref())?
            .status
            .success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vcs::Vcs;

    #[test]
    fn test_missing_executable_is_fatal() {
        let vcs = GitCli::new("git-buildinfo-no-such-binary");
        let err = vcs.query(&["status"]).unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("git-buildinfo-no-such-binary status"));
    }
}
