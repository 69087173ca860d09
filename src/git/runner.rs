use std::path::{Path, PathBuf};
use std::process::Command;

use git2::Repository as Git2Repo;

use crate::error::Result;
use crate::git::{CommandResult, CommandRunner, SPAWN_FAILURE_EXIT_CODE};
use crate::ui;

/// Runs commands through the system `git` binary
pub struct SystemGitRunner {
    workdir: PathBuf,
    silent: bool,
}

impl SystemGitRunner {
    /// Create a runner for `workdir` without checking that it is a repository.
    ///
    /// # Arguments
    /// * `workdir` - Directory every command runs in
    /// * `silent` - When false, each command line and its output is echoed
    pub fn new<P: AsRef<Path>>(workdir: P, silent: bool) -> Self {
        SystemGitRunner {
            workdir: workdir.as_ref().to_path_buf(),
            silent,
        }
    }

    /// Create a runner for `workdir` after confirming it lies inside a git
    /// repository.
    ///
    /// Commands still run in `workdir` itself, not the repository root, so
    /// relative artifact paths resolve the same way for git and for the file
    /// writes.
    ///
    /// # Returns
    /// * `Ok(SystemGitRunner)` - `workdir` is inside a repository
    /// * `Err(Git)` - No repository found in `workdir` or any parent
    pub fn discover<P: AsRef<Path>>(workdir: P, silent: bool) -> Result<Self> {
        Git2Repo::discover(workdir.as_ref())?;
        Ok(Self::new(workdir, silent))
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    pub fn is_silent(&self) -> bool {
        self.silent
    }
}

impl CommandRunner for SystemGitRunner {
    fn run(&self, args: &[&str]) -> CommandResult {
        if !self.silent {
            ui::display_command(args);
        }

        let result = match Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
        {
            Ok(output) => CommandResult {
                output: String::from_utf8_lossy(&output.stdout).into_owned(),
                error_output: String::from_utf8_lossy(&output.stderr).into_owned(),
                // Killed by a signal: no code, report a generic failure
                code: output.status.code().unwrap_or(-1),
            },
            Err(e) => CommandResult::failed(
                SPAWN_FAILURE_EXIT_CODE,
                format!("Failed to execute git: {}", e),
            ),
        };

        if !self.silent {
            ui::display_command_output(&result);
        }

        result
    }
}
