//! Git operations abstraction layer
//!
//! This module separates *running* a git command from *interpreting* it,
//! so the release workflow can run against a real repository or against a
//! scripted mock in tests.
//!
//! # Overview
//!
//! - [CommandRunner]: runs one `git` command and returns a [CommandResult].
//!   It never fails; problems show up as a non-zero exit code.
//! - [runner::SystemGitRunner]: the real implementation, shelling out to `git`
//! - [mock::MockRunner]: a scripted implementation for testing
//! - [RepositoryState]: the queries and mutations the release workflow needs,
//!   built on top of any runner
//!
//! ```rust
//! # use release_branch::git::{MockRunner, RepositoryState};
//! let runner = MockRunner::new().with_default("branch", "* master\n  develop\n");
//! let repo = RepositoryState::new(runner);
//! assert!(!repo.is_dirty());
//! assert_eq!(repo.current_branch().unwrap(), "master");
//! ```

pub mod mock;
pub mod runner;

pub use mock::MockRunner;
pub use runner::SystemGitRunner;

use crate::error::{ReleaseBranchError, Result};

/// Exit code git uses when `checkout -b` names a branch that already exists
pub const BRANCH_EXISTS_EXIT_CODE: i32 = 128;

/// Exit code reported when the git process could not be started at all
pub const SPAWN_FAILURE_EXIT_CODE: i32 = 127;

/// Captured result of one git invocation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandResult {
    /// Captured standard output
    pub output: String,
    /// Captured standard error
    pub error_output: String,
    /// Process exit code
    pub code: i32,
}

impl CommandResult {
    /// A successful result with the given stdout
    pub fn ok(output: impl Into<String>) -> Self {
        CommandResult {
            output: output.into(),
            error_output: String::new(),
            code: 0,
        }
    }

    /// A failed result with the given exit code and stderr
    pub fn failed(code: i32, error_output: impl Into<String>) -> Self {
        CommandResult {
            output: String::new(),
            error_output: error_output.into(),
            code,
        }
    }

    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Runs git commands against one working directory.
///
/// Implementations must not panic or return errors for failed commands:
/// everything, including a missing `git` binary, is reported through the
/// exit code of the returned [CommandResult]. Callers decide what a failure
/// means.
///
/// ## Implementations
///
/// - [SystemGitRunner](runner::SystemGitRunner): spawns the system `git`
/// - [MockRunner](mock::MockRunner): scripted responses, records calls
pub trait CommandRunner: Send + Sync {
    /// Run `git <args>` synchronously.
    ///
    /// # Arguments
    /// * `args` - Arguments after `git`, e.g. `["status", "--porcelain"]`
    fn run(&self, args: &[&str]) -> CommandResult;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, args: &[&str]) -> CommandResult {
        (**self).run(args)
    }
}

/// Working tree queries and mutations used by the release workflow.
///
/// Holds no state of its own besides the runner; every call goes to git.
/// Mutations (`add`, `commit`, `pull`, `push`) do not check their outcome;
/// the caller re-checks state where correctness depends on it.
pub struct RepositoryState<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> RepositoryState<R> {
    pub fn new(runner: R) -> Self {
        RepositoryState { runner }
    }

    /// The underlying runner
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// True iff `git status --porcelain` reports anything.
    pub fn is_dirty(&self) -> bool {
        let result = self.runner.run(&["status", "--porcelain"]);
        !result.output.trim().is_empty()
    }

    /// Name of the checked-out branch, read from the `*` line of `git branch`.
    ///
    /// # Returns
    /// * `Ok(String)` - The current branch name
    /// * `Err(Parse)` - No line is marked current, or HEAD is detached
    pub fn current_branch(&self) -> Result<String> {
        let result = self.runner.run(&["branch"]);
        parse_current_branch(&result.output)
    }

    /// `git checkout [-b] <branch>`
    ///
    /// # Returns
    /// * `false` - Only when git reports the branch already exists
    /// * `true` - Otherwise, including other failures
    pub fn checkout(&self, branch: &str, create: bool) -> bool {
        let result = if create {
            self.runner.run(&["checkout", "-b", branch])
        } else {
            self.runner.run(&["checkout", branch])
        };
        result.code != BRANCH_EXISTS_EXIT_CODE
    }

    /// `git add <path>`
    pub fn add(&self, path: &str) -> CommandResult {
        self.runner.run(&["add", path])
    }

    /// `git commit -m <message>`
    pub fn commit(&self, message: &str) -> CommandResult {
        self.runner.run(&["commit", "-m", message])
    }

    /// `git pull [<branch>]`
    pub fn pull(&self, branch: Option<&str>) -> CommandResult {
        match branch {
            Some(branch) => self.runner.run(&["pull", branch]),
            None => self.runner.run(&["pull"]),
        }
    }

    /// `git push [<spec>...]`
    pub fn push(&self, spec: &[&str]) -> CommandResult {
        let mut args = vec!["push"];
        args.extend_from_slice(spec);
        self.runner.run(&args)
    }
}

/// Extracts the current branch from `git branch` output.
pub fn parse_current_branch(listing: &str) -> Result<String> {
    let line = listing
        .lines()
        .find(|line| line.starts_with('*'))
        .ok_or_else(|| {
            ReleaseBranchError::parse("no current branch marked in `git branch` output")
        })?;

    let name = line.trim_start_matches('*').trim();
    if name.is_empty() || name.starts_with('(') {
        return Err(ReleaseBranchError::parse(format!(
            "cannot identify current branch from '{}'",
            line
        )));
    }

    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_current_branch() {
        let listing = "  develop\n* master\n  Release-v1.0.0\n";
        assert_eq!(parse_current_branch(listing).unwrap(), "master");
    }

    #[test]
    fn test_parse_current_branch_with_dots_and_dashes() {
        assert_eq!(
            parse_current_branch("* Release-v1.2.3\n  master\n").unwrap(),
            "Release-v1.2.3"
        );
    }

    #[test]
    fn test_parse_current_branch_missing_marker() {
        let err = parse_current_branch("  develop\n  master\n").unwrap_err();
        assert!(matches!(err, ReleaseBranchError::Parse(_)));
    }

    #[test]
    fn test_parse_current_branch_detached_head() {
        let err = parse_current_branch("* (HEAD detached at 1a2b3c4)\n  master\n").unwrap_err();
        assert!(matches!(err, ReleaseBranchError::Parse(_)));
    }

    #[test]
    fn test_is_dirty() {
        let clean = RepositoryState::new(MockRunner::new());
        assert!(!clean.is_dirty());

        let dirty = RepositoryState::new(
            MockRunner::new().with_default("status --porcelain", " M package.json\n"),
        );
        assert!(dirty.is_dirty());
    }

    #[test]
    fn test_whitespace_only_status_is_clean() {
        let repo = RepositoryState::new(MockRunner::new().with_default("status --porcelain", "\n"));
        assert!(!repo.is_dirty());
    }

    #[test]
    fn test_checkout_reports_existing_branch() {
        let runner = MockRunner::new().with_result(
            "checkout -b Release-v1.0.0",
            CommandResult::failed(
                BRANCH_EXISTS_EXIT_CODE,
                "fatal: a branch named 'Release-v1.0.0' already exists",
            ),
        );
        let repo = RepositoryState::new(runner);

        assert!(!repo.checkout("Release-v1.0.0", true));
        assert!(repo.checkout("Release-v1.0.1", true));
    }

    #[test]
    fn test_checkout_other_failures_are_not_conflicts() {
        let runner = MockRunner::new()
            .with_result("checkout missing", CommandResult::failed(1, "error: pathspec"));
        let repo = RepositoryState::new(runner);
        assert!(repo.checkout("missing", false));
    }

    #[test]
    fn test_command_forms() {
        let repo = RepositoryState::new(MockRunner::new());
        repo.checkout("master", false);
        repo.checkout("Release-v1.0.0", true);
        repo.add("VERSION");
        repo.commit("Updated Version Numbers");
        repo.pull(None);
        repo.pull(Some("develop"));
        repo.push(&["--set-upstream", "origin", "Release-v1.0.0"]);
        repo.push(&[]);

        assert_eq!(
            repo.runner().calls(),
            vec![
                "checkout master",
                "checkout -b Release-v1.0.0",
                "add VERSION",
                "commit -m Updated Version Numbers",
                "pull",
                "pull develop",
                "push --set-upstream origin Release-v1.0.0",
                "push",
            ]
        );
    }
}
