use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::git::{CommandResult, CommandRunner};

/// Mock runner for testing without actual git operations
///
/// Commands are keyed by their argument line joined with spaces, e.g.
/// `"status --porcelain"`. A queued result is returned once, in order; once
/// the queue for a command is empty its default applies, and commands without
/// a default succeed with empty output. Every call is recorded.
pub struct MockRunner {
    queued: Mutex<HashMap<String, VecDeque<CommandResult>>>,
    defaults: HashMap<String, CommandResult>,
    calls: Mutex<Vec<String>>,
}

impl MockRunner {
    /// Create a runner where every command succeeds with empty output,
    /// except `branch`, which reports `master` as current
    pub fn new() -> Self {
        let mut defaults = HashMap::new();
        defaults.insert("branch".to_string(), CommandResult::ok("* master\n"));

        MockRunner {
            queued: Mutex::new(HashMap::new()),
            defaults,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Set the stdout a command returns whenever nothing is queued for it
    pub fn with_default(self, command: &str, output: &str) -> Self {
        self.with_result(command, CommandResult::ok(output))
    }

    /// Set the full result a command returns whenever nothing is queued for it
    pub fn with_result(mut self, command: &str, result: CommandResult) -> Self {
        self.defaults.insert(command.to_string(), result);
        self
    }

    /// Queue a one-shot stdout for the next call of a command
    pub fn queue(self, command: &str, output: &str) -> Self {
        self.queue_result(command, CommandResult::ok(output))
    }

    /// Queue a one-shot result for the next call of a command
    pub fn queue_result(self, command: &str, result: CommandResult) -> Self {
        if let Ok(mut queued) = self.queued.lock() {
            queued
                .entry(command.to_string())
                .or_default()
                .push_back(result);
        }
        self
    }

    /// Every command issued so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Number of times a command line was issued
    pub fn count(&self, command: &str) -> usize {
        self.calls().iter().filter(|call| *call == command).count()
    }
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, args: &[&str]) -> CommandResult {
        let command = args.join(" ");

        if let Ok(mut calls) = self.calls.lock() {
            calls.push(command.clone());
        }

        let queued = self
            .queued
            .lock()
            .ok()
            .and_then(|mut queued| queued.get_mut(&command).and_then(VecDeque::pop_front));

        queued
            .or_else(|| self.defaults.get(&command).cloned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_runner_defaults() {
        let runner = MockRunner::new();
        let result = runner.run(&["pull"]);
        assert!(result.success());
        assert!(result.output.is_empty());
        assert_eq!(runner.run(&["branch"]).output, "* master\n");
    }

    #[test]
    fn test_mock_runner_queue_then_default() {
        let runner = MockRunner::new()
            .with_default("status --porcelain", "")
            .queue("status --porcelain", "?? new.txt\n");

        assert_eq!(runner.run(&["status", "--porcelain"]).output, "?? new.txt\n");
        assert_eq!(runner.run(&["status", "--porcelain"]).output, "");
    }

    #[test]
    fn test_mock_runner_records_calls() {
        let runner = MockRunner::new();
        runner.run(&["status", "--porcelain"]);
        runner.run(&["add", "VERSION"]);
        runner.run(&["add", "VERSION"]);

        assert_eq!(runner.calls(), vec!["status --porcelain", "add VERSION", "add VERSION"]);
        assert_eq!(runner.count("add VERSION"), 2);
    }

    #[test]
    fn test_mock_runner_failed_result() {
        let runner = MockRunner::new().with_result("pull", CommandResult::failed(1, "no remote"));
        let result = runner.run(&["pull"]);
        assert!(!result.success());
        assert_eq!(result.error_output, "no remote");
    }
}
