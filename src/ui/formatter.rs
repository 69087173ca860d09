//! Pure formatting functions for UI output.
//!
//! This module contains all display logic for a release run. Nothing here
//! reads input; functions only print.

use console::style;

use crate::cli::orchestration::ReleaseOutcome;
use crate::git::CommandResult;
use crate::notice::SkipNotice;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Print a bold section heading.
pub fn display_heading(message: &str) {
    println!("\n{}", style(message).bold().underlined());
}

/// Display a non-fatal notice.
pub fn display_notice(notice: &SkipNotice) {
    println!("{} {}", style("ℹ").cyan(), notice);
}

/// Echo a git command line before it runs.
pub fn display_command(args: &[&str]) {
    println!("  {} {}", style("$ git").dim(), style(args.join(" ")).dim());
}

/// Echo what a git command printed, and its exit code when it failed.
pub fn display_command_output(result: &CommandResult) {
    for line in result.output.lines().chain(result.error_output.lines()) {
        println!("    {}", style(line).dim());
    }
    if !result.success() {
        println!("    {}", style(format!("exit code {}", result.code)).red().dim());
    }
}

/// Summarize a finished run.
///
/// # Arguments
/// * `outcome` - What the run did
pub fn display_outcome(outcome: &ReleaseOutcome) {
    if outcome.dry_run {
        println!("\n{}", style("Dry run, nothing was changed:").bold());
        println!(
            "  Version: {} -> {}",
            style(&outcome.previous_version).red(),
            style(&outcome.new_version).green()
        );
        if let Some(branch) = &outcome.branch {
            println!("  Would create branch: {}", style(branch).green());
        }
        for path in &outcome.artifacts {
            println!("  Would update: {}", path.display());
        }
        return;
    }

    match &outcome.branch {
        Some(branch) => println!(
            "\n{} Created release branch {} at version {}\n",
            style("✓").green(),
            style(branch).bold(),
            style(&outcome.new_version).bold()
        ),
        None => println!(
            "\n{} Updated version to {}\n",
            style("✓").green(),
            style(&outcome.new_version).bold()
        ),
    }
}

/// Display the target profiles defined in the config file.
pub fn display_targets(targets: &[String]) {
    println!("{}", style("Configured targets:").bold());
    for target in targets {
        println!("  - {}", target);
    }
}

/// Tell the user how to publish a branch that was not pushed.
pub fn display_manual_push_instruction(branch: &str, remote: &str) {
    println!(
        "\n{} To push this branch later, run:\n  {}",
        style("→").yellow(),
        style(format!("git push --set-upstream {} {}", remote, branch)).cyan()
    );
}
