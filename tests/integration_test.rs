// tests/integration_test.rs
use std::fs;
use std::path::Path;
use std::process::Command;

use git2::Repository;
use release_branch::cli::ReleaseOrchestrator;
use release_branch::config::ReleaseConfig;
use release_branch::git::{RepositoryState, SystemGitRunner};
use release_branch::version::IncrementKind;
use tempfile::TempDir;

fn release_branch() -> Command {
    Command::new(env!("CARGO_BIN_EXE_release-branch"))
}

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

#[test]
fn test_release_branch_help() {
    let output = release_branch()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("release-branch"));
    assert!(stdout.contains("Create a release branch"));
}

#[test]
fn test_release_branch_version() {
    let output = release_branch()
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_no_git_run_updates_files() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("package.json"),
        r#"{"name":"demo","version":"1.2.3"}"#,
    )
    .unwrap();
    fs::write(
        temp_dir.path().join(release_branch::config::CONFIG_FILE_NAME),
        "update_readme = false\n",
    )
    .unwrap();

    let output = release_branch()
        .args(["major", "--no-git"])
        .current_dir(temp_dir.path())
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(fs::read_to_string(temp_dir.path().join("VERSION")).unwrap(), "v2.0.0");
    assert!(!temp_dir.path().join("README.md").exists());
}

#[test]
fn test_missing_manifest_exits_non_zero() {
    let temp_dir = TempDir::new().unwrap();

    let output = release_branch()
        .args(["patch", "--no-git"])
        .current_dir(temp_dir.path())
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("package.json"));
}

#[test]
fn test_invalid_configured_kind_exits_non_zero() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(release_branch::config::CONFIG_FILE_NAME),
        "iterum = \"huge\"\n",
    )
    .unwrap();

    let output = release_branch()
        .args(["--no-git"])
        .current_dir(temp_dir.path())
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
}

#[cfg(test)]
mod git_operations_tests {
    use super::*;

    // Helper function to setup a temporary git repo with one commit
    fn setup_test_repo() -> TempDir {
        let temp_dir = TempDir::new().expect("Could not create temp dir");
        let repo = Repository::init(temp_dir.path()).expect("Could not init git repo");

        {
            let mut config = repo.config().expect("Could not get config");
            config
                .set_str("user.name", "Test User")
                .expect("Could not set user.name");
            config
                .set_str("user.email", "test@example.com")
                .expect("Could not set user.email");
        }

        fs::write(
            temp_dir.path().join("package.json"),
            r#"{"name":"demo","version":"1.2.3"}"#,
        )
        .expect("Could not write manifest");
        fs::write(temp_dir.path().join("README.md"), "demo\n====\n\nNotes.\n")
            .expect("Could not write readme");
        fs::write(temp_dir.path().join("VERSION"), "1.2.3").expect("Could not write version");

        let mut index = repo.index().expect("Could not get index");
        for file in ["package.json", "README.md", "VERSION"] {
            index
                .add_path(Path::new(file))
                .expect("Could not add file to index");
        }
        index.write().expect("Could not write index");

        let tree_id = index.write_tree().expect("Could not write tree");
        let tree = repo.find_tree(tree_id).expect("Could not find tree");
        let signature = repo.signature().expect("Could not get sig");
        repo.commit(Some("HEAD"), &signature, &signature, "Initial commit", &tree, &[])
            .expect("Could not create commit");

        temp_dir
    }

    fn head_branch(path: &Path) -> String {
        let repo = Repository::open(path).unwrap();
        let head = repo.head().unwrap();
        head.shorthand().unwrap().to_string()
    }

    #[test]
    fn test_release_against_real_repository() {
        if !git_available() {
            eprintln!("git not available, skipping");
            return;
        }

        let temp_dir = setup_test_repo();
        let source_branch = head_branch(temp_dir.path());

        let mut config = ReleaseConfig {
            increment: IncrementKind::Minor,
            ..ReleaseConfig::default()
        };
        config.git.source_branch = source_branch;
        config.git.auto_push = false;

        let runner = SystemGitRunner::discover(temp_dir.path(), true).unwrap();
        let mut release = ReleaseOrchestrator::new(config, runner, temp_dir.path());
        let outcome = release.run().expect("release should succeed");

        assert_eq!(outcome.new_version, "v1.3.0");
        assert_eq!(head_branch(temp_dir.path()), "Release-v1.3.0");
        assert_eq!(fs::read_to_string(temp_dir.path().join("VERSION")).unwrap(), "v1.3.0");

        let repo = RepositoryState::new(SystemGitRunner::new(temp_dir.path(), true));
        assert!(!repo.is_dirty(), "all artifacts should be committed");

        let git_repo = Repository::open(temp_dir.path()).unwrap();
        let head_commit = git_repo.head().unwrap().peel_to_commit().unwrap();
        assert_eq!(head_commit.message(), Some("Updated Version Numbers\n"));
    }

    #[test]
    fn test_second_release_of_same_version_conflicts() {
        if !git_available() {
            eprintln!("git not available, skipping");
            return;
        }

        let temp_dir = setup_test_repo();
        let source_branch = head_branch(temp_dir.path());
        {
            let repo = Repository::open(temp_dir.path()).unwrap();
            let head = repo.head().unwrap().peel_to_commit().unwrap();
            repo.branch("Release-v1.2.4", &head, false).unwrap();
        }

        let mut config = ReleaseConfig::default();
        config.git.source_branch = source_branch.clone();
        config.git.auto_push = false;

        let runner = SystemGitRunner::discover(temp_dir.path(), true).unwrap();
        let mut release = ReleaseOrchestrator::new(config, runner, temp_dir.path());
        let err = release.run().unwrap_err();

        assert!(matches!(
            err,
            release_branch::ReleaseBranchError::BranchAlreadyExists(_)
        ));
        assert_eq!(head_branch(temp_dir.path()), source_branch);
        assert_eq!(fs::read_to_string(temp_dir.path().join("VERSION")).unwrap(), "1.2.3");
    }
}
