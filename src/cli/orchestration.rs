//! Release workflow orchestration
//!
//! This module holds the release-branch state machine. It is independent of
//! clap so the workflow can be driven programmatically and tested against a
//! [MockRunner](crate::git::MockRunner).

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::artifact::{self, Manifest, ReadmeRequest};
use crate::config::ReleaseConfig;
use crate::error::{ReleaseBranchError, Result};
use crate::git::{CommandRunner, RepositoryState};
use crate::notice::SkipNotice;
use crate::ui;
use crate::version::next_version;

/// Where a release run currently stands.
///
/// Steps that a configuration skips (for instance everything git related
/// under `disable_git`) still pass through their state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseState {
    Idle,
    SourceChecked,
    VersionComputed,
    BranchCreated,
    ArtifactsWritten,
    Committed,
    Pushed,
    Done,
    Aborted,
}

/// The three versioned files, in the order they are written and staged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Artifact {
    Package,
    VersionFile,
    Readme,
}

impl Artifact {
    fn label(&self) -> &'static str {
        match self {
            Artifact::Package => "package",
            Artifact::VersionFile => "version file",
            Artifact::Readme => "readme",
        }
    }
}

/// Result of a successful release run
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseOutcome {
    /// Version read from the manifest
    pub previous_version: String,

    /// Rendered new version
    pub new_version: String,

    /// Release branch created (or planned, in a dry run); `None` without git
    pub branch: Option<String>,

    /// Artifact files written (or planned), as configured, in write order
    pub artifacts: Vec<PathBuf>,

    /// Whether the artifacts were committed
    pub committed: bool,

    /// Whether the branch was pushed to the remote
    pub pushed: bool,

    /// Whether this was a dry run; nothing was branched, written or committed
    pub dry_run: bool,
}

/// Runs one release: source checkout, version bump, branch creation,
/// artifact updates, commit and push.
///
/// The run is single-shot and sequential. A fatal error stops it where it is;
/// nothing already done (a checked-out branch, written files) is undone.
/// Two runs against the same working tree at the same time are not guarded
/// against; callers must not do that.
pub struct ReleaseOrchestrator<R: CommandRunner> {
    config: ReleaseConfig,
    repo: RepositoryState<R>,
    root: PathBuf,
    date: NaiveDate,
    state: ReleaseState,
}

impl<R: CommandRunner> ReleaseOrchestrator<R> {
    /// # Arguments
    /// * `config` - Resolved configuration for this run
    /// * `runner` - Git runner; must run commands in `root`
    /// * `root` - Directory the configured file paths are relative to
    pub fn new(config: ReleaseConfig, runner: R, root: impl Into<PathBuf>) -> Self {
        ReleaseOrchestrator {
            config,
            repo: RepositoryState::new(runner),
            root: root.into(),
            date: chrono::Local::now().date_naive(),
            state: ReleaseState::Idle,
        }
    }

    /// Use a fixed date for the readme `[now]` placeholder
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn state(&self) -> ReleaseState {
        self.state
    }

    pub fn config(&self) -> &ReleaseConfig {
        &self.config
    }

    pub fn repository(&self) -> &RepositoryState<R> {
        &self.repo
    }

    /// Run the whole workflow.
    ///
    /// # Returns
    /// * `Ok(ReleaseOutcome)` - State is `Done`
    /// * `Err` - State is `Aborted`; see [ReleaseBranchError] for the causes
    pub fn run(&mut self) -> Result<ReleaseOutcome> {
        match self.execute() {
            Ok(outcome) => {
                self.state = ReleaseState::Done;
                Ok(outcome)
            }
            Err(e) => {
                self.state = ReleaseState::Aborted;
                Err(e)
            }
        }
    }

    fn execute(&mut self) -> Result<ReleaseOutcome> {
        ui::display_heading(&format!("Create a {} branch", self.config.increment));

        self.check_out_source()?;

        let mut manifest = artifact::read_manifest(&self.root.join(&self.config.files.package))?;
        let previous_version = manifest.version()?.to_string();
        ui::display_success(&format!("Current version: {}", previous_version));

        let new_version = next_version(
            &previous_version,
            self.config.increment,
            &self.config.version_prefix,
            &self.config.version_postfix,
        )?;
        ui::display_success(&format!("Set to: {}", new_version));
        self.state = ReleaseState::VersionComputed;

        if self.config.dry_run {
            return Ok(self.plan(previous_version, new_version));
        }

        let branch = self.create_release_branch(&new_version)?;
        self.state = ReleaseState::BranchCreated;

        manifest.set_version(&new_version);
        let artifacts = self.write_artifacts(&manifest, &new_version)?;
        self.state = ReleaseState::ArtifactsWritten;

        let committed = self.commit(&artifacts);
        self.state = ReleaseState::Committed;

        let pushed = self.push(branch.as_deref())?;
        self.state = ReleaseState::Pushed;

        Ok(ReleaseOutcome {
            previous_version,
            new_version,
            branch,
            artifacts,
            committed,
            pushed,
            dry_run: false,
        })
    }

    fn check_out_source(&mut self) -> Result<()> {
        if self.config.disable_git {
            ui::display_notice(&SkipNotice::GitDisabled);
            self.state = ReleaseState::SourceChecked;
            return Ok(());
        }

        if self.repo.is_dirty() {
            return Err(ReleaseBranchError::DirtyWorkingTree);
        }

        let current = self.repo.current_branch()?;
        ui::display_success(&format!("Git current branch: {}", current));

        let source = &self.config.git.source_branch;
        if self.config.dry_run {
            if current != *source {
                ui::display_notice(&SkipNotice::NotOnSourceBranch {
                    current,
                    source: source.clone(),
                });
            }
        } else {
            if current != *source {
                ui::display_status(&format!("Git checkout: {}", source));
                self.repo.checkout(source, false);
            }
            ui::display_status("Git pull");
            self.repo.pull(None);
        }

        self.state = ReleaseState::SourceChecked;
        Ok(())
    }

    fn release_branch_name(&self, version: &str) -> String {
        format!("{}{}", self.config.git.new_branch_prefix, version)
    }

    fn create_release_branch(&self, version: &str) -> Result<Option<String>> {
        if self.config.disable_git {
            return Ok(None);
        }

        // The pull may have left the tree dirty
        if self.repo.is_dirty() {
            return Err(ReleaseBranchError::DirtyWorkingTree);
        }

        let branch = self.release_branch_name(version);
        ui::display_status(&format!("Git checkout new branch: {}", branch));
        if !self.repo.checkout(&branch, true) {
            return Err(ReleaseBranchError::BranchAlreadyExists(branch));
        }
        Ok(Some(branch))
    }

    fn enabled_artifacts(&self) -> [(Artifact, bool, &Path); 3] {
        let files = &self.config.files;
        [
            (Artifact::Package, self.config.update_package, files.package.as_path()),
            (Artifact::VersionFile, self.config.update_version, files.version.as_path()),
            (Artifact::Readme, self.config.update_readme, files.readme.as_path()),
        ]
    }

    fn write_artifacts(&self, manifest: &Manifest, version: &str) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        for (kind, enabled, path) in self.enabled_artifacts() {
            if !enabled {
                ui::display_notice(&SkipNotice::ArtifactDisabled {
                    artifact: kind.label(),
                    path: path.to_path_buf(),
                });
                continue;
            }

            let target = self.root.join(path);
            let updated = match kind {
                Artifact::Package => {
                    artifact::write_manifest(&target, manifest)?;
                    true
                }
                Artifact::VersionFile => {
                    artifact::write_version_file(&target, version)?;
                    true
                }
                Artifact::Readme => self.write_readme(&target, path, manifest, version)?,
            };

            if updated {
                ui::display_success(&format!("Updated: {}", path.display()));
                written.push(path.to_path_buf());
            }
        }

        Ok(written)
    }

    fn write_readme(
        &self,
        target: &Path,
        path: &Path,
        manifest: &Manifest,
        version: &str,
    ) -> Result<bool> {
        let request = ReadmeRequest {
            template: &self.config.readme_template,
            divider_pattern: &self.config.readme_pattern,
            version,
            kind: self.config.increment,
            date: self.date,
            project_name: Some(manifest.name()?),
        };

        let update = artifact::update_readme(target, &request)?;
        if !update.inserted {
            ui::display_notice(&SkipNotice::ReadmeDividerMissing {
                path: path.to_path_buf(),
                pattern: self.config.readme_pattern.clone(),
            });
        }
        Ok(update.inserted)
    }

    fn commit(&self, artifacts: &[PathBuf]) -> bool {
        if self.config.disable_git {
            return false;
        }
        if !self.config.git.auto_commit {
            ui::display_notice(&SkipNotice::AutoCommitDisabled);
            return false;
        }

        for path in artifacts {
            let path = path.to_string_lossy();
            self.repo.add(&path);
            ui::display_success(&format!("Git add: {}", path));
        }

        let message = &self.config.git.commit_message;
        self.repo.commit(message);
        ui::display_success(&format!("Git commit files: {}", message));
        true
    }

    fn push(&self, branch: Option<&str>) -> Result<bool> {
        if self.config.disable_git {
            return Ok(false);
        }

        let remote = &self.config.git.remote;
        if !self.config.git.auto_push {
            ui::display_notice(&SkipNotice::AutoPushDisabled);
            if let Some(branch) = branch {
                ui::display_manual_push_instruction(branch, remote);
            }
            return Ok(false);
        }

        let current = self.repo.current_branch()?;
        ui::display_status(&format!(
            "Git push to remote: --set-upstream {} {}",
            remote, current
        ));
        self.repo.push(&["--set-upstream", remote.as_str(), current.as_str()]);
        Ok(true)
    }

    fn plan(&self, previous_version: String, new_version: String) -> ReleaseOutcome {
        let branch =
            (!self.config.disable_git).then(|| self.release_branch_name(&new_version));
        let artifacts = self
            .enabled_artifacts()
            .into_iter()
            .filter(|(_, enabled, _)| *enabled)
            .map(|(_, _, path)| path.to_path_buf())
            .collect();

        ReleaseOutcome {
            previous_version,
            new_version,
            branch,
            artifacts,
            committed: false,
            pushed: false,
            dry_run: true,
        }
    }
}
