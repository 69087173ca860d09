use std::fmt;
use std::path::PathBuf;

/// Non-fatal conditions met during a release run.
/// They are reported to the user and the run carries on.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipNotice {
    /// `disable_git` is set; no git commands run
    GitDisabled,
    /// An artifact's update toggle is off
    ArtifactDisabled { artifact: &'static str, path: PathBuf },
    /// The readme exists but has no line matching the divider pattern
    ReadmeDividerMissing { path: PathBuf, pattern: String },
    AutoCommitDisabled,
    AutoPushDisabled,
    /// Started on another branch than the source branch in a dry run
    NotOnSourceBranch { current: String, source: String },
    /// The invocation target is neither an increment kind nor a configured profile
    UnknownTarget { target: String },
}

impl fmt::Display for SkipNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipNotice::GitDisabled => write!(f, "Git integration disabled, skipping git commands"),
            SkipNotice::ArtifactDisabled { artifact, path } => {
                write!(f, "Skipping {} update ({})", artifact, path.display())
            }
            SkipNotice::ReadmeDividerMissing { path, pattern } => write!(
                f,
                "No line in {} matches '{}', readme left unchanged",
                path.display(),
                pattern.escape_debug()
            ),
            SkipNotice::AutoCommitDisabled => {
                write!(f, "Auto commit disabled, files left unstaged")
            }
            SkipNotice::AutoPushDisabled => write!(f, "Auto push disabled, branch stays local"),
            SkipNotice::NotOnSourceBranch { current, source } => write!(
                f,
                "On branch '{}', a real run would check out '{}' and pull first",
                current, source
            ),
            SkipNotice::UnknownTarget { target } => write!(
                f,
                "Target '{}' is not an increment kind or configured target, using configured kind",
                target
            ),
        }
    }
}
