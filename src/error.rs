use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for release-branch operations
///
/// Every variant is fatal: the run stops at the first one and nothing that
/// already happened is rolled back.
#[derive(Error, Debug)]
pub enum ReleaseBranchError {
    #[error("Git found some uncommitted files. Commit or stash them to proceed")]
    DirtyWorkingTree,

    #[error("Can not increment version without an increment kind (target: {target:?}, configured: {configured:?})")]
    InvalidIncrementKind {
        target: Option<String>,
        configured: Option<String>,
    },

    #[error("File not found [package]: {0}")]
    ManifestNotFound(PathBuf),

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("Git branch [{0}] already exists")]
    BranchAlreadyExists(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Git repository error: {0}")]
    Git(#[from] git2::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config file parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in release-branch
pub type Result<T> = std::result::Result<T, ReleaseBranchError>;

impl ReleaseBranchError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseBranchError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        ReleaseBranchError::Version(msg.into())
    }

    /// Create a parse error with context
    pub fn parse(msg: impl Into<String>) -> Self {
        ReleaseBranchError::Parse(msg.into())
    }

    pub fn invalid_manifest(msg: impl Into<String>) -> Self {
        ReleaseBranchError::InvalidManifest(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReleaseBranchError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ReleaseBranchError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_branch_already_exists_names_branch() {
        let err = ReleaseBranchError::BranchAlreadyExists("Release-v1.3.0".to_string());
        assert_eq!(err.to_string(), "Git branch [Release-v1.3.0] already exists");
    }

    #[test]
    fn test_manifest_not_found_names_path() {
        let err = ReleaseBranchError::ManifestNotFound(PathBuf::from("package.json"));
        assert!(err.to_string().contains("package.json"));
    }

    #[test]
    fn test_invalid_increment_kind_lists_both_sources() {
        let err = ReleaseBranchError::InvalidIncrementKind {
            target: Some("alpha".to_string()),
            configured: Some("huge".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("alpha"));
        assert!(msg.contains("huge"));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (ReleaseBranchError::config("x"), "Configuration error"),
            (ReleaseBranchError::version("x"), "Version parsing error"),
            (ReleaseBranchError::parse("x"), "Parse error"),
            (ReleaseBranchError::invalid_manifest("x"), "Invalid manifest"),
            (ReleaseBranchError::DirtyWorkingTree, "Git found some uncommitted files"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
