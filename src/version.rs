use std::fmt;
use std::str::FromStr;

use crate::error::{ReleaseBranchError, Result};

/// Which semantic-version component a release advances.
///
/// `Static` keeps all three numbers and only re-applies prefix/postfix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncrementKind {
    Major,
    Minor,
    Patch,
    Static,
}

impl IncrementKind {
    pub const ALL: [IncrementKind; 4] = [
        IncrementKind::Major,
        IncrementKind::Minor,
        IncrementKind::Patch,
        IncrementKind::Static,
    ];

    /// Name used on the command line and in the readme `[iterum]` placeholder
    pub fn name(&self) -> &'static str {
        match self {
            IncrementKind::Major => "major",
            IncrementKind::Minor => "minor",
            IncrementKind::Patch => "patch",
            IncrementKind::Static => "static",
        }
    }

    /// Looks up a kind by its exact name, `None` for anything else.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for IncrementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IncrementKind {
    type Err = ReleaseBranchError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s).ok_or_else(|| ReleaseBranchError::InvalidIncrementKind {
            target: None,
            configured: Some(s.to_string()),
        })
    }
}

/// Numeric part of a version; prefix and postfix only exist in the rendered string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl SemanticVersion {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        SemanticVersion {
            major,
            minor,
            patch,
        }
    }

    /// Parses `X.Y.Z`, keeping only the ASCII digits of each component.
    ///
    /// A stored value such as `v1.2.3-alpha` therefore reads as `1.2.3`, which
    /// keeps a previously rendered prefix/postfix from piling up on the next
    /// release. All digits are kept, so `3-rc1` reads as `31`.
    ///
    /// # Returns
    /// * `Ok(SemanticVersion)` - Parsed version
    /// * `Err` - Not exactly three components, a component without digits, or overflow
    pub fn parse_lenient(version: &str) -> Result<Self> {
        let parts: Vec<&str> = version.split('.').collect();
        if parts.len() != 3 {
            return Err(ReleaseBranchError::version(format!(
                "Invalid version format: '{}' - expected X.Y.Z",
                version
            )));
        }

        Ok(SemanticVersion {
            major: parse_component(parts[0], "major")?,
            minor: parse_component(parts[1], "minor")?,
            patch: parse_component(parts[2], "patch")?,
        })
    }

    /// Applies an increment; lower components reset to zero.
    ///
    /// # Returns
    /// * `Ok(SemanticVersion)` - The advanced version
    /// * `Err(Version)` - The advanced component would overflow
    pub fn increment(&self, kind: IncrementKind) -> Result<Self> {
        Ok(match kind {
            IncrementKind::Major => SemanticVersion::new(bump(self.major, "major")?, 0, 0),
            IncrementKind::Minor => {
                SemanticVersion::new(self.major, bump(self.minor, "minor")?, 0)
            }
            IncrementKind::Patch => {
                SemanticVersion::new(self.major, self.minor, bump(self.patch, "patch")?)
            }
            IncrementKind::Static => *self,
        })
    }

    /// Renders as `<prefix><major>.<minor>.<patch><postfix>`.
    pub fn render(&self, prefix: &str, postfix: &str) -> String {
        format!(
            "{}{}.{}.{}{}",
            prefix, self.major, self.minor, self.patch, postfix
        )
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

fn digits_only(component: &str) -> String {
    component.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn bump(component: u64, label: &str) -> Result<u64> {
    component.checked_add(1).ok_or_else(|| {
        ReleaseBranchError::version(format!("Cannot increment {} version {}", label, component))
    })
}

fn parse_component(component: &str, label: &str) -> Result<u64> {
    let digits = digits_only(component);
    if digits.is_empty() {
        return Err(ReleaseBranchError::version(format!(
            "Invalid {} version: '{}' contains no digits",
            label, component
        )));
    }
    digits.parse::<u64>().map_err(|_| {
        ReleaseBranchError::version(format!("Invalid {} version: '{}'", label, component))
    })
}

/// Computes the next rendered version string.
///
/// # Arguments
/// * `current` - Stored version, e.g. `1.2.3` or `v1.2.3-beta`
/// * `kind` - Component to advance
/// * `prefix` - Prepended to the major number
/// * `postfix` - Appended to the patch number
///
/// # Example
/// ```
/// use release_branch::version::{next_version, IncrementKind};
///
/// assert_eq!(next_version("1.2.3", IncrementKind::Minor, "v", "").unwrap(), "v1.3.0");
/// assert_eq!(next_version("v1.3.0", IncrementKind::Patch, "v", "").unwrap(), "v1.3.1");
/// ```
pub fn next_version(
    current: &str,
    kind: IncrementKind,
    prefix: &str,
    postfix: &str,
) -> Result<String> {
    let version = SemanticVersion::parse_lenient(current)?;
    Ok(version.increment(kind)?.render(prefix, postfix))
}
