use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ReleaseBranchError, Result};
use crate::version::IncrementKind;

/// Name of the config file looked up in the current directory
pub const CONFIG_FILE_NAME: &str = "release-branch.toml";

pub const DEFAULT_README_TEMPLATE: &str =
    "\n## [version]\n- New [iterum] branch created on [now]\n\n";
pub const DEFAULT_README_PATTERN: &str = "(={3,}(?:\n|\r))";

/// One layer of release options. Every field is optional; `None` means the
/// layer says nothing about it, while `Some("")` is a real empty value.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ReleaseOptions {
    #[serde(alias = "iterum")]
    pub increment: Option<String>,
    pub version_prefix: Option<String>,
    pub version_postfix: Option<String>,
    pub update_package: Option<bool>,
    pub update_version: Option<bool>,
    pub update_readme: Option<bool>,
    pub files: FileOptions,
    pub readme_template: Option<String>,
    pub readme_pattern: Option<String>,
    pub disable_git: Option<bool>,
    pub git: GitOptions,
}

/// Paths of the three artifact files
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct FileOptions {
    pub package: Option<PathBuf>,
    pub readme: Option<PathBuf>,
    pub version: Option<PathBuf>,
}

/// Source-control behaviour
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct GitOptions {
    pub source_branch: Option<String>,
    pub new_branch_prefix: Option<String>,
    pub auto_commit: Option<bool>,
    pub commit_message: Option<String>,
    pub auto_push: Option<bool>,
    pub remote: Option<String>,
}

fn overlay<T: Clone>(base: &mut Option<T>, top: &Option<T>) {
    if top.is_some() {
        base.clone_from(top);
    }
}

impl ReleaseOptions {
    /// Lay `top` over `self`; fields `top` sets win.
    pub fn merge(&mut self, top: &ReleaseOptions) {
        overlay(&mut self.increment, &top.increment);
        overlay(&mut self.version_prefix, &top.version_prefix);
        overlay(&mut self.version_postfix, &top.version_postfix);
        overlay(&mut self.update_package, &top.update_package);
        overlay(&mut self.update_version, &top.update_version);
        overlay(&mut self.update_readme, &top.update_readme);
        overlay(&mut self.files.package, &top.files.package);
        overlay(&mut self.files.readme, &top.files.readme);
        overlay(&mut self.files.version, &top.files.version);
        overlay(&mut self.readme_template, &top.readme_template);
        overlay(&mut self.readme_pattern, &top.readme_pattern);
        overlay(&mut self.disable_git, &top.disable_git);
        overlay(&mut self.git.source_branch, &top.git.source_branch);
        overlay(&mut self.git.new_branch_prefix, &top.git.new_branch_prefix);
        overlay(&mut self.git.auto_commit, &top.git.auto_commit);
        overlay(&mut self.git.commit_message, &top.git.commit_message);
        overlay(&mut self.git.auto_push, &top.git.auto_push);
        overlay(&mut self.git.remote, &top.git.remote);
    }
}

/// Contents of `release-branch.toml`: top-level options plus named target
/// profiles under `[targets.<name>]`.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ConfigFile {
    #[serde(flatten)]
    pub options: ReleaseOptions,
    pub targets: BTreeMap<String, ReleaseOptions>,
}

/// Per-run inputs that sit above the config file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Invocation {
    /// Target name: an increment kind, a `[targets.<name>]` profile, or both
    pub target: Option<String>,
    /// Options given on the command line
    pub overrides: ReleaseOptions,
    pub dry_run: bool,
    pub silent: bool,
}

/// Fully resolved, immutable configuration for one run
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseConfig {
    pub increment: IncrementKind,
    pub version_prefix: String,
    pub version_postfix: String,
    pub update_package: bool,
    pub update_version: bool,
    pub update_readme: bool,
    pub files: FilePaths,
    pub readme_template: String,
    pub readme_pattern: String,
    pub disable_git: bool,
    pub git: GitConfig,
    pub dry_run: bool,
    pub silent: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilePaths {
    pub package: PathBuf,
    pub readme: PathBuf,
    pub version: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GitConfig {
    pub source_branch: String,
    pub new_branch_prefix: String,
    pub auto_commit: bool,
    pub commit_message: String,
    pub auto_push: bool,
    pub remote: String,
}

impl Default for FilePaths {
    fn default() -> Self {
        FilePaths {
            package: PathBuf::from("package.json"),
            readme: PathBuf::from("README.md"),
            version: PathBuf::from("VERSION"),
        }
    }
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            source_branch: "master".to_string(),
            new_branch_prefix: "Release-".to_string(),
            auto_commit: true,
            commit_message: "Updated Version Numbers".to_string(),
            auto_push: true,
            remote: "origin".to_string(),
        }
    }
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            increment: IncrementKind::Patch,
            version_prefix: "v".to_string(),
            version_postfix: String::new(),
            update_package: true,
            update_version: true,
            update_readme: true,
            files: FilePaths::default(),
            readme_template: DEFAULT_README_TEMPLATE.to_string(),
            readme_pattern: DEFAULT_README_PATTERN.to_string(),
            disable_git: false,
            git: GitConfig::default(),
            dry_run: false,
            silent: true,
        }
    }
}

impl ConfigFile {
    /// Parse config file text
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Names of the `[targets.<name>]` profiles, sorted
    pub fn target_names(&self) -> Vec<String> {
        self.targets.keys().cloned().collect()
    }

    /// True if `name` selects either an increment kind or a profile
    pub fn knows_target(&self, name: &str) -> bool {
        IncrementKind::from_name(name).is_some() || self.targets.contains_key(name)
    }

    /// Resolve all layers into the configuration for one run.
    ///
    /// Precedence, lowest first: built-in defaults, top-level file options,
    /// the target's profile, command-line overrides. The increment kind is
    /// the target name itself when that is a valid kind, otherwise the layered
    /// `increment` option.
    ///
    /// # Returns
    /// * `Ok(ReleaseConfig)` - Validated configuration
    /// * `Err(InvalidIncrementKind)` - Neither the target nor the configured kind is valid
    /// * `Err(Config | Regex)` - An empty file path or an invalid readme pattern
    pub fn resolve(&self, invocation: &Invocation) -> Result<ReleaseConfig> {
        let mut layered = self.options.clone();
        if let Some(profile) = invocation
            .target
            .as_deref()
            .and_then(|target| self.targets.get(target))
        {
            layered.merge(profile);
        }
        layered.merge(&invocation.overrides);

        let defaults = ReleaseConfig::default();
        let increment = resolve_increment(
            invocation.target.as_deref(),
            layered.increment.as_deref(),
            defaults.increment,
        )?;

        let files = FilePaths {
            package: non_empty_path("package", layered.files.package, defaults.files.package)?,
            readme: non_empty_path("readme", layered.files.readme, defaults.files.readme)?,
            version: non_empty_path("version", layered.files.version, defaults.files.version)?,
        };

        let readme_pattern = layered.readme_pattern.unwrap_or(defaults.readme_pattern);
        Regex::new(&readme_pattern)?;

        let git = GitConfig {
            source_branch: layered.git.source_branch.unwrap_or(defaults.git.source_branch),
            new_branch_prefix: layered
                .git
                .new_branch_prefix
                .unwrap_or(defaults.git.new_branch_prefix),
            auto_commit: layered.git.auto_commit.unwrap_or(defaults.git.auto_commit),
            commit_message: layered.git.commit_message.unwrap_or(defaults.git.commit_message),
            auto_push: layered.git.auto_push.unwrap_or(defaults.git.auto_push),
            remote: layered.git.remote.unwrap_or(defaults.git.remote),
        };

        Ok(ReleaseConfig {
            increment,
            version_prefix: layered.version_prefix.unwrap_or(defaults.version_prefix),
            version_postfix: layered.version_postfix.unwrap_or(defaults.version_postfix),
            update_package: layered.update_package.unwrap_or(defaults.update_package),
            update_version: layered.update_version.unwrap_or(defaults.update_version),
            update_readme: layered.update_readme.unwrap_or(defaults.update_readme),
            files,
            readme_template: layered.readme_template.unwrap_or(defaults.readme_template),
            readme_pattern,
            disable_git: layered.disable_git.unwrap_or(defaults.disable_git),
            git,
            dry_run: invocation.dry_run,
            silent: invocation.silent,
        })
    }
}

/// Target name first if it is a kind, then the configured kind, then the default.
fn resolve_increment(
    target: Option<&str>,
    configured: Option<&str>,
    default: IncrementKind,
) -> Result<IncrementKind> {
    if let Some(kind) = target.and_then(IncrementKind::from_name) {
        return Ok(kind);
    }

    match configured {
        None => Ok(default),
        Some(name) => IncrementKind::from_name(name).ok_or_else(|| {
            ReleaseBranchError::InvalidIncrementKind {
                target: target.map(str::to_string),
                configured: Some(name.to_string()),
            }
        }),
    }
}

fn non_empty_path(label: &str, value: Option<PathBuf>, default: PathBuf) -> Result<PathBuf> {
    let path = value.unwrap_or(default);
    if path.as_os_str().is_empty() {
        return Err(ReleaseBranchError::config(format!(
            "file path for `{}` must not be empty",
            label
        )));
    }
    Ok(path)
}

/// Loads the config file or returns an empty one.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release-branch.toml` in current directory
/// 3. `.release-branch.toml` in the user config directory
/// 4. No file: every option falls back to its default
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(ConfigFile)` - Loaded or empty configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>) -> Result<ConfigFile> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path).map_err(|e| {
            ReleaseBranchError::config(format!("cannot read {}: {}", path.display(), e))
        })?
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        fs::read_to_string(CONFIG_FILE_NAME)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(format!(".{}", CONFIG_FILE_NAME));
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(ConfigFile::default());
        }
    } else {
        return Ok(ConfigFile::default());
    };

    ConfigFile::from_toml(&config_str)
}
