//! Versioned artifact files: the package manifest, the plain version file and
//! the readme/changelog.
//!
//! Everything here is stateless; callers pass paths and values explicitly.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use regex::RegexBuilder;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ReleaseBranchError, Result};
use crate::version::IncrementKind;

/// A JSON package manifest with at least `name` and `version` string fields.
///
/// Keys keep their on-disk order when written back.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    fields: Map<String, Value>,
}

impl Manifest {
    /// Parse a manifest from JSON text
    ///
    /// # Returns
    /// * `Ok(Manifest)` - A JSON object with string `name` and `version` fields
    /// * `Err(InvalidManifest)` - Anything else
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        let Value::Object(fields) = value else {
            return Err(ReleaseBranchError::invalid_manifest(
                "top-level value must be an object",
            ));
        };

        let manifest = Manifest { fields };
        manifest.name()?;
        manifest.version()?;
        Ok(manifest)
    }

    pub fn version(&self) -> Result<&str> {
        self.string_field("version")
    }

    pub fn set_version(&mut self, version: &str) {
        self.fields
            .insert("version".to_string(), Value::String(version.to_string()));
    }

    pub fn name(&self) -> Result<&str> {
        self.string_field("name")
    }

    /// Render as tab-indented JSON, keys in their original order
    pub fn to_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.fields.serialize(&mut serializer)?;
        String::from_utf8(buf)
            .map_err(|e| ReleaseBranchError::invalid_manifest(format!("non UTF-8 output: {}", e)))
    }

    fn string_field(&self, key: &str) -> Result<&str> {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ReleaseBranchError::invalid_manifest(format!("missing string field `{}`", key))
            })
    }
}

/// Load the manifest at `path`.
///
/// # Returns
/// * `Ok(Manifest)` - Parsed manifest
/// * `Err(ManifestNotFound)` - Nothing exists at `path`
/// * `Err(InvalidManifest | Json)` - The file is not a usable manifest
pub fn read_manifest(path: &Path) -> Result<Manifest> {
    if !path.exists() {
        return Err(ReleaseBranchError::ManifestNotFound(path.to_path_buf()));
    }
    let text = fs::read_to_string(path)?;
    Manifest::from_json(&text)
}

/// Overwrite `path` with the manifest.
pub fn write_manifest(path: &Path, manifest: &Manifest) -> Result<()> {
    fs::write(path, manifest.to_json()?)?;
    Ok(())
}

/// Replace the plain version file with the bare version string.
///
/// The old file is removed first, so nothing of a longer previous value can
/// survive.
pub fn write_version_file(path: &Path, version: &str) -> Result<()> {
    if path.exists() {
        fs::remove_file(path)?;
    }
    fs::write(path, version)?;
    Ok(())
}

/// Inputs for a readme update
#[derive(Debug, Clone)]
pub struct ReadmeRequest<'a> {
    /// Block inserted after the divider, with `[version]`, `[iterum]`, `[now]` placeholders
    pub template: &'a str,
    /// Regex locating the divider line; the block goes right after the first match
    pub divider_pattern: &'a str,
    pub version: &'a str,
    pub kind: IncrementKind,
    pub date: NaiveDate,
    /// Heading for a readme that does not exist yet
    pub project_name: Option<&'a str>,
}

/// What `update_readme` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadmeUpdate {
    /// Full readme text after the update
    pub text: String,
    /// The file did not exist and was synthesized
    pub created: bool,
    /// False when an existing readme had no divider; the file is then left untouched
    pub inserted: bool,
}

/// Substitute the first occurrence of each placeholder.
///
/// `[now]` renders like `Mon Oct 19 2026`.
pub fn render_template(
    template: &str,
    version: &str,
    kind: IncrementKind,
    date: NaiveDate,
) -> String {
    template
        .replacen("[version]", version, 1)
        .replacen("[iterum]", kind.name(), 1)
        .replacen("[now]", &date.format("%a %b %d %Y").to_string(), 1)
}

/// Insert `block` right after the first match of `pattern` in `text`.
///
/// Matching is case-insensitive. Returns `Ok(None)` when nothing matches.
pub fn insert_after_divider(text: &str, pattern: &str, block: &str) -> Result<Option<String>> {
    let divider = RegexBuilder::new(pattern).case_insensitive(true).build()?;

    Ok(divider.find(text).map(|found| {
        let mut updated = String::with_capacity(text.len() + block.len());
        updated.push_str(&text[..found.end()]);
        updated.push_str(block);
        updated.push_str(&text[found.end()..]);
        updated
    }))
}

/// Heading for a new readme: the name underlined with one `=` per character.
pub fn readme_header(name: &str) -> String {
    format!("{}\n{}\n", name, "=".repeat(name.chars().count()))
}

/// Add the rendered release block to the readme at `path`, creating it if needed.
pub fn update_readme(path: &Path, request: &ReadmeRequest<'_>) -> Result<ReadmeUpdate> {
    let block = render_template(request.template, request.version, request.kind, request.date);

    if !path.exists() {
        let name = request.project_name.ok_or_else(|| {
            ReleaseBranchError::invalid_manifest("missing string field `name` for readme heading")
        })?;
        let text = format!("{}{}\n", readme_header(name), block);
        fs::write(path, &text)?;
        return Ok(ReadmeUpdate {
            text,
            created: true,
            inserted: true,
        });
    }

    let existing = fs::read_to_string(path)?;
    match insert_after_divider(&existing, request.divider_pattern, &block)? {
        Some(text) => {
            fs::write(path, &text)?;
            Ok(ReadmeUpdate {
                text,
                created: false,
                inserted: true,
            })
        }
        None => Ok(ReadmeUpdate {
            text: existing,
            created: false,
            inserted: false,
        }),
    }
}
