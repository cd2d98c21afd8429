//! Manifest parsing for the supported dependency file formats.
//!
//! Parsing never fails the caller: malformed input is logged and whatever
//! could be salvaged is returned, down to an empty list. The declared file
//! type arrives as an untrusted string from the upload form; unrecognized
//! values also yield an empty list.

use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use tracing::warn;

use crate::scanning::domain::{Dependency, Ecosystem};

/// Supported manifest formats, keyed by the conventional file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    PackageJson,
    ComposerJson,
    RequirementsTxt,
}

impl ManifestFormat {
    /// Maps a declared file type string to a format. Returns `None` for
    /// anything unrecognized; the caller decides whether that is an error.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "package.json" => Some(ManifestFormat::PackageJson),
            "composer.json" => Some(ManifestFormat::ComposerJson),
            "requirements.txt" => Some(ManifestFormat::RequirementsTxt),
            _ => None,
        }
    }
}

// serde_json's preserve_order feature keeps these maps in declaration order,
// which matters downstream: the scan cap takes the first N dependencies as
// they appear in the manifest.
#[derive(Debug, Deserialize)]
struct PackageJson {
    #[serde(default)]
    dependencies: serde_json::Map<String, serde_json::Value>,
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ComposerJson {
    #[serde(default)]
    require: serde_json::Map<String, serde_json::Value>,
    #[serde(default, rename = "require-dev")]
    require_dev: serde_json::Map<String, serde_json::Value>,
}

/// Parses manifest content for the declared file type.
///
/// Dispatches on the raw string so the HTTP layer can pass the form field
/// through untouched; unknown types log a warning and yield no dependencies.
pub fn parse_dependencies(content: &str, file_type: &str) -> Vec<Dependency> {
    match ManifestFormat::from_name(file_type) {
        Some(format) => parse(content, format),
        None => {
            warn!(file_type, "unrecognized manifest type, nothing to scan");
            Vec::new()
        }
    }
}

/// Parses manifest content for a known format.
pub fn parse(content: &str, format: ManifestFormat) -> Vec<Dependency> {
    match format {
        ManifestFormat::PackageJson => parse_package_json(content),
        ManifestFormat::ComposerJson => parse_composer_json(content),
        ManifestFormat::RequirementsTxt => parse_requirements_txt(content),
    }
}

/// Merges two manifest dependency blocks with later-key-wins semantics.
///
/// Matches JS object spread: a name redeclared in the second block keeps its
/// original position but takes the later version. Position matters because
/// the scan cap is a prefix of this list.
fn merge_blocks(
    first: serde_json::Map<String, serde_json::Value>,
    second: serde_json::Map<String, serde_json::Value>,
) -> serde_json::Map<String, serde_json::Value> {
    let mut merged = first;
    for (name, version) in second {
        merged.insert(name, version);
    }
    merged
}

/// Strips a single leading `^` or `~` comparator from a version literal.
fn strip_version_prefix(version: &str) -> &str {
    version
        .strip_prefix('^')
        .or_else(|| version.strip_prefix('~'))
        .unwrap_or(version)
}

fn parse_package_json(content: &str) -> Vec<Dependency> {
    let manifest: PackageJson = match serde_json::from_str(content) {
        Ok(manifest) => manifest,
        Err(error) => {
            warn!("failed to parse package.json: {error}");
            return Vec::new();
        }
    };

    merge_blocks(manifest.dependencies, manifest.dev_dependencies)
        .into_iter()
        .filter_map(|(name, version)| {
            // Non-string version values (workspace objects etc.) are skipped,
            // salvaging the rest of the manifest.
            let version = version.as_str()?;
            Some(Dependency::new(
                name,
                strip_version_prefix(version),
                Ecosystem::Npm,
            ))
        })
        .collect()
}

fn parse_composer_json(content: &str) -> Vec<Dependency> {
    let manifest: ComposerJson = match serde_json::from_str(content) {
        Ok(manifest) => manifest,
        Err(error) => {
            warn!("failed to parse composer.json: {error}");
            return Vec::new();
        }
    };

    merge_blocks(manifest.require, manifest.require_dev)
        .into_iter()
        .filter_map(|(name, version)| {
            // Platform requirements (php, ext-*) have no vendor prefix and
            // are not packages.
            if !name.contains('/') {
                return None;
            }
            let version = version.as_str()?;
            Some(Dependency::new(
                name,
                strip_version_prefix(version),
                Ecosystem::Composer,
            ))
        })
        .collect()
}

/// A requirements.txt package line: name, optionally followed by a
/// comparator and a version literal.
fn requirement_line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([A-Za-z0-9._-]+)\s*(?:(?:==|>=|<=|!=|=|<|>)\s*(.+))?$")
            .expect("requirement line pattern is valid")
    })
}

fn parse_requirements_txt(content: &str) -> Vec<Dependency> {
    content
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            // Blank lines, comments, and pip option lines (-r, --hash, ...)
            if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
                return None;
            }
            let captures = requirement_line_pattern().captures(line)?;
            let name = captures.get(1)?.as_str().to_string();
            let version = captures
                .get(2)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_else(|| "*".to_string());
            Some(Dependency::new(name, version, Ecosystem::Python))
        })
        .collect()
}
