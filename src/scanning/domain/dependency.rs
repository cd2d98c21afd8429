use serde::{Deserialize, Serialize};
use std::fmt;

/// Packaging system a dependency belongs to.
///
/// Serialized with the coordinate names the upstream sources expect
/// ("npm", "composer", "python"), which are also the `type` strings in the
/// scan result JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    Npm,
    Composer,
    Python,
}

impl Ecosystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ecosystem::Npm => "npm",
            Ecosystem::Composer => "composer",
            Ecosystem::Python => "python",
        }
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared package/version pair extracted from a manifest.
///
/// The version is either a comparator-stripped literal or `"*"` for an
/// unconstrained declaration. Instances are immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub name: String,
    pub version: String,
    pub ecosystem: Ecosystem,
}

impl Dependency {
    pub fn new(name: impl Into<String>, version: impl Into<String>, ecosystem: Ecosystem) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ecosystem,
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}
