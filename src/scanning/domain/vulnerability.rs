use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of a vulnerability description, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 200;

/// Normalized severity level.
///
/// Upstream sources disagree on vocabulary (NVD uses `MODERATE` nowhere,
/// GitHub-backed feeds use it instead of `MEDIUM`) and OSS Index carries no
/// severity string at all, so every adapter normalizes into this enum -
/// either by parsing the source string or by bucketing a CVSS score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", from = "String")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Unknown,
}

impl Severity {
    /// Parses an upstream severity string, case-insensitively.
    /// Unrecognized values map to `Unknown` rather than failing.
    pub fn parse(value: &str) -> Self {
        match value.to_uppercase().as_str() {
            "CRITICAL" => Severity::Critical,
            "HIGH" => Severity::High,
            "MODERATE" | "MEDIUM" => Severity::Medium,
            "LOW" => Severity::Low,
            _ => Severity::Unknown,
        }
    }

    /// Buckets a CVSS base score into a severity level.
    /// A score of zero means the source carried no usable metric.
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 9.0 => Severity::Critical,
            s if s >= 7.0 => Severity::High,
            s if s >= 4.0 => Severity::Medium,
            s if s > 0.0 => Severity::Low,
            _ => Severity::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
            Severity::Unknown => "UNKNOWN",
        }
    }
}

impl From<String> for Severity {
    fn from(value: String) -> Self {
        Severity::parse(&value)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized vulnerability record from any upstream source.
///
/// Immutable once constructed from an upstream response. Serializes to the
/// camelCase JSON shape of the scan API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vulnerability {
    pub id: String,
    pub description: String,
    pub severity: Severity,
    pub score: f64,
    #[serde(default)]
    pub references: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<DateTime<Utc>>,
}

/// Truncates a string to at most `max_chars` characters, on a character
/// boundary (byte slicing would panic on multi-byte input).
pub fn truncate_chars(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}
