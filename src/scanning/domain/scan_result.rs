use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Ecosystem, Vulnerability};

/// Aggregated findings for one vulnerable dependency.
///
/// Only dependencies with at least one vulnerability from any source get a
/// finding; clean dependencies are counted in `ScanResult::total_dependencies`
/// but carry no entry here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyFinding {
    pub dependency: String,
    pub version: String,
    #[serde(rename = "type")]
    pub ecosystem: Ecosystem,
    pub vulnerabilities: Vec<Vulnerability>,
}

/// The completed output of one scan.
///
/// Created once by the orchestrator and never mutated afterwards; owned by
/// the result store until evicted. Serializes to the camelCase JSON shape
/// returned by `POST /api/scan`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub scan_id: String,
    pub timestamp: DateTime<Utc>,
    pub total_dependencies: usize,
    pub scanned_dependencies: usize,
    pub vulnerable_dependencies: usize,
    pub results: Vec<DependencyFinding>,
}

impl ScanResult {
    /// Assembles a scan result; `vulnerable_dependencies` is derived from
    /// the findings rather than passed in, so the counts cannot drift.
    pub fn new(
        scan_id: String,
        timestamp: DateTime<Utc>,
        total_dependencies: usize,
        scanned_dependencies: usize,
        results: Vec<DependencyFinding>,
    ) -> Self {
        Self {
            scan_id,
            timestamp,
            total_dependencies,
            scanned_dependencies,
            vulnerable_dependencies: results.len(),
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanning::domain::Severity;

    fn finding(name: &str) -> DependencyFinding {
        DependencyFinding {
            dependency: name.to_string(),
            version: "1.0.0".to_string(),
            ecosystem: Ecosystem::Npm,
            vulnerabilities: vec![Vulnerability {
                id: "CVE-2024-0001".to_string(),
                description: "Test".to_string(),
                severity: Severity::High,
                score: 7.5,
                references: vec![],
                published: None,
            }],
        }
    }

    #[test]
    fn test_vulnerable_count_derived_from_results() {
        let result = ScanResult::new(
            "123".to_string(),
            Utc::now(),
            10,
            10,
            vec![finding("a"), finding("b")],
        );
        assert_eq!(result.vulnerable_dependencies, 2);
    }

    #[test]
    fn test_json_shape_matches_api_contract() {
        let result = ScanResult::new("1700000000000".to_string(), Utc::now(), 5, 5, vec![finding("lodash")]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["scanId"], "1700000000000");
        assert_eq!(json["totalDependencies"], 5);
        assert_eq!(json["scannedDependencies"], 5);
        assert_eq!(json["vulnerableDependencies"], 1);
        assert_eq!(json["results"][0]["dependency"], "lodash");
        assert_eq!(json["results"][0]["type"], "npm");
    }

    #[test]
    fn test_round_trips_through_json() {
        let result = ScanResult::new("42".to_string(), Utc::now(), 3, 3, vec![finding("left-pad")]);
        let json = serde_json::to_string(&result).unwrap();
        let back: ScanResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
