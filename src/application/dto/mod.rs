use serde::Deserialize;

use crate::scanning::domain::DependencyFinding;

/// Body of the legacy report endpoint: an already-computed scan result
/// posted directly, not looked up in the store.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyReportRequest {
    #[serde(default)]
    pub scan_results: Option<LegacyReport>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Lenient scan-result shape for the legacy path. Old clients post payloads
/// without ids or timestamps; only `results` is load-bearing, and its
/// absence is the one input error the endpoint rejects.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyReport {
    #[serde(default)]
    pub total_dependencies: usize,
    #[serde(default)]
    pub vulnerable_dependencies: usize,
    pub results: Option<Vec<DependencyFinding>>,
}

impl LegacyReport {
    pub fn findings(&self) -> &[DependencyFinding] {
        self.results.as_deref().unwrap_or_default()
    }
}
