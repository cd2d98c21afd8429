use async_trait::async_trait;
use serde::Deserialize;

use super::{build_http_client, parse_published};
use crate::ports::outbound::VulnerabilitySource;
use crate::scanning::domain::vulnerability::{truncate_chars, MAX_DESCRIPTION_CHARS};
use crate::scanning::domain::{Dependency, Severity, Vulnerability};
use crate::shared::Result;

/// NVD keyword-search client.
///
/// Queries the CVE 2.0 REST endpoint by dependency name. The API key header
/// is only attached when configured; without one NVD still answers, at a
/// lower rate limit.
pub struct NvdClient {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl NvdClient {
    const API_ENDPOINT: &'static str = "https://services.nvd.nist.gov/rest/json/cves/2.0";

    /// How many results to request from the endpoint.
    const RESULTS_PER_PAGE: u32 = 10;

    /// Cap on records this adapter contributes per dependency.
    const MAX_RESULTS: usize = 5;

    /// Cap on reference URLs kept per record.
    const MAX_REFERENCES: usize = 2;

    pub fn new(api_key: Option<String>) -> Result<Self> {
        Ok(Self {
            client: build_http_client()?,
            api_url: Self::API_ENDPOINT.to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl VulnerabilitySource for NvdClient {
    fn name(&self) -> &'static str {
        "nvd"
    }

    async fn query(&self, dependency: &Dependency) -> Result<Vec<Vulnerability>> {
        let results_per_page = Self::RESULTS_PER_PAGE.to_string();
        let mut request = self.client.get(&self.api_url).query(&[
            ("keywordSearch", dependency.name.as_str()),
            ("resultsPerPage", results_per_page.as_str()),
        ]);
        if let Some(key) = &self.api_key {
            request = request.header("apiKey", key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            anyhow::bail!("NVD API returned status code {}", response.status());
        }

        let payload: NvdResponse = response.json().await?;
        Ok(payload
            .vulnerabilities
            .iter()
            .filter_map(|entry| map_cve(&entry.cve))
            .take(Self::MAX_RESULTS)
            .collect())
    }
}

/// Maps one CVE record to the normalized shape; records without a
/// description are skipped.
///
/// Severity and score prefer the CVSS v3.1 metric over v2. The upstream
/// schema is asymmetric: v3.1 carries severity inside `cvssData`, v2 carries
/// it on the metric itself.
fn map_cve(cve: &NvdCve) -> Option<Vulnerability> {
    let description = cve.descriptions.first()?;

    let v31 = cve.metrics.cvss_metric_v31.first();
    let v2 = cve.metrics.cvss_metric_v2.first();

    let severity = v31
        .map(|m| m.cvss_data.base_severity.as_str())
        .or_else(|| v2.and_then(|m| m.base_severity.as_deref()))
        .map(Severity::parse)
        .unwrap_or(Severity::Unknown);

    let score = v31
        .map(|m| m.cvss_data.base_score)
        .or_else(|| v2.map(|m| m.cvss_data.base_score))
        .unwrap_or(0.0);

    Some(Vulnerability {
        id: cve.id.clone(),
        description: truncate_chars(&description.value, MAX_DESCRIPTION_CHARS),
        severity,
        score,
        references: cve
            .references
            .iter()
            .take(NvdClient::MAX_REFERENCES)
            .map(|r| r.url.clone())
            .collect(),
        published: cve.published.as_deref().and_then(parse_published),
    })
}

// NVD CVE 2.0 response structures

#[derive(Debug, Deserialize)]
struct NvdResponse {
    #[serde(default)]
    vulnerabilities: Vec<NvdEntry>,
}

#[derive(Debug, Deserialize)]
struct NvdEntry {
    cve: NvdCve,
}

#[derive(Debug, Deserialize)]
struct NvdCve {
    id: String,
    #[serde(default)]
    descriptions: Vec<NvdDescription>,
    #[serde(default)]
    metrics: NvdMetrics,
    #[serde(default)]
    references: Vec<NvdReference>,
    #[serde(default)]
    published: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NvdDescription {
    value: String,
}

#[derive(Debug, Default, Deserialize)]
struct NvdMetrics {
    #[serde(default, rename = "cvssMetricV31")]
    cvss_metric_v31: Vec<NvdMetricV31>,
    #[serde(default, rename = "cvssMetricV2")]
    cvss_metric_v2: Vec<NvdMetricV2>,
}

#[derive(Debug, Deserialize)]
struct NvdMetricV31 {
    #[serde(rename = "cvssData")]
    cvss_data: NvdCvssDataV31,
}

#[derive(Debug, Deserialize)]
struct NvdCvssDataV31 {
    #[serde(rename = "baseScore")]
    base_score: f64,
    #[serde(rename = "baseSeverity")]
    base_severity: String,
}

#[derive(Debug, Deserialize)]
struct NvdMetricV2 {
    #[serde(rename = "cvssData")]
    cvss_data: NvdCvssDataV2,
    #[serde(default, rename = "baseSeverity")]
    base_severity: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NvdCvssDataV2 {
    #[serde(rename = "baseScore")]
    base_score: f64,
}

#[derive(Debug, Deserialize)]
struct NvdReference {
    url: String,
}
