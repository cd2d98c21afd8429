use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use super::build_http_client;
use crate::ports::outbound::VulnerabilitySource;
use crate::scanning::domain::vulnerability::{truncate_chars, MAX_DESCRIPTION_CHARS};
use crate::scanning::domain::{Dependency, Severity, Vulnerability};
use crate::shared::Result;

/// Sonatype OSS Index component-report client.
///
/// Looks a dependency up by its `ecosystem:name:version` coordinate string.
/// Works unauthenticated; when an API key is configured it is sent as a
/// base64-encoded `Basic` credential for the higher rate limit.
pub struct OssIndexClient {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl OssIndexClient {
    const API_ENDPOINT: &'static str = "https://ossindex.sonatype.org/api/v3/component-report";

    /// Cap on records this adapter contributes per dependency.
    const MAX_RESULTS: usize = 3;

    pub fn new(api_key: Option<String>) -> Result<Self> {
        Ok(Self {
            client: build_http_client()?,
            api_url: Self::API_ENDPOINT.to_string(),
            api_key,
        })
    }

    /// Coordinate string for a dependency, e.g. `npm:lodash:4.17.21`.
    fn coordinate(dependency: &Dependency) -> String {
        format!(
            "{}:{}:{}",
            dependency.ecosystem, dependency.name, dependency.version
        )
    }
}

#[async_trait]
impl VulnerabilitySource for OssIndexClient {
    fn name(&self) -> &'static str {
        "oss-index"
    }

    async fn query(&self, dependency: &Dependency) -> Result<Vec<Vulnerability>> {
        let body = OssIndexRequest {
            coordinates: vec![Self::coordinate(dependency)],
        };

        let mut request = self.client.post(&self.api_url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Basic {}", BASE64.encode(key)));
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            anyhow::bail!("OSS Index API returned status code {}", response.status());
        }

        let reports: Vec<OssIndexReport> = response.json().await?;
        Ok(reports
            .into_iter()
            .flat_map(|report| report.vulnerabilities)
            .map(map_vulnerability)
            .take(Self::MAX_RESULTS)
            .collect())
    }
}

/// Normalizes one OSS Index record. The payload has a numeric CVSS score but
/// no severity string, so severity is bucketed from the score; the CVE id is
/// preferred over the internal report id when present.
fn map_vulnerability(vuln: OssIndexVulnerability) -> Vulnerability {
    let score = vuln.cvss_score.unwrap_or(0.0);
    let description = vuln.title.or(vuln.description).unwrap_or_default();

    Vulnerability {
        id: vuln.cve.unwrap_or(vuln.id),
        description: truncate_chars(&description, MAX_DESCRIPTION_CHARS),
        severity: Severity::from_score(score),
        score,
        references: vuln.reference.into_iter().collect(),
        published: None,
    }
}

// OSS Index v3 component-report structures

#[derive(Debug, Serialize)]
struct OssIndexRequest {
    coordinates: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct OssIndexReport {
    #[serde(default)]
    vulnerabilities: Vec<OssIndexVulnerability>,
}

#[derive(Debug, Deserialize)]
struct OssIndexVulnerability {
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, rename = "cvssScore")]
    cvss_score: Option<f64>,
    #[serde(default)]
    cve: Option<String>,
    #[serde(default)]
    reference: Option<String>,
}
