use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{build_http_client, parse_published};
use crate::ports::outbound::VulnerabilitySource;
use crate::scanning::domain::vulnerability::{truncate_chars, MAX_DESCRIPTION_CHARS};
use crate::scanning::domain::{Dependency, Severity, Vulnerability};
use crate::shared::Result;

/// Snyk org-scoped package-issues client.
///
/// This source is capability-gated: without an API token and an org id it
/// performs no network call at all and contributes nothing - that is a
/// configuration state, not a failure.
pub struct SnykClient {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
    org_id: Option<String>,
}

impl SnykClient {
    const API_ENDPOINT: &'static str = "https://api.snyk.io/rest";

    /// Cap on records this adapter contributes per dependency.
    const MAX_RESULTS: usize = 3;

    pub fn new(token: Option<String>, org_id: Option<String>) -> Result<Self> {
        Ok(Self {
            client: build_http_client()?,
            api_url: Self::API_ENDPOINT.to_string(),
            token,
            org_id,
        })
    }

    fn credentials(&self) -> Option<(&str, &str)> {
        Some((self.token.as_deref()?, self.org_id.as_deref()?))
    }
}

#[async_trait]
impl VulnerabilitySource for SnykClient {
    fn name(&self) -> &'static str {
        "snyk"
    }

    async fn query(&self, dependency: &Dependency) -> Result<Vec<Vulnerability>> {
        let Some((token, org_id)) = self.credentials() else {
            debug!("Snyk lookup skipped: no API token/org configured");
            return Ok(Vec::new());
        };

        // Scoped npm names contain / and @ and must be percent-encoded.
        let url = format!(
            "{}/orgs/{}/packages/{}/issues",
            self.api_url,
            org_id,
            urlencoding::encode(&dependency.name)
        );

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("token {}", token))
            .header("Content-Type", "application/vnd.api+json")
            .send()
            .await?;
        if !response.status().is_success() {
            anyhow::bail!("Snyk API returned status code {}", response.status());
        }

        let payload: SnykResponse = response.json().await?;
        Ok(payload
            .data
            .into_iter()
            .map(map_issue)
            .take(Self::MAX_RESULTS)
            .collect())
    }
}

/// Normalizes one JSON:API issue document. The issues payload carries no
/// CVSS base score in this shape, so the score defaults to zero.
fn map_issue(issue: SnykIssue) -> Vulnerability {
    let description = issue
        .attributes
        .title
        .or(issue.attributes.description)
        .unwrap_or_default();

    Vulnerability {
        id: issue.id,
        description: truncate_chars(&description, MAX_DESCRIPTION_CHARS),
        severity: issue
            .attributes
            .effective_severity_level
            .as_deref()
            .map(Severity::parse)
            .unwrap_or(Severity::Unknown),
        score: 0.0,
        references: Vec::new(),
        published: issue
            .attributes
            .created_at
            .as_deref()
            .and_then(parse_published),
    }
}

// Snyk REST API (JSON:API) structures

#[derive(Debug, Deserialize)]
struct SnykResponse {
    #[serde(default)]
    data: Vec<SnykIssue>,
}

#[derive(Debug, Deserialize)]
struct SnykIssue {
    id: String,
    #[serde(default)]
    attributes: SnykIssueAttributes,
}

#[derive(Debug, Default, Deserialize)]
struct SnykIssueAttributes {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    effective_severity_level: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
}
