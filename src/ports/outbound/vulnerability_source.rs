use async_trait::async_trait;
use tracing::warn;

use crate::scanning::domain::{Dependency, Vulnerability};
use crate::shared::Result;

/// VulnerabilitySource port - one upstream vulnerability database.
///
/// Implementations translate a dependency into the upstream's query protocol
/// and normalize its response into `Vulnerability` records.
///
/// # Failure contract
/// `query` is the explicit, fallible path so transport and payload errors
/// stay testable in isolation. The scan pipeline only ever calls `lookup`,
/// which collapses any failure into an empty result: a single unreachable
/// upstream must not abort the scan.
#[async_trait]
pub trait VulnerabilitySource: Send + Sync {
    /// Short source name used in logs.
    fn name(&self) -> &'static str;

    /// Queries the upstream for vulnerabilities affecting the dependency.
    ///
    /// # Errors
    /// Returns an error if the request fails, the upstream responds with a
    /// non-success status, or the payload cannot be parsed.
    async fn query(&self, dependency: &Dependency) -> Result<Vec<Vulnerability>>;

    /// Infallible lookup: failures are logged and absorbed into an empty
    /// list at this boundary.
    async fn lookup(&self, dependency: &Dependency) -> Vec<Vulnerability> {
        match self.query(dependency).await {
            Ok(vulnerabilities) => vulnerabilities,
            Err(error) => {
                warn!(
                    source = self.name(),
                    dependency = %dependency,
                    "upstream lookup failed: {error:#}"
                );
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanning::domain::{Ecosystem, Severity};

    struct FailingSource;

    #[async_trait]
    impl VulnerabilitySource for FailingSource {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn query(&self, _dependency: &Dependency) -> Result<Vec<Vulnerability>> {
            anyhow::bail!("connection refused")
        }
    }

    struct FixedSource;

    #[async_trait]
    impl VulnerabilitySource for FixedSource {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn query(&self, _dependency: &Dependency) -> Result<Vec<Vulnerability>> {
            Ok(vec![Vulnerability {
                id: "CVE-2024-0001".to_string(),
                description: "Test".to_string(),
                severity: Severity::High,
                score: 7.5,
                references: vec![],
                published: None,
            }])
        }
    }

    #[tokio::test]
    async fn test_lookup_absorbs_query_failure() {
        let dependency = Dependency::new("express", "4.18.2", Ecosystem::Npm);
        let results = FailingSource.lookup(&dependency).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_lookup_passes_through_success() {
        let dependency = Dependency::new("express", "4.18.2", Ecosystem::Npm);
        let results = FixedSource.lookup(&dependency).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "CVE-2024-0001");
    }
}
