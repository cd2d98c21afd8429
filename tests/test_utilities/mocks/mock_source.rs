use async_trait::async_trait;
use std::collections::HashMap;

use depscan::prelude::*;

/// Mock VulnerabilitySource for testing.
///
/// Returns pre-seeded vulnerabilities per dependency name, or fails every
/// query when constructed with `with_failure`.
pub struct MockSource {
    name: &'static str,
    records: HashMap<String, Vec<Vulnerability>>,
    should_fail: bool,
}

impl MockSource {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            records: HashMap::new(),
            should_fail: false,
        }
    }

    pub fn with_failure(name: &'static str) -> Self {
        Self {
            name,
            records: HashMap::new(),
            should_fail: true,
        }
    }

    /// Seeds one vulnerability for a dependency name.
    pub fn with_vulnerability(mut self, dependency: &str, id: &str, severity: Severity) -> Self {
        self.records
            .entry(dependency.to_string())
            .or_default()
            .push(Vulnerability {
                id: id.to_string(),
                description: format!("Mock finding {}", id),
                severity,
                score: match severity {
                    Severity::Critical => 9.8,
                    Severity::High => 7.5,
                    Severity::Medium => 5.0,
                    Severity::Low => 2.0,
                    Severity::Unknown => 0.0,
                },
                references: vec![],
                published: None,
            });
        self
    }
}

#[async_trait]
impl VulnerabilitySource for MockSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn query(&self, dependency: &Dependency) -> Result<Vec<Vulnerability>> {
        if self.should_fail {
            anyhow::bail!("mock upstream failure");
        }
        Ok(self
            .records
            .get(&dependency.name)
            .cloned()
            .unwrap_or_default())
    }
}
