use chrono::Utc;
use futures::future::join_all;
use futures::stream::{self, StreamExt};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tracing::info;

use crate::manifest;
use crate::ports::outbound::VulnerabilitySource;
use crate::scanning::domain::{Dependency, DependencyFinding, ScanResult};

/// Maximum number of dependencies queried per scan. This is a cost and
/// upstream-quota control; the full parsed count is still reported as
/// `total_dependencies`.
pub const SCAN_DEPENDENCY_CAP: usize = 20;

/// Bounded worker window for fanning out across dependencies. Each worker
/// already fans out to all sources, so the effective upstream concurrency is
/// this times the source count.
const MAX_CONCURRENT_DEPENDENCIES: usize = 4;

/// RunScanUseCase - the scan orchestrator.
///
/// Parses the uploaded manifest, caps the dependency list, fans lookups out
/// across all registered sources, and assembles the immutable `ScanResult`.
/// Partial upstream failure is already absorbed at the source boundary, so
/// a scan always completes.
pub struct RunScanUseCase {
    sources: Vec<Arc<dyn VulnerabilitySource>>,
}

impl RunScanUseCase {
    /// Creates the use case over the given sources. Registration order is
    /// load-bearing: each dependency's vulnerability list concatenates the
    /// sources' outputs in this order.
    pub fn new(sources: Vec<Arc<dyn VulnerabilitySource>>) -> Self {
        Self { sources }
    }

    /// Runs a scan over raw manifest content with its declared file type.
    pub async fn execute(&self, content: &str, file_type: &str) -> ScanResult {
        let dependencies = manifest::parse_dependencies(content, file_type);
        let total_dependencies = dependencies.len();

        let scanned: Vec<Dependency> = dependencies
            .into_iter()
            .take(SCAN_DEPENDENCY_CAP)
            .collect();
        let scanned_dependencies = scanned.len();

        // `buffered` (not `buffer_unordered`) keeps findings in original
        // dependency order regardless of per-dependency completion order.
        let findings: Vec<Option<DependencyFinding>> = stream::iter(scanned)
            .map(|dependency| self.scan_dependency(dependency))
            .buffered(MAX_CONCURRENT_DEPENDENCIES)
            .collect()
            .await;

        let results: Vec<DependencyFinding> = findings.into_iter().flatten().collect();

        ScanResult::new(
            next_scan_id(),
            Utc::now(),
            total_dependencies,
            scanned_dependencies,
            results,
        )
    }

    /// Queries every source for one dependency. All lookups are issued
    /// before any is awaited; the join has no early exit, since failures
    /// were already collapsed to empty lists.
    async fn scan_dependency(&self, dependency: Dependency) -> Option<DependencyFinding> {
        info!("Scanning {}", dependency);

        let lookups = self.sources.iter().map(|source| source.lookup(&dependency));
        let vulnerabilities: Vec<_> = join_all(lookups).await.into_iter().flatten().collect();

        if vulnerabilities.is_empty() {
            return None;
        }
        Some(DependencyFinding {
            dependency: dependency.name,
            version: dependency.version,
            ecosystem: dependency.ecosystem,
            vulnerabilities,
        })
    }
}

static LAST_SCAN_ID: AtomicI64 = AtomicI64::new(0);

/// Allocates a scan id derived from the current time in milliseconds, made
/// strictly monotonic by a process-wide high-water mark so concurrent scans
/// completing in the same millisecond still get unique ids.
fn next_scan_id() -> String {
    let now = Utc::now().timestamp_millis();
    let mut last = LAST_SCAN_ID.load(Ordering::Relaxed);
    loop {
        let candidate = now.max(last + 1);
        match LAST_SCAN_ID.compare_exchange_weak(
            last,
            candidate,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => return candidate.to_string(),
            Err(observed) => last = observed,
        }
    }
}
