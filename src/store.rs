//! Keyed, time-bounded holder of completed scan results.
//!
//! One explicitly owned instance lives in the server state; the orchestrator
//! writes each result once and the report path reads and eventually evicts
//! it. Entries are never mutated in place, so the only interleaving to care
//! about is a read racing a scheduled removal - both sides of that race are
//! safe because removal is remove-if-present.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::scanning::domain::ScanResult;

/// How long a rendered scan result stays retrievable before the scheduled
/// eviction removes it.
pub const RESULT_RETENTION: Duration = Duration::from_secs(30);

/// In-memory scan result store, addressed by scan id.
pub struct ResultStore {
    entries: DashMap<String, ScanResult>,
    retention: Duration,
}

impl ResultStore {
    pub fn new(retention: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            retention,
        }
    }

    /// Stores a completed scan under its own scan id.
    pub fn put(&self, result: ScanResult) {
        self.entries.insert(result.scan_id.clone(), result);
    }

    /// Returns a clone of the stored result, if it has not been evicted.
    pub fn get(&self, scan_id: &str) -> Option<ScanResult> {
        self.entries.get(scan_id).map(|entry| entry.clone())
    }

    /// Removes an entry if present. Idempotent: removing an already-evicted
    /// id is a no-op, which is what makes the explicit and delayed deletion
    /// paths safe to interleave.
    pub fn remove(&self, scan_id: &str) -> bool {
        self.entries.remove(scan_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Schedules removal of an entry after the retention period, giving the
    /// client a window to re-download the report.
    pub fn schedule_removal(self: &Arc<Self>, scan_id: &str) {
        let store = Arc::clone(self);
        let scan_id = scan_id.to_string();
        tokio::spawn(async move {
            tokio::time::sleep(store.retention).await;
            if store.remove(&scan_id) {
                debug!(%scan_id, "scan result evicted after retention period");
            }
        });
    }
}
