/// Network adapters for the upstream vulnerability databases.
pub mod nvd;
pub mod ossindex;
pub mod snyk;

pub use nvd::NvdClient;
pub use ossindex::OssIndexClient;
pub use snyk::SnykClient;

use chrono::{DateTime, NaiveDateTime, Utc};
use std::time::Duration;

use crate::shared::Result;

/// Per-request timeout applied to every upstream call. There is no retry:
/// a slow or dead upstream costs a scan at most this long per lookup.
pub(crate) const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds the shared reqwest client configuration for an upstream adapter.
pub(crate) fn build_http_client() -> Result<reqwest::Client> {
    let version = env!("CARGO_PKG_VERSION");
    let user_agent = format!("depscan/{}", version);
    let client = reqwest::Client::builder()
        .timeout(UPSTREAM_TIMEOUT)
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Parses an upstream timestamp leniently.
///
/// NVD emits naive timestamps ("2021-04-15T19:15:14.310"), others RFC 3339;
/// anything unparseable becomes `None` rather than failing the record.
pub(crate) fn parse_published(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .map(|naive| naive.and_utc())
                .ok()
        })
}
