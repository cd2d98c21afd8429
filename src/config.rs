//! Environment-backed configuration.
//!
//! All upstream credentials are optional: the NVD and OSS Index adapters
//! work unauthenticated (at lower rate limits) and the Snyk adapter gates
//! itself off entirely without credentials. Loading is split into a pure
//! `from_lookup` core so tests never have to mutate process environment.

use tracing::warn;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;

/// Top-level service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub sources: SourceConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Credentials for the upstream vulnerability databases.
#[derive(Debug, Clone, Default)]
pub struct SourceConfig {
    pub nvd_api_key: Option<String>,
    pub snyk_api_token: Option<String>,
    pub snyk_org_id: Option<String>,
    pub oss_index_api_key: Option<String>,
}

impl Config {
    /// Loads configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    /// Empty values are treated as unset; an unparseable port falls back to
    /// the default with a warning rather than refusing to start.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match non_empty("PORT").map(|raw| raw.parse::<u16>()) {
            Some(Ok(port)) => port,
            Some(Err(_)) => {
                warn!("PORT is not a valid port number, using {}", DEFAULT_PORT);
                DEFAULT_PORT
            }
            None => DEFAULT_PORT,
        };

        Self {
            server: ServerConfig {
                host: non_empty("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port,
            },
            sources: SourceConfig {
                nvd_api_key: non_empty("NVD_API_KEY"),
                snyk_api_token: non_empty("SNYK_API_TOKEN"),
                snyk_org_id: non_empty("SNYK_ORG_ID"),
                oss_index_api_key: non_empty("OSS_INDEX_API_KEY"),
            },
        }
    }

    /// Warns about half-configured source credentials at startup.
    pub fn warn_on_partial_credentials(&self) {
        let sources = &self.sources;
        if sources.snyk_api_token.is_some() && sources.snyk_org_id.is_none() {
            warn!("SNYK_API_TOKEN is set without SNYK_ORG_ID; the Snyk source will be skipped");
        }
        if sources.snyk_org_id.is_some() && sources.snyk_api_token.is_none() {
            warn!("SNYK_ORG_ID is set without SNYK_API_TOKEN; the Snyk source will be skipped");
        }
    }
}
