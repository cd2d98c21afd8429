//! depscan - dependency vulnerability scanning service
//!
//! Parses a dependency manifest (package.json, composer.json, or
//! requirements.txt), fans out concurrent lookups against NVD, Snyk, and
//! OSS Index, aggregates the findings per dependency, and renders paginated
//! PDF reports from a short-lived in-memory result store.
//!
//! # Architecture
//!
//! The crate is organized hexagonally:
//!
//! - **Domain** (`scanning`): dependency, vulnerability, and scan result models
//! - **Application** (`application`): the scan orchestrator and DTOs
//! - **Ports** (`ports`): interfaces for upstream sources and the report surface
//! - **Adapters** (`adapters`): upstream API clients and the PDF report path
//! - **Presentation** (`presentation`): axum routes and handlers
//! - **Shared** (`shared`): common result and error types
//!
//! # Example
//!
//! ```no_run
//! use depscan::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn demo() -> Result<()> {
//! // Create source adapters (all credentials optional)
//! let sources: Vec<Arc<dyn VulnerabilitySource>> = vec![
//!     Arc::new(NvdClient::new(None)?),
//!     Arc::new(SnykClient::new(None, None)?),
//!     Arc::new(OssIndexClient::new(None)?),
//! ];
//!
//! // Run a scan over raw manifest bytes
//! let scanner = RunScanUseCase::new(sources);
//! let manifest = r#"{ "dependencies": { "lodash": "^4.17.15" } }"#;
//! let result = scanner.execute(manifest, "package.json").await;
//!
//! // Render the report
//! let mut surface = PdfSurface::new();
//! ReportRenderer::render(&result, &mut surface);
//! let pdf_bytes = surface.into_bytes();
//! # let _ = pdf_bytes;
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod cli;
pub mod config;
pub mod manifest;
pub mod ports;
pub mod presentation;
pub mod scanning;
pub mod shared;
pub mod store;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::network::{NvdClient, OssIndexClient, SnykClient};
    pub use crate::adapters::outbound::report::{PdfSurface, ReportRenderer};
    pub use crate::application::dto::{LegacyReport, LegacyReportRequest};
    pub use crate::application::use_cases::RunScanUseCase;
    pub use crate::config::Config;
    pub use crate::manifest::{parse_dependencies, ManifestFormat};
    pub use crate::ports::outbound::{ReportSurface, VulnerabilitySource};
    pub use crate::presentation::{create_router, AppState};
    pub use crate::scanning::domain::{
        Dependency, DependencyFinding, Ecosystem, ScanResult, Severity, Vulnerability,
    };
    pub use crate::shared::{Result, ScanError};
    pub use crate::store::{ResultStore, RESULT_RETENTION};
}
