//! Route definitions and middleware stack.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::application::use_cases::RunScanUseCase;
use crate::presentation::handlers;
use crate::store::ResultStore;

/// Upload size limit, matching the original service's 10 MiB cap.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Whole-request timeout; generous because a scan fans out up to twenty
/// dependencies against rate-limited upstreams.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Shared server state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub scanner: Arc<RunScanUseCase>,
    pub store: Arc<ResultStore>,
}

/// Builds the application router with the full middleware stack.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/scan", post(handlers::scan))
        .route("/api/generate-pdf/{scan_id}", get(handlers::generate_pdf))
        .route("/api/generate-pdf", post(handlers::generate_pdf_legacy))
        .route("/api/health", get(handlers::health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .with_state(state)
}
