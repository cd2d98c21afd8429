//! Request handlers for the scan and report endpoints.

use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::error;

use crate::adapters::outbound::report::{PdfSurface, ReportRenderer};
use crate::application::dto::LegacyReportRequest;
use crate::presentation::routes::AppState;
use crate::scanning::domain::ScanResult;
use crate::shared::ScanError;

/// JSON error body returned by every failing endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ScanError {
    fn into_response(self) -> Response {
        let status = match &self {
            ScanError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ScanError::NotFound => StatusCode::NOT_FOUND,
            ScanError::Internal(cause) => {
                // The cause stays in the logs; the client gets a generic body.
                error!("internal error: {cause:#}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

/// `POST /api/scan` - multipart upload of a manifest plus its declared type.
pub async fn scan(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ScanResult>, ScanError> {
    let mut file_content: Option<String> = None;
    let mut file_type = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ScanError::invalid_input("Malformed multipart body"))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|_| ScanError::invalid_input("Malformed multipart body"))?;
                file_content = Some(String::from_utf8_lossy(&data).into_owned());
            }
            Some("fileType") => {
                file_type = field
                    .text()
                    .await
                    .map_err(|_| ScanError::invalid_input("Malformed multipart body"))?;
            }
            _ => {}
        }
    }

    let Some(content) = file_content else {
        return Err(ScanError::invalid_input("No file uploaded"));
    };

    let result = state.scanner.execute(&content, &file_type).await;
    state.store.put(result.clone());
    Ok(Json(result))
}

/// `GET /api/generate-pdf/{scan_id}` - renders a stored scan result and
/// schedules its eviction.
pub async fn generate_pdf(
    State(state): State<AppState>,
    Path(scan_id): Path<String>,
) -> Result<Response, ScanError> {
    let Some(result) = state.store.get(&scan_id) else {
        return Err(ScanError::NotFound);
    };

    let mut surface = PdfSurface::new();
    ReportRenderer::render(&result, &mut surface);
    let bytes = surface.into_bytes();

    // The client keeps a short re-download window before the entry expires.
    state.store.schedule_removal(&scan_id);

    Ok(pdf_response(&format!("vulnerability-report-{}.pdf", scan_id), bytes))
}

/// `POST /api/generate-pdf` - legacy path: renders a result posted directly
/// in the body, with the tighter legacy caps.
pub async fn generate_pdf_legacy(
    Json(body): Json<LegacyReportRequest>,
) -> Result<Response, ScanError> {
    let report = body
        .scan_results
        .filter(|report| report.results.is_some())
        .ok_or_else(|| ScanError::invalid_input("Invalid scan results"))?;

    let title = body
        .title
        .unwrap_or_else(|| "Vulnerability Scan Report".to_string());
    let generated_at = Utc::now();

    let mut surface = PdfSurface::new();
    ReportRenderer::render_legacy(&report, &title, generated_at, &mut surface);
    let bytes = surface.into_bytes();

    let filename = format!("vulnerability-report-{}.pdf", generated_at.timestamp_millis());
    Ok(pdf_response(&filename, bytes))
}

fn pdf_response(filename: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response()
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// `GET /api/health` - liveness probe.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        timestamp: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::RunScanUseCase;
    use crate::ports::outbound::VulnerabilitySource;
    use crate::presentation::create_router;
    use crate::scanning::domain::{Dependency, Severity, Vulnerability};
    use crate::store::{ResultStore, RESULT_RETENTION};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct StubSource {
        vulnerable: bool,
    }

    #[async_trait]
    impl VulnerabilitySource for StubSource {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn query(&self, dependency: &Dependency) -> crate::shared::Result<Vec<Vulnerability>> {
            if !self.vulnerable {
                return Ok(Vec::new());
            }
            Ok(vec![Vulnerability {
                id: format!("CVE-TEST-{}", dependency.name),
                description: "Stub finding".to_string(),
                severity: Severity::High,
                score: 7.5,
                references: vec![],
                published: None,
            }])
        }
    }

    fn test_state(vulnerable: bool) -> AppState {
        AppState {
            scanner: Arc::new(RunScanUseCase::new(vec![Arc::new(StubSource { vulnerable })])),
            store: Arc::new(ResultStore::new(RESULT_RETENTION)),
        }
    }

    fn multipart_body(file_type: &str, content: &str) -> (String, String) {
        let boundary = "X-DEPSCAN-TEST-BOUNDARY";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"fileType\"\r\n\r\n\
             {file_type}\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{file_type}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n\
             {content}\r\n\
             --{boundary}--\r\n"
        );
        (format!("multipart/form-data; boundary={boundary}"), body)
    }

    async fn response_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_router(test_state(false));
        let response = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["status"], "OK");
        assert!(json["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_scan_without_file_is_bad_request() {
        let app = create_router(test_state(false));
        let boundary = "X-DEPSCAN-TEST-BOUNDARY";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"fileType\"\r\n\r\n\
             package.json\r\n\
             --{boundary}--\r\n"
        );
        let response = app
            .oneshot(
                Request::post("/api/scan")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"], "No file uploaded");
    }

    #[tokio::test]
    async fn test_scan_returns_result_and_stores_it() {
        let state = test_state(true);
        let store = Arc::clone(&state.store);
        let app = create_router(state);

        let manifest = r#"{ "dependencies": { "express": "^4.18.2" } }"#;
        let (content_type, body) = multipart_body("package.json", manifest);
        let response = app
            .oneshot(
                Request::post("/api/scan")
                    .header(header::CONTENT_TYPE, content_type)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["totalDependencies"], 1);
        assert_eq!(json["scannedDependencies"], 1);
        assert_eq!(json["vulnerableDependencies"], 1);
        assert_eq!(json["results"][0]["dependency"], "express");
        assert_eq!(json["results"][0]["version"], "4.18.2");

        let scan_id = json["scanId"].as_str().unwrap();
        assert!(store.get(scan_id).is_some());
    }

    #[tokio::test]
    async fn test_scan_with_unknown_file_type_returns_empty_result() {
        let app = create_router(test_state(true));
        let (content_type, body) = multipart_body("Cargo.toml", "[dependencies]");
        let response = app
            .oneshot(
                Request::post("/api/scan")
                    .header(header::CONTENT_TYPE, content_type)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["totalDependencies"], 0);
        assert_eq!(json["vulnerableDependencies"], 0);
    }

    #[tokio::test]
    async fn test_generate_pdf_unknown_id_is_not_found() {
        let app = create_router(test_state(false));
        let response = app
            .oneshot(
                Request::get("/api/generate-pdf/123456")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = response_json(response).await;
        assert_eq!(json["error"], "Scan results not found");
    }

    #[tokio::test]
    async fn test_generate_pdf_streams_stored_result() {
        let state = test_state(false);
        let result = crate::scanning::domain::ScanResult::new(
            "777".to_string(),
            Utc::now(),
            2,
            2,
            vec![],
        );
        state.store.put(result);
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::get("/api/generate-pdf/777")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/pdf"
        );
        assert!(response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("vulnerability-report-777.pdf"));

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.starts_with(b"%PDF-1.4"));
    }

    #[tokio::test]
    async fn test_legacy_pdf_without_results_is_bad_request() {
        let app = create_router(test_state(false));
        let response = app
            .oneshot(
                Request::post("/api/generate-pdf")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{ "title": "No payload" }"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"], "Invalid scan results");
    }

    #[tokio::test]
    async fn test_legacy_pdf_renders_posted_results() {
        let app = create_router(test_state(false));
        let body = r#"{
            "scanResults": {
                "totalDependencies": 1,
                "vulnerableDependencies": 1,
                "results": [{
                    "dependency": "lodash",
                    "version": "4.17.15",
                    "type": "npm",
                    "vulnerabilities": [{
                        "id": "CVE-2020-8203",
                        "description": "Prototype pollution",
                        "severity": "HIGH",
                        "score": 7.4
                    }]
                }]
            }
        }"#;
        let response = app
            .oneshot(
                Request::post("/api/generate-pdf")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("(1. lodash@4.17.15) Tj"));
        assert!(text.contains("CVE-2020-8203"));
    }
}
