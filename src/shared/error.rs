use thiserror::Error;

/// Application-facing errors for the scanning service.
///
/// The three variants mirror how failures are surfaced to callers: bad
/// requests get a short message, missing scan results get a not-found
/// signal, and everything unexpected collapses to a generic internal error
/// whose cause is only logged server-side. Upstream source failures never
/// appear here - they are absorbed at the adapter boundary.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The request itself was malformed (missing upload, invalid report body).
    #[error("{0}")]
    InvalidInput(String),

    /// No stored scan result for the requested scan id (expired or never existed).
    #[error("Scan results not found")]
    NotFound,

    /// Unexpected failure during orchestration or rendering.
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ScanError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ScanError::InvalidInput(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_display_keeps_message() {
        let error = ScanError::invalid_input("No file uploaded");
        assert_eq!(format!("{}", error), "No file uploaded");
    }

    #[test]
    fn test_not_found_display() {
        assert_eq!(format!("{}", ScanError::NotFound), "Scan results not found");
    }

    #[test]
    fn test_internal_display_hides_cause() {
        let error = ScanError::from(anyhow::anyhow!("connection pool exhausted"));
        let display = format!("{}", error);
        assert_eq!(display, "Internal server error");
        assert!(!display.contains("pool"));
    }
}
