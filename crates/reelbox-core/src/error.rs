//! Error types module
//!
//! All failures that can reach a client converge on [`AppError`]. Each layer keeps its own
//! `thiserror` enum (storage, metadata store, delivery, ingestion) and converts into `AppError`
//! at the boundary; the variant decides status code, machine-readable code and log level
//! through [`ErrorMetadata`].

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like upstream timeouts
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "UPSTREAM_FAILED")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Storage credentials missing: {0}")]
    StorageCredentialsMissing(String),

    #[error("Upstream rejected the upload: {0}")]
    UpstreamRejected(String),

    #[error("Upstream storage call timed out")]
    UpstreamTimeout,

    #[error("Upstream storage call failed: {0}")]
    UpstreamFailed(String),

    /// The asset was stored remotely but its record could not be written.
    #[error("Metadata commit failed for asset {asset_ref}: {message}")]
    MetadataCommitFailed { asset_ref: String, message: String },

    #[error("Metadata store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Operation cancelled before completion")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::Validation(_) => (
            400,
            "VALIDATION_ERROR",
            false,
            Some("Check request parameters and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::PayloadTooLarge(_) => (
            400,
            "PAYLOAD_TOO_LARGE",
            false,
            Some("Reduce file size and upload again"),
            false,
            LogLevel::Debug,
        ),
        AppError::Unauthorized(_) => (
            401,
            "UNAUTHORIZED",
            false,
            Some("Sign in and retry with a valid session token"),
            false,
            LogLevel::Debug,
        ),
        AppError::StorageCredentialsMissing(_) => (
            500,
            "STORAGE_CREDENTIALS_MISSING",
            false,
            Some("Contact support if this error persists"),
            true,
            LogLevel::Error,
        ),
        AppError::UpstreamRejected(_) => (
            422,
            "UPSTREAM_REJECTED",
            false,
            Some("Check the file format and try a different file"),
            false,
            LogLevel::Warn,
        ),
        AppError::UpstreamTimeout => (
            504,
            "UPSTREAM_TIMEOUT",
            true,
            Some("Retry after a short delay"),
            false,
            LogLevel::Warn,
        ),
        AppError::UpstreamFailed(_) => (
            502,
            "UPSTREAM_FAILED",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::MetadataCommitFailed { .. } => (
            500,
            "METADATA_COMMIT_FAILED",
            true,
            Some("Retry the upload; contact support if this error persists"),
            true,
            LogLevel::Error,
        ),
        AppError::StoreUnavailable(_) => (
            500,
            "STORE_UNAVAILABLE",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::Cancelled => (
            503,
            "CANCELLED",
            true,
            Some("Retry the request"),
            false,
            LogLevel::Warn,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Validation(_) => "Validation",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::StorageCredentialsMissing(_) => "StorageCredentialsMissing",
            AppError::UpstreamRejected(_) => "UpstreamRejected",
            AppError::UpstreamTimeout => "UpstreamTimeout",
            AppError::UpstreamFailed(_) => "UpstreamFailed",
            AppError::MetadataCommitFailed { .. } => "MetadataCommitFailed",
            AppError::StoreUnavailable(_) => "StoreUnavailable",
            AppError::Cancelled => "Cancelled",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Validation(ref msg) => msg.clone(),
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::Unauthorized(ref msg) => msg.clone(),
            AppError::StorageCredentialsMissing(_) => {
                "Storage service is not configured".to_string()
            }
            AppError::UpstreamRejected(ref reason) => {
                format!("Storage service rejected the upload: {}", reason)
            }
            AppError::UpstreamTimeout => "Storage service timed out".to_string(),
            AppError::UpstreamFailed(_) => "Storage service request failed".to_string(),
            AppError::MetadataCommitFailed { .. } => {
                "Upload stored but its record could not be saved".to_string()
            }
            AppError::StoreUnavailable(_) => "Failed to access media records".to_string(),
            AppError::Cancelled => "Request was cancelled before completion".to_string(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_payload_too_large_is_client_error() {
        let err = AppError::PayloadTooLarge("File size exceeds 70 MB".to_string());
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "PAYLOAD_TOO_LARGE");
        assert!(!err.is_recoverable());
        assert_eq!(err.client_message(), "File size exceeds 70 MB");
        assert!(!err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_error_metadata_metadata_commit_failed() {
        let err = AppError::MetadataCommitFailed {
            asset_ref: "reelbox/video-upload/abc".to_string(),
            message: "pool timed out".to_string(),
        };
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "METADATA_COMMIT_FAILED");
        assert!(err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Error);
        assert!(!err.client_message().contains("pool timed out"));
        assert!(err.to_string().contains("reelbox/video-upload/abc"));
    }

    #[test]
    fn test_error_metadata_upstream_variants() {
        assert_eq!(AppError::UpstreamTimeout.http_status_code(), 504);
        assert!(AppError::UpstreamTimeout.is_recoverable());

        let rejected = AppError::UpstreamRejected("unsupported codec".to_string());
        assert_eq!(rejected.http_status_code(), 422);
        assert!(rejected.client_message().contains("unsupported codec"));

        let missing = AppError::StorageCredentialsMissing("STORAGE_API_KEY".to_string());
        assert_eq!(missing.http_status_code(), 500);
        assert_eq!(missing.error_code(), "STORAGE_CREDENTIALS_MISSING");
        assert!(!missing.client_message().contains("STORAGE_API_KEY"));
    }

    #[test]
    fn test_error_metadata_suggested_actions() {
        let err1 = AppError::StoreUnavailable("connection refused".to_string());
        assert_eq!(err1.suggested_action(), Some("Retry after a short delay"));

        let err2 = AppError::Validation("title is required".to_string());
        assert_eq!(
            err2.suggested_action(),
            Some("Check request parameters and try again")
        );
    }

    #[test]
    fn test_detailed_message_walks_source_chain() {
        let err = AppError::from(anyhow::anyhow!("inner").context("outer"));
        let details = err.detailed_message();
        assert!(details.starts_with("Internal error with source"));
        assert!(details.contains("Caused by: outer"));
    }
}
