//! Types used by the ingestion coordinator

use bytes::Bytes;
use reelbox_core::models::MediaKind;
use reelbox_core::{AppError, Config};
use reelbox_db::StoreError;
use reelbox_storage::StorageError;
use std::time::Duration;
use validator::Validate;

/// One upload, fully buffered
#[derive(Clone, Validate)]
pub struct IngestRequest {
    pub bytes: Bytes,
    pub kind: MediaKind,
    #[validate(length(max = 255, message = "Title must be at most 255 characters"))]
    pub title: String,
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
    /// Size reported by the client. Bookkeeping only; the received byte count is stored.
    pub declared_original_size: i64,
    pub content_type: Option<String>,
}

impl std::fmt::Debug for IngestRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestRequest")
            .field("size_bytes", &self.bytes.len())
            .field("kind", &self.kind)
            .field("title", &self.title)
            .field("declared_original_size", &self.declared_original_size)
            .field("content_type", &self.content_type)
            .finish()
    }
}

/// Size ceilings and timeouts applied to every ingestion
#[derive(Debug, Clone)]
pub struct IngestLimits {
    pub max_video_bytes: usize,
    pub max_image_bytes: usize,
    pub upload_timeout: Duration,
    /// Remove the stored asset when its record cannot be committed
    pub compensating_delete: bool,
}

impl IngestLimits {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_video_bytes: config.max_video_size_bytes(),
            max_image_bytes: config.max_image_size_bytes(),
            upload_timeout: Duration::from_secs(config.storage_upload_timeout_secs()),
            compensating_delete: config.compensating_delete_enabled(),
        }
    }

    pub fn max_bytes_for(&self, kind: MediaKind) -> usize {
        match kind {
            MediaKind::Video => self.max_video_bytes,
            MediaKind::Image => self.max_image_bytes,
        }
    }
}

/// Ingestion failures, by the stage that failed
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("Storage call failed: {0}")]
    UpstreamFailed(#[source] StorageError),

    /// The asset exists remotely but no record was written.
    #[error("Metadata commit failed for asset {asset_ref} (orphan removed: {orphan_removed}): {source}")]
    MetadataCommitFailed {
        asset_ref: String,
        #[source]
        source: StoreError,
        orphan_removed: bool,
    },

    #[error("Ingestion cancelled")]
    Cancelled,
}

impl From<validator::ValidationErrors> for IngestError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        IngestError::Validation(messages.join("; "))
    }
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::Validation(msg) => AppError::Validation(msg),
            IngestError::PayloadTooLarge(msg) => AppError::PayloadTooLarge(msg),
            IngestError::UpstreamFailed(storage_err) => storage_err.into(),
            IngestError::MetadataCommitFailed {
                asset_ref,
                source,
                orphan_removed,
            } => AppError::MetadataCommitFailed {
                asset_ref,
                message: format!("{} (orphan removed: {})", source, orphan_removed),
            },
            IngestError::Cancelled => AppError::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelbox_core::ErrorMetadata;

    #[test]
    fn test_ingest_errors_map_to_their_http_kinds() {
        let cases: Vec<(IngestError, u16, &str)> = vec![
            (IngestError::Validation("x".into()), 400, "VALIDATION_ERROR"),
            (IngestError::PayloadTooLarge("x".into()), 400, "PAYLOAD_TOO_LARGE"),
            (
                IngestError::UpstreamFailed(StorageError::Unknown("reset".into())),
                502,
                "UPSTREAM_FAILED",
            ),
            (
                IngestError::UpstreamFailed(StorageError::Timeout),
                504,
                "UPSTREAM_TIMEOUT",
            ),
            (
                IngestError::MetadataCommitFailed {
                    asset_ref: "reelbox/video-upload/a".into(),
                    source: StoreError::Unavailable("down".into()),
                    orphan_removed: true,
                },
                500,
                "METADATA_COMMIT_FAILED",
            ),
            (IngestError::Cancelled, 503, "CANCELLED"),
        ];

        for (err, status, code) in cases {
            let app: AppError = err.into();
            assert_eq!(app.http_status_code(), status);
            assert_eq!(app.error_code(), code);
        }
    }

    #[test]
    fn test_length_rules_report_their_messages() {
        let request = IngestRequest {
            bytes: Bytes::from_static(b"x"),
            kind: MediaKind::Video,
            title: "t".repeat(256),
            description: None,
            declared_original_size: 1,
            content_type: None,
        };
        let err: IngestError = request.validate().unwrap_err().into();
        match err {
            IngestError::Validation(msg) => assert!(msg.contains("255")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
