//! Ingestion coordinator
//!
//! The only path that creates media records: validate → size check → store → insert.
//! Nothing is retried. When the insert fails after a successful store, the stored asset is
//! removed on a best-effort basis and the caller still receives `MetadataCommitFailed`.

use futures::FutureExt;
use reelbox_core::models::{MediaKind, MediaRecord, NewMediaRecord};
use reelbox_core::TransformOptions;
use reelbox_db::MetadataStore;
use reelbox_storage::{StorageClient, StorageError, StoredAsset};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use validator::Validate;

use super::types::{IngestError, IngestLimits, IngestRequest};

const COMPENSATING_DELETE_TIMEOUT: Duration = Duration::from_secs(10);

pub struct IngestionCoordinator {
    storage: Arc<dyn StorageClient>,
    store: Arc<dyn MetadataStore>,
    limits: IngestLimits,
}

impl IngestionCoordinator {
    pub fn new(
        storage: Arc<dyn StorageClient>,
        store: Arc<dyn MetadataStore>,
        limits: IngestLimits,
    ) -> Self {
        Self {
            storage,
            store,
            limits,
        }
    }

    /// Ingest one upload and return the committed record.
    ///
    /// `cancel` firing before the storage call completes yields `Cancelled` and no record. An
    /// asset the storage call already returned by then is removed like any other orphan.
    #[tracing::instrument(
        skip(self, request, cancel),
        fields(media_kind = %request.kind, size_bytes = request.bytes.len())
    )]
    pub async fn ingest(
        &self,
        request: IngestRequest,
        cancel: &CancellationToken,
    ) -> Result<MediaRecord, IngestError> {
        validate_request(&request)?;
        self.check_size(&request)?;

        if cancel.is_cancelled() {
            return Err(IngestError::Cancelled);
        }

        let received = request.bytes.len() as i64;
        if received != request.declared_original_size {
            tracing::warn!(
                declared = request.declared_original_size,
                received,
                "Declared original size does not match received byte count"
            );
        }

        let kind = request.kind;
        let stored = self.store_asset(request.bytes, kind, cancel).await?;

        let record = NewMediaRecord {
            kind,
            asset_ref: stored.asset_ref.clone(),
            title: request.title.trim().to_string(),
            description: request
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            original_size_bytes: received,
            derived_size_bytes: stored.derived_size_bytes,
            duration_seconds: stored.derived_duration_seconds.max(0.0),
        };

        match self.store.insert(record).await {
            Ok(committed) => {
                tracing::info!(
                    record_id = %committed.id,
                    asset_ref = %committed.asset_ref,
                    original_size_bytes = committed.original_size_bytes,
                    derived_size_bytes = committed.derived_size_bytes,
                    "Media ingested"
                );
                Ok(committed)
            }
            Err(source) => {
                tracing::error!(
                    priority = "high",
                    asset_ref = %stored.asset_ref,
                    error = %source,
                    "Asset stored but metadata commit failed"
                );
                let orphan_removed = self.remove_orphan(&stored.asset_ref, kind).await;
                Err(IngestError::MetadataCommitFailed {
                    asset_ref: stored.asset_ref,
                    source,
                    orphan_removed,
                })
            }
        }
    }

    fn check_size(&self, request: &IngestRequest) -> Result<(), IngestError> {
        let max = self.limits.max_bytes_for(request.kind);
        if request.bytes.len() > max {
            return Err(IngestError::PayloadTooLarge(format!(
                "File size {} bytes exceeds maximum allowed size of {} MB for {}",
                request.bytes.len(),
                max / 1024 / 1024,
                request.kind
            )));
        }
        Ok(())
    }

    async fn store_asset(
        &self,
        bytes: bytes::Bytes,
        kind: MediaKind,
        cancel: &CancellationToken,
    ) -> Result<StoredAsset, IngestError> {
        let options = TransformOptions::for_kind(kind);
        let upload = tokio::time::timeout(
            self.limits.upload_timeout,
            self.storage.store(bytes, kind, &options),
        );
        tokio::pin!(upload);

        let result = tokio::select! {
            biased;
            result = &mut upload => result,
            _ = cancel.cancelled() => {
                // The upload may have finished in the same wakeup that delivered the cancel.
                if let Some(Ok(Ok(asset))) = upload.as_mut().now_or_never() {
                    tracing::info!(
                        asset_ref = %asset.asset_ref,
                        "Ingestion cancelled after the asset was stored"
                    );
                    self.remove_orphan(&asset.asset_ref, kind).await;
                } else {
                    tracing::info!("Ingestion cancelled before the storage call completed");
                }
                return Err(IngestError::Cancelled);
            }
        };

        match result {
            Ok(Ok(asset)) => Ok(asset),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Storage call failed");
                Err(IngestError::UpstreamFailed(e))
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.limits.upload_timeout.as_secs(),
                    "Storage call timed out"
                );
                Err(IngestError::UpstreamFailed(StorageError::Timeout))
            }
        }
    }

    /// Returns whether the asset is known to be gone.
    async fn remove_orphan(&self, asset_ref: &str, kind: MediaKind) -> bool {
        if !self.limits.compensating_delete {
            tracing::warn!(asset_ref, "Compensating delete disabled; asset left orphaned");
            return false;
        }

        match tokio::time::timeout(
            COMPENSATING_DELETE_TIMEOUT,
            self.storage.destroy(asset_ref, kind),
        )
        .await
        {
            Ok(Ok(())) => {
                tracing::info!(asset_ref, "Orphaned asset removed");
                true
            }
            Ok(Err(e)) => {
                tracing::error!(priority = "high", asset_ref, error = %e, "Failed to remove orphaned asset");
                false
            }
            Err(_) => {
                tracing::error!(priority = "high", asset_ref, "Timed out removing orphaned asset");
                false
            }
        }
    }
}

/// Local checks; no external calls.
fn validate_request(request: &IngestRequest) -> Result<(), IngestError> {
    if request.bytes.is_empty() {
        return Err(IngestError::Validation("File is empty".to_string()));
    }
    if request.declared_original_size <= 0 {
        return Err(IngestError::Validation(
            "declaredOriginalSize must be a positive integer".to_string(),
        ));
    }
    if request.title.trim().is_empty() {
        return Err(IngestError::Validation("Title is required".to_string()));
    }
    request.validate()?;

    if let Some(content_type) = request.content_type.as_deref() {
        if !request.kind.accepts_content_type(content_type) {
            return Err(IngestError::Validation(format!(
                "Content type {} is not a {} type",
                content_type, request.kind
            )));
        }
    }
    Ok(())
}
