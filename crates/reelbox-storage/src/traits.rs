//! Storage client abstraction
//!
//! The transform service is a black box reached through [`StorageClient`]: one awaitable
//! call that either returns the stored (and transformed) asset or a tagged error.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use reelbox_core::models::MediaKind;
use reelbox_core::{AppError, TransformOptions};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// One or more credentials are unset; no request was attempted.
    #[error("Storage credentials missing: {0}")]
    CredentialsMissing(String),

    #[error("Remote service rejected the request: {0}")]
    RemoteRejected(String),

    #[error("Storage request timed out")]
    Timeout,

    #[error("Storage request failed: {0}")]
    Unknown(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Unknown(format!("IO error: {}", err))
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::CredentialsMissing(missing) => AppError::StorageCredentialsMissing(missing),
            StorageError::RemoteRejected(reason) => AppError::UpstreamRejected(reason),
            StorageError::Timeout => AppError::UpstreamTimeout,
            StorageError::Unknown(reason) => AppError::UpstreamFailed(reason),
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Result of a successful upload: the handle plus facts about the derived artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAsset {
    pub asset_ref: String,
    pub derived_size_bytes: i64,
    pub derived_duration_seconds: f64,
}

/// Storage client trait
///
/// Implementations must be safe to call concurrently from independent requests.
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Upload `data` and apply `options`; returns the derived asset.
    async fn store(
        &self,
        data: Bytes,
        kind: MediaKind,
        options: &TransformOptions,
    ) -> StorageResult<StoredAsset>;

    /// Remove a previously stored asset. Used only for cleanup after a failed commit.
    async fn destroy(&self, asset_ref: &str, kind: MediaKind) -> StorageResult<()>;

    /// Get the backend type for this client
    fn backend_type(&self) -> StorageBackend;
}
