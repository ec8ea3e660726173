use async_trait::async_trait;
use reelbox_core::models::{MediaRecord, NewMediaRecord};
use reelbox_core::{AppError, Config, MetadataBackend};
use sqlx::error::ErrorKind;
use sqlx::PgPool;
use std::sync::Arc;

use super::{InMemoryMediaRepository, PgMediaRepository};

/// Metadata store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached (connection, pool or TLS failure).
    #[error("Metadata store unavailable: {0}")]
    Unavailable(String),

    /// The record violates a store constraint; nothing was written.
    #[error("Record rejected: {0}")]
    Rejected(String),

    #[error("Query failed: {0}")]
    Query(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreError::Unavailable(err.to_string()),
            sqlx::Error::Database(ref db_err)
                if matches!(
                    db_err.kind(),
                    ErrorKind::UniqueViolation
                        | ErrorKind::CheckViolation
                        | ErrorKind::NotNullViolation
                ) =>
            {
                StoreError::Rejected(db_err.message().to_string())
            }
            other => StoreError::Query(other),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::StoreUnavailable(err.to_string())
    }
}

/// Keyed record store for media records
///
/// Implementations must support concurrent independent calls.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Insert one record; the store assigns `id` and `created_at`.
    async fn insert(&self, record: NewMediaRecord) -> Result<MediaRecord, StoreError>;

    /// All records, newest first. Empty when nothing has been stored.
    async fn list_all(&self) -> Result<Vec<MediaRecord>, StoreError>;

    /// Cheap reachability check for readiness probes.
    async fn ping(&self) -> Result<(), StoreError>;

    fn backend_name(&self) -> &'static str;
}

/// Create the metadata store selected by `METADATA_BACKEND`.
///
/// The Postgres backend needs the pool built during database setup.
pub fn create_metadata_store(
    config: &Config,
    pool: Option<PgPool>,
) -> Result<Arc<dyn MetadataStore>, AppError> {
    match config.metadata_backend() {
        MetadataBackend::Postgres => {
            let pool = pool.ok_or_else(|| {
                AppError::Internal(
                    "METADATA_BACKEND=postgres requires a database connection pool".to_string(),
                )
            })?;
            tracing::info!("Initializing PostgreSQL metadata store");
            Ok(Arc::new(PgMediaRepository::new(pool)))
        }
        MetadataBackend::Memory => {
            tracing::warn!("Using in-memory metadata store; records are lost on restart");
            Ok(Arc::new(InMemoryMediaRepository::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelbox_core::ErrorMetadata;

    #[test]
    fn test_connectivity_errors_are_unavailable() {
        assert!(matches!(
            StoreError::from(sqlx::Error::PoolTimedOut),
            StoreError::Unavailable(_)
        ));
        assert!(matches!(
            StoreError::from(sqlx::Error::PoolClosed),
            StoreError::Unavailable(_)
        ));
        assert!(matches!(
            StoreError::from(sqlx::Error::RowNotFound),
            StoreError::Query(_)
        ));
    }

    #[test]
    fn test_store_error_maps_to_store_unavailable() {
        let err = AppError::from(StoreError::Unavailable("connection refused".to_string()));
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "STORE_UNAVAILABLE");
    }
}
