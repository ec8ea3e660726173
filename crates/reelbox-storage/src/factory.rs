#[cfg(feature = "storage-cloud")]
use crate::{CloudStorageClient, StorageCredentials};
#[cfg(feature = "storage-local")]
use crate::LocalStorageClient;
use crate::{StorageBackend, StorageClient, StorageResult};
use reelbox_core::Config;
use std::sync::Arc;
#[cfg(feature = "storage-cloud")]
use std::time::Duration;

/// Create a storage client based on configuration
pub async fn create_storage_client(config: &Config) -> StorageResult<Arc<dyn StorageClient>> {
    match config.storage_backend() {
        #[cfg(feature = "storage-cloud")]
        StorageBackend::Cloud => {
            let client = CloudStorageClient::new(
                config.storage_api_base(),
                config.storage_folder(),
                StorageCredentials::from_config(config),
                Duration::from_secs(config.storage_upload_timeout_secs()),
            )?;
            Ok(Arc::new(client))
        }

        #[cfg(not(feature = "storage-cloud"))]
        StorageBackend::Cloud => Err(crate::StorageError::Unknown(
            "Cloud storage backend not available (storage-cloud feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let client =
                LocalStorageClient::new(config.local_storage_path(), config.storage_folder())
                    .await?;
            Ok(Arc::new(client))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(crate::StorageError::Unknown(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}
