//! Storage client setup

use anyhow::{Context, Result};
use reelbox_core::{Config, StorageBackend};
use reelbox_storage::{create_storage_client, StorageClient};
use std::sync::Arc;

/// Build the storage client. Missing cloud credentials are reported here but only fail
/// individual uploads, so the process still starts and serves listings.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn StorageClient>> {
    tracing::info!(backend = %config.storage_backend(), "Initializing storage client...");

    if config.storage_backend() == StorageBackend::Cloud {
        let missing = config.missing_storage_credentials();
        if !missing.is_empty() {
            tracing::warn!(
                missing = %missing.join(", "),
                "Storage credentials incomplete; uploads will fail until they are set"
            );
        }
    }

    let storage = create_storage_client(config)
        .await
        .context("Failed to create storage client")?;

    tracing::info!(
        backend = %storage.backend_type(),
        "Storage client initialized successfully"
    );
    Ok(storage)
}
