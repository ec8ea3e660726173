use crate::keys;
use crate::traits::{StorageClient, StorageError, StorageResult, StoredAsset};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use reelbox_core::models::MediaKind;
use reelbox_core::TransformOptions;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage client
///
/// Stands in for the transform service during development: bytes are written unchanged,
/// so the derived artifact is the original and videos report a zero duration.
#[derive(Clone)]
pub struct LocalStorageClient {
    base_path: PathBuf,
    root_folder: String,
}

impl LocalStorageClient {
    /// Create a new LocalStorageClient
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "./data/media")
    /// * `root_folder` - Folder prefix of generated asset keys (e.g., "reelbox")
    pub async fn new(
        base_path: impl Into<PathBuf>,
        root_folder: impl Into<String>,
    ) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::Unknown(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorageClient {
            base_path,
            root_folder: root_folder.into(),
        })
    }

    /// Convert an asset key to a filesystem path, refusing keys that could escape the
    /// base directory.
    fn key_to_path(&self, asset_key: &str) -> StorageResult<PathBuf> {
        if asset_key.is_empty()
            || asset_key.starts_with('/')
            || asset_key.split('/').any(|segment| segment == "..")
        {
            return Err(StorageError::RemoteRejected(format!(
                "invalid asset key: {}",
                asset_key
            )));
        }

        Ok(self.base_path.join(asset_key))
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl StorageClient for LocalStorageClient {
    async fn store(
        &self,
        data: Bytes,
        kind: MediaKind,
        options: &TransformOptions,
    ) -> StorageResult<StoredAsset> {
        let key = keys::generate_asset_key(&self.root_folder, kind);
        let path = self.key_to_path(&key)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::Unknown(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::Unknown(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::Unknown(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            transformation = %options.to_transformation(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(StoredAsset {
            asset_ref: key,
            derived_size_bytes: size as i64,
            derived_duration_seconds: 0.0,
        })
    }

    async fn destroy(&self, asset_ref: &str, _kind: MediaKind) -> StorageResult<()> {
        let path = self.key_to_path(asset_ref)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::Unknown(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(path = %path.display(), key = %asset_ref, "Local storage delete successful");

        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_store_writes_bytes_under_kind_folder() {
        let dir = TempDir::new().unwrap();
        let client = LocalStorageClient::new(dir.path(), "reelbox").await.unwrap();

        let asset = client
            .store(
                Bytes::from_static(b"hello video"),
                MediaKind::Video,
                &TransformOptions::for_kind(MediaKind::Video),
            )
            .await
            .unwrap();

        assert!(asset.asset_ref.starts_with("reelbox/video-upload/"));
        assert_eq!(asset.derived_size_bytes, 11);
        assert_eq!(asset.derived_duration_seconds, 0.0);

        let on_disk = std::fs::read(dir.path().join(&asset.asset_ref)).unwrap();
        assert_eq!(on_disk, b"hello video");
    }

    #[tokio::test]
    async fn test_destroy_removes_file_and_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let client = LocalStorageClient::new(dir.path(), "reelbox").await.unwrap();
        let asset = client
            .store(
                Bytes::from_static(b"img"),
                MediaKind::Image,
                &TransformOptions::for_kind(MediaKind::Image),
            )
            .await
            .unwrap();

        client.destroy(&asset.asset_ref, MediaKind::Image).await.unwrap();
        assert!(!dir.path().join(&asset.asset_ref).exists());
        client.destroy(&asset.asset_ref, MediaKind::Image).await.unwrap();
    }

    #[tokio::test]
    async fn test_destroy_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        let client = LocalStorageClient::new(dir.path(), "reelbox").await.unwrap();
        assert!(client.destroy("../etc/passwd", MediaKind::Image).await.is_err());
        assert!(client.destroy("/etc/passwd", MediaKind::Image).await.is_err());
    }
}
