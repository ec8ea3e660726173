use async_trait::async_trait;
use bytes::Bytes;
use reelbox_core::models::MediaKind;
use reelbox_core::TransformOptions;
use reelbox_storage::{
    LocalStorageClient, StorageBackend, StorageClient, StorageError, StorageResult, StoredAsset,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tempfile::TempDir;

/// Storage client stub that counts calls. Halves the byte count to mimic compression.
pub struct StubStorage {
    store_calls: AtomicUsize,
    destroy_calls: AtomicUsize,
    failure: Mutex<Option<StorageError>>,
}

impl StubStorage {
    pub fn new() -> Self {
        Self {
            store_calls: AtomicUsize::new(0),
            destroy_calls: AtomicUsize::new(0),
            failure: Mutex::new(None),
        }
    }

    pub fn failing(err: StorageError) -> Self {
        let stub = Self::new();
        *stub.failure.lock().unwrap() = Some(err);
        stub
    }

    pub fn store_calls(&self) -> usize {
        self.store_calls.load(Ordering::SeqCst)
    }

    pub fn destroy_calls(&self) -> usize {
        self.destroy_calls.load(Ordering::SeqCst)
    }
}

impl Default for StubStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageClient for StubStorage {
    async fn store(
        &self,
        data: Bytes,
        kind: MediaKind,
        _options: &TransformOptions,
    ) -> StorageResult<StoredAsset> {
        let n = self.store_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.failure.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(StoredAsset {
            asset_ref: format!("reelbox/{}/stub-{}", kind.upload_folder(), n),
            derived_size_bytes: (data.len() as i64 / 2).max(1),
            derived_duration_seconds: match kind {
                MediaKind::Video => 42.0,
                MediaKind::Image => 0.0,
            },
        })
    }

    async fn destroy(&self, _asset_ref: &str, _kind: MediaKind) -> StorageResult<()> {
        self.destroy_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

/// Local filesystem storage rooted in a temp directory.
pub struct TestStorage {
    pub temp_dir: TempDir,
    pub client: LocalStorageClient,
}

impl TestStorage {
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let client = LocalStorageClient::new(temp_dir.path(), "reelbox")
            .await
            .expect("Failed to create local storage");
        Self { temp_dir, client }
    }
}
