use async_trait::async_trait;
use chrono::Utc;
use reelbox_core::models::{MediaRecord, NewMediaRecord};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::{MetadataStore, StoreError};

/// Process-local media record store
#[derive(Default)]
pub struct InMemoryMediaRepository {
    records: RwLock<Vec<MediaRecord>>,
}

impl InMemoryMediaRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MetadataStore for InMemoryMediaRepository {
    async fn insert(&self, record: NewMediaRecord) -> Result<MediaRecord, StoreError> {
        record
            .check_invariants()
            .map_err(|e| StoreError::Rejected(e.to_string()))?;

        let mut records = self.records.write().await;
        if records.iter().any(|r| r.asset_ref == record.asset_ref) {
            return Err(StoreError::Rejected(format!(
                "asset reference {} already has a record",
                record.asset_ref
            )));
        }

        let committed = record.into_record(Uuid::new_v4(), Utc::now());
        records.push(committed.clone());
        Ok(committed)
    }

    async fn list_all(&self) -> Result<Vec<MediaRecord>, StoreError> {
        let records = self.records.read().await;
        // Newest insert first among equal timestamps.
        let mut listed: Vec<MediaRecord> = records.iter().rev().cloned().collect();
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listed)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelbox_core::models::MediaKind;

    fn new_record(asset_ref: &str) -> NewMediaRecord {
        NewMediaRecord {
            kind: MediaKind::Video,
            asset_ref: asset_ref.to_string(),
            title: "demo".to_string(),
            description: None,
            original_size_bytes: 100,
            derived_size_bytes: 80,
            duration_seconds: 1.0,
        }
    }

    #[tokio::test]
    async fn test_list_all_on_empty_store_is_empty() {
        let store = InMemoryMediaRepository::new();
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_assigns_identity_and_lists_newest_first() {
        let store = InMemoryMediaRepository::new();
        let first = store.insert(new_record("a")).await.unwrap();
        let second = store.insert(new_record("b")).await.unwrap();
        assert_ne!(first.id, second.id);

        let listed = store.list_all().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].asset_ref, "b");
        assert_eq!(listed[1].asset_ref, "a");
    }

    #[tokio::test]
    async fn test_insert_rejects_invalid_and_duplicate_records() {
        let store = InMemoryMediaRepository::new();

        let mut invalid = new_record("a");
        invalid.derived_size_bytes = 0;
        assert!(matches!(
            store.insert(invalid).await,
            Err(StoreError::Rejected(_))
        ));

        store.insert(new_record("a")).await.unwrap();
        assert!(matches!(
            store.insert(new_record("a")).await,
            Err(StoreError::Rejected(_))
        ));
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }
}
