use async_trait::async_trait;
use reelbox_core::models::{MediaRecord, NewMediaRecord};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use super::store::{MetadataStore, StoreError};

const RECORD_COLUMNS: &str = "id, kind, asset_ref, title, description, original_size_bytes, \
     derived_size_bytes, duration_seconds, created_at";

/// Postgres-backed media record repository
#[derive(Clone)]
pub struct PgMediaRepository {
    pool: PgPool,
}

impl PgMediaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MetadataStore for PgMediaRepository {
    #[tracing::instrument(
        skip(self, record),
        fields(
            db.table = "media_records",
            db.operation = "insert",
            media_kind = %record.kind
        )
    )]
    async fn insert(&self, record: NewMediaRecord) -> Result<MediaRecord, StoreError> {
        record
            .check_invariants()
            .map_err(|e| StoreError::Rejected(e.to_string()))?;

        let sql = format!(
            r#"
            INSERT INTO media_records
                (id, kind, asset_ref, title, description,
                 original_size_bytes, derived_size_bytes, duration_seconds)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            RECORD_COLUMNS
        );

        let row = sqlx::query_as::<Postgres, MediaRecord>(&sql)
            .bind(Uuid::new_v4())
            .bind(record.kind)
            .bind(&record.asset_ref)
            .bind(&record.title)
            .bind(&record.description)
            .bind(record.original_size_bytes)
            .bind(record.derived_size_bytes)
            .bind(record.duration_seconds)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!(record_id = %row.id, asset_ref = %row.asset_ref, "Media record inserted");

        Ok(row)
    }

    #[tracing::instrument(skip(self), fields(db.table = "media_records", db.operation = "select"))]
    async fn list_all(&self) -> Result<Vec<MediaRecord>, StoreError> {
        let sql = format!(
            "SELECT {} FROM media_records ORDER BY created_at DESC, id DESC",
            RECORD_COLUMNS
        );

        let rows = sqlx::query_as::<Postgres, MediaRecord>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
