//! Reelbox metadata store
//!
//! Keyed record store for media records. [`MetadataStore`] is the seam the ingestion and
//! listing paths depend on; Postgres backs production and an in-memory store backs tests
//! and local runs.

pub mod db;

pub use db::{
    create_metadata_store, InMemoryMediaRepository, MetadataStore, PgMediaRepository, StoreError,
};
