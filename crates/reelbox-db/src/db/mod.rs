//! Database repositories for data access layer
//
// Media record repositories and the store trait
pub mod media;

pub use media::{
    create_metadata_store, InMemoryMediaRepository, MetadataStore, PgMediaRepository, StoreError,
};
