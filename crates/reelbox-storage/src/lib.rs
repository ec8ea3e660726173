//! Reelbox Storage Library
//!
//! Contract to the external object/transform service ([`StorageClient`]) and its
//! implementations: the remote service client and a filesystem client for local runs.
//!
//! # Asset key format
//!
//! Uploads are grouped per kind below a configurable root folder:
//! `{root}/video-upload/...` and `{root}/image-upload/...`. Key generation is centralized
//! in the `keys` module so both backends stay consistent.

#[cfg(feature = "storage-cloud")]
pub mod cloud;
pub mod credentials;
pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod traits;

#[cfg(feature = "storage-cloud")]
pub use cloud::CloudStorageClient;
pub use credentials::StorageCredentials;
pub use factory::create_storage_client;
#[cfg(feature = "storage-local")]
pub use local::LocalStorageClient;
pub use reelbox_core::StorageBackend;
pub use traits::{StorageClient, StorageError, StorageResult, StoredAsset};
