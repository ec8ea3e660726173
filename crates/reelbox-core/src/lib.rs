//! Reelbox Core Library
//!
//! Domain models, error types, configuration and the delivery URL resolver shared by the
//! storage, metadata and API crates.

pub mod config;
pub mod delivery;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod transform;

pub use config::{BaseConfig, Config, MetadataBackend, ServiceConfig};
pub use delivery::{DeliveryError, DeliveryResolver, DeliveryUrlBuilder, DeliveryUrls, SocialPreset};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
pub use transform::{Crop, Gravity, Quality, TargetFormat, TransformOptions};
