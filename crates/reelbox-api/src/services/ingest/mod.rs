//! Media ingestion: the coordinator plus its request, limit and error types.

mod service;
mod types;

pub use service::IngestionCoordinator;
pub use types::{IngestError, IngestLimits, IngestRequest};
