//! Reelbox API Library
//!
//! HTTP handlers, the access gate, the ingestion coordinator and application setup.

mod api_doc;
mod handlers;
mod telemetry;
mod utils;

pub mod auth;
pub mod error;
pub mod middleware;
pub mod services;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use services::ingest::{IngestError, IngestLimits, IngestRequest, IngestionCoordinator};
pub use state::AppState;
