//! Application setup and initialization
//!
//! Everything `main` needs to go from a loaded [`Config`] to a served router. Collaborators
//! are built once here and handed to [`AppState`].

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use reelbox_core::Config;
use reelbox_db::create_metadata_store;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.log_format(), config.environment())
        .context("Failed to initialize telemetry")?;

    tracing::info!("Configuration loaded and validated successfully");

    let pool = database::setup_database(&config).await?;
    let store = create_metadata_store(&config, pool).context("Failed to create metadata store")?;
    let storage = storage::setup_storage(&config).await?;

    let state = Arc::new(AppState::new(
        config.clone(),
        storage,
        store,
        CancellationToken::new(),
    ));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
