//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use reelbox_core::{Config, MetadataBackend};

/// Validate critical configuration values
///
/// Hard errors come from [`Config::validate`]; this adds the startup warnings that should not
/// stop the process.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    let env_var = std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .ok();
    if config.is_production() && env_var.is_none() {
        tracing::warn!(
            "Production mode detected but ENVIRONMENT/APP_ENV not set - error details may leak"
        );
    }

    if config.is_production() && config.metadata_backend() == MetadataBackend::Memory {
        tracing::warn!("In-memory metadata store in production: records are lost on restart");
    }

    if !config.compensating_delete_enabled() {
        tracing::warn!(
            "COMPENSATING_DELETE_ENABLED=false: assets whose record fails to commit stay orphaned"
        );
    }

    Ok(())
}
