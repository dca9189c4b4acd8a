//! Application setup and initialization
//!
//! Everything `main` needs to go from a `Config` to a serving router, split so
//! tests can assemble the same router around their own pool.

pub mod database;
pub mod routes;
pub mod server;
pub mod services;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use bytesweep_core::Config;
use bytesweep_infra::telemetry::DEFAULT_LOG_FILTER;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    validation::validate_config(&config).context("Configuration validation failed")?;

    bytesweep_infra::init_telemetry(DEFAULT_LOG_FILTER, config.is_production())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = config.environment(),
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;

    let state = services::initialize_services(&config, pool).await?;

    let router = routes::setup_routes(&config, state.clone()).await?;

    Ok((state, router))
}
