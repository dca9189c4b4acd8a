//! Builds the application state from configuration and a database pool

use crate::state::{AppState, CompressionState, DbState};
use anyhow::{Context, Result};
use bytesweep_core::Config;
use bytesweep_infra::Compressor;
use sqlx::PgPool;
use std::sync::Arc;

pub async fn initialize_services(config: &Config, pool: PgPool) -> Result<Arc<AppState>> {
    let archive = config.archive();
    let compressor = Compressor::new(archive)
        .await
        .with_context(|| {
            format!(
                "Failed to prepare scratch directory {}",
                archive.scratch_dir.display()
            )
        })?;

    tracing::info!(
        max_upload_files = archive.max_upload_files,
        seven_zip_path = %archive.seven_zip_path,
        rar_path = %archive.rar_path,
        "Archive builder initialized"
    );

    Ok(Arc::new(AppState {
        db: DbState::new(pool),
        compression: CompressionState {
            compressor: Arc::new(compressor),
            max_files: archive.max_upload_files,
        },
        config: config.clone(),
    }))
}
