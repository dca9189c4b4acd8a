//! Application state and sub-states.
//!
//! Handlers receive `State<Arc<AppState>>` and reach into the sub-state they
//! need: `db` for the metadata API, `compression` for `/compress`.

use bytesweep_core::Config;
use bytesweep_db::{DiskRepository, FileRepository, StatsRepository};
use bytesweep_infra::Compressor;
use sqlx::PgPool;
use std::sync::Arc;

/// Database pool and the repositories built on it
#[derive(Clone)]
pub struct DbState {
    pub pool: PgPool,
    pub files: FileRepository,
    pub stats: StatsRepository,
    pub disks: DiskRepository,
}

impl DbState {
    pub fn new(pool: PgPool) -> Self {
        Self {
            files: FileRepository::new(pool.clone()),
            stats: StatsRepository::new(pool.clone()),
            disks: DiskRepository::new(pool.clone()),
            pool,
        }
    }
}

/// Archive builder and the limits applied to `/compress` uploads
#[derive(Clone)]
pub struct CompressionState {
    pub compressor: Arc<Compressor>,
    pub max_files: usize,
}

pub struct AppState {
    pub db: DbState,
    pub compression: CompressionState,
    pub config: Config,
}
