use bytesweep_core::{
    models::{DiskInfo, UpsertDiskRequest},
    AppError,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

const DISK_COLUMNS: &str = "id, drive, total_space, used_space, free_space, usage, last_updated, \
     created_at, updated_at";

/// Repository for disk capacity records
#[derive(Clone)]
pub struct DiskRepository {
    pool: PgPool,
}

impl DiskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All disks ordered by drive name
    #[tracing::instrument(skip(self), fields(db.table = "disk_info", db.operation = "select"))]
    pub async fn list_disks(&self) -> Result<Vec<DiskInfo>, AppError> {
        let disks = sqlx::query_as::<Postgres, DiskInfo>(&format!(
            "SELECT {} FROM disk_info ORDER BY drive ASC",
            DISK_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(disks)
    }

    /// Insert or replace the record for `request.drive`
    #[tracing::instrument(skip(self, request), fields(db.table = "disk_info", db.operation = "upsert", drive = %request.drive))]
    pub async fn upsert_disk(&self, request: &UpsertDiskRequest) -> Result<DiskInfo, AppError> {
        let disk = sqlx::query_as::<Postgres, DiskInfo>(&format!(
            r#"
            INSERT INTO disk_info (id, drive, total_space, used_space, free_space, usage, last_updated)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            ON CONFLICT (drive) DO UPDATE SET
                total_space = EXCLUDED.total_space,
                used_space = EXCLUDED.used_space,
                free_space = EXCLUDED.free_space,
                usage = EXCLUDED.usage,
                last_updated = NOW(),
                updated_at = NOW()
            RETURNING {}
            "#,
            DISK_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&request.drive)
        .bind(request.total_space)
        .bind(request.used_space)
        .bind(request.free_space)
        .bind(request.usage)
        .fetch_one(&self.pool)
        .await?;

        Ok(disk)
    }

    #[tracing::instrument(skip(self), fields(db.table = "disk_info", db.operation = "delete"))]
    pub async fn purge_all(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM disk_info")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
