use bytesweep_core::{
    models::{
        CategoryBreakdown, CleanupStats, CreateSystemStatsRequest, HealthSummary, SizeBucket,
        SizeBucketLabel, SystemStats, OVERFLOW_BUCKET, SIZE_BUCKET_BOUNDARIES,
    },
    AppError,
};
use chrono::Utc;
use sqlx::{FromRow, PgPool, Postgres};
use uuid::Uuid;

const STATS_COLUMNS: &str = "id, total_files, total_size, temp_files, temp_size, large_files, \
     large_size, duplicate_files, duplicate_size, last_updated, created_at, updated_at";

/// Label value the bucket expression yields for the overflow bucket
const OVERFLOW_MARKER: i64 = -1;

/// SQL expression mapping `size` to the lower boundary of its bucket.
fn bucket_case_expression() -> String {
    let mut expr = String::from("CASE");
    for pair in SIZE_BUCKET_BOUNDARIES.windows(2) {
        expr.push_str(&format!(
            " WHEN size >= {} AND size < {} THEN {}",
            pair[0], pair[1], pair[0]
        ));
    }
    expr.push_str(&format!(" ELSE {} END", OVERFLOW_MARKER));
    expr
}

/// Per-category aggregate over the non-deleted records
#[derive(Debug, Default, FromRow)]
struct FileAggregate {
    total_files: i64,
    total_size: i64,
    temp_files: i64,
    temp_size: i64,
    large_files: i64,
    large_size: i64,
    duplicate_files: i64,
    duplicate_size: i64,
}

const AGGREGATE_QUERY: &str = r#"
    SELECT
        COUNT(*) AS total_files,
        COALESCE(SUM(size), 0)::BIGINT AS total_size,
        COUNT(*) FILTER (WHERE category = 'temp') AS temp_files,
        COALESCE(SUM(size) FILTER (WHERE category = 'temp'), 0)::BIGINT AS temp_size,
        COUNT(*) FILTER (WHERE category = 'large') AS large_files,
        COALESCE(SUM(size) FILTER (WHERE category = 'large'), 0)::BIGINT AS large_size,
        COUNT(*) FILTER (WHERE category = 'duplicate') AS duplicate_files,
        COALESCE(SUM(size) FILTER (WHERE category = 'duplicate'), 0)::BIGINT AS duplicate_size
    FROM files
    WHERE is_deleted = FALSE
"#;

impl From<FileAggregate> for CreateSystemStatsRequest {
    fn from(agg: FileAggregate) -> Self {
        CreateSystemStatsRequest {
            total_files: agg.total_files,
            total_size: agg.total_size,
            temp_files: agg.temp_files,
            temp_size: agg.temp_size,
            large_files: agg.large_files,
            large_size: agg.large_size,
            duplicate_files: agg.duplicate_files,
            duplicate_size: agg.duplicate_size,
        }
    }
}

/// Repository for system stat snapshots and the aggregates they are built from
#[derive(Clone)]
pub struct StatsRepository {
    pool: PgPool,
}

impl StatsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Newest snapshot, if any
    #[tracing::instrument(skip(self), fields(db.table = "system_stats", db.operation = "select"))]
    pub async fn latest(&self) -> Result<Option<SystemStats>, AppError> {
        let stats = sqlx::query_as::<Postgres, SystemStats>(&format!(
            "SELECT {} FROM system_stats ORDER BY created_at DESC LIMIT 1",
            STATS_COLUMNS
        ))
        .fetch_optional(&self.pool)
        .await?;

        Ok(stats)
    }

    /// Append a snapshot
    #[tracing::instrument(skip(self, values), fields(db.table = "system_stats", db.operation = "insert"))]
    pub async fn insert(&self, values: &CreateSystemStatsRequest) -> Result<SystemStats, AppError> {
        let stats = sqlx::query_as::<Postgres, SystemStats>(&format!(
            r#"
            INSERT INTO system_stats (id, total_files, total_size, temp_files, temp_size,
                                      large_files, large_size, duplicate_files, duplicate_size,
                                      last_updated)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            STATS_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(values.total_files)
        .bind(values.total_size)
        .bind(values.temp_files)
        .bind(values.temp_size)
        .bind(values.large_files)
        .bind(values.large_size)
        .bind(values.duplicate_files)
        .bind(values.duplicate_size)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }

    async fn aggregate(&self) -> Result<FileAggregate, AppError> {
        let agg = sqlx::query_as::<Postgres, FileAggregate>(AGGREGATE_QUERY)
            .fetch_one(&self.pool)
            .await?;
        Ok(agg)
    }

    /// Compute snapshot values from the current file records
    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "aggregate"))]
    pub async fn compute_snapshot(&self) -> Result<CreateSystemStatsRequest, AppError> {
        Ok(self.aggregate().await?.into())
    }

    /// Compute a snapshot from the file records and persist it
    pub async fn record_snapshot(&self) -> Result<SystemStats, AppError> {
        let values = self.compute_snapshot().await?;
        self.insert(&values).await
    }

    /// Newest snapshot, recording one first if none exists
    pub async fn latest_or_record(&self) -> Result<SystemStats, AppError> {
        match self.latest().await? {
            Some(stats) => Ok(stats),
            None => self.record_snapshot().await,
        }
    }

    /// Count and size per category, largest total first
    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "aggregate"))]
    pub async fn files_by_category(&self) -> Result<Vec<CategoryBreakdown>, AppError> {
        let rows = sqlx::query_as::<Postgres, CategoryBreakdown>(
            r#"
            SELECT category, COUNT(*) AS count, COALESCE(SUM(size), 0)::BIGINT AS total_size
            FROM files
            WHERE is_deleted = FALSE
            GROUP BY category
            ORDER BY total_size DESC, category ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Size histogram; empty buckets are omitted and the overflow bucket comes last
    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "aggregate"))]
    pub async fn size_distribution(&self) -> Result<Vec<SizeBucket>, AppError> {
        let sql = format!(
            r#"
            SELECT bucket, COUNT(*) AS count, COALESCE(SUM(size), 0)::BIGINT AS total_size
            FROM (SELECT size, {} AS bucket FROM files WHERE is_deleted = FALSE) sized
            GROUP BY bucket
            ORDER BY (bucket = {}) ASC, bucket ASC
            "#,
            bucket_case_expression(),
            OVERFLOW_MARKER
        );

        let rows = sqlx::query_as::<Postgres, (i64, i64, i64)>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(bucket, count, total_size)| SizeBucket {
                bucket: if bucket == OVERFLOW_MARKER {
                    SizeBucketLabel::Overflow(OVERFLOW_BUCKET.to_string())
                } else {
                    SizeBucketLabel::Lower(bucket)
                },
                count,
                total_size,
            })
            .collect())
    }

    /// Reclaimable counts and sizes per cleanable category
    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "aggregate"))]
    pub async fn cleanup_stats(&self) -> Result<CleanupStats, AppError> {
        let agg = self.aggregate().await?;
        Ok(CleanupStats {
            temp_files: agg.temp_files,
            temp_size: agg.temp_size,
            large_files: agg.large_files,
            large_size: agg.large_size,
            duplicate_files: agg.duplicate_files,
            duplicate_size: agg.duplicate_size,
            total_cleanup_size: agg.temp_size + agg.large_size + agg.duplicate_size,
        })
    }

    /// Live health summary of the file records
    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "aggregate"))]
    pub async fn health(&self) -> Result<HealthSummary, AppError> {
        let agg = self.aggregate().await?;
        Ok(HealthSummary {
            total_files: agg.total_files,
            total_size: agg.total_size,
            temp_files: agg.temp_files,
            large_files: agg.large_files,
            duplicate_files: agg.duplicate_files,
            last_updated: Utc::now(),
        })
    }

    #[tracing::instrument(skip(self), fields(db.table = "system_stats", db.operation = "delete"))]
    pub async fn purge_all(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM system_stats")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_case_expression() {
        let expr = bucket_case_expression();
        assert!(expr.starts_with("CASE WHEN size >= 0 AND size < 1024 THEN 0"));
        assert!(expr.contains("WHEN size >= 104857600 AND size < 1073741824 THEN 104857600"));
        assert!(expr.ends_with("ELSE -1 END"));
        assert_eq!(expr.matches("WHEN").count(), SIZE_BUCKET_BOUNDARIES.len() - 1);
    }

    #[test]
    fn test_aggregate_into_snapshot() {
        let values: CreateSystemStatsRequest = FileAggregate {
            total_files: 4,
            total_size: 400,
            temp_files: 1,
            temp_size: 10,
            ..Default::default()
        }
        .into();
        assert_eq!(values.total_files, 4);
        assert_eq!(values.temp_size, 10);
        assert_eq!(values.large_files, 0);
    }
}
