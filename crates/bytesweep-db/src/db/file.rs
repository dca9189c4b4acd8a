use bytesweep_core::{
    models::{
        CreateFileRequest, FileCategory, FileListFilter, FileRecord, FileRow, FileSummary,
        Pagination, RemovalTotals, UpdateFileRequest,
    },
    AppError,
};
use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

const FILE_COLUMNS: &str = "id, name, path, size, file_type, category, last_modified, is_deleted, \
     extension, mime_type, permissions, owner, created_at, updated_at";

const SUMMARY_COLUMNS: &str = "id, name, path, size, file_type, last_modified, category";

/// Escape LIKE wildcards so the search term matches literally.
pub(crate) fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn push_list_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &FileListFilter) {
    qb.push(" WHERE is_deleted = FALSE");

    if let Some(category) = filter.category {
        qb.push(" AND category = ");
        qb.push_bind(category);
    }

    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", escape_like(search));
        qb.push(" AND (name ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR path ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }
}

fn map_write_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::BadRequest("A file with this path already exists".to_string())
        }
        sqlx::Error::Database(db_err) if db_err.is_check_violation() => {
            AppError::BadRequest(format!("Invalid file record: {}", db_err.message()))
        }
        _ => AppError::Database(err),
    }
}

/// Repository for file metadata records
#[derive(Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List non-deleted records with filtering, sorting and pagination.
    /// Returns the page and the total number of matching records.
    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "select"))]
    pub async fn list_files(
        &self,
        filter: &FileListFilter,
        pagination: Pagination,
    ) -> Result<(Vec<FileRecord>, i64), AppError> {
        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM files");
        push_list_filters(&mut count_qb, filter);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM files", FILE_COLUMNS));
        push_list_filters(&mut qb, filter);
        qb.push(format!(
            " ORDER BY {} {}, id ASC",
            filter.sort_by.column(),
            filter.sort_order.as_sql()
        ));
        qb.push(" LIMIT ");
        qb.push_bind(pagination.limit as i64);
        qb.push(" OFFSET ");
        qb.push_bind(pagination.offset());

        let rows: Vec<FileRow> = qb.build_query_as().fetch_all(&self.pool).await?;

        Ok((rows.into_iter().map(FileRecord::from).collect(), total))
    }

    /// Get a record by ID, deleted or not
    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "select", db.record_id = %id))]
    pub async fn get_file(&self, id: Uuid) -> Result<Option<FileRecord>, AppError> {
        let row = sqlx::query_as::<Postgres, FileRow>(&format!(
            "SELECT {} FROM files WHERE id = $1",
            FILE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(FileRecord::from))
    }

    /// Insert a new record. A duplicate path is reported as a bad request.
    #[tracing::instrument(skip(self, request), fields(db.table = "files", db.operation = "insert"))]
    pub async fn create_file(&self, request: &CreateFileRequest) -> Result<FileRecord, AppError> {
        let metadata = request.metadata.clone().unwrap_or_default();

        let row = sqlx::query_as::<Postgres, FileRow>(&format!(
            r#"
            INSERT INTO files (id, name, path, size, file_type, category, last_modified,
                               extension, mime_type, permissions, owner)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            FILE_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&request.name)
        .bind(&request.path)
        .bind(request.size)
        .bind(&request.file_type)
        .bind(request.category.unwrap_or_default())
        .bind(request.last_modified.unwrap_or_else(Utc::now))
        .bind(metadata.extension)
        .bind(metadata.mime_type)
        .bind(metadata.permissions)
        .bind(metadata.owner)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(row.into())
    }

    /// Apply a partial update. A supplied metadata object replaces the stored one.
    #[tracing::instrument(skip(self, request), fields(db.table = "files", db.operation = "update", db.record_id = %id))]
    pub async fn update_file(
        &self,
        id: Uuid,
        request: &UpdateFileRequest,
    ) -> Result<Option<FileRecord>, AppError> {
        let replace_metadata = request.metadata.is_some();
        let metadata = request.metadata.clone().unwrap_or_default();

        let row = sqlx::query_as::<Postgres, FileRow>(&format!(
            r#"
            UPDATE files SET
                name = COALESCE($2, name),
                path = COALESCE($3, path),
                size = COALESCE($4, size),
                file_type = COALESCE($5, file_type),
                category = COALESCE($6, category),
                last_modified = COALESCE($7, last_modified),
                is_deleted = COALESCE($8, is_deleted),
                extension = CASE WHEN $9 THEN $10 ELSE extension END,
                mime_type = CASE WHEN $9 THEN $11 ELSE mime_type END,
                permissions = CASE WHEN $9 THEN $12 ELSE permissions END,
                owner = CASE WHEN $9 THEN $13 ELSE owner END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            FILE_COLUMNS
        ))
        .bind(id)
        .bind(request.name.as_deref())
        .bind(request.path.as_deref())
        .bind(request.size)
        .bind(request.file_type.as_deref())
        .bind(request.category)
        .bind(request.last_modified)
        .bind(request.is_deleted)
        .bind(replace_metadata)
        .bind(metadata.extension)
        .bind(metadata.mime_type)
        .bind(metadata.permissions)
        .bind(metadata.owner)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(row.map(FileRecord::from))
    }

    /// Soft delete a record. Returns false if no record has this ID.
    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "update", db.record_id = %id))]
    pub async fn soft_delete_file(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE files SET is_deleted = TRUE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Non-deleted records of one category, newest first
    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "select"))]
    pub async fn list_by_category(
        &self,
        category: FileCategory,
        pagination: Pagination,
    ) -> Result<(Vec<FileRecord>, i64), AppError> {
        let total = sqlx::query_scalar::<Postgres, i64>(
            "SELECT COUNT(*) FROM files WHERE category = $1 AND is_deleted = FALSE",
        )
        .bind(category)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<Postgres, FileRow>(&format!(
            "SELECT {} FROM files WHERE category = $1 AND is_deleted = FALSE \
             ORDER BY last_modified DESC, id ASC LIMIT $2 OFFSET $3",
            FILE_COLUMNS
        ))
        .bind(category)
        .bind(pagination.limit as i64)
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((rows.into_iter().map(FileRecord::from).collect(), total))
    }

    /// Non-deleted records of at least `min_size` bytes, biggest first
    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "select"))]
    pub async fn list_larger_than(
        &self,
        min_size: i64,
        pagination: Pagination,
    ) -> Result<(Vec<FileRecord>, i64), AppError> {
        let total = sqlx::query_scalar::<Postgres, i64>(
            "SELECT COUNT(*) FROM files WHERE size >= $1 AND is_deleted = FALSE",
        )
        .bind(min_size)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<Postgres, FileRow>(&format!(
            "SELECT {} FROM files WHERE size >= $1 AND is_deleted = FALSE \
             ORDER BY size DESC, id ASC LIMIT $2 OFFSET $3",
            FILE_COLUMNS
        ))
        .bind(min_size)
        .bind(pagination.limit as i64)
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((rows.into_iter().map(FileRecord::from).collect(), total))
    }

    /// Soft delete every non-deleted record in the given categories.
    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "update"))]
    pub async fn delete_by_categories(
        &self,
        categories: &[FileCategory],
    ) -> Result<RemovalTotals, AppError> {
        let names: Vec<String> = categories.iter().map(|c| c.as_str().to_string()).collect();

        let (files, bytes) = sqlx::query_as::<Postgres, (i64, i64)>(
            r#"
            WITH removed AS (
                UPDATE files SET is_deleted = TRUE, updated_at = NOW()
                WHERE category::text = ANY($1) AND is_deleted = FALSE
                RETURNING size
            )
            SELECT COUNT(*), COALESCE(SUM(size), 0)::BIGINT FROM removed
            "#,
        )
        .bind(&names)
        .fetch_one(&self.pool)
        .await?;

        Ok(RemovalTotals { files, bytes })
    }

    /// Soft delete the given records. Records that were already deleted do not
    /// count towards the totals.
    #[tracing::instrument(skip(self, ids), fields(db.table = "files", db.operation = "update", count = ids.len()))]
    pub async fn delete_by_ids(&self, ids: &[Uuid]) -> Result<RemovalTotals, AppError> {
        let (files, bytes) = sqlx::query_as::<Postgres, (i64, i64)>(
            r#"
            WITH removed AS (
                UPDATE files SET is_deleted = TRUE, updated_at = NOW()
                WHERE id = ANY($1) AND is_deleted = FALSE
                RETURNING size
            )
            SELECT COUNT(*), COALESCE(SUM(size), 0)::BIGINT FROM removed
            "#,
        )
        .bind(ids)
        .fetch_one(&self.pool)
        .await?;

        Ok(RemovalTotals { files, bytes })
    }

    /// Clear the deleted flag. Returns the number of records restored.
    #[tracing::instrument(skip(self, ids), fields(db.table = "files", db.operation = "update", count = ids.len()))]
    pub async fn restore(&self, ids: &[Uuid]) -> Result<i64, AppError> {
        let result = sqlx::query(
            "UPDATE files SET is_deleted = FALSE, updated_at = NOW() \
             WHERE id = ANY($1) AND is_deleted = TRUE",
        )
        .bind(ids)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() as i64)
    }

    /// Biggest non-deleted records of one category
    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "select"))]
    pub async fn preview_category(
        &self,
        category: FileCategory,
        limit: i64,
    ) -> Result<Vec<FileSummary>, AppError> {
        let files = sqlx::query_as::<Postgres, FileSummary>(&format!(
            "SELECT {} FROM files WHERE category = $1 AND is_deleted = FALSE \
             ORDER BY size DESC, id ASC LIMIT $2",
            SUMMARY_COLUMNS
        ))
        .bind(category)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(files)
    }

    /// Most recently modified non-deleted records
    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "select"))]
    pub async fn recent_files(&self, limit: i64) -> Result<Vec<FileSummary>, AppError> {
        let files = sqlx::query_as::<Postgres, FileSummary>(&format!(
            "SELECT {} FROM files WHERE is_deleted = FALSE \
             ORDER BY last_modified DESC, id ASC LIMIT $1",
            SUMMARY_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(files)
    }

    /// Remove every record permanently (used when reseeding)
    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "delete"))]
    pub async fn purge_all(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM files")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
