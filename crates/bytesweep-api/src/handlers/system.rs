//! System handlers: stat snapshots, disk capacity and file aggregations

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use bytesweep_core::models::{
    CategoryBreakdown, CreateSystemStatsRequest, DiskInfo, FileSummary, HealthSummary,
    RecentFilesQuery, SizeBucket, SystemStats, UpsertDiskRequest, DEFAULT_RECENT_LIMIT,
    MAX_PAGE_SIZE,
};
use std::sync::Arc;
use validator::Validate;

use crate::error::{HttpAppError, ValidatedJson, ValidatedQuery};
use crate::state::AppState;

/// Current stats snapshot, computed and recorded if none exists yet
#[utoipa::path(
    get,
    path = "/api/system/stats",
    responses(
        (status = 200, description = "Newest stats snapshot", body = SystemStats)
    ),
    tag = "system"
)]
#[tracing::instrument(skip(state))]
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let stats = state.db.stats.latest_or_record().await?;
    Ok(Json(stats))
}

/// Record a caller-supplied stats snapshot
#[utoipa::path(
    post,
    path = "/api/system/stats",
    request_body = CreateSystemStatsRequest,
    responses(
        (status = 201, description = "Snapshot recorded", body = SystemStats),
        (status = 400, description = "Validation failed")
    ),
    tag = "system"
)]
#[tracing::instrument(skip(state, request))]
pub async fn create_stats(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateSystemStatsRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate()?;
    let stats = state.db.stats.insert(&request).await?;
    Ok((StatusCode::CREATED, Json(stats)))
}

/// All disks ordered by drive
#[utoipa::path(
    get,
    path = "/api/system/disks",
    responses(
        (status = 200, description = "Disk capacity records", body = Vec<DiskInfo>)
    ),
    tag = "system"
)]
#[tracing::instrument(skip(state))]
pub async fn list_disks(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let disks = state.db.disks.list_disks().await?;
    Ok(Json(disks))
}

/// Insert or replace the record of one drive
#[utoipa::path(
    post,
    path = "/api/system/disks",
    request_body = UpsertDiskRequest,
    responses(
        (status = 200, description = "Disk record", body = DiskInfo),
        (status = 400, description = "Validation failed")
    ),
    tag = "system"
)]
#[tracing::instrument(skip(state, request), fields(drive = %request.drive))]
pub async fn upsert_disk(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<UpsertDiskRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate()?;
    let disk = state.db.disks.upsert_disk(&request).await?;
    Ok(Json(disk))
}

/// Count and size per category, largest first
#[utoipa::path(
    get,
    path = "/api/system/files-by-category",
    responses(
        (status = 200, description = "Per-category totals", body = Vec<CategoryBreakdown>)
    ),
    tag = "system"
)]
#[tracing::instrument(skip(state))]
pub async fn files_by_category(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let breakdown = state.db.stats.files_by_category().await?;
    Ok(Json(breakdown))
}

/// Histogram of record sizes
#[utoipa::path(
    get,
    path = "/api/system/file-size-distribution",
    responses(
        (status = 200, description = "Non-empty size buckets", body = Vec<SizeBucket>)
    ),
    tag = "system"
)]
#[tracing::instrument(skip(state))]
pub async fn file_size_distribution(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let buckets = state.db.stats.size_distribution().await?;
    Ok(Json(buckets))
}

/// Most recently modified records
#[utoipa::path(
    get,
    path = "/api/system/recent-files",
    params(RecentFilesQuery),
    responses(
        (status = 200, description = "Recent file records", body = Vec<FileSummary>)
    ),
    tag = "system"
)]
#[tracing::instrument(skip(state))]
pub async fn recent_files(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(query): ValidatedQuery<RecentFilesQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_RECENT_LIMIT)
        .clamp(1, MAX_PAGE_SIZE);
    let files = state.db.files.recent_files(i64::from(limit)).await?;
    Ok(Json(files))
}

/// Live summary of the file records
#[utoipa::path(
    get,
    path = "/api/system/health",
    responses(
        (status = 200, description = "File record summary", body = HealthSummary)
    ),
    tag = "system"
)]
#[tracing::instrument(skip(state))]
pub async fn system_health(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let summary = state.db.stats.health().await?;
    Ok(Json(summary))
}
