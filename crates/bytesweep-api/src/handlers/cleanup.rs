//! Cleanup handlers
//!
//! Every mutating endpoint requires `confirm: true` and soft-deletes records.
//! A fresh stats snapshot is recorded after each mutation; a failure there is
//! logged and does not fail the request.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
};
use bytesweep_core::models::{
    BulkCleanupRequest, CleanupByIdsRequest, CleanupConfirmRequest, CleanupPreview,
    CleanupResponse, CleanupStats, FileCategory, PreviewQuery, RestoreRequest, RestoreResponse,
    DEFAULT_PREVIEW_LIMIT,
};
use bytesweep_core::AppError;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{HttpAppError, ValidatedJson, ValidatedQuery};
use crate::state::AppState;

fn require_confirmation(confirm: bool) -> Result<(), AppError> {
    if confirm {
        Ok(())
    } else {
        Err(AppError::BadRequest(
            "Confirmation required for cleanup operation".to_string(),
        ))
    }
}

fn require_ids(ids: Option<Vec<Uuid>>) -> Result<Vec<Uuid>, AppError> {
    ids.filter(|ids| !ids.is_empty())
        .ok_or_else(|| AppError::BadRequest("File IDs array is required".to_string()))
}

async fn refresh_snapshot(state: &AppState) {
    if let Err(e) = state.db.stats.record_snapshot().await {
        tracing::warn!(error = %e, "Failed to record stats snapshot after cleanup");
    }
}

/// Soft delete every temporary file
#[utoipa::path(
    post,
    path = "/api/cleanup/temp-files",
    request_body = CleanupConfirmRequest,
    responses(
        (status = 200, description = "Temporary files removed", body = CleanupResponse),
        (status = 400, description = "Confirmation missing")
    ),
    tag = "cleanup"
)]
#[tracing::instrument(skip(state, request))]
pub async fn cleanup_temp_files(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CleanupConfirmRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    require_confirmation(request.confirm)?;

    let totals = state
        .db
        .files
        .delete_by_categories(&[FileCategory::Temp])
        .await?;
    refresh_snapshot(&state).await;

    tracing::info!(files = totals.files, bytes = totals.bytes, "Temporary files cleaned up");

    Ok(Json(CleanupResponse::new(
        "Temporary files cleaned up successfully",
        totals,
        vec![FileCategory::Temp],
    )))
}

async fn cleanup_by_ids(
    state: &AppState,
    request: CleanupByIdsRequest,
    category: FileCategory,
    message: &str,
) -> Result<CleanupResponse, AppError> {
    require_confirmation(request.confirm)?;
    let ids = require_ids(request.file_ids)?;

    let totals = state.db.files.delete_by_ids(&ids).await?;
    refresh_snapshot(state).await;

    tracing::info!(
        category = %category,
        requested = ids.len(),
        files = totals.files,
        bytes = totals.bytes,
        "Files cleaned up by id"
    );

    Ok(CleanupResponse::new(message, totals, vec![category]))
}

/// Soft delete selected large files
#[utoipa::path(
    post,
    path = "/api/cleanup/large-files",
    request_body = CleanupByIdsRequest,
    responses(
        (status = 200, description = "Files removed", body = CleanupResponse),
        (status = 400, description = "Confirmation or file IDs missing")
    ),
    tag = "cleanup"
)]
#[tracing::instrument(skip(state, request))]
pub async fn cleanup_large_files(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CleanupByIdsRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let response = cleanup_by_ids(
        &state,
        request,
        FileCategory::Large,
        "Large files cleaned up successfully",
    )
    .await?;
    Ok(Json(response))
}

/// Soft delete selected duplicate files
#[utoipa::path(
    post,
    path = "/api/cleanup/duplicate-files",
    request_body = CleanupByIdsRequest,
    responses(
        (status = 200, description = "Files removed", body = CleanupResponse),
        (status = 400, description = "Confirmation or file IDs missing")
    ),
    tag = "cleanup"
)]
#[tracing::instrument(skip(state, request))]
pub async fn cleanup_duplicate_files(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CleanupByIdsRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let response = cleanup_by_ids(
        &state,
        request,
        FileCategory::Duplicate,
        "Duplicate files cleaned up successfully",
    )
    .await?;
    Ok(Json(response))
}

/// Soft delete every record in the given categories
#[utoipa::path(
    post,
    path = "/api/cleanup/bulk",
    request_body = BulkCleanupRequest,
    responses(
        (status = 200, description = "Files removed", body = CleanupResponse),
        (status = 400, description = "Confirmation or categories missing")
    ),
    tag = "cleanup"
)]
#[tracing::instrument(skip(state, request))]
pub async fn bulk_cleanup(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<BulkCleanupRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    require_confirmation(request.confirm)?;
    let categories = request
        .categories
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::BadRequest("Categories array is required".to_string()))?;

    let totals = state.db.files.delete_by_categories(&categories).await?;
    refresh_snapshot(&state).await;

    tracing::info!(
        categories = ?categories,
        files = totals.files,
        bytes = totals.bytes,
        "Bulk cleanup completed"
    );

    Ok(Json(CleanupResponse::new(
        "Bulk cleanup completed successfully",
        totals,
        categories,
    )))
}

/// Files a cleanup of one category would remove, biggest first
#[utoipa::path(
    get,
    path = "/api/cleanup/preview/{category}",
    params(
        ("category" = String, Path, description = "temp, large or duplicate"),
        PreviewQuery
    ),
    responses(
        (status = 200, description = "Cleanup preview", body = CleanupPreview),
        (status = 400, description = "Invalid category")
    ),
    tag = "cleanup"
)]
#[tracing::instrument(skip(state))]
pub async fn cleanup_preview(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
    ValidatedQuery(query): ValidatedQuery<PreviewQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let category = category
        .parse::<FileCategory>()
        .ok()
        .filter(FileCategory::is_cleanable)
        .ok_or_else(|| AppError::BadRequest("Invalid category".to_string()))?;
    let limit = query.limit.unwrap_or(DEFAULT_PREVIEW_LIMIT).max(1);

    let files = state
        .db
        .files
        .preview_category(category, i64::from(limit))
        .await?;
    let total_size = files.iter().map(|f| f.size).sum();

    Ok(Json(CleanupPreview {
        total_files: files.len() as i64,
        total_size,
        files,
        category,
    }))
}

/// Clear the deleted flag of the given records
#[utoipa::path(
    post,
    path = "/api/cleanup/restore",
    request_body = RestoreRequest,
    responses(
        (status = 200, description = "Files restored", body = RestoreResponse),
        (status = 400, description = "File IDs missing")
    ),
    tag = "cleanup"
)]
#[tracing::instrument(skip(state, request))]
pub async fn restore_files(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<RestoreRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let ids = require_ids(request.file_ids)?;

    let restored = state.db.files.restore(&ids).await?;
    refresh_snapshot(&state).await;

    Ok(Json(RestoreResponse {
        message: "Files restored successfully".to_string(),
        files_restored: restored,
    }))
}

/// Reclaimable space per cleanable category
#[utoipa::path(
    get,
    path = "/api/cleanup/stats",
    responses(
        (status = 200, description = "Cleanup statistics", body = CleanupStats)
    ),
    tag = "cleanup"
)]
#[tracing::instrument(skip(state))]
pub async fn cleanup_stats(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let stats = state.db.stats.cleanup_stats().await?;
    Ok(Json(stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmation_gate() {
        assert!(require_confirmation(true).is_ok());
        let err = require_confirmation(false).unwrap_err();
        assert!(matches!(
            err,
            AppError::BadRequest(ref msg) if msg == "Confirmation required for cleanup operation"
        ));
    }

    #[test]
    fn test_ids_required() {
        assert!(require_ids(None).is_err());
        assert!(require_ids(Some(vec![])).is_err());
        let id = Uuid::new_v4();
        assert_eq!(require_ids(Some(vec![id])).unwrap(), vec![id]);
    }
}
