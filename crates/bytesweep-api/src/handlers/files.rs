//! File record handlers
//!
//! CRUD over the file-metadata records plus the category and size listings.
//! Deletion is always a soft delete.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use bytesweep_core::models::{
    CreateFileRequest, FileCategory, FileListResponse, FileRecord, ListFilesQuery,
    MessageResponse, PageQuery, Pagination, UpdateFileRequest,
};
use bytesweep_core::AppError;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{HttpAppError, ValidatedJson, ValidatedQuery};
use crate::state::AppState;

fn not_found() -> HttpAppError {
    AppError::NotFound("File not found".to_string()).into()
}

/// List file records with filtering, sorting and pagination
#[utoipa::path(
    get,
    path = "/api/files",
    params(ListFilesQuery),
    responses(
        (status = 200, description = "Page of file records", body = FileListResponse),
        (status = 400, description = "Invalid query parameters"),
        (status = 500, description = "Internal server error")
    ),
    tag = "files"
)]
#[tracing::instrument(skip(state))]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(query): ValidatedQuery<ListFilesQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let filter = query.filter().map_err(AppError::BadRequest)?;
    let pagination = query.pagination();

    let (files, total) = state.db.files.list_files(&filter, pagination).await?;

    Ok(Json(FileListResponse::new(files, total, pagination)))
}

/// Get a file record by ID
#[utoipa::path(
    get,
    path = "/api/files/{id}",
    params(("id" = Uuid, Path, description = "File ID")),
    responses(
        (status = 200, description = "File record", body = FileRecord),
        (status = 404, description = "File not found")
    ),
    tag = "files"
)]
#[tracing::instrument(skip(state))]
pub async fn get_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let file = state.db.files.get_file(id).await?.ok_or_else(not_found)?;
    Ok(Json(file))
}

/// Create a file record
#[utoipa::path(
    post,
    path = "/api/files",
    request_body = CreateFileRequest,
    responses(
        (status = 201, description = "File record created", body = FileRecord),
        (status = 400, description = "Validation failed or path already exists")
    ),
    tag = "files"
)]
#[tracing::instrument(skip(state, request))]
pub async fn create_file(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateFileRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let request = request.normalized();
    request.validate()?;

    let file = state.db.files.create_file(&request).await?;
    tracing::info!(file_id = %file.id, path = %file.path, "File record created");

    Ok((StatusCode::CREATED, Json(file)))
}

/// Update a file record
#[utoipa::path(
    put,
    path = "/api/files/{id}",
    params(("id" = Uuid, Path, description = "File ID")),
    request_body = UpdateFileRequest,
    responses(
        (status = 200, description = "Updated file record", body = FileRecord),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "File not found")
    ),
    tag = "files"
)]
#[tracing::instrument(skip(state, request))]
pub async fn update_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateFileRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let request = request.normalized();
    request.validate()?;

    let file = state
        .db
        .files
        .update_file(id, &request)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(file))
}

/// Soft delete a file record
#[utoipa::path(
    delete,
    path = "/api/files/{id}",
    params(("id" = Uuid, Path, description = "File ID")),
    responses(
        (status = 200, description = "File deleted", body = MessageResponse),
        (status = 404, description = "File not found")
    ),
    tag = "files"
)]
#[tracing::instrument(skip(state))]
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    if !state.db.files.soft_delete_file(id).await? {
        return Err(not_found());
    }

    Ok(Json(MessageResponse {
        message: "File deleted successfully".to_string(),
    }))
}

/// List the records of one category, most recently modified first
#[utoipa::path(
    get,
    path = "/api/files/category/{category}",
    params(
        ("category" = String, Path, description = "temp, large, duplicate, system or user"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Page of file records", body = FileListResponse),
        (status = 400, description = "Invalid category")
    ),
    tag = "files"
)]
#[tracing::instrument(skip(state))]
pub async fn files_by_category(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
    ValidatedQuery(query): ValidatedQuery<PageQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let category: FileCategory = category.parse().map_err(AppError::BadRequest)?;
    let pagination = Pagination::from(&query);

    let (files, total) = state.db.files.list_by_category(category, pagination).await?;

    Ok(Json(FileListResponse::new(files, total, pagination)))
}

/// List the records of at least `minSize` bytes, biggest first
#[utoipa::path(
    get,
    path = "/api/files/large/{minSize}",
    params(
        ("minSize" = i64, Path, description = "Minimum size in bytes"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Page of file records", body = FileListResponse),
        (status = 400, description = "Invalid size")
    ),
    tag = "files"
)]
#[tracing::instrument(skip(state))]
pub async fn large_files(
    State(state): State<Arc<AppState>>,
    Path(min_size): Path<String>,
    ValidatedQuery(query): ValidatedQuery<PageQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let min_size: i64 = min_size
        .trim()
        .parse()
        .ok()
        .filter(|size| *size >= 0)
        .ok_or_else(|| AppError::BadRequest("minSize must be a non-negative integer".to_string()))?;
    let pagination = Pagination::from(&query);

    let (files, total) = state.db.files.list_larger_than(min_size, pagination).await?;

    Ok(Json(FileListResponse::new(files, total, pagination)))
}
