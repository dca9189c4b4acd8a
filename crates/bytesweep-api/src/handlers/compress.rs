//! Archive download handler
//!
//! `POST /compress` receives a batch of files and a format tag and answers
//! with one archive. The request workspace travels with the response body, so
//! inputs and output are removed once the body is finished or dropped.

use axum::{
    body::Body,
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::Response,
};
use bytes::Bytes;
use bytesweep_core::AppError;
use bytesweep_infra::{ArchiveFormat, CompressionWorkspace};
use futures::Stream;
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::fs::File;
use tokio_util::io::ReaderStream;

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::upload::receive_compression_upload;

/// Archive bytes read from scratch storage. Owns the workspace so the
/// scratch directory lives exactly as long as the body.
struct ArchiveBody {
    inner: ReaderStream<File>,
    _workspace: CompressionWorkspace,
}

impl Stream for ArchiveBody {
    type Item = io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

/// Compress uploaded files into a single archive
#[utoipa::path(
    post,
    path = "/compress",
    request_body(
        content = inline(Object),
        content_type = "multipart/form-data",
        description = "One or more `files` parts and a `format` field (zip, tar, gzip, 7z, rar)"
    ),
    responses(
        (status = 200, description = "Archive bytes; Content-Disposition names archive_<timestamp>.<ext>"),
        (status = 400, description = "No files uploaded or unsupported format", body = crate::error::ErrorResponse),
        (status = 413, description = "Too many files or request too large", body = crate::error::ErrorResponse),
        (status = 500, description = "Archive could not be built", body = crate::error::ErrorResponse)
    ),
    tag = "compress"
)]
#[tracing::instrument(skip(state, multipart))]
pub async fn compress_files(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Response, HttpAppError> {
    let compression = &state.compression;
    let workspace = compression
        .compressor
        .create_workspace()
        .await
        .map_err(AppError::from)?;
    tracing::info!(workspace = workspace.id(), "Compression request received");

    let upload =
        receive_compression_upload(multipart, workspace, compression.max_files).await?;

    if upload.entries.is_empty() {
        return Err(AppError::BadRequest("No files uploaded.".to_string()).into());
    }

    let format: ArchiveFormat = upload.format.as_deref().unwrap_or_default().parse()?;

    let built = compression
        .compressor
        .compress(&upload.workspace, &upload.entries, format)
        .await?;

    let file = File::open(&built.path)
        .await
        .map_err(|e| AppError::Archive(format!("Failed to open built archive: {}", e)))?;
    tracing::info!(
        workspace = upload.workspace.id(),
        download = %built.download_name,
        size_bytes = built.size,
        "Sending archive"
    );

    let body = ArchiveBody {
        inner: ReaderStream::new(file),
        _workspace: upload.workspace,
    };

    let content_disposition = format!("attachment; filename=\"{}\"", built.download_name);
    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, built.content_type)
        .header(header::CONTENT_DISPOSITION, content_disposition.as_str())
        .header(header::CONTENT_LENGTH, built.size)
        .body(Body::from_stream(body))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}
