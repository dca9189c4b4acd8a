//! Multipart receiver for compression requests
//!
//! Every `files` part is streamed chunk by chunk into the request's
//! workspace and synced before the archive builder sees it. The workspace is
//! owned by the receiver until it returns, so any error drops it and removes
//! whatever was already written.

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use bytesweep_core::AppError;
use bytesweep_infra::{ArchiveEntry, CompressionWorkspace};
use tokio::io::AsyncWriteExt;

use crate::constants::{FILES_FIELD, FORMAT_FIELD};

/// Inputs of one compression request, held in its workspace
#[derive(Debug)]
pub struct ReceivedUpload {
    pub workspace: CompressionWorkspace,
    pub entries: Vec<ArchiveEntry>,
    /// Raw `format` field, if the client sent one
    pub format: Option<String>,
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Upload exceeds the maximum request size".to_string())
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
    }
}

/// Read the whole multipart body into `workspace`.
///
/// More than `max_files` file parts is rejected with 413.
#[tracing::instrument(skip(multipart, workspace), fields(workspace = %workspace.id()))]
pub async fn receive_compression_upload(
    mut multipart: Multipart,
    mut workspace: CompressionWorkspace,
    max_files: usize,
) -> Result<ReceivedUpload, AppError> {
    let mut entries = Vec::new();
    let mut format = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name() {
            Some(FILES_FIELD) => {
                if entries.len() >= max_files {
                    return Err(AppError::PayloadTooLarge(format!(
                        "Too many files. At most {} files can be compressed per request",
                        max_files
                    )));
                }
                let entry = store_file_field(field, &mut workspace).await?;
                entries.push(entry);
            }
            Some(FORMAT_FIELD) => {
                format = Some(field.text().await.map_err(multipart_error)?);
            }
            other => {
                tracing::debug!(field = ?other, "Ignoring unexpected multipart field");
            }
        }
    }

    tracing::debug!(files = entries.len(), format = ?format, "Upload received");

    Ok(ReceivedUpload {
        workspace,
        entries,
        format,
    })
}

async fn store_file_field(
    mut field: Field<'_>,
    workspace: &mut CompressionWorkspace,
) -> Result<ArchiveEntry, AppError> {
    let original = field.file_name().unwrap_or_default().to_string();
    let (name, path) = workspace.reserve_input(&original);

    let mut file = tokio::fs::File::create(&path).await?;
    let mut size: u64 = 0;
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        file.write_all(&chunk).await?;
        size += chunk.len() as u64;
    }
    file.flush().await?;
    file.sync_all().await?;

    tracing::debug!(original = %original, stored = %name, size_bytes = size, "Input stored");

    Ok(ArchiveEntry { path, name, size })
}
