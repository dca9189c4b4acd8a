//! OpenAPI documentation, served at `/api/openapi.json` and rendered at `/docs`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use bytesweep_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bytesweep API",
        version = "0.1.0",
        description = "File-management backend: archive downloads for uploaded files, file-metadata records, cleanup operations and system statistics."
    ),
    paths(
        // Compression
        handlers::compress::compress_files,
        // Files
        handlers::files::list_files,
        handlers::files::get_file,
        handlers::files::create_file,
        handlers::files::update_file,
        handlers::files::delete_file,
        handlers::files::files_by_category,
        handlers::files::large_files,
        // Cleanup
        handlers::cleanup::cleanup_temp_files,
        handlers::cleanup::cleanup_large_files,
        handlers::cleanup::cleanup_duplicate_files,
        handlers::cleanup::bulk_cleanup,
        handlers::cleanup::cleanup_preview,
        handlers::cleanup::restore_files,
        handlers::cleanup::cleanup_stats,
        // System
        handlers::system::get_stats,
        handlers::system::create_stats,
        handlers::system::list_disks,
        handlers::system::upsert_disk,
        handlers::system::files_by_category,
        handlers::system::file_size_distribution,
        handlers::system::recent_files,
        handlers::system::system_health,
    ),
    components(schemas(
        error::ErrorResponse,
        models::FileCategory,
        models::FileMetadata,
        models::FileRecord,
        models::FileSummary,
        models::CreateFileRequest,
        models::UpdateFileRequest,
        models::FileListResponse,
        models::MessageResponse,
        models::SortOrder,
        models::CleanupConfirmRequest,
        models::CleanupByIdsRequest,
        models::BulkCleanupRequest,
        models::RestoreRequest,
        models::CleanupResponse,
        models::RestoreResponse,
        models::CleanupPreview,
        models::CleanupStats,
        models::SystemStats,
        models::CreateSystemStatsRequest,
        models::CategoryBreakdown,
        models::SizeBucketLabel,
        models::SizeBucket,
        models::HealthSummary,
        models::DiskInfo,
        models::UpsertDiskRequest,
    )),
    tags(
        (name = "compress", description = "Archive downloads"),
        (name = "files", description = "File-metadata records"),
        (name = "cleanup", description = "Soft-delete cleanup operations"),
        (name = "system", description = "Stats snapshots, disks and aggregations"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_routes() {
        let spec = ApiDoc::openapi();
        for path in [
            "/compress",
            "/api/files",
            "/api/files/{id}",
            "/api/cleanup/preview/{category}",
            "/api/system/file-size-distribution",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
