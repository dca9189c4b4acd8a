//! Domain route groups (compression, files, cleanup, system).

use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

pub fn compress_routes() -> Router<Arc<AppState>> {
    Router::new().route("/compress", post(handlers::compress::compress_files))
}

pub fn file_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/files", API_PREFIX),
            get(handlers::files::list_files).post(handlers::files::create_file),
        )
        .route(
            &format!("{}/files/{{id}}", API_PREFIX),
            get(handlers::files::get_file)
                .put(handlers::files::update_file)
                .delete(handlers::files::delete_file),
        )
        .route(
            &format!("{}/files/category/{{category}}", API_PREFIX),
            get(handlers::files::files_by_category),
        )
        .route(
            &format!("{}/files/large/{{min_size}}", API_PREFIX),
            get(handlers::files::large_files),
        )
}

pub fn cleanup_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/cleanup/temp-files", API_PREFIX),
            post(handlers::cleanup::cleanup_temp_files),
        )
        .route(
            &format!("{}/cleanup/large-files", API_PREFIX),
            post(handlers::cleanup::cleanup_large_files),
        )
        .route(
            &format!("{}/cleanup/duplicate-files", API_PREFIX),
            post(handlers::cleanup::cleanup_duplicate_files),
        )
        .route(
            &format!("{}/cleanup/bulk", API_PREFIX),
            post(handlers::cleanup::bulk_cleanup),
        )
        .route(
            &format!("{}/cleanup/preview/{{category}}", API_PREFIX),
            get(handlers::cleanup::cleanup_preview),
        )
        .route(
            &format!("{}/cleanup/restore", API_PREFIX),
            post(handlers::cleanup::restore_files),
        )
        .route(
            &format!("{}/cleanup/stats", API_PREFIX),
            get(handlers::cleanup::cleanup_stats),
        )
}

pub fn system_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/system/stats", API_PREFIX),
            get(handlers::system::get_stats).post(handlers::system::create_stats),
        )
        .route(
            &format!("{}/system/disks", API_PREFIX),
            get(handlers::system::list_disks).post(handlers::system::upsert_disk),
        )
        .route(
            &format!("{}/system/files-by-category", API_PREFIX),
            get(handlers::system::files_by_category),
        )
        .route(
            &format!("{}/system/file-size-distribution", API_PREFIX),
            get(handlers::system::file_size_distribution),
        )
        .route(
            &format!("{}/system/recent-files", API_PREFIX),
            get(handlers::system::recent_files),
        )
        .route(
            &format!("{}/system/health", API_PREFIX),
            get(handlers::system::system_health),
        )
}
