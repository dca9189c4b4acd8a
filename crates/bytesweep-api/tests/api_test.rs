//! Routing, probes and request validation that never reach the database.
//!
//! Run with: `cargo test -p bytesweep-api --test api_test`

mod helpers;

use helpers::setup_app_without_db;
use serde_json::json;

#[tokio::test]
async fn test_liveness_does_not_need_database() {
    let app = setup_app_without_db(&[]).await;

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_readiness_reports_unreachable_database() {
    let app = setup_app_without_db(&[]).await;

    let response = app.client().get("/ready").await;

    assert_eq!(response.status_code(), 503);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "not_ready");
}

#[tokio::test]
async fn test_openapi_document_and_docs_page() {
    let app = setup_app_without_db(&[]).await;

    let spec = app.client().get("/api/openapi.json").await;
    assert_eq!(spec.status_code(), 200);
    let spec: serde_json::Value = spec.json();
    assert!(spec["paths"]["/compress"].is_object());
    assert!(spec["paths"]["/api/cleanup/bulk"].is_object());

    let docs = app.client().get("/docs").await;
    assert_eq!(docs.status_code(), 200);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = setup_app_without_db(&[]).await;

    let response = app
        .client()
        .get("/health")
        .add_header("x-request-id", "test-request-42")
        .await;

    assert_eq!(response.header("x-request-id"), "test-request-42");
}

#[tokio::test]
async fn test_cleanup_requires_confirmation() {
    let app = setup_app_without_db(&[]).await;

    for path in [
        "/api/cleanup/temp-files",
        "/api/cleanup/large-files",
        "/api/cleanup/duplicate-files",
        "/api/cleanup/bulk",
    ] {
        let response = app.client().post(path).json(&json!({})).await;
        assert_eq!(response.status_code(), 400, "{}", path);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Confirmation required for cleanup operation");
    }
}

#[tokio::test]
async fn test_cleanup_requires_ids_and_categories() {
    let app = setup_app_without_db(&[]).await;

    let response = app
        .client()
        .post("/api/cleanup/large-files")
        .json(&json!({ "confirm": true, "fileIds": [] }))
        .await;
    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "File IDs array is required");

    let response = app
        .client()
        .post("/api/cleanup/bulk")
        .json(&json!({ "confirm": true }))
        .await;
    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Categories array is required");

    let response = app
        .client()
        .post("/api/cleanup/restore")
        .json(&json!({}))
        .await;
    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "File IDs array is required");
}

#[tokio::test]
async fn test_invalid_categories_are_rejected() {
    let app = setup_app_without_db(&[]).await;

    let response = app.client().get("/api/cleanup/preview/user").await;
    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Invalid category");

    let response = app.client().get("/api/files/category/music").await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_invalid_listing_parameters_are_rejected() {
    let app = setup_app_without_db(&[]).await;

    let response = app.client().get("/api/files?sortBy=password").await;
    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap_or_default().contains("sortBy"));

    let response = app.client().get("/api/files?page=first").await;
    assert_eq!(response.status_code(), 400);

    let response = app.client().get("/api/files/large/-5").await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_invalid_bodies_are_rejected_before_the_database() {
    let app = setup_app_without_db(&[]).await;

    let response = app
        .client()
        .post("/api/files")
        .json(&json!({ "name": "  ", "path": "/tmp/x", "size": 1, "type": "txt" }))
        .await;
    assert_eq!(response.status_code(), 400);

    let response = app
        .client()
        .post("/api/system/disks")
        .json(&json!({
            "drive": "C:",
            "totalSpace": 100,
            "usedSpace": 50,
            "freeSpace": 50,
            "usage": 150.0
        }))
        .await;
    assert_eq!(response.status_code(), 400);

    let response = app
        .client()
        .post("/api/files")
        .content_type("application/json")
        .text("{not json")
        .await;
    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
}
