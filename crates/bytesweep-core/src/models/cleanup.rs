use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::file::{FileCategory, FileSummary};

pub const DEFAULT_PREVIEW_LIMIT: u32 = 50;

/// Body of `POST /api/cleanup/temp-files`
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct CleanupConfirmRequest {
    #[serde(default)]
    pub confirm: bool,
}

/// Body of the id-based cleanup endpoints
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CleanupByIdsRequest {
    #[serde(default)]
    pub file_ids: Option<Vec<Uuid>>,
    #[serde(default)]
    pub confirm: bool,
}

/// Body of `POST /api/cleanup/bulk`
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct BulkCleanupRequest {
    #[serde(default)]
    pub categories: Option<Vec<FileCategory>>,
    #[serde(default)]
    pub confirm: bool,
}

/// Body of `POST /api/cleanup/restore`
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestoreRequest {
    #[serde(default)]
    pub file_ids: Option<Vec<Uuid>>,
}

/// Count and byte total of the records touched by one cleanup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemovalTotals {
    pub files: i64,
    pub bytes: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CleanupResponse {
    pub message: String,
    pub files_removed: i64,
    pub space_freed: i64,
    pub categories: Vec<FileCategory>,
}

impl CleanupResponse {
    pub fn new(message: &str, totals: RemovalTotals, categories: Vec<FileCategory>) -> Self {
        CleanupResponse {
            message: message.to_string(),
            files_removed: totals.files,
            space_freed: totals.bytes,
            categories,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestoreResponse {
    pub message: String,
    pub files_restored: i64,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PreviewQuery {
    pub limit: Option<u32>,
}

/// Files a cleanup of one category would remove
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CleanupPreview {
    pub files: Vec<FileSummary>,
    pub total_files: i64,
    pub total_size: i64,
    pub category: FileCategory,
}

/// Reclaimable space per cleanable category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CleanupStats {
    pub temp_files: i64,
    pub temp_size: i64,
    pub large_files: i64,
    pub large_size: i64,
    pub duplicate_files: i64,
    pub duplicate_size: i64,
    pub total_cleanup_size: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_defaults_to_false() {
        let req: CleanupConfirmRequest = serde_json::from_str("{}").unwrap();
        assert!(!req.confirm);

        let req: CleanupByIdsRequest = serde_json::from_str(r#"{"confirm":true}"#).unwrap();
        assert!(req.confirm);
        assert!(req.file_ids.is_none());
    }

    #[test]
    fn test_bulk_request_parses_categories() {
        let req: BulkCleanupRequest =
            serde_json::from_str(r#"{"categories":["temp","duplicate"],"confirm":true}"#).unwrap();
        assert_eq!(
            req.categories.unwrap(),
            vec![FileCategory::Temp, FileCategory::Duplicate]
        );
    }

    #[test]
    fn test_cleanup_response_shape() {
        let resp = CleanupResponse::new(
            "Temporary files cleaned up successfully",
            RemovalTotals { files: 3, bytes: 4096 },
            vec![FileCategory::Temp],
        );
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["filesRemoved"], 3);
        assert_eq!(value["spaceFreed"], 4096);
        assert_eq!(value["categories"][0], "temp");
    }
}
