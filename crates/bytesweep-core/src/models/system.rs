use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

use super::file::FileCategory;

pub const DEFAULT_RECENT_LIMIT: u32 = 10;

/// Lower boundaries of the size-distribution buckets, in bytes. Sizes at or
/// above the last boundary fall into the overflow bucket.
pub const SIZE_BUCKET_BOUNDARIES: [i64; 8] = [
    0,
    1024,
    10_240,
    102_400,
    1_048_576,
    10_485_760,
    104_857_600,
    1_073_741_824,
];

pub const OVERFLOW_BUCKET: &str = "Very Large";

/// Point-in-time aggregate of the file records
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct SystemStats {
    pub id: Uuid,
    pub total_files: i64,
    pub total_size: i64,
    pub temp_files: i64,
    pub temp_size: i64,
    pub large_files: i64,
    pub large_size: i64,
    pub duplicate_files: i64,
    pub duplicate_size: i64,
    pub last_updated: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Snapshot values, either computed from the records or supplied by a caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSystemStatsRequest {
    #[serde(default)]
    #[validate(range(min = 0))]
    pub total_files: i64,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub total_size: i64,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub temp_files: i64,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub temp_size: i64,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub large_files: i64,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub large_size: i64,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub duplicate_files: i64,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub duplicate_size: i64,
}

/// Record count and byte total of one category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct CategoryBreakdown {
    pub category: FileCategory,
    pub count: i64,
    pub total_size: i64,
}

/// Label of a size bucket: its lower boundary, or the overflow label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum SizeBucketLabel {
    Lower(i64),
    Overflow(String),
}

impl SizeBucketLabel {
    /// Bucket holding a record of `size` bytes.
    pub fn for_size(size: i64) -> Self {
        let last = SIZE_BUCKET_BOUNDARIES.len() - 1;
        if size < SIZE_BUCKET_BOUNDARIES[0] || size >= SIZE_BUCKET_BOUNDARIES[last] {
            return SizeBucketLabel::Overflow(OVERFLOW_BUCKET.to_string());
        }
        let lower = SIZE_BUCKET_BOUNDARIES[..last]
            .iter()
            .rev()
            .find(|b| size >= **b)
            .copied()
            .unwrap_or(0);
        SizeBucketLabel::Lower(lower)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SizeBucket {
    pub bucket: SizeBucketLabel,
    pub count: i64,
    pub total_size: i64,
}

/// Quick health summary of the file records
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthSummary {
    pub total_files: i64,
    pub total_size: i64,
    pub temp_files: i64,
    pub large_files: i64,
    pub duplicate_files: i64,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecentFilesQuery {
    pub limit: Option<u32>,
}

/// Capacity of one drive
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct DiskInfo {
    pub id: Uuid,
    pub drive: String,
    pub total_space: i64,
    pub used_space: i64,
    pub free_space: i64,
    pub usage: f64,
    pub last_updated: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request DTO for `POST /api/system/disks`
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertDiskRequest {
    #[validate(length(min = 1, message = "Drive is required"))]
    pub drive: String,
    #[validate(range(min = 0))]
    pub total_space: i64,
    #[validate(range(min = 0))]
    pub used_space: i64,
    #[validate(range(min = 0))]
    pub free_space: i64,
    #[validate(range(min = 0.0, max = 100.0, message = "Usage must be between 0 and 100"))]
    pub usage: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_bucket_boundaries() {
        assert_eq!(SizeBucketLabel::for_size(0), SizeBucketLabel::Lower(0));
        assert_eq!(SizeBucketLabel::for_size(1023), SizeBucketLabel::Lower(0));
        assert_eq!(SizeBucketLabel::for_size(1024), SizeBucketLabel::Lower(1024));
        assert_eq!(
            SizeBucketLabel::for_size(5 * 1024 * 1024),
            SizeBucketLabel::Lower(1_048_576)
        );
        assert_eq!(
            SizeBucketLabel::for_size(1_073_741_823),
            SizeBucketLabel::Lower(104_857_600)
        );
        assert_eq!(
            SizeBucketLabel::for_size(1_073_741_824),
            SizeBucketLabel::Overflow("Very Large".to_string())
        );
    }

    #[test]
    fn test_bucket_label_serialization() {
        let lower = serde_json::to_value(SizeBucketLabel::Lower(1024)).unwrap();
        assert_eq!(lower, serde_json::json!(1024));
        let overflow =
            serde_json::to_value(SizeBucketLabel::Overflow(OVERFLOW_BUCKET.to_string())).unwrap();
        assert_eq!(overflow, serde_json::json!("Very Large"));
    }

    #[test]
    fn test_disk_usage_range() {
        let mut req = UpsertDiskRequest {
            drive: "C:".to_string(),
            total_space: 500,
            used_space: 350,
            free_space: 150,
            usage: 70.0,
        };
        assert!(req.validate().is_ok());
        req.usage = 100.5;
        assert!(req.validate().is_err());
        req.usage = -1.0;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_stats_request_rejects_negative_values() {
        let req = CreateSystemStatsRequest {
            temp_size: -5,
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}
