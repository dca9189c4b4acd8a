use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Classification of a stored file record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "file_category", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Temp,
    Large,
    Duplicate,
    System,
    #[default]
    User,
}

impl FileCategory {
    pub const ALL: [FileCategory; 5] = [
        FileCategory::Temp,
        FileCategory::Large,
        FileCategory::Duplicate,
        FileCategory::System,
        FileCategory::User,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Temp => "temp",
            FileCategory::Large => "large",
            FileCategory::Duplicate => "duplicate",
            FileCategory::System => "system",
            FileCategory::User => "user",
        }
    }

    /// Categories that the cleanup preview accepts.
    pub fn is_cleanable(&self) -> bool {
        matches!(
            self,
            FileCategory::Temp | FileCategory::Large | FileCategory::Duplicate
        )
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FileCategory::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Invalid category: {}", s))
    }
}

/// Optional descriptive attributes of a file record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

/// Database row for the `files` table; metadata is stored in flat columns.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct FileRow {
    pub id: Uuid,
    pub name: String,
    pub path: String,
    pub size: i64,
    pub file_type: String,
    pub category: FileCategory,
    pub last_modified: DateTime<Utc>,
    pub is_deleted: bool,
    pub extension: Option<String>,
    pub mime_type: Option<String>,
    pub permissions: Option<String>,
    pub owner: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// File record as exposed by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: Uuid,
    pub name: String,
    pub path: String,
    pub size: i64,
    #[serde(rename = "type")]
    pub file_type: String,
    pub category: FileCategory,
    pub last_modified: DateTime<Utc>,
    pub is_deleted: bool,
    pub metadata: FileMetadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FileRow> for FileRecord {
    fn from(row: FileRow) -> Self {
        FileRecord {
            id: row.id,
            name: row.name,
            path: row.path,
            size: row.size,
            file_type: row.file_type,
            category: row.category,
            last_modified: row.last_modified,
            is_deleted: row.is_deleted,
            metadata: FileMetadata {
                extension: row.extension,
                mime_type: row.mime_type,
                permissions: row.permissions,
                owner: row.owner,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Request DTO for creating a file record
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFileRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "File name must be between 1 and 255 characters"
    ))]
    pub name: String,
    #[validate(length(min = 1, message = "File path is required"))]
    pub path: String,
    #[validate(range(min = 0, message = "File size cannot be negative"))]
    pub size: i64,
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "File type is required"))]
    pub file_type: String,
    #[serde(default)]
    pub category: Option<FileCategory>,
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: Option<FileMetadata>,
}

impl CreateFileRequest {
    /// Trim the name before validation, the way the record stores it.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self
    }
}

/// Request DTO for a partial update of a file record
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFileRequest {
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 255,
        message = "File name must be between 1 and 255 characters"
    ))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "File path is required"))]
    pub path: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0, message = "File size cannot be negative"))]
    pub size: Option<i64>,
    #[serde(default, rename = "type")]
    #[validate(length(min = 1, message = "File type is required"))]
    pub file_type: Option<String>,
    #[serde(default)]
    pub category: Option<FileCategory>,
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_deleted: Option<bool>,
    #[serde(default)]
    pub metadata: Option<FileMetadata>,
}

impl UpdateFileRequest {
    pub fn normalized(mut self) -> Self {
        self.name = self.name.map(|n| n.trim().to_string());
        self
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Sortable columns of the file listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileSortField {
    Name,
    Path,
    Size,
    Type,
    Category,
    #[default]
    LastModified,
    CreatedAt,
    UpdatedAt,
}

impl FileSortField {
    pub fn column(&self) -> &'static str {
        match self {
            FileSortField::Name => "name",
            FileSortField::Path => "path",
            FileSortField::Size => "size",
            FileSortField::Type => "file_type",
            FileSortField::Category => "category",
            FileSortField::LastModified => "last_modified",
            FileSortField::CreatedAt => "created_at",
            FileSortField::UpdatedAt => "updated_at",
        }
    }
}

impl FromStr for FileSortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(FileSortField::Name),
            "path" => Ok(FileSortField::Path),
            "size" => Ok(FileSortField::Size),
            "type" => Ok(FileSortField::Type),
            "category" => Ok(FileSortField::Category),
            "lastModified" => Ok(FileSortField::LastModified),
            "createdAt" => Ok(FileSortField::CreatedAt),
            "updatedAt" => Ok(FileSortField::UpdatedAt),
            other => Err(format!("Invalid sortBy field: {}", other)),
        }
    }
}

/// Query parameters of `GET /api/files`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct ListFilesQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub category: Option<FileCategory>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
    pub search: Option<String>,
}

/// Query parameters for paginated sub-listings
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Resolved page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    /// Page defaults to 1, limit to 20 and is capped at 100.
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Pagination {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            return 0;
        }
        (total + self.limit as i64 - 1) / self.limit as i64
    }
}

impl From<&PageQuery> for Pagination {
    fn from(q: &PageQuery) -> Self {
        Pagination::new(q.page, q.limit)
    }
}

/// Filters of the file listing after validation
#[derive(Debug, Clone, Default)]
pub struct FileListFilter {
    pub category: Option<FileCategory>,
    pub search: Option<String>,
    pub sort_by: FileSortField,
    pub sort_order: SortOrder,
}

impl ListFilesQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.limit)
    }

    pub fn filter(&self) -> Result<FileListFilter, String> {
        let sort_by = match self.sort_by.as_deref() {
            Some(s) if !s.is_empty() => s.parse()?,
            _ => FileSortField::default(),
        };
        Ok(FileListFilter {
            category: self.category,
            search: self
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            sort_by,
            sort_order: self.sort_order.unwrap_or_default(),
        })
    }
}

/// Paginated list of file records
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileListResponse {
    pub files: Vec<FileRecord>,
    pub total_pages: i64,
    pub current_page: u32,
    pub total_files: i64,
}

impl FileListResponse {
    pub fn new(files: Vec<FileRecord>, total: i64, pagination: Pagination) -> Self {
        FileListResponse {
            files,
            total_pages: pagination.total_pages(total),
            current_page: pagination.page,
            total_files: total,
        }
    }
}

/// Compact record used by previews and recent-file listings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct FileSummary {
    pub id: Uuid,
    pub name: String,
    pub path: String,
    pub size: i64,
    #[serde(rename = "type")]
    pub file_type: String,
    pub last_modified: DateTime<Utc>,
    pub category: FileCategory,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_and_display() {
        assert_eq!("temp".parse::<FileCategory>().unwrap(), FileCategory::Temp);
        assert_eq!(FileCategory::Duplicate.to_string(), "duplicate");
        assert!("cache".parse::<FileCategory>().is_err());
        assert_eq!(FileCategory::default(), FileCategory::User);
    }

    #[test]
    fn test_cleanable_categories() {
        assert!(FileCategory::Temp.is_cleanable());
        assert!(FileCategory::Large.is_cleanable());
        assert!(FileCategory::Duplicate.is_cleanable());
        assert!(!FileCategory::System.is_cleanable());
        assert!(!FileCategory::User.is_cleanable());
    }

    #[test]
    fn test_pagination_defaults_and_cap() {
        let p = Pagination::new(None, None);
        assert_eq!(p, Pagination { page: 1, limit: 20 });
        assert_eq!(p.offset(), 0);

        let p = Pagination::new(Some(3), Some(500));
        assert_eq!(p.limit, 100);
        assert_eq!(p.offset(), 200);

        let p = Pagination::new(Some(0), Some(0));
        assert_eq!(p, Pagination { page: 1, limit: 1 });
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let p = Pagination::new(Some(1), Some(20));
        assert_eq!(p.total_pages(0), 0);
        assert_eq!(p.total_pages(20), 1);
        assert_eq!(p.total_pages(21), 2);
        assert_eq!(p.total_pages(59), 3);
    }

    #[test]
    fn test_sort_field_whitelist() {
        assert_eq!(
            "lastModified".parse::<FileSortField>().unwrap().column(),
            "last_modified"
        );
        assert_eq!("type".parse::<FileSortField>().unwrap().column(), "file_type");
        assert!("size; DROP TABLE files".parse::<FileSortField>().is_err());
    }

    #[test]
    fn test_list_query_filter() {
        let query = ListFilesQuery {
            sort_by: Some("size".to_string()),
            sort_order: Some(SortOrder::Asc),
            search: Some("  report ".to_string()),
            ..Default::default()
        };
        let filter = query.filter().unwrap();
        assert_eq!(filter.sort_by, FileSortField::Size);
        assert_eq!(filter.sort_order, SortOrder::Asc);
        assert_eq!(filter.search.as_deref(), Some("report"));

        let bad = ListFilesQuery {
            sort_by: Some("owner".to_string()),
            ..Default::default()
        };
        assert!(bad.filter().is_err());
    }

    #[test]
    fn test_create_request_json_shape() {
        let json = r#"{"name":" notes.txt ","path":"/home/u/notes.txt","size":12,"type":"txt","metadata":{"mimeType":"text/plain"}}"#;
        let req: CreateFileRequest = serde_json::from_str(json).unwrap();
        let req = req.normalized();
        assert_eq!(req.name, "notes.txt");
        assert_eq!(req.file_type, "txt");
        assert_eq!(
            req.metadata.unwrap().mime_type.as_deref(),
            Some("text/plain")
        );
        assert!(req.category.is_none());
    }

    #[test]
    fn test_create_request_validation() {
        let req = CreateFileRequest {
            name: "".to_string(),
            path: "/x".to_string(),
            size: -1,
            file_type: "bin".to_string(),
            category: None,
            last_modified: None,
            metadata: None,
        };
        let err = req.validate().unwrap_err();
        let fields = err.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("size"));
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let now = Utc::now();
        let record = FileRecord::from(FileRow {
            id: Uuid::new_v4(),
            name: "a.tmp".to_string(),
            path: "/tmp/a.tmp".to_string(),
            size: 10,
            file_type: "tmp".to_string(),
            category: FileCategory::Temp,
            last_modified: now,
            is_deleted: false,
            extension: Some(".tmp".to_string()),
            mime_type: None,
            permissions: None,
            owner: None,
            created_at: now,
            updated_at: now,
        });
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["type"], "tmp");
        assert_eq!(value["category"], "temp");
        assert_eq!(value["isDeleted"], false);
        assert_eq!(value["metadata"]["extension"], ".tmp");
        assert!(value.get("lastModified").is_some());
    }
}
