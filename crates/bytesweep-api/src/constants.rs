//! API path constants

/// Prefix of the JSON API routes
pub const API_PREFIX: &str = "/api";

/// Path of the served OpenAPI document
pub const OPENAPI_PATH: &str = "/api/openapi.json";

/// Multipart field carrying the files to compress
pub const FILES_FIELD: &str = "files";

/// Multipart field carrying the archive format
pub const FORMAT_FIELD: &str = "format";
