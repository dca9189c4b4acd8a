//! Bytesweep Infrastructure Library
//!
//! This crate provides shared infrastructure components used by the Bytesweep services:
//! - Middleware (request ID)
//! - Telemetry initialization
//! - Archive building (zip, tar, tar.gz, 7z, rar) and per-request scratch workspaces

#[cfg(feature = "middleware")]
pub mod middleware;

#[cfg(feature = "observability-basic")]
pub mod telemetry;

#[cfg(feature = "archive")]
pub mod archive;

// Re-export commonly used types
#[cfg(feature = "middleware")]
pub use middleware::{request_id_middleware, RequestId};

#[cfg(feature = "observability-basic")]
pub use telemetry::{init_telemetry, shutdown_telemetry};

#[cfg(feature = "archive")]
pub use archive::{
    ArchiveEntry, ArchiveFormat, BuildError, BuiltArchive, CompressionWorkspace, Compressor,
};
