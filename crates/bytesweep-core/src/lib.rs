//! Bytesweep Core Library
//!
//! This crate provides the domain models, error types and configuration that are
//! shared across all Bytesweep components.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{ArchiveConfig, BaseConfig, Config, ServiceConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
