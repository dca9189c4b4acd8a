//! Archive building
//!
//! Turns a set of uploaded files held in a per-request scratch workspace into
//! one archive. zip and tar (optionally gzip-compressed) are produced in
//! process; 7z and rar are delegated to external executables. Every mechanism
//! sits behind the [`ArchiveBuilder`] trait.

mod builder;
mod error;
mod external;
mod format;
mod naming;
mod service;
mod tar_builder;
mod workspace;
mod zip_builder;

pub use builder::{ArchiveBuilder, ArchiveEntry};
pub use error::BuildError;
pub use external::ExternalToolBuilder;
pub use format::{ArchiveFormat, UnsupportedFormat};
pub use naming::{sanitize_archive_filename, OutputName, OutputNamer, UniqueNames};
pub use service::{BuiltArchive, Compressor};
pub use tar_builder::TarBuilder;
pub use workspace::{CompressionWorkspace, ScratchSpace};
pub use zip_builder::ZipBuilder;
