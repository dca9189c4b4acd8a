use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::error::BuildError;

/// One input file of an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Location of the uploaded bytes in scratch storage
    pub path: PathBuf,
    /// Member name inside the archive; equals the basename of `path`
    pub name: String,
    pub size: u64,
}

/// Builds one archive from a set of inputs
///
/// Implementations must either leave a complete archive at `output` or
/// return an error. Removing a partial output is the caller's job.
#[async_trait]
pub trait ArchiveBuilder: Send + Sync {
    async fn build(&self, entries: &[ArchiveEntry], output: &Path) -> Result<(), BuildError>;
}
