use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::naming::{sanitize_archive_filename, UniqueNames};

const INPUTS_DIR: &str = "inputs";

/// Root directory under which every compression request gets its own workspace
#[derive(Debug, Clone)]
pub struct ScratchSpace {
    root: PathBuf,
}

impl ScratchSpace {
    /// Create (if needed) and canonicalize the scratch root.
    pub async fn new(root: impl AsRef<Path>) -> io::Result<Self> {
        tokio::fs::create_dir_all(root.as_ref()).await?;
        let root = tokio::fs::canonicalize(root.as_ref()).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create a fresh, uniquely named workspace with an empty `inputs/` directory.
    pub async fn create_workspace(&self) -> io::Result<CompressionWorkspace> {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || Self::create_workspace_in(&root))
            .await
            .map_err(io::Error::other)?
    }

    fn create_workspace_in(root: &Path) -> io::Result<CompressionWorkspace> {
        let dir = tempfile::Builder::new()
            .prefix("compress-")
            .tempdir_in(root)?;
        let inputs = dir.path().join(INPUTS_DIR);
        std::fs::create_dir(&inputs)?;

        let id = dir
            .path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        tracing::debug!(workspace = %id, "Compression workspace created");

        Ok(CompressionWorkspace {
            id,
            inputs,
            names: UniqueNames::new(),
            dir: Some(dir),
        })
    }
}

/// Scratch directory owning every transient artifact of one compression
/// request: the received inputs and the built archive. The directory and
/// everything in it is removed when the workspace is dropped.
#[derive(Debug)]
pub struct CompressionWorkspace {
    id: String,
    inputs: PathBuf,
    names: UniqueNames,
    dir: Option<TempDir>,
}

impl CompressionWorkspace {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn path(&self) -> &Path {
        self.dir
            .as_ref()
            .map(TempDir::path)
            .unwrap_or_else(|| self.inputs.as_path())
    }

    pub fn inputs_dir(&self) -> &Path {
        &self.inputs
    }

    /// Reserve a path for an uploaded file. Returns the member name (the
    /// sanitized, de-duplicated client filename) and where to write it.
    pub fn reserve_input(&mut self, original_name: &str) -> (String, PathBuf) {
        let fallback = format!("file_{}", self.names.len() + 1);
        let safe = sanitize_archive_filename(original_name, &fallback);
        let name = self.names.claim(&safe);
        let path = self.inputs.join(&name);
        (name, path)
    }

    /// Path for an output artifact, outside `inputs/`
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.path().join(file_name)
    }
}

impl Drop for CompressionWorkspace {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            match dir.close() {
                Ok(()) => tracing::debug!(workspace = %self.id, "Compression workspace removed"),
                Err(e) => tracing::warn!(
                    workspace = %self.id,
                    error = %e,
                    "Failed to remove compression workspace"
                ),
            }
        }
    }
}
