use bytesweep_core::ArchiveConfig;
use std::io;
use std::path::PathBuf;
use std::time::Instant;

use super::builder::{ArchiveBuilder, ArchiveEntry};
use super::error::BuildError;
use super::external::ExternalToolBuilder;
use super::format::ArchiveFormat;
use super::naming::OutputNamer;
use super::tar_builder::TarBuilder;
use super::workspace::{CompressionWorkspace, ScratchSpace};
use super::zip_builder::ZipBuilder;

/// A finished archive inside a compression workspace
#[derive(Debug, Clone)]
pub struct BuiltArchive {
    pub path: PathBuf,
    pub download_name: String,
    pub content_type: &'static str,
    pub size: u64,
}

/// Dispatches compression requests to the builder for their format
pub struct Compressor {
    scratch: ScratchSpace,
    namer: OutputNamer,
    zip: ZipBuilder,
    tar: TarBuilder,
    gzip: TarBuilder,
    seven_zip: ExternalToolBuilder,
    rar: ExternalToolBuilder,
}

impl Compressor {
    pub async fn new(config: &ArchiveConfig) -> io::Result<Self> {
        let scratch = ScratchSpace::new(&config.scratch_dir).await?;
        tracing::info!(scratch_root = %scratch.root().display(), "Archive scratch space ready");

        Ok(Self {
            scratch,
            namer: OutputNamer::new(),
            zip: ZipBuilder::new(),
            tar: TarBuilder::new(false),
            gzip: TarBuilder::new(true),
            seven_zip: ExternalToolBuilder::seven_zip(config.seven_zip_path.clone()),
            rar: ExternalToolBuilder::rar(config.rar_path.clone()),
        })
    }

    pub fn scratch(&self) -> &ScratchSpace {
        &self.scratch
    }

    pub async fn create_workspace(&self) -> io::Result<CompressionWorkspace> {
        self.scratch.create_workspace().await
    }

    fn builder_for(&self, format: ArchiveFormat) -> &dyn ArchiveBuilder {
        match format {
            ArchiveFormat::Zip => &self.zip,
            ArchiveFormat::Tar => &self.tar,
            ArchiveFormat::Gzip => &self.gzip,
            ArchiveFormat::SevenZip => &self.seven_zip,
            ArchiveFormat::Rar => &self.rar,
        }
    }

    /// Build one archive of `entries` inside `workspace`. On failure the
    /// partial output is removed before the error is returned.
    pub async fn compress(
        &self,
        workspace: &CompressionWorkspace,
        entries: &[ArchiveEntry],
        format: ArchiveFormat,
    ) -> Result<BuiltArchive, BuildError> {
        if entries.is_empty() {
            return Err(BuildError::NoEntries);
        }

        let name = self.namer.next(format);
        let output = workspace.output_path(&name.file_name);
        let started = Instant::now();

        tracing::info!(
            workspace = workspace.id(),
            format = %format,
            files = entries.len(),
            "Building archive"
        );

        if let Err(e) = self.builder_for(format).build(entries, &output).await {
            if let Err(remove_err) = tokio::fs::remove_file(&output).await {
                if remove_err.kind() != io::ErrorKind::NotFound {
                    tracing::warn!(
                        workspace = workspace.id(),
                        error = %remove_err,
                        "Failed to remove partial archive"
                    );
                }
            }
            tracing::error!(workspace = workspace.id(), format = %format, error = %e, "Archive build failed");
            return Err(e);
        }

        let size = tokio::fs::metadata(&output).await?.len();
        tracing::info!(
            workspace = workspace.id(),
            format = %format,
            size_bytes = size,
            duration_ms = started.elapsed().as_millis() as u64,
            "Archive built"
        );

        Ok(BuiltArchive {
            path: output,
            download_name: name.download_name,
            content_type: format.content_type(),
            size,
        })
    }
}
