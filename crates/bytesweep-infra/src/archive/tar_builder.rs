use async_trait::async_trait;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::builder::{ArchiveBuilder, ArchiveEntry};
use super::error::BuildError;

/// Writes a tar container, gzip-compressed when `gzip` is set
#[derive(Debug, Clone, Default)]
pub struct TarBuilder {
    gzip: bool,
}

impl TarBuilder {
    pub fn new(gzip: bool) -> Self {
        Self { gzip }
    }
}

fn append_entries<W: Write>(writer: W, entries: &[ArchiveEntry]) -> Result<W, BuildError> {
    let mut tar = tar::Builder::new(writer);
    for entry in entries {
        // Members are named by their scratch basename.
        let name = entry
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| entry.name.clone());
        tar.append_path_with_name(&entry.path, name)?;
    }
    Ok(tar.into_inner()?)
}

fn write_tar(entries: &[ArchiveEntry], output: &Path, gzip: bool) -> Result<(), BuildError> {
    let file = File::create(output)?;

    let writer = if gzip {
        let encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        append_entries(encoder, entries)?.finish()?
    } else {
        append_entries(BufWriter::new(file), entries)?
    };

    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    Ok(())
}

#[async_trait]
impl ArchiveBuilder for TarBuilder {
    async fn build(&self, entries: &[ArchiveEntry], output: &Path) -> Result<(), BuildError> {
        if entries.is_empty() {
            return Err(BuildError::NoEntries);
        }

        let entries = entries.to_vec();
        let output = output.to_path_buf();
        let gzip = self.gzip;
        tokio::task::spawn_blocking(move || write_tar(&entries, &output, gzip)).await?
    }
}
