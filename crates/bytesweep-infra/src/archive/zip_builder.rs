use async_trait::async_trait;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

use super::builder::{ArchiveBuilder, ArchiveEntry};
use super::error::BuildError;

const MAX_DEFLATE_LEVEL: i32 = 9;
const ZIP32_LIMIT: u64 = u32::MAX as u64;

/// Writes a zip container, each input Deflate-compressed
#[derive(Debug, Clone)]
pub struct ZipBuilder {
    level: i32,
}

impl Default for ZipBuilder {
    fn default() -> Self {
        Self {
            level: MAX_DEFLATE_LEVEL,
        }
    }
}

impl ZipBuilder {
    pub fn new() -> Self {
        Self::default()
    }
}

fn write_zip(entries: &[ArchiveEntry], output: &Path, level: i32) -> Result<(), BuildError> {
    let file = File::create(output)?;
    let mut zip = ZipWriter::new(BufWriter::new(file));

    for entry in entries {
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(level))
            .unix_permissions(0o644)
            .large_file(entry.size >= ZIP32_LIMIT);

        zip.start_file(entry.name.as_str(), options)?;
        let mut input = File::open(&entry.path)?;
        io::copy(&mut input, &mut zip)?;
    }

    let writer = zip.finish()?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    Ok(())
}

#[async_trait]
impl ArchiveBuilder for ZipBuilder {
    async fn build(&self, entries: &[ArchiveEntry], output: &Path) -> Result<(), BuildError> {
        if entries.is_empty() {
            return Err(BuildError::NoEntries);
        }

        let entries = entries.to_vec();
        let output = output.to_path_buf();
        let level = self.level;
        tokio::task::spawn_blocking(move || write_zip(&entries, &output, level)).await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn write_input(dir: &Path, name: &str, contents: &[u8]) -> ArchiveEntry {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        ArchiveEntry {
            path,
            name: name.to_string(),
            size: contents.len() as u64,
        }
    }

    #[tokio::test]
    async fn test_zip_contains_every_input() {
        let dir = tempfile::tempdir().unwrap();
        let entries = vec![
            write_input(dir.path(), "a.txt", b"alpha"),
            write_input(dir.path(), "b.log", &b"beta ".repeat(1000)),
            write_input(dir.path(), "empty.bin", b""),
        ];
        let output = dir.path().join("out.zip");

        ZipBuilder::new().build(&entries, &output).await.unwrap();

        let mut archive = zip::ZipArchive::new(File::open(&output).unwrap()).unwrap();
        assert_eq!(archive.len(), 3);
        let names: Vec<String> = archive.file_names().map(String::from).collect();
        for expected in ["a.txt", "b.log", "empty.bin"] {
            assert!(names.contains(&expected.to_string()));
        }

        let mut member = archive.by_name("b.log").unwrap();
        assert_eq!(member.compression(), CompressionMethod::Deflated);
        let mut contents = Vec::new();
        member.read_to_end(&mut contents).unwrap();
        assert_eq!(contents, b"beta ".repeat(1000));
    }

    #[tokio::test]
    async fn test_missing_input_fails() {
        let dir = tempfile::tempdir().unwrap();
        let entries = vec![ArchiveEntry {
            path: dir.path().join("gone.txt"),
            name: "gone.txt".to_string(),
            size: 0,
        }];
        let err = ZipBuilder::new()
            .build(&entries, &dir.path().join("out.zip"))
            .await
            .unwrap_err();
        assert!(matches!(err, BuildError::Io(_)));
    }

    #[tokio::test]
    async fn test_empty_entries_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = ZipBuilder::new()
            .build(&[], &dir.path().join("out.zip"))
            .await
            .unwrap_err();
        assert!(matches!(err, BuildError::NoEntries));
    }
}
