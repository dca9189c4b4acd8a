//! Client for `POST /compress`.

use anyhow::{Context, Result};
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::multipart::{Form, Part};
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Saved archive
#[derive(Debug)]
pub struct CompressedArchive {
    pub path: PathBuf,
    pub bytes: u64,
}

pub struct CompressClient {
    http: reqwest::Client,
    base_url: String,
}

impl CompressClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Upload `files` and write the returned archive. When `output` is None the
    /// server's suggested file name is used in the current directory.
    pub async fn compress(
        &self,
        files: &[PathBuf],
        format: &str,
        output: Option<&Path>,
    ) -> Result<CompressedArchive> {
        let mut form = Form::new().text("format", format.to_string());
        for file in files {
            form = form.part("files", file_part(file).await?);
        }

        let response = self
            .http
            .post(format!("{}/compress", self.base_url))
            .multipart(form)
            .send()
            .await
            .context("Failed to reach the compression service")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Compression failed ({}): {}", status, error_message(&body));
        }

        let suggested = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(disposition_filename);
        let path = match (output, suggested) {
            (Some(path), _) => path.to_path_buf(),
            (None, Some(name)) => PathBuf::from(name),
            (None, None) => anyhow::bail!("Server did not suggest a file name; pass --output"),
        };

        let body = response
            .bytes()
            .await
            .context("Failed to read archive body")?;
        tokio::fs::write(&path, &body)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(CompressedArchive {
            path,
            bytes: body.len() as u64,
        })
    }
}

async fn file_part(path: &Path) -> Result<Part> {
    let contents = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Not a file path: {}", path.display()))?
        .to_string();

    Part::bytes(contents)
        .file_name(name)
        .mime_str("application/octet-stream")
        .context("Invalid MIME type")
}

/// `error` field of a JSON error body, or the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

/// File name from `attachment; filename="..."`; path components are dropped.
pub fn disposition_filename(header: &str) -> Option<String> {
    let value = header
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))?
        .trim_matches('"');
    let name = Path::new(value).file_name()?.to_str()?;
    (!name.is_empty()).then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disposition_filename_quoted() {
        assert_eq!(
            disposition_filename("attachment; filename=\"archive_1700000000000.tar.gz\""),
            Some("archive_1700000000000.tar.gz".to_string())
        );
    }

    #[test]
    fn disposition_filename_rejects_paths_and_missing() {
        assert_eq!(
            disposition_filename("attachment; filename=\"../../etc/archive.zip\""),
            Some("archive.zip".to_string())
        );
        assert_eq!(disposition_filename("attachment"), None);
        assert_eq!(disposition_filename("attachment; filename=\"\""), None);
    }

    #[test]
    fn error_message_prefers_json_error() {
        assert_eq!(
            error_message(r#"{"error":"Unsupported format.","code":"BAD_REQUEST"}"#),
            "Unsupported format."
        );
        assert_eq!(error_message("  plain failure \n"), "plain failure");
    }

    #[tokio::test]
    async fn file_part_requires_readable_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        let err = file_part(&missing).await.unwrap_err();
        assert!(err.to_string().contains("missing.txt"));

        let present = dir.path().join("present.txt");
        std::fs::write(&present, b"hello").unwrap();
        assert!(file_part(&present).await.is_ok());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = CompressClient::new("http://localhost:5000/");
        assert_eq!(client.base_url, DEFAULT_API_URL);
    }
}
