use bytesweep_core::AppError;
use std::io;

use super::format::ArchiveFormat;

/// Failure while building an archive
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("No files to archive")]
    NoEntries,

    #[error("I/O error while building archive: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to write zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("{tool} is not available for {format} archives: {source}")]
    ToolUnavailable {
        tool: String,
        format: ArchiveFormat,
        #[source]
        source: io::Error,
    },

    #[error("{tool} failed to create {format} archive ({status}): {stderr}")]
    ToolFailed {
        tool: String,
        format: ArchiveFormat,
        status: String,
        stderr: String,
    },

    #[error("Archive worker failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl From<BuildError> for AppError {
    fn from(err: BuildError) -> Self {
        AppError::Archive(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytesweep_core::ErrorMetadata;

    #[test]
    fn test_tool_errors_name_tool_and_format() {
        let err = BuildError::ToolUnavailable {
            tool: "rar".to_string(),
            format: ArchiveFormat::Rar,
            source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        };
        let message = err.to_string();
        assert!(message.contains("rar"));
        assert!(message.contains("No such file"));

        let err = BuildError::ToolFailed {
            tool: "7z".to_string(),
            format: ArchiveFormat::SevenZip,
            status: "exit status: 2".to_string(),
            stderr: "disk full".to_string(),
        };
        let app: AppError = err.into();
        assert_eq!(app.http_status_code(), 500);
        assert!(app.client_message().contains("7z"));
        assert!(app.client_message().contains("disk full"));
    }
}
