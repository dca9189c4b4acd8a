use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use super::builder::{ArchiveBuilder, ArchiveEntry};
use super::error::BuildError;
use super::format::ArchiveFormat;

/// Delegates archiving to an external executable invoked as
/// `<program> a [switches] <output> ./<member>...`, run from the directory
/// holding the inputs. The `./` prefix keeps names starting with `-` or `@`
/// from being read as switches or list files.
#[derive(Debug, Clone)]
pub struct ExternalToolBuilder {
    program: String,
    tool: &'static str,
    format: ArchiveFormat,
    switches: &'static [&'static str],
}

impl ExternalToolBuilder {
    pub fn new(program: impl Into<String>, tool: &'static str, format: ArchiveFormat) -> Self {
        Self {
            program: program.into(),
            tool,
            format,
            switches: &[],
        }
    }

    /// `-spd` turns off 7z's own wildcard matching on member names.
    pub fn seven_zip(program: impl Into<String>) -> Self {
        Self {
            switches: &["-spd"],
            ..Self::new(program, "7z", ArchiveFormat::SevenZip)
        }
    }

    pub fn rar(program: impl Into<String>) -> Self {
        Self::new(program, "rar", ArchiveFormat::Rar)
    }

    fn tool_label(&self) -> String {
        if self.program == self.tool {
            self.tool.to_string()
        } else {
            format!("{} ({})", self.tool, self.program)
        }
    }
}

#[async_trait]
impl ArchiveBuilder for ExternalToolBuilder {
    async fn build(&self, entries: &[ArchiveEntry], output: &Path) -> Result<(), BuildError> {
        let working_dir = entries
            .first()
            .and_then(|e| e.path.parent())
            .ok_or(BuildError::NoEntries)?;

        let mut command = Command::new(&self.program);
        command.arg("a").args(self.switches).arg(output);
        for entry in entries {
            command.arg(Path::new(".").join(&entry.name));
        }

        tracing::debug!(
            tool = self.tool,
            format = %self.format,
            members = entries.len(),
            "Running external archiver"
        );

        let result = command
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| BuildError::ToolUnavailable {
                tool: self.tool_label(),
                format: self.format,
                source,
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
            tracing::error!(
                tool = self.tool,
                status = %result.status,
                stderr = %stderr,
                "External archiver failed"
            );
            return Err(BuildError::ToolFailed {
                tool: self.tool_label(),
                format: self.format,
                status: result.status.to_string(),
                stderr,
            });
        }

        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    fn stub_tool(dir: &Path, script: &str) -> PathBuf {
        let path = dir.join("stub-archiver");
        std::fs::write(&path, format!("#!/bin/sh\n{}", script)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn inputs(dir: &Path) -> Vec<ArchiveEntry> {
        inputs_named(dir, &["a.txt", "b.txt"])
    }

    fn inputs_named(dir: &Path, names: &[&str]) -> Vec<ArchiveEntry> {
        let inputs = dir.join("inputs");
        std::fs::create_dir(&inputs).unwrap();
        names
            .iter()
            .map(|name| {
                let path = inputs.join(name);
                std::fs::write(&path, name.as_bytes()).unwrap();
                ArchiveEntry {
                    path,
                    name: name.to_string(),
                    size: name.len() as u64,
                }
            })
            .collect()
    }

    // Records its arguments one per line into the output, then checks every
    // member resolves from the working directory.
    const RECORD_ARGS: &str = "[ \"$1\" = a ] || exit 3\nshift\n\
        while [ \"${1#-}\" != \"$1\" ]; do sw=\"$sw $1\"; shift; done\n\
        out=\"$1\"\nshift\n\
        for m in \"$@\"; do [ -f \"$m\" ] || exit 4; done\n\
        printf '%s\\n' \"switches:$sw\" \"$@\" > \"$out\"\n";

    #[tokio::test]
    async fn test_invokes_tool_with_relative_members() {
        let dir = tempfile::tempdir().unwrap();
        let tool = stub_tool(dir.path(), RECORD_ARGS);
        let entries = inputs(dir.path());
        let output = dir.path().join("out.7z");

        ExternalToolBuilder::seven_zip(tool.to_string_lossy())
            .build(&entries, &output)
            .await
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "switches: -spd\n./a.txt\n./b.txt\n"
        );
    }

    #[tokio::test]
    async fn test_list_file_and_switch_lookalikes_stay_members() {
        let dir = tempfile::tempdir().unwrap();
        let tool = stub_tool(dir.path(), RECORD_ARGS);
        let entries = inputs_named(dir.path(), &["@x.txt", "-y", "*.txt"]);
        let output = dir.path().join("out.rar");

        ExternalToolBuilder::rar(tool.to_string_lossy())
            .build(&entries, &output)
            .await
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "switches:\n./@x.txt\n./-y\n./*.txt\n"
        );
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_tool_failure() {
        let dir = tempfile::tempdir().unwrap();
        let tool = stub_tool(dir.path(), "echo 'cannot create archive' >&2\nexit 2\n");
        let entries = inputs(dir.path());

        let err = ExternalToolBuilder::rar(tool.to_string_lossy())
            .build(&entries, &dir.path().join("out.rar"))
            .await
            .unwrap_err();

        match err {
            BuildError::ToolFailed {
                format, stderr, ..
            } => {
                assert_eq!(format, ArchiveFormat::Rar);
                assert_eq!(stderr, "cannot create archive");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_tool_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let entries = inputs(dir.path());

        let err = ExternalToolBuilder::rar("/nonexistent/bytesweep-rar")
            .build(&entries, &dir.path().join("out.rar"))
            .await
            .unwrap_err();

        assert!(matches!(err, BuildError::ToolUnavailable { .. }));
        assert!(err.to_string().contains("rar"));
    }
}
