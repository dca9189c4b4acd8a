use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use super::format::ArchiveFormat;

/// Longest member name in bytes. Leaves room under the usual 255-byte
/// filesystem limit for a ` (n)` collision suffix.
pub const MAX_MEMBER_NAME_BYTES: usize = 200;

/// Extensions longer than this are treated as part of the stem when truncating.
const MAX_KEPT_EXTENSION_BYTES: usize = 16;

/// Reduce a client-supplied filename to a safe basename.
///
/// Path components (either separator) are stripped, control characters
/// removed, and a leading `-` is replaced so the name can never be read as a
/// command-line switch by the external archivers. Names over
/// [`MAX_MEMBER_NAME_BYTES`] are shortened, keeping the extension. Empty, `.`
/// and `..` fall back to `fallback`.
pub fn sanitize_archive_filename(filename: &str, fallback: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let cleaned: String = base.chars().filter(|c| !c.is_control()).collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        return fallback.to_string();
    }

    let name = match cleaned.strip_prefix('-') {
        Some(rest) => format!("_{}", rest),
        None => cleaned.to_string(),
    };
    truncate_name(name, MAX_MEMBER_NAME_BYTES)
}

/// Cut `name` to at most `max` bytes on a char boundary, keeping a short
/// extension intact.
fn truncate_name(name: String, max: usize) -> String {
    if name.len() <= max {
        return name;
    }

    let (stem, ext) = match name.rfind('.') {
        Some(idx) if idx > 0 && name.len() - idx <= MAX_KEPT_EXTENSION_BYTES => {
            name.split_at(idx)
        }
        _ => (name.as_str(), ""),
    };

    let mut end = max - ext.len();
    while !stem.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{}", stem[..end].trim_end(), ext)
}

/// Hands out distinct names within one directory, resolving collisions as
/// `name (1).ext`, `name (2).ext`, ...
#[derive(Debug, Default)]
pub struct UniqueNames {
    used: HashSet<String>,
}

impl UniqueNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, name: &str) -> String {
        if self.used.insert(name.to_string()) {
            return name.to_string();
        }

        let (stem, ext) = match name.rfind('.') {
            Some(idx) if idx > 0 => (&name[..idx], &name[idx..]),
            _ => (name, ""),
        };

        let mut counter = 1;
        loop {
            let candidate = format!("{} ({}){}", stem, counter, ext);
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            counter += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}

/// Name of an archive on disk and as offered to the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputName {
    /// `archive_<timestamp>-<seq>.<ext>`; unique within the process
    pub file_name: String,
    /// `archive_<timestamp>.<ext>` for `Content-Disposition`
    pub download_name: String,
}

/// Derives output names from a millisecond timestamp and a process-wide sequence
#[derive(Debug, Default)]
pub struct OutputNamer {
    sequence: AtomicU64,
}

impl OutputNamer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self, format: ArchiveFormat) -> OutputName {
        let timestamp = chrono::Utc::now().timestamp_millis();
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        OutputName {
            file_name: format!("archive_{}-{}.{}", timestamp, seq, format.extension()),
            download_name: format!("archive_{}.{}", timestamp, format.extension()),
        }
    }
}
