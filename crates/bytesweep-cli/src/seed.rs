//! Sample data for local development.
//!
//! `seed` inserts a small base set of file records, two disk records and a
//! stats snapshot computed from the live records. `--extra` adds a larger
//! second set, `--reset` clears every table first.

use bytesweep_core::models::{
    CreateFileRequest, FileCategory, FileMetadata, SystemStats, UpsertDiskRequest,
};
use bytesweep_core::AppError;
use bytesweep_db::{DiskRepository, FileRepository, StatsRepository};
use chrono::{Duration, Utc};
use sqlx::PgPool;

const HOUR: i64 = 1;
const DAY: i64 = 24 * HOUR;

const RW_R_R: &str = "rw-r--r--";

/// One sample file record; `age_hours` is subtracted from the current time.
#[derive(Debug, Clone, Copy)]
pub struct SampleFile {
    pub name: &'static str,
    pub path: &'static str,
    pub size: i64,
    pub extension: &'static str,
    pub category: FileCategory,
    pub mime_type: &'static str,
    pub owner: &'static str,
    pub age_hours: i64,
}

impl SampleFile {
    pub fn to_request(&self) -> CreateFileRequest {
        CreateFileRequest {
            name: self.name.to_string(),
            path: self.path.to_string(),
            size: self.size,
            file_type: self.extension.to_string(),
            category: Some(self.category),
            last_modified: Some(Utc::now() - Duration::hours(self.age_hours)),
            metadata: Some(FileMetadata {
                extension: Some(self.extension.to_string()),
                mime_type: Some(self.mime_type.to_string()),
                permissions: Some(RW_R_R.to_string()),
                owner: Some(self.owner.to_string()),
            }),
        }
    }
}

pub const BASE_FILES: [SampleFile; 5] = [
    SampleFile {
        name: "temp_file_1.tmp",
        path: "/temp/temp_file_1.tmp",
        size: 1_024_000,
        extension: "tmp",
        category: FileCategory::Temp,
        mime_type: "application/octet-stream",
        owner: "system",
        age_hours: DAY,
    },
    SampleFile {
        name: "large_video.mp4",
        path: "/videos/large_video.mp4",
        size: 2_147_483_648,
        extension: "mp4",
        category: FileCategory::Large,
        mime_type: "video/mp4",
        owner: "user",
        age_hours: 7 * DAY,
    },
    SampleFile {
        name: "document_copy.pdf",
        path: "/documents/document_copy.pdf",
        size: 5_242_880,
        extension: "pdf",
        category: FileCategory::Duplicate,
        mime_type: "application/pdf",
        owner: "user",
        age_hours: 2 * DAY,
    },
    SampleFile {
        name: "system_log.log",
        path: "/logs/system_log.log",
        size: 1_048_576,
        extension: "log",
        category: FileCategory::System,
        mime_type: "text/plain",
        owner: "system",
        age_hours: 12 * HOUR,
    },
    SampleFile {
        name: "user_document.docx",
        path: "/documents/user_document.docx",
        size: 2_097_152,
        extension: "docx",
        category: FileCategory::User,
        mime_type: "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        owner: "user",
        age_hours: 3 * DAY,
    },
];

pub const EXTRA_FILES: [SampleFile; 13] = [
    SampleFile {
        name: "browser_cache.tmp",
        path: "/temp/browser_cache.tmp",
        size: 2_048_000,
        extension: "tmp",
        category: FileCategory::Temp,
        mime_type: "application/octet-stream",
        owner: "system",
        age_hours: 2 * HOUR,
    },
    SampleFile {
        name: "download_cache.cache",
        path: "/cache/download_cache.cache",
        size: 5_120_000,
        extension: "cache",
        category: FileCategory::Temp,
        mime_type: "application/octet-stream",
        owner: "user",
        age_hours: 6 * HOUR,
    },
    SampleFile {
        name: "system_log_backup.log",
        path: "/logs/system_log_backup.log",
        size: 1_048_576,
        extension: "log",
        category: FileCategory::Temp,
        mime_type: "text/plain",
        owner: "system",
        age_hours: 12 * HOUR,
    },
    SampleFile {
        name: "old_backup.bak",
        path: "/backups/old_backup.bak",
        size: 3_145_728,
        extension: "bak",
        category: FileCategory::Temp,
        mime_type: "application/octet-stream",
        owner: "system",
        age_hours: DAY,
    },
    SampleFile {
        name: "movie_collection.mp4",
        path: "/videos/movie_collection.mp4",
        size: 3_221_225_472,
        extension: "mp4",
        category: FileCategory::Large,
        mime_type: "video/mp4",
        owner: "user",
        age_hours: 3 * DAY,
    },
    SampleFile {
        name: "game_installer.exe",
        path: "/downloads/game_installer.exe",
        size: 1_610_612_736,
        extension: "exe",
        category: FileCategory::Large,
        mime_type: "application/x-msdownload",
        owner: "user",
        age_hours: 5 * DAY,
    },
    SampleFile {
        name: "database_backup.sql",
        path: "/backups/database_backup.sql",
        size: 805_306_368,
        extension: "sql",
        category: FileCategory::Large,
        mime_type: "application/sql",
        owner: "system",
        age_hours: 7 * DAY,
    },
    SampleFile {
        name: "document_copy_2.pdf",
        path: "/documents/document_copy_2.pdf",
        size: 5_242_880,
        extension: "pdf",
        category: FileCategory::Duplicate,
        mime_type: "application/pdf",
        owner: "user",
        age_hours: DAY,
    },
    SampleFile {
        name: "image_duplicate.jpg",
        path: "/images/image_duplicate.jpg",
        size: 2_097_152,
        extension: "jpg",
        category: FileCategory::Duplicate,
        mime_type: "image/jpeg",
        owner: "user",
        age_hours: 4 * DAY,
    },
    SampleFile {
        name: "music_duplicate.mp3",
        path: "/music/music_duplicate.mp3",
        size: 8_388_608,
        extension: "mp3",
        category: FileCategory::Duplicate,
        mime_type: "audio/mpeg",
        owner: "user",
        age_hours: 2 * DAY,
    },
    SampleFile {
        name: "presentation.pptx",
        path: "/documents/presentation.pptx",
        size: 15_728_640,
        extension: "pptx",
        category: FileCategory::User,
        mime_type: "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        owner: "user",
        age_hours: DAY,
    },
    SampleFile {
        name: "spreadsheet.xlsx",
        path: "/documents/spreadsheet.xlsx",
        size: 5_242_880,
        extension: "xlsx",
        category: FileCategory::User,
        mime_type: "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        owner: "user",
        age_hours: 3 * DAY,
    },
    SampleFile {
        name: "archive.zip",
        path: "/archives/archive.zip",
        size: 104_857_600,
        extension: "zip",
        category: FileCategory::User,
        mime_type: "application/zip",
        owner: "user",
        age_hours: 10 * DAY,
    },
];

pub fn sample_disks() -> Vec<UpsertDiskRequest> {
    vec![
        UpsertDiskRequest {
            drive: "C:".to_string(),
            total_space: 500_000_000_000,
            used_space: 350_000_000_000,
            free_space: 150_000_000_000,
            usage: 70.0,
        },
        UpsertDiskRequest {
            drive: "D:".to_string(),
            total_space: 1_000_000_000_000,
            used_space: 200_000_000_000,
            free_space: 800_000_000_000,
            usage: 20.0,
        },
    ]
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SeedOptions {
    pub reset: bool,
    pub extra: bool,
}

#[derive(Debug)]
pub struct SeedReport {
    pub inserted: usize,
    pub skipped: usize,
    pub disks: usize,
    pub snapshot: SystemStats,
}

/// Files inserted for the given options, base set first.
pub fn files_for(options: SeedOptions) -> Vec<SampleFile> {
    let mut files = BASE_FILES.to_vec();
    if options.extra {
        files.extend_from_slice(&EXTRA_FILES);
    }
    files
}

/// Insert the sample data. Records whose path already exists are skipped.
#[tracing::instrument(skip(pool))]
pub async fn run(pool: &PgPool, options: SeedOptions) -> Result<SeedReport, AppError> {
    let files = FileRepository::new(pool.clone());
    let stats = StatsRepository::new(pool.clone());
    let disks = DiskRepository::new(pool.clone());

    if options.reset {
        let removed = files.purge_all().await?;
        stats.purge_all().await?;
        disks.purge_all().await?;
        tracing::info!(files = removed, "Cleared existing data");
    }

    let mut inserted = 0;
    let mut skipped = 0;
    for sample in files_for(options) {
        match files.create_file(&sample.to_request()).await {
            Ok(_) => inserted += 1,
            Err(AppError::BadRequest(reason)) => {
                tracing::warn!(path = sample.path, %reason, "Skipping sample file");
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    let sample_disks = sample_disks();
    for disk in &sample_disks {
        disks.upsert_disk(disk).await?;
    }

    let snapshot = stats.record_snapshot().await?;

    Ok(SeedReport {
        inserted,
        skipped,
        disks: sample_disks.len(),
        snapshot,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn sample_paths_are_unique() {
        let all = files_for(SeedOptions {
            reset: false,
            extra: true,
        });
        assert_eq!(all.len(), 18);
        let paths: HashSet<_> = all.iter().map(|f| f.path).collect();
        assert_eq!(paths.len(), all.len());
    }

    #[test]
    fn base_set_covers_every_category() {
        let categories: HashSet<_> = BASE_FILES.iter().map(|f| f.category).collect();
        for category in FileCategory::ALL {
            assert!(categories.contains(&category), "missing {}", category);
        }
    }

    #[test]
    fn sample_requests_carry_metadata() {
        let now = Utc::now();
        for sample in files_for(SeedOptions {
            reset: false,
            extra: true,
        }) {
            let request = sample.to_request();
            assert!(request.path.ends_with(&request.name));
            assert!(request.size > 0);
            assert_eq!(
                request.metadata.as_ref().and_then(|m| m.extension.as_deref()),
                Some(request.file_type.as_str())
            );
            assert!(request.last_modified.is_some_and(|t| t < now));
        }
    }

    #[test]
    fn disk_usage_matches_capacity() {
        for disk in sample_disks() {
            assert_eq!(disk.used_space + disk.free_space, disk.total_space);
            let usage = disk.used_space as f64 / disk.total_space as f64 * 100.0;
            assert!((usage - disk.usage).abs() < f64::EPSILON * 100.0);
        }
    }
}
