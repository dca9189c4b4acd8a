//! Bytesweep CLI: seed the database and talk to the compression endpoint.
//!
//! `seed` reads DATABASE_URL; `compress` reads BYTESWEEP_API_URL unless `--url` is given.

use anyhow::Context;
use bytesweep_cli::client::{CompressClient, DEFAULT_API_URL};
use bytesweep_cli::seed::{self, SeedOptions};
use bytesweep_cli::{format_bytes, init_tracing};
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bytesweep", about = "Bytesweep command-line tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert sample file records, disks and a stats snapshot
    Seed {
        /// Delete all existing records first
        #[arg(long)]
        reset: bool,
        /// Also insert the larger additional sample set
        #[arg(long)]
        extra: bool,
    },
    /// Upload files to the service and save the returned archive
    Compress {
        /// Files to include
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Archive format: zip, tar, gzip, 7z or rar
        #[arg(long, default_value = "zip")]
        format: String,
        /// Output path (defaults to the server-suggested name)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Service base URL
        #[arg(long, env = "BYTESWEEP_API_URL", default_value = DEFAULT_API_URL)]
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Seed { reset, extra } => {
            let database_url =
                std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
            let pool = PgPoolOptions::new()
                .max_connections(2)
                .connect(&database_url)
                .await
                .context("Failed to connect to database")?;

            let report = seed::run(&pool, SeedOptions { reset, extra }).await?;
            pool.close().await;

            let s = &report.snapshot;
            println!(
                "Inserted {} files ({} skipped), {} disks",
                report.inserted, report.skipped, report.disks
            );
            println!("- Total files: {}", s.total_files);
            println!("- Total size: {}", format_bytes(s.total_size));
            println!("- Temp files: {} ({})", s.temp_files, format_bytes(s.temp_size));
            println!("- Large files: {} ({})", s.large_files, format_bytes(s.large_size));
            println!(
                "- Duplicate files: {} ({})",
                s.duplicate_files,
                format_bytes(s.duplicate_size)
            );
        }
        Commands::Compress {
            files,
            format,
            output,
            url,
        } => {
            let client = CompressClient::new(url);
            let archive = client.compress(&files, &format, output.as_deref()).await?;
            println!(
                "Wrote {} ({})",
                archive.path.display(),
                format_bytes(archive.bytes as i64)
            );
        }
    }

    Ok(())
}
