//! Configuration validation
//!
//! Checks the values that would otherwise only fail on first use.

use anyhow::Result;
use bytesweep_core::Config;

/// Validate critical configuration values, failing fast on misconfiguration
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.is_production() && config.cors_origins().iter().any(|o| o == "*") {
        return Err(anyhow::anyhow!(
            "CORS configured to allow all origins (*) in production. \
             Set explicit origins via CORS_ORIGINS."
        ));
    }

    if config.db_max_connections() == 0 {
        return Err(anyhow::anyhow!("Database max connections cannot be 0"));
    }

    if config.db_timeout_seconds() == 0 {
        return Err(anyhow::anyhow!("Database timeout cannot be 0"));
    }

    let archive = config.archive();
    if archive.seven_zip_path.trim().is_empty() || archive.rar_path.trim().is_empty() {
        return Err(anyhow::anyhow!(
            "SEVEN_ZIP_PATH and RAR_PATH cannot be empty"
        ));
    }

    if archive.scratch_dir.exists() && !archive.scratch_dir.is_dir() {
        return Err(anyhow::anyhow!(
            "SCRATCH_DIR {} exists and is not a directory",
            archive.scratch_dir.display()
        ));
    }

    Ok(())
}
