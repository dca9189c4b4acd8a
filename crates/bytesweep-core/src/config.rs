//! Configuration module
//!
//! This module provides configuration structures for the API server, the
//! database pool and the archive builder. Values come from the environment
//! (after loading an optional `.env` file).

use std::env;
use std::path::PathBuf;

// Common constants
const SERVER_PORT: u16 = 5000;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_UPLOAD_FILES: usize = 100;
const MAX_UPLOAD_SIZE_MB: usize = 512;

/// Server-level configuration
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub environment: String,
}

/// Archive builder configuration
#[derive(Clone, Debug)]
pub struct ArchiveConfig {
    /// Root of the scratch storage; every compression request gets its own directory below it.
    pub scratch_dir: PathBuf,
    pub max_upload_files: usize,
    pub max_upload_size_bytes: usize,
    pub seven_zip_path: String,
    pub rar_path: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            scratch_dir: env::temp_dir().join("bytesweep"),
            max_upload_files: MAX_UPLOAD_FILES,
            max_upload_size_bytes: MAX_UPLOAD_SIZE_MB * 1024 * 1024,
            seven_zip_path: "7z".to_string(),
            rar_path: "rar".to_string(),
        }
    }
}

/// Full service configuration
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub base: BaseConfig,
    pub database_url: String,
    pub archive: ArchiveConfig,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ServiceConfig>);

impl Config {
    fn inner(&self) -> &ServiceConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.inner().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ServiceConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn database_url(&self) -> &str {
        &self.inner().database_url
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().base.db_timeout_seconds
    }

    pub fn archive(&self) -> &ArchiveConfig {
        &self.inner().archive
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.inner().archive.max_upload_size_bytes
    }
}

fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup (the process
    /// environment in production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins_str = lookup("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        if is_production_name(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server_port = match lookup("PORT") {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => SERVER_PORT,
        };

        let base = BaseConfig {
            server_port,
            cors_origins,
            db_max_connections: parse_or(lookup("DB_MAX_CONNECTIONS"), MAX_CONNECTIONS),
            db_timeout_seconds: parse_or(lookup("DB_TIMEOUT_SECONDS"), CONNECTION_TIMEOUT_SECS),
            environment,
        };

        let defaults = ArchiveConfig::default();
        let archive = ArchiveConfig {
            scratch_dir: lookup("SCRATCH_DIR")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.scratch_dir),
            max_upload_files: parse_or(lookup("MAX_UPLOAD_FILES"), MAX_UPLOAD_FILES),
            max_upload_size_bytes: parse_or(lookup("MAX_UPLOAD_SIZE_MB"), MAX_UPLOAD_SIZE_MB)
                * 1024
                * 1024,
            seven_zip_path: lookup("SEVEN_ZIP_PATH")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.seven_zip_path),
            rar_path: lookup("RAR_PATH")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.rar_path),
        };

        let config = ServiceConfig {
            base,
            database_url: lookup("DATABASE_URL")
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?,
            archive,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.database_url.starts_with("postgresql://")
            || self.database_url.starts_with("postgres://"))
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.archive.max_upload_files == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_FILES must be at least 1"));
        }

        if self.archive.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be at least 1"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::from_lookup(lookup_from(&[(
            "DATABASE_URL",
            "postgresql://localhost/bytesweep",
        )]))
        .unwrap();

        assert_eq!(config.base.server_port, 5000);
        assert_eq!(config.base.cors_origins, vec!["*".to_string()]);
        assert_eq!(config.base.environment, "development");
        assert_eq!(config.archive.max_upload_files, 100);
        assert_eq!(config.archive.max_upload_size_bytes, 512 * 1024 * 1024);
        assert_eq!(config.archive.seven_zip_path, "7z");
        assert_eq!(config.archive.rar_path, "rar");
    }

    #[test]
    fn test_overrides() {
        let config = ServiceConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db/bytesweep"),
            ("PORT", "8080"),
            ("SCRATCH_DIR", "/var/tmp/scratch"),
            ("MAX_UPLOAD_FILES", "3"),
            ("MAX_UPLOAD_SIZE_MB", "1"),
            ("RAR_PATH", "/opt/rar/rar"),
            ("CORS_ORIGINS", "http://localhost:5173, https://app.example.com"),
        ]))
        .unwrap();

        assert_eq!(config.base.server_port, 8080);
        assert_eq!(config.archive.scratch_dir, PathBuf::from("/var/tmp/scratch"));
        assert_eq!(config.archive.max_upload_files, 3);
        assert_eq!(config.archive.max_upload_size_bytes, 1024 * 1024);
        assert_eq!(config.archive.rar_path, "/opt/rar/rar");
        assert_eq!(
            config.base.cors_origins,
            vec![
                "http://localhost:5173".to_string(),
                "https://app.example.com".to_string()
            ]
        );
    }

    #[test]
    fn test_missing_database_url() {
        let err = ServiceConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_rejects_non_postgres_url() {
        let err = ServiceConfig::from_lookup(lookup_from(&[(
            "DATABASE_URL",
            "mongodb://localhost:27017/bytesweep",
        )]))
        .unwrap_err();
        assert!(err.to_string().contains("PostgreSQL"));
    }

    #[test]
    fn test_wildcard_cors_rejected_in_production() {
        let err = ServiceConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgresql://localhost/bytesweep"),
            ("ENVIRONMENT", "production"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("CORS_ORIGINS"));
    }

    #[test]
    fn test_invalid_port() {
        let err = ServiceConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgresql://localhost/bytesweep"),
            ("PORT", "not-a-port"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_zero_file_limit_rejected() {
        let err = ServiceConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgresql://localhost/bytesweep"),
            ("MAX_UPLOAD_FILES", "0"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("MAX_UPLOAD_FILES"));
    }
}
