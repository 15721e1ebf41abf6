//! Configuration module
//!
//! Env-driven configuration for the API service: server, database, photo
//! storage, and intake settings. `.env` files are honored via dotenvy.

use std::env;
use std::str::FromStr;

use crate::storage_types::StorageBackend;

const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_DB_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PHOTO_MAX_SIZE_BYTES: usize = 10 * 1024 * 1024;

/// Unit lookup strategy used by the resolver.
///
/// `Keyed` is the primary-key lookup behind direct unit text entry;
/// `Filtered` is the equality query behind the block/number dropdown UX.
/// Both converge on the same stored data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitLookupStrategy {
    #[default]
    Keyed,
    Filtered,
}

impl FromStr for UnitLookupStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "keyed" => Ok(UnitLookupStrategy::Keyed),
            "filtered" => Ok(UnitLookupStrategy::Filtered),
            other => Err(format!(
                "Unknown unit lookup strategy '{}' (expected 'keyed' or 'filtered')",
                other
            )),
        }
    }
}

/// Service configuration, loaded once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    server_port: u16,
    cors_origins: Vec<String>,
    environment: String,
    // Database
    database_url: String,
    db_max_connections: u32,
    db_timeout_seconds: u64,
    // Photo storage
    storage_backend: StorageBackend,
    s3_bucket: Option<String>,
    s3_region: Option<String>,
    s3_endpoint: Option<String>,
    local_storage_path: Option<String>,
    local_storage_base_url: Option<String>,
    // Intake
    photo_max_size_bytes: usize,
    photo_allowed_extensions: Vec<String>,
    photo_allowed_content_types: Vec<String>,
    unit_lookup_strategy: UnitLookupStrategy,
}

fn env_or<T: FromStr>(key: &str, default: T) -> Result<T, String> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| format!("Invalid value for {}: '{}'", key, raw)),
        Err(_) => Ok(default),
    }
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_list(key: &str, default: &[&str]) -> Vec<String> {
    match env_opt(key) {
        Some(raw) => raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        None => default.iter().map(|s| s.to_string()).collect(),
    }
}

impl Config {
    /// Load configuration from the environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

        let storage_backend = env_opt("STORAGE_BACKEND")
            .map(|raw| raw.parse::<StorageBackend>())
            .transpose()
            .map_err(|e| anyhow::anyhow!(e))?
            .unwrap_or(StorageBackend::Local);

        let unit_lookup_strategy = env_opt("UNIT_LOOKUP_STRATEGY")
            .map(|raw| raw.parse::<UnitLookupStrategy>())
            .transpose()
            .map_err(|e| anyhow::anyhow!(e))?
            .unwrap_or_default();

        let config = Config {
            server_port: env_or("SERVER_PORT", DEFAULT_SERVER_PORT)
                .map_err(|e| anyhow::anyhow!(e))?,
            cors_origins: env_list("CORS_ORIGINS", &["*"]),
            environment: env_opt("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            database_url,
            db_max_connections: env_or("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)
                .map_err(|e| anyhow::anyhow!(e))?,
            db_timeout_seconds: env_or("DB_TIMEOUT_SECONDS", DEFAULT_DB_TIMEOUT_SECS)
                .map_err(|e| anyhow::anyhow!(e))?,
            storage_backend,
            s3_bucket: env_opt("S3_BUCKET"),
            s3_region: env_opt("S3_REGION").or_else(|| env_opt("AWS_REGION")),
            s3_endpoint: env_opt("S3_ENDPOINT"),
            local_storage_path: env_opt("LOCAL_STORAGE_PATH"),
            local_storage_base_url: env_opt("LOCAL_STORAGE_BASE_URL"),
            photo_max_size_bytes: env_or("PHOTO_MAX_SIZE_BYTES", DEFAULT_PHOTO_MAX_SIZE_BYTES)
                .map_err(|e| anyhow::anyhow!(e))?,
            photo_allowed_extensions: env_list(
                "PHOTO_ALLOWED_EXTENSIONS",
                &["jpg", "jpeg", "png", "webp"],
            ),
            photo_allowed_content_types: env_list(
                "PHOTO_ALLOWED_CONTENT_TYPES",
                &["image/jpeg", "image/png", "image/webp"],
            ),
            unit_lookup_strategy,
        };

        config.validate()?;
        Ok(config)
    }

    /// Fail fast on misconfiguration: the chosen storage backend must have
    /// its settings present before the server starts taking submissions.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    anyhow::bail!("S3_BUCKET must be set when STORAGE_BACKEND=s3");
                }
                if self.s3_region.is_none() {
                    anyhow::bail!("S3_REGION or AWS_REGION must be set when STORAGE_BACKEND=s3");
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    anyhow::bail!("LOCAL_STORAGE_PATH must be set when STORAGE_BACKEND=local");
                }
                if self.local_storage_base_url.is_none() {
                    anyhow::bail!("LOCAL_STORAGE_BASE_URL must be set when STORAGE_BACKEND=local");
                }
            }
        }
        if self.photo_max_size_bytes == 0 {
            anyhow::bail!("PHOTO_MAX_SIZE_BYTES must be greater than zero");
        }
        Ok(())
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.db_timeout_seconds
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.s3_endpoint.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.local_storage_base_url.as_deref()
    }

    pub fn photo_max_size_bytes(&self) -> usize {
        self.photo_max_size_bytes
    }

    pub fn photo_allowed_extensions(&self) -> &[String] {
        &self.photo_allowed_extensions
    }

    pub fn photo_allowed_content_types(&self) -> &[String] {
        &self.photo_allowed_content_types
    }

    pub fn unit_lookup_strategy(&self) -> UnitLookupStrategy {
        self.unit_lookup_strategy
    }

    /// Construct a config directly, for tests and embedded use.
    pub fn for_tests(database_url: String, local_storage_path: String) -> Self {
        Config {
            server_port: 0,
            cors_origins: vec!["*".to_string()],
            environment: "test".to_string(),
            database_url,
            db_max_connections: 5,
            db_timeout_seconds: 5,
            storage_backend: StorageBackend::Local,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            local_storage_path: Some(local_storage_path),
            local_storage_base_url: Some("http://localhost:3000/photos".to_string()),
            photo_max_size_bytes: DEFAULT_PHOTO_MAX_SIZE_BYTES,
            photo_allowed_extensions: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
                "webp".to_string(),
            ],
            photo_allowed_content_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
            ],
            unit_lookup_strategy: UnitLookupStrategy::Keyed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_strategy_parses() {
        assert_eq!(
            "keyed".parse::<UnitLookupStrategy>().unwrap(),
            UnitLookupStrategy::Keyed
        );
        assert_eq!(
            "Filtered".parse::<UnitLookupStrategy>().unwrap(),
            UnitLookupStrategy::Filtered
        );
        assert!("fuzzy".parse::<UnitLookupStrategy>().is_err());
    }

    #[test]
    fn test_config_validates() {
        let config = Config::for_tests(
            "postgres://localhost/gatepass".to_string(),
            "/tmp/gatepass-photos".to_string(),
        );
        assert!(config.validate().is_ok());
        assert_eq!(config.storage_backend(), StorageBackend::Local);
    }
}
