//! Configuration module
//!
//! Configuration is read once from the environment (after loading `.env`) and passed
//! explicitly to everything that needs it.

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::storage_types::StorageBackend;

const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_VIDEO_SIZE_MB: usize = 70;
const MAX_IMAGE_SIZE_MB: usize = 10;
const MAX_REQUEST_BODY_MB: usize = 150;
const STORAGE_UPLOAD_TIMEOUT_SECS: u64 = 300;
const HTTP_CONCURRENCY_LIMIT: usize = 1_000;
const DEFAULT_STORAGE_API_BASE: &str = "https://api.cloudinary.com";
const DEFAULT_DELIVERY_BASE_URL: &str = "https://res.cloudinary.com";
const DEFAULT_STORAGE_FOLDER: &str = "reelbox";
const DEFAULT_LOCAL_STORAGE_PATH: &str = "./data/media";

/// Where media records are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataBackend {
    Postgres,
    /// Process-local store; records are lost on restart
    Memory,
}

impl FromStr for MetadataBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(MetadataBackend::Postgres),
            "memory" => Ok(MetadataBackend::Memory),
            _ => Err(anyhow::anyhow!("Invalid metadata backend: {}", s)),
        }
    }
}

impl Display for MetadataBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MetadataBackend::Postgres => write!(f, "postgres"),
            MetadataBackend::Memory => write!(f, "memory"),
        }
    }
}

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub jwt_secret: String,
    /// `pretty` or `json`
    pub log_format: String,
}

/// Full service configuration
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub base: BaseConfig,
    // Metadata store
    pub metadata_backend: MetadataBackend,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    // Storage service
    pub storage_backend: StorageBackend,
    pub storage_cloud_name: Option<String>,
    pub storage_api_key: Option<String>,
    pub storage_api_secret: Option<String>,
    pub storage_api_base: String,
    pub delivery_base_url: String,
    pub storage_folder: String,
    pub local_storage_path: String,
    // Ingestion
    pub max_video_size_bytes: usize,
    pub max_image_size_bytes: usize,
    pub max_request_body_bytes: usize,
    pub storage_upload_timeout_secs: u64,
    pub compensating_delete_enabled: bool,
    /// In-flight request cap; uploads are buffered in memory
    pub http_concurrency_limit: usize,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ServiceConfig>);

impl Config {
    fn as_service(&self) -> &ServiceConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ServiceConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_service().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.as_service().base.environment)
    }

    pub fn environment(&self) -> &str {
        &self.as_service().base.environment
    }

    pub fn server_port(&self) -> u16 {
        self.as_service().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_service().base.cors_origins
    }

    pub fn jwt_secret(&self) -> &str {
        &self.as_service().base.jwt_secret
    }

    pub fn log_format(&self) -> &str {
        &self.as_service().base.log_format
    }

    pub fn metadata_backend(&self) -> MetadataBackend {
        self.as_service().metadata_backend
    }

    pub fn database_url(&self) -> Option<&str> {
        self.as_service().database_url.as_deref()
    }

    pub fn db_max_connections(&self) -> u32 {
        self.as_service().db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.as_service().db_timeout_seconds
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.as_service().storage_backend
    }

    pub fn storage_cloud_name(&self) -> Option<&str> {
        self.as_service().storage_cloud_name.as_deref()
    }

    pub fn storage_api_key(&self) -> Option<&str> {
        self.as_service().storage_api_key.as_deref()
    }

    pub fn storage_api_secret(&self) -> Option<&str> {
        self.as_service().storage_api_secret.as_deref()
    }

    pub fn storage_api_base(&self) -> &str {
        &self.as_service().storage_api_base
    }

    pub fn delivery_base_url(&self) -> &str {
        &self.as_service().delivery_base_url
    }

    pub fn storage_folder(&self) -> &str {
        &self.as_service().storage_folder
    }

    pub fn local_storage_path(&self) -> &str {
        &self.as_service().local_storage_path
    }

    pub fn max_video_size_bytes(&self) -> usize {
        self.as_service().max_video_size_bytes
    }

    pub fn max_image_size_bytes(&self) -> usize {
        self.as_service().max_image_size_bytes
    }

    pub fn max_request_body_bytes(&self) -> usize {
        self.as_service().max_request_body_bytes
    }

    pub fn storage_upload_timeout_secs(&self) -> u64 {
        self.as_service().storage_upload_timeout_secs
    }

    pub fn compensating_delete_enabled(&self) -> bool {
        self.as_service().compensating_delete_enabled
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.as_service().http_concurrency_limit
    }

    /// Names of the storage credential variables that are unset or blank.
    pub fn missing_storage_credentials(&self) -> Vec<&'static str> {
        let service = self.as_service();
        [
            ("STORAGE_CLOUD_NAME", &service.storage_cloud_name),
            ("STORAGE_API_KEY", &service.storage_api_key),
            ("STORAGE_API_SECRET", &service.storage_api_secret),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().map(str::trim).unwrap_or_default().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Parse a size given in MiB into bytes. Unparseable values fall back to the default;
/// values that overflow `usize` once scaled are rejected.
fn mib_to_bytes(
    name: &str,
    value: Option<String>,
    default_mb: usize,
) -> Result<usize, anyhow::Error> {
    let mb = value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default_mb);
    mb.checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("{} is too large: {} MiB", name, mb))
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins: Vec<String> = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase(),
        };

        let metadata_backend = env::var("METADATA_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .parse()?;
        let storage_backend = env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "cloud".to_string())
            .parse()?;

        let mib = |name: &str, default: usize| mib_to_bytes(name, env::var(name).ok(), default);

        Ok(ServiceConfig {
            base,
            metadata_backend,
            database_url: optional_var("DATABASE_URL"),
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            storage_backend,
            storage_cloud_name: optional_var("STORAGE_CLOUD_NAME"),
            storage_api_key: optional_var("STORAGE_API_KEY"),
            storage_api_secret: optional_var("STORAGE_API_SECRET"),
            storage_api_base: env::var("STORAGE_API_BASE")
                .unwrap_or_else(|_| DEFAULT_STORAGE_API_BASE.to_string()),
            delivery_base_url: env::var("DELIVERY_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_DELIVERY_BASE_URL.to_string()),
            storage_folder: env::var("STORAGE_FOLDER")
                .unwrap_or_else(|_| DEFAULT_STORAGE_FOLDER.to_string()),
            local_storage_path: env::var("LOCAL_STORAGE_PATH")
                .unwrap_or_else(|_| DEFAULT_LOCAL_STORAGE_PATH.to_string()),
            max_video_size_bytes: mib("MAX_VIDEO_SIZE_MB", MAX_VIDEO_SIZE_MB)?,
            max_image_size_bytes: mib("MAX_IMAGE_SIZE_MB", MAX_IMAGE_SIZE_MB)?,
            max_request_body_bytes: mib("MAX_REQUEST_BODY_MB", MAX_REQUEST_BODY_MB)?,
            storage_upload_timeout_secs: env::var("STORAGE_UPLOAD_TIMEOUT_SECS")
                .unwrap_or_else(|_| STORAGE_UPLOAD_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(STORAGE_UPLOAD_TIMEOUT_SECS),
            compensating_delete_enabled: env::var("COMPENSATING_DELETE_ENABLED")
                .unwrap_or_else(|_| "true".to_string())
                .to_lowercase()
                .parse()
                .unwrap_or(true),
            http_concurrency_limit: env::var("HTTP_CONCURRENCY_LIMIT")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(HTTP_CONCURRENCY_LIMIT)
                .max(1),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.server_port == 0 {
            return Err(anyhow::anyhow!("PORT must be greater than 0"));
        }

        if self.base.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if is_production_name(&self.base.environment)
            && self.base.cors_origins.iter().any(|o| o == "*")
        {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if !matches!(self.base.log_format.as_str(), "pretty" | "json") {
            return Err(anyhow::anyhow!("LOG_FORMAT must be 'pretty' or 'json'"));
        }

        if self.metadata_backend == MetadataBackend::Postgres {
            match self.database_url.as_deref() {
                Some(url) if url.starts_with("postgres://") || url.starts_with("postgresql://") => {}
                Some(_) => {
                    return Err(anyhow::anyhow!(
                        "DATABASE_URL must be a valid PostgreSQL connection string"
                    ))
                }
                None => {
                    return Err(anyhow::anyhow!(
                        "DATABASE_URL must be set when METADATA_BACKEND=postgres"
                    ))
                }
            }
        }

        if self.max_video_size_bytes == 0 || self.max_image_size_bytes == 0 {
            return Err(anyhow::anyhow!(
                "MAX_VIDEO_SIZE_MB and MAX_IMAGE_SIZE_MB must be greater than 0"
            ));
        }

        if self.max_request_body_bytes <= self.max_video_size_bytes {
            return Err(anyhow::anyhow!(
                "MAX_REQUEST_BODY_MB must be larger than MAX_VIDEO_SIZE_MB so oversize uploads get a validation response"
            ));
        }

        if self.http_concurrency_limit == 0 {
            return Err(anyhow::anyhow!("HTTP_CONCURRENCY_LIMIT must be greater than 0"));
        }

        if self.storage_upload_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "STORAGE_UPLOAD_TIMEOUT_SECS must be greater than 0"
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ServiceConfig {
        ServiceConfig {
            base: BaseConfig {
                server_port: 4000,
                cors_origins: vec!["http://localhost:3000".to_string()],
                environment: "development".to_string(),
                jwt_secret: "x".repeat(32),
                log_format: "pretty".to_string(),
            },
            metadata_backend: MetadataBackend::Memory,
            database_url: None,
            db_max_connections: MAX_CONNECTIONS,
            db_timeout_seconds: CONNECTION_TIMEOUT_SECS,
            storage_backend: StorageBackend::Cloud,
            storage_cloud_name: Some("demo".to_string()),
            storage_api_key: None,
            storage_api_secret: Some("   ".to_string()),
            storage_api_base: DEFAULT_STORAGE_API_BASE.to_string(),
            delivery_base_url: DEFAULT_DELIVERY_BASE_URL.to_string(),
            storage_folder: DEFAULT_STORAGE_FOLDER.to_string(),
            local_storage_path: DEFAULT_LOCAL_STORAGE_PATH.to_string(),
            max_video_size_bytes: MAX_VIDEO_SIZE_MB * 1024 * 1024,
            max_image_size_bytes: MAX_IMAGE_SIZE_MB * 1024 * 1024,
            max_request_body_bytes: MAX_REQUEST_BODY_MB * 1024 * 1024,
            storage_upload_timeout_secs: STORAGE_UPLOAD_TIMEOUT_SECS,
            compensating_delete_enabled: true,
            http_concurrency_limit: HTTP_CONCURRENCY_LIMIT,
        }
    }

    #[test]
    fn test_concurrency_limit_must_be_positive() {
        let mut config = Config(Box::new(test_config()));
        assert_eq!(config.http_concurrency_limit(), 1_000);

        config.0.http_concurrency_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_mib_sizes_reject_overflow() {
        assert_eq!(
            mib_to_bytes("MAX_VIDEO_SIZE_MB", Some("70".to_string()), 10).unwrap(),
            73_400_320
        );
        assert_eq!(
            mib_to_bytes("MAX_VIDEO_SIZE_MB", Some("lots".to_string()), 10).unwrap(),
            10_485_760
        );
        assert_eq!(
            mib_to_bytes("MAX_IMAGE_SIZE_MB", None, 10).unwrap(),
            10_485_760
        );

        let err = mib_to_bytes("MAX_REQUEST_BODY_MB", Some(usize::MAX.to_string()), 150)
            .unwrap_err();
        assert!(err.to_string().contains("MAX_REQUEST_BODY_MB"));
    }

    #[test]
    fn test_default_video_ceiling_is_70_mib() {
        assert_eq!(test_config().max_video_size_bytes, 73_400_320);
    }

    #[test]
    fn test_validate_accepts_memory_backend_without_database_url() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_validate_requires_database_url_for_postgres() {
        let mut config = test_config();
        config.metadata_backend = MetadataBackend::Postgres;
        assert!(config.validate().is_err());

        config.database_url = Some("postgresql://localhost/reelbox".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_short_jwt_secret() {
        let mut config = test_config();
        config.base.jwt_secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_wildcard_cors_in_production() {
        let mut config = test_config();
        config.base.environment = "production".to_string();
        config.base.cors_origins = vec!["*".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_body_limit_below_video_ceiling() {
        let mut config = test_config();
        config.max_request_body_bytes = config.max_video_size_bytes;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_storage_credentials_treats_blank_as_missing() {
        let config = Config(Box::new(test_config()));
        assert_eq!(
            config.missing_storage_credentials(),
            vec!["STORAGE_API_KEY", "STORAGE_API_SECRET"]
        );
    }
}
