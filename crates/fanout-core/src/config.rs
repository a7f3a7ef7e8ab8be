//! Configuration module
//!
//! Loads the service configuration from the environment (and an optional `.env` file):
//! object-store credentials and region, the local-upload switch and its directory roots,
//! upload ceilings, and pipeline tuning knobs.

use std::env;
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_BUCKET, DEFAULT_JPEG_QUALITY, DEFAULT_MAX_FILE_SIZE_BYTES, DEFAULT_MAX_UPLOAD_COUNT,
    DEFAULT_NAMESPACE_SUFFIX, DEFAULT_REGION,
};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_FILE_CONCURRENCY: usize = 1;

/// Object-store connection settings
#[derive(Clone)]
pub struct RemoteConfig {
    pub enabled: bool,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub region: String,
    pub endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, LocalStack)
    pub bucket: String,
}

impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("enabled", &self.enabled)
            .field(
                "access_key_id",
                &self.access_key_id.as_ref().map(|_| "[REDACTED]"),
            )
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("bucket", &self.bucket)
            .finish()
    }
}

/// Local backup upload settings
#[derive(Clone, Debug)]
pub struct LocalUploadConfig {
    pub enabled: bool,
    pub users_dir: PathBuf,
    pub services_dir: PathBuf,
    pub log_dir: Option<PathBuf>,
}

/// Upload ceilings and pipeline tuning
#[derive(Clone, Debug)]
pub struct UploadLimits {
    /// Per-file size unit; the request ceiling is `max_file_size_bytes * max_upload_count`.
    pub max_file_size_bytes: usize,
    pub max_upload_count: usize,
    /// Number of accepted files processed at once within one request.
    pub file_concurrency: usize,
    /// Wait for remote puts and report per-file outcomes in the response.
    pub wait_for_remote: bool,
    /// Appended to the per-request uuid to form the storage namespace.
    pub namespace_suffix: String,
    /// Encoder quality (1-100) of JPEG variants.
    pub jpeg_quality: u8,
}

impl UploadLimits {
    /// Aggregate byte ceiling for the files of one request.
    pub fn max_total_bytes(&self) -> usize {
        self.max_file_size_bytes
            .saturating_mul(self.max_upload_count)
    }
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_BYTES,
            max_upload_count: DEFAULT_MAX_UPLOAD_COUNT,
            file_concurrency: DEFAULT_FILE_CONCURRENCY,
            wait_for_remote: false,
            namespace_suffix: DEFAULT_NAMESPACE_SUFFIX.to_string(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub remote: RemoteConfig,
    pub local: LocalUploadConfig,
    pub limits: UploadLimits,
    /// HMAC key of the filename generator
    pub filename_secret: Vec<u8>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("server_port", &self.server_port)
            .field("environment", &self.environment)
            .field("cors_origins", &self.cors_origins)
            .field("remote", &self.remote)
            .field("local", &self.local)
            .field("limits", &self.limits)
            .field("filename_secret", &"[REDACTED]")
            .finish()
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> Result<T, anyhow::Error> {
    parse_value(name, env::var(name).ok(), default)
}

/// Parse a numeric setting; an unset or blank value takes the default.
fn parse_value<T: std::str::FromStr>(
    name: &str,
    raw: Option<String>,
    default: T,
) -> Result<T, anyhow::Error> {
    match raw.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number, got '{}'", name, value)),
    }
}

fn env_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server_port = env::var("PORT")
            .unwrap_or_else(|_| DEFAULT_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let remote = RemoteConfig {
            enabled: env_flag("REMOTE_UPLOAD_ENABLED", true),
            access_key_id: env_opt("AWS_ID").or_else(|| env_opt("AWS_ACCESS_KEY_ID")),
            secret_access_key: env_opt("AWS_SECRET").or_else(|| env_opt("AWS_SECRET_ACCESS_KEY")),
            region: env_opt("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            endpoint: env_opt("S3_ENDPOINT"),
            bucket: env_opt("S3_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
        };

        let local = LocalUploadConfig {
            enabled: env_flag("LOCAL_UPLOAD_ENABLED", true),
            users_dir: env_opt("LOCAL_UPLOAD_USERS_DIR")
                .unwrap_or_else(|| "./uploads/users".to_string())
                .into(),
            services_dir: env_opt("LOCAL_UPLOAD_SERVICES_DIR")
                .unwrap_or_else(|| "./uploads/service".to_string())
                .into(),
            log_dir: env_opt("LOG_DIR").map(PathBuf::from),
        };

        let limits = UploadLimits {
            max_file_size_bytes: env_parse("MAX_FILE_SIZE_BYTES", DEFAULT_MAX_FILE_SIZE_BYTES)?,
            max_upload_count: env_parse("MAX_UPLOAD_COUNT", DEFAULT_MAX_UPLOAD_COUNT)?,
            file_concurrency: env_parse("FILE_CONCURRENCY", DEFAULT_FILE_CONCURRENCY)?,
            wait_for_remote: env_flag("WAIT_FOR_REMOTE", false),
            namespace_suffix: env::var("NAMESPACE_SUFFIX")
                .unwrap_or_else(|_| DEFAULT_NAMESPACE_SUFFIX.to_string()),
            jpeg_quality: env_parse("JPEG_QUALITY", DEFAULT_JPEG_QUALITY)?,
        };

        let filename_secret = match env_opt("FILENAME_SECRET") {
            Some(secret) => secret.into_bytes(),
            None => {
                tracing::debug!("FILENAME_SECRET not set, using a per-process random key");
                rand::random::<[u8; 32]>().to_vec()
            }
        };

        let config = Config {
            server_port,
            environment,
            cors_origins,
            remote,
            local,
            limits,
            filename_secret,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.limits.max_upload_count == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_COUNT must be at least 1"));
        }

        if self.limits.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_BYTES must be at least 1"));
        }

        if self.limits.file_concurrency == 0 {
            return Err(anyhow::anyhow!("FILE_CONCURRENCY must be at least 1"));
        }

        if !(1..=100).contains(&self.limits.jpeg_quality) {
            return Err(anyhow::anyhow!("JPEG_QUALITY must be between 1 and 100"));
        }

        if self.remote.enabled && self.remote.bucket.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "S3_BUCKET must be set when remote upload is enabled"
            ));
        }

        if self.remote.access_key_id.is_some() != self.remote.secret_access_key.is_some() {
            return Err(anyhow::anyhow!(
                "AWS_ID and AWS_SECRET must be set together"
            ));
        }

        if self.limits.namespace_suffix.contains("..") {
            return Err(anyhow::anyhow!("NAMESPACE_SUFFIX must not contain '..'"));
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}
