use std::env;
use std::time::Duration;

use thiserror::Error;

/// Errors raised while loading configuration at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid configuration for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Missing(_) => "CONFIG_MISSING",
            ConfigError::Invalid { .. } => "CONFIG_INVALID",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub swagger: SwaggerConfig,
    pub redis: RedisConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// Redis connection used as the shared response/credential cache
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
    /// Every key written by this process is namespaced under this prefix
    pub key_prefix: String,
}

/// Token-authenticated object storage (Keystone identity + Swift objects)
///
/// All identity and container values are required; there are no defaults
/// for credentials.
#[derive(Clone)]
pub struct StorageConfig {
    /// Identity endpoint receiving the password handshake
    pub auth_url: String,
    /// Public base URL objects are uploaded under and bulk deletes are posted to
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub project_id: String,
    /// Top-level namespace every managed object lives in
    pub container: String,
    pub request_timeout: Duration,
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("auth_url", &self.auth_url)
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"***")
            .field("project_id", &self.project_id)
            .field("container", &self.container)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
            redis: RedisConfig::from_env()?,
            storage: StorageConfig::from_env()?,
        })
    }
}

/// Read a required variable, treating an empty value as missing
fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 25 * 1024 * 1024; // 25MB

    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|e| ConfigError::Invalid {
                key: "PORT",
                reason: e.to_string(),
            })?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| ConfigError::Invalid {
                key: "MAX_REQUEST_BODY_SIZE",
                reason: "must be a valid number".to_string(),
            })?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "CMS Media API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Media upload and deletion backed by object storage".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

impl RedisConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
        let key_prefix = env::var("REDIS_KEY_PREFIX").unwrap_or_else(|_| "cms".to_string());

        Ok(Self { url, key_prefix })
    }
}

impl StorageConfig {
    const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

    pub fn from_env() -> Result<Self, ConfigError> {
        let auth_url = required("STORAGE_AUTH_URL")?;
        let base_url = required("STORAGE_BASE_URL")?;
        let username = required("STORAGE_USERNAME")?;
        let password = required("STORAGE_PASSWORD")?;
        let project_id = required("STORAGE_PROJECT_ID")?;
        let container = required("STORAGE_CONTAINER_NAME")?
            .trim_matches('/')
            .to_string();

        let request_timeout_secs = env::var("STORAGE_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_REQUEST_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::Invalid {
                key: "STORAGE_REQUEST_TIMEOUT_SECS",
                reason: "must be a valid number".to_string(),
            })?;

        Ok(Self {
            auth_url,
            base_url,
            username,
            password,
            project_id,
            container,
            request_timeout: Duration::from_secs(request_timeout_secs),
        })
    }
}
