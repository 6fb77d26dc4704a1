//! Configuration management
//!
//! This module handles loading and parsing configuration for the Tandem
//! backend. Configuration can be loaded from:
//! - config.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults. The JWT
//! secret has no default: the server refuses to start when it is missing
//! or left at the documented placeholder.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Placeholder value that must never be used as a real JWT secret
pub const JWT_SECRET_PLACEHOLDER: &str = "CHANGE_THIS_TO_A_SECURE_RANDOM_STRING_MIN_32_CHARS";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,
    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Upload configuration
    #[serde(default)]
    pub upload: UploadConfig,
    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// SMTP configuration for outbound mail
    #[serde(default)]
    pub smtp: SmtpConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origin
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5001
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database driver (sqlite or mysql)
    #[serde(default)]
    pub driver: DatabaseDriver,
    /// Database connection URL
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            driver: DatabaseDriver::default(),
            url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "data/tandem.db".to_string()
}

/// Database driver type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseDriver {
    /// SQLite (default)
    #[default]
    Sqlite,
    /// MySQL
    Mysql,
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret used to sign JWT tokens. Required at startup.
    #[serde(default)]
    pub jwt_secret: String,
    /// Token lifetime in hours
    #[serde(default = "default_jwt_expiry_hours")]
    pub jwt_expiry_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_expiry_hours: default_jwt_expiry_hours(),
        }
    }
}

fn default_jwt_expiry_hours() -> i64 {
    24
}

/// Cache configuration (in-memory)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache TTL in seconds
    #[serde(default = "default_ttl")]
    pub ttl_seconds: u64,
    /// Maximum number of cached entries
    #[serde(default = "default_cache_capacity")]
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl(),
            max_capacity: default_cache_capacity(),
        }
    }
}

fn default_ttl() -> u64 {
    600
}

fn default_cache_capacity() -> u64 {
    10_000
}

/// Upload configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Upload directory path
    #[serde(default = "default_upload_path")]
    pub path: PathBuf,
    /// Maximum file size in bytes (default: 10MB)
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Allowed image MIME types
    #[serde(default = "default_allowed_types")]
    pub allowed_types: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            path: default_upload_path(),
            max_file_size: default_max_file_size(),
            allowed_types: default_allowed_types(),
        }
    }
}

fn default_upload_path() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024 // 10MB
}

fn default_allowed_types() -> Vec<String> {
    vec![
        "image/jpeg".to_string(),
        "image/png".to_string(),
        "image/gif".to_string(),
        "image/webp".to_string(),
        "image/svg+xml".to_string(),
    ]
}

impl UploadConfig {
    /// Check if a MIME type is allowed
    pub fn is_type_allowed(&self, mime_type: &str) -> bool {
        self.allowed_types.iter().any(|t| t == mime_type)
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Whether the general API limiter is applied
    #[serde(default)]
    pub enabled: bool,
    /// Maximum requests per IP within the window
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
    /// Window size in seconds for the API limiter
    #[serde(default = "default_window_seconds")]
    pub window_seconds: u64,
    /// Maximum failed sign-in attempts per identifier
    #[serde(default = "default_auth_max_attempts")]
    pub auth_max_attempts: u32,
    /// Window size in seconds for the sign-in limiter
    #[serde(default = "default_auth_window_seconds")]
    pub auth_window_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_requests: default_max_requests(),
            window_seconds: default_window_seconds(),
            auth_max_attempts: default_auth_max_attempts(),
            auth_window_seconds: default_auth_window_seconds(),
        }
    }
}

fn default_max_requests() -> u32 {
    100
}

fn default_window_seconds() -> u64 {
    900
}

fn default_auth_max_attempts() -> u32 {
    5
}

fn default_auth_window_seconds() -> u64 {
    900
}

/// SMTP configuration for contact-form relay and subscription confirmations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// SMTP relay host; mail sending is disabled when empty
    #[serde(default)]
    pub host: String,
    /// SMTP port
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    /// SMTP username
    #[serde(default)]
    pub username: String,
    /// SMTP password
    #[serde(default)]
    pub password: String,
    /// From address for outbound mail
    #[serde(default)]
    pub from: String,
    /// Destination inbox for contact-form submissions
    #[serde(default)]
    pub contact_to: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: default_smtp_port(),
            username: String::new(),
            password: String::new(),
            from: String::new(),
            contact_to: String::new(),
        }
    }
}

fn default_smtp_port() -> u16 {
    587
}

impl SmtpConfig {
    /// Check whether outbound mail is configured
    pub fn is_configured(&self) -> bool {
        !self.host.is_empty() && !self.from.is_empty()
    }
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

impl Config {
    /// Load configuration from file.
    ///
    /// If the file doesn't exist, returns default configuration. If the
    /// file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides.
    ///
    /// Environment variables follow the pattern:
    /// - TANDEM_SERVER_HOST / TANDEM_SERVER_PORT / TANDEM_SERVER_CORS_ORIGIN
    /// - TANDEM_DATABASE_DRIVER / TANDEM_DATABASE_URL
    /// - TANDEM_JWT_SECRET / TANDEM_JWT_EXPIRY_HOURS
    /// - TANDEM_UPLOAD_PATH / TANDEM_UPLOAD_MAX_FILE_SIZE
    /// - TANDEM_RATE_LIMIT_ENABLED / TANDEM_RATE_LIMIT_MAX_REQUESTS /
    ///   TANDEM_RATE_LIMIT_WINDOW_SECONDS
    /// - TANDEM_SMTP_HOST / TANDEM_SMTP_PORT / TANDEM_SMTP_USERNAME /
    ///   TANDEM_SMTP_PASSWORD / TANDEM_SMTP_FROM / TANDEM_SMTP_CONTACT_TO
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("TANDEM_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("TANDEM_SERVER_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.server.port = port;
            }
        }
        if let Ok(cors_origin) = std::env::var("TANDEM_SERVER_CORS_ORIGIN") {
            self.server.cors_origin = cors_origin;
        }

        if let Ok(driver) = std::env::var("TANDEM_DATABASE_DRIVER") {
            match driver.to_lowercase().as_str() {
                "sqlite" => self.database.driver = DatabaseDriver::Sqlite,
                "mysql" => self.database.driver = DatabaseDriver::Mysql,
                _ => {} // Ignore invalid values
            }
        }
        if let Ok(url) = std::env::var("TANDEM_DATABASE_URL") {
            self.database.url = url;
        }

        if let Ok(secret) = std::env::var("TANDEM_JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Ok(hours) = std::env::var("TANDEM_JWT_EXPIRY_HOURS") {
            if let Ok(hours) = hours.parse::<i64>() {
                self.auth.jwt_expiry_hours = hours;
            }
        }

        if let Ok(path) = std::env::var("TANDEM_UPLOAD_PATH") {
            self.upload.path = PathBuf::from(path);
        }
        if let Ok(size) = std::env::var("TANDEM_UPLOAD_MAX_FILE_SIZE") {
            if let Ok(size) = size.parse::<u64>() {
                self.upload.max_file_size = size;
            }
        }

        if let Ok(enabled) = std::env::var("TANDEM_RATE_LIMIT_ENABLED") {
            self.rate_limit.enabled = enabled == "true" || enabled == "1";
        }
        if let Ok(max) = std::env::var("TANDEM_RATE_LIMIT_MAX_REQUESTS") {
            if let Ok(max) = max.parse::<u32>() {
                self.rate_limit.max_requests = max;
            }
        }
        if let Ok(window) = std::env::var("TANDEM_RATE_LIMIT_WINDOW_SECONDS") {
            if let Ok(window) = window.parse::<u64>() {
                self.rate_limit.window_seconds = window;
            }
        }

        if let Ok(host) = std::env::var("TANDEM_SMTP_HOST") {
            self.smtp.host = host;
        }
        if let Ok(port) = std::env::var("TANDEM_SMTP_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.smtp.port = port;
            }
        }
        if let Ok(username) = std::env::var("TANDEM_SMTP_USERNAME") {
            self.smtp.username = username;
        }
        if let Ok(password) = std::env::var("TANDEM_SMTP_PASSWORD") {
            self.smtp.password = password;
        }
        if let Ok(from) = std::env::var("TANDEM_SMTP_FROM") {
            self.smtp.from = from;
        }
        if let Ok(to) = std::env::var("TANDEM_SMTP_CONTACT_TO") {
            self.smtp.contact_to = to;
        }
    }

    /// Validate settings that have no safe default.
    ///
    /// The JWT secret must be present and must not be the placeholder that
    /// ships in the sample configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.is_empty() || self.auth.jwt_secret == JWT_SECRET_PLACEHOLDER {
            return Err(ConfigError::ValidationError(
                "JWT secret is not configured. Set auth.jwt_secret in config.yml \
                 or the TANDEM_JWT_SECRET environment variable."
                    .to_string(),
            ));
        }
        if self.auth.jwt_expiry_hours <= 0 {
            return Err(ConfigError::ValidationError(
                "auth.jwt_expiry_hours must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 5001);
        assert_eq!(config.database.driver, DatabaseDriver::Sqlite);
        assert_eq!(config.auth.jwt_expiry_hours, 24);
        assert!(!config.rate_limit.enabled);
        assert!(!config.smtp.is_configured());
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let config = Config::load(std::path::Path::new("/nonexistent/config.yml")).unwrap();
        assert_eq!(config.server.port, 5001);
    }

    #[test]
    fn test_load_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "server:\n  port: 9000\nauth:\n  jwt_secret: test-secret\nrate_limit:\n  enabled: true\n  max_requests: 42"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.auth.jwt_secret, "test-secret");
        assert!(config.rate_limit.enabled);
        assert_eq!(config.rate_limit.max_requests, 42);
        // Untouched sections get defaults
        assert_eq!(config.database.driver, DatabaseDriver::Sqlite);
    }

    #[test]
    fn test_load_invalid_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server: [not a mapping").unwrap();

        let result = Config::load(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_empty_file_returns_defaults() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.port, 5001);
    }

    #[test]
    fn test_validate_rejects_missing_secret() {
        let config = Config::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_placeholder_secret() {
        let mut config = Config::default();
        config.auth.jwt_secret = JWT_SECRET_PLACEHOLDER.to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_real_secret() {
        let mut config = Config::default();
        config.auth.jwt_secret = "a-perfectly-reasonable-secret".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_upload_type_allowed() {
        let config = UploadConfig::default();
        assert!(config.is_type_allowed("image/png"));
        assert!(config.is_type_allowed("image/jpeg"));
        assert!(!config.is_type_allowed("application/x-msdownload"));
    }
}
