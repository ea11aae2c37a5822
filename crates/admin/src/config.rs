//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `JOYERIA_API_BASE` - Store API base URL (default: `http://127.0.0.1:8000/api`).
//!   `JOYERIA_API_URL` is accepted as a fallback name.
//! - `JOYERIA_API_TIMEOUT_SECS` - Per-request timeout (default: 15)
//! - `JOYERIA_LOOKUP_TTL_SECS` - Cache lifetime for payment methods and statuses (default: 300)
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `LOG_FORMAT` - `json` or `text` (default: text)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 1.0)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default store API location (the API's development server).
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000/api";
const DEFAULT_TIMEOUT_SECS: &str = "15";
const DEFAULT_LOOKUP_TTL_SECS: &str = "300";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Store API connection settings.
///
/// Shared by the web binary and the CLI.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL without trailing slash, e.g. `http://127.0.0.1:8000/api`
    pub base_url: String,
    /// Timeout applied to every API request
    pub timeout: Duration,
    /// How long lookup tables (payment methods, statuses) stay cached
    pub lookup_ttl: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(15),
            lookup_ttl: Duration::from_secs(300),
        }
    }
}

/// Admin application configuration.
#[derive(Clone)]
pub struct AdminConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Store API settings
    pub api: ApiConfig,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api", &self.api)
            .field("log_format", &self.log_format)
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"))
            .field("sentry_environment", &self.sentry_environment)
            .field("sentry_sample_rate", &self.sentry_sample_rate)
            .field("sentry_traces_sample_rate", &self.sentry_traces_sample_rate)
            .finish()
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = get_env_or_default(&get, "ADMIN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default(&get, "ADMIN_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_PORT".to_string(), e.to_string()))?;
        let api = ApiConfig::from_lookup(&get)?;
        let log_format = match get_env_or_default(&get, "LOG_FORMAT", "text")
            .to_lowercase()
            .as_str()
        {
            "json" => LogFormat::Json,
            "text" | "" => LogFormat::Text,
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "LOG_FORMAT".to_string(),
                    format!("expected 'json' or 'text', got '{other}'"),
                ));
            }
        };
        let sentry_dsn = get_optional_env(&get, "SENTRY_DSN");
        let sentry_environment = get_optional_env(&get, "SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env(&get, "SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env(&get, "SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            host,
            port,
            api,
            log_format,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ApiConfig {
    /// Load only the store API settings (used by the CLI).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    fn from_lookup<F>(get: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_base = get_optional_env(get, "JOYERIA_API_BASE")
            .or_else(|| get_optional_env(get, "JOYERIA_API_URL"))
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let base_url = normalize_base_url(&raw_base)?;

        let timeout = parse_secs(get, "JOYERIA_API_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let lookup_ttl = parse_secs(get, "JOYERIA_LOOKUP_TTL_SECS", DEFAULT_LOOKUP_TTL_SECS)?;

        Ok(Self {
            base_url,
            timeout,
            lookup_ttl,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env<F>(get: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    get(key).filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default<F>(get: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    get_optional_env(get, key).unwrap_or_else(|| default.to_string())
}

fn parse_secs<F>(get: &F, key: &str, default: &str) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let secs = get_env_or_default(get, key, default)
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if secs == 0 {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

/// Validate the API base URL and strip trailing slashes.
fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed)
        .map_err(|e| ConfigError::InvalidEnvVar("JOYERIA_API_BASE".to_string(), e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "JOYERIA_API_BASE".to_string(),
            format!("unsupported scheme '{}'", parsed.scheme()),
        ));
    }
    Ok(trimmed.to_string())
}
