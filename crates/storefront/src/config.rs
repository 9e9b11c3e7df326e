//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required when `STOREFRONT_BACKEND=rest`
//! - `LUSTRE_API_URL` - Base URL of the remote persistence service
//! - `LUSTRE_API_KEY` - API key for the remote service (high entropy)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BACKEND` - `rest` or `memory` (default: rest)
//! - `STOREFRONT_LOCALES_DIR` - Directory of `<lang>.json` translation tables
//!   (default: crates/storefront/locales)
//! - `STOREFRONT_ADMIN_KEY` - Bearer key for catalog writes (high entropy);
//!   catalog writes are refused when unset
//! - `STOREFRONT_SYNC_INTERVAL_SECS` - Catalog resync interval, 0 disables
//!   (default: 300)
//! - `STOREFRONT_MAX_UPLOAD_BYTES` - Avatar upload limit (default: 5 MB)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Default avatar upload limit (5 MB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Default catalog resync interval.
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(300);

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Which backend adapter to use
    pub backend: BackendConfig,
    /// Directory holding `<lang>.json` translation tables
    pub locales_dir: PathBuf,
    /// Bearer key required for catalog writes; `None` refuses them
    pub admin_key: Option<SecretString>,
    /// Catalog resync interval; `None` disables the sync task
    pub sync_interval: Option<Duration>,
    /// Largest accepted avatar upload in bytes
    pub max_upload_bytes: usize,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Backend adapter selection.
#[derive(Debug, Clone)]
pub enum BackendConfig {
    /// The remote REST persistence service.
    Rest(RestBackendConfig),
    /// In-process demo data, for local development.
    Memory,
}

/// Remote persistence service configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct RestBackendConfig {
    /// Base URL of the service
    pub base_url: Url,
    /// Bearer API key
    pub api_key: SecretString,
}

impl std::fmt::Debug for RestBackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestBackendConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl Default for StorefrontConfig {
    /// Local development settings with the in-memory backend.
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            backend: BackendConfig::Memory,
            locales_dir: PathBuf::from("crates/storefront/locales"),
            admin_key: None,
            sync_interval: Some(DEFAULT_SYNC_INTERVAL),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the API key fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let defaults = Self::default();

        let host = parse_env("STOREFRONT_HOST", defaults.host)?;
        let port = parse_env("STOREFRONT_PORT", defaults.port)?;
        let backend = BackendConfig::from_env()?;
        let locales_dir = get_optional_env("STOREFRONT_LOCALES_DIR")
            .map_or(defaults.locales_dir, PathBuf::from);
        let admin_key = get_optional_validated_secret("STOREFRONT_ADMIN_KEY")?;
        let sync_secs: u64 = parse_env(
            "STOREFRONT_SYNC_INTERVAL_SECS",
            DEFAULT_SYNC_INTERVAL.as_secs(),
        )?;
        let sync_interval = (sync_secs > 0).then(|| Duration::from_secs(sync_secs));
        let max_upload_bytes = parse_env("STOREFRONT_MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?;

        Ok(Self {
            host,
            port,
            backend,
            locales_dir,
            admin_key,
            sync_interval,
            max_upload_bytes,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            ..defaults
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl BackendConfig {
    fn from_env() -> Result<Self, ConfigError> {
        match get_env_or_default("STOREFRONT_BACKEND", "rest").as_str() {
            "rest" => Ok(Self::Rest(RestBackendConfig::from_env()?)),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_BACKEND".to_string(),
                format!("expected 'rest' or 'memory', got '{other}'"),
            )),
        }
    }
}

impl RestBackendConfig {
    /// Load the remote service settings on their own.
    ///
    /// Also used by the CLI, which needs no server settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the URL or key is missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let raw_url = get_required_env("LUSTRE_API_URL")?;
        let base_url = parse_base_url(&raw_url, "LUSTRE_API_URL")?;
        let api_key = get_validated_secret("LUSTRE_API_KEY")?;
        Ok(Self { base_url, api_key })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an optional environment variable, falling back to `default`.
fn parse_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Parse an http(s) base URL.
fn parse_base_url(raw: &str, var_name: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "not a base URL".to_string(),
        ));
    }
    Ok(url)
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated key."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

/// Load and validate a secret that may be absent.
fn get_optional_validated_secret(key: &str) -> Result<Option<SecretString>, ConfigError> {
    get_optional_env(key)
        .map(|value| -> Result<SecretString, ConfigError> {
            validate_secret_strength(&value, key)?;
            Ok(SecretString::from(value))
        })
        .transpose()
}
