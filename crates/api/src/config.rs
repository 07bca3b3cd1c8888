//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `MANDI_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `MANDI_SESSION_SECRET` - Session token signing secret (min 32 chars)
//! - `GEMINI_API_KEY` - Generative AI API key
//! - `CLOUDINARY_CLOUD_NAME` - Image host account name
//! - `CLOUDINARY_API_KEY` - Image host API key
//! - `CLOUDINARY_API_SECRET` - Image host API secret
//! - `RAZORPAY_KEY_ID` - Payment gateway public key id
//! - `RAZORPAY_KEY_SECRET` - Payment gateway secret
//!
//! ## Optional
//! - `MANDI_HOST` - Bind address (default: 127.0.0.1)
//! - `MANDI_PORT` - Listen port (default: 5001)
//! - `MANDI_BASE_URL` - Public URL (default: <http://localhost:5001>)
//! - `MANDI_ALLOWED_ORIGINS` - Comma-separated browser origins for CORS
//! - `GEMINI_MODEL` - Model name (default: gemini-1.5-flash-latest)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SESSION_SECRET_LENGTH: usize = 32;

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

/// Mandi API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL; https here turns on hardened cookie attributes
    pub base_url: String,
    /// Session token signing secret
    pub session_secret: SecretString,
    /// Browser origins allowed by CORS
    pub allowed_origins: Vec<String>,
    /// Generative AI configuration
    pub gemini: GeminiConfig,
    /// Image host configuration
    pub cloudinary: CloudinaryConfig,
    /// Payment gateway configuration
    pub razorpay: RazorpayConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// Generative AI API configuration.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key (sent as a query parameter)
    pub api_key: SecretString,
    /// Model name, e.g. gemini-1.5-flash-latest
    pub model: String,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

/// Image host (Cloudinary) configuration.
#[derive(Clone)]
pub struct CloudinaryConfig {
    /// Account cloud name (part of the upload URL)
    pub cloud_name: String,
    /// API key (sent with each upload)
    pub api_key: String,
    /// API secret (used to sign uploads)
    pub api_secret: SecretString,
}

impl std::fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}

/// Payment gateway (Razorpay) configuration.
#[derive(Clone)]
pub struct RazorpayConfig {
    /// Public key id, also echoed to clients for checkout initiation
    pub key_id: String,
    /// Secret used for basic auth and callback signature verification
    pub key_secret: SecretString,
}

impl std::fmt::Debug for RazorpayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayConfig")
            .field("key_id", &self.key_id)
            .field("key_secret", &"[REDACTED]")
            .finish()
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the session secret fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("MANDI_DATABASE_URL")?;
        let host = get_env_or_default("MANDI_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("MANDI_HOST".to_owned(), e.to_string()))?;
        let port = get_env_or_default("MANDI_PORT", "5001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("MANDI_PORT".to_owned(), e.to_string()))?;
        let base_url = get_env_or_default("MANDI_BASE_URL", "http://localhost:5001");

        let session_secret = get_required_secret("MANDI_SESSION_SECRET")?;
        validate_session_secret(&session_secret, "MANDI_SESSION_SECRET")?;

        let allowed_origins = get_optional_env("MANDI_ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_secret,
            allowed_origins,
            gemini: GeminiConfig::from_env()?,
            cloudinary: CloudinaryConfig::from_env()?,
            razorpay: RazorpayConfig::from_env()?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the public base URL is served over https.
    ///
    /// Controls the session cookie's `Secure`/`SameSite` attributes.
    #[must_use]
    pub fn is_https(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl GeminiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: get_required_secret("GEMINI_API_KEY")?,
            model: get_env_or_default("GEMINI_MODEL", "gemini-1.5-flash-latest"),
        })
    }
}

impl CloudinaryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            cloud_name: get_required_env("CLOUDINARY_CLOUD_NAME")?,
            api_key: get_required_env("CLOUDINARY_API_KEY")?,
            api_secret: get_required_secret("CLOUDINARY_API_SECRET")?,
        })
    }
}

impl RazorpayConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            key_id: get_required_env("RAZORPAY_KEY_ID")?,
            key_secret: get_required_secret("RAZORPAY_KEY_SECRET")?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_owned()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_owned()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Validate that a session secret is long enough and not a placeholder.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_owned(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }

    let lower = value.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_owned(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_session_secret_too_short() {
        let secret = SecretString::from("short");
        assert!(validate_session_secret(&secret, "TEST").is_err());
    }

    #[test]
    fn test_validate_session_secret_placeholder() {
        let secret = SecretString::from("your-session-signing-key-goes-here-32");
        let err = validate_session_secret(&secret, "TEST").unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_session_secret_valid() {
        let secret = SecretString::from("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6(dE1)");
        assert!(validate_session_secret(&secret, "TEST").is_ok());
    }

    #[test]
    fn test_is_https() {
        let mut config = test_config();
        assert!(!config.is_https());
        config.base_url = "https://mandi.example".to_owned();
        assert!(config.is_https());
    }

    #[test]
    fn test_socket_addr() {
        let config = test_config();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 5001);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = test_config();
        let output = format!("{config:?}");
        assert!(output.contains("[REDACTED]"));
        assert!(!output.contains("gemini-key-value"));
        assert!(!output.contains("cloudinary-secret-value"));
        assert!(!output.contains("razorpay-secret-value"));
    }

    fn test_config() -> ApiConfig {
        ApiConfig {
            database_url: SecretString::from("postgres://localhost/mandi_test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 5001,
            base_url: "http://localhost:5001".to_owned(),
            session_secret: SecretString::from("k".repeat(48)),
            allowed_origins: vec!["http://localhost:5173".to_owned()],
            gemini: GeminiConfig {
                api_key: SecretString::from("gemini-key-value"),
                model: "gemini-1.5-flash-latest".to_owned(),
            },
            cloudinary: CloudinaryConfig {
                cloud_name: "mandi-test".to_owned(),
                api_key: "1234567890".to_owned(),
                api_secret: SecretString::from("cloudinary-secret-value"),
            },
            razorpay: RazorpayConfig {
                key_id: "rzp_test_abc".to_owned(),
                key_secret: SecretString::from("razorpay-secret-value"),
            },
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}
