//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; defaults suit a local checkout of the repo.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL (default: <http://localhost:3000>); `https://` enables secure cookies
//! - `STOREFRONT_STATIC_DIR` - Static assets directory (default: crates/storefront/static)
//! - `CATALOG_SOURCE` - Catalog document: an `http(s)://` URL or a file path
//!   (default: crates/storefront/static/products.json)
//! - `CHECKOUT_PHONE` - WhatsApp number orders are handed off to, digits only
//!   (default: 201222292977)
//! - `CURRENCY_LABEL` - Appended to rendered prices (default: ج.م)
//! - `FEATURED_COUNT` - Products shown on the home page (default: 9)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate, 0.0-1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0-1.0 (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::CatalogSource;

const DEFAULT_CATALOG_SOURCE: &str = "crates/storefront/static/products.json";
const DEFAULT_STATIC_DIR: &str = "crates/storefront/static";
const DEFAULT_CHECKOUT_PHONE: &str = "201222292977";
const DEFAULT_CURRENCY_LABEL: &str = "ج.م";
const DEFAULT_FEATURED_COUNT: &str = "9";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Where the product catalog is fetched from
    pub catalog_source: CatalogSource,
    /// Checkout hand-off settings
    pub checkout: CheckoutConfig,
    /// Number of products on the home page
    pub featured_count: usize,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry transaction sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Messaging hand-off configuration.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// International phone number, digits only
    pub phone: String,
    /// Label appended to rendered prices
    pub currency_label: String,
}

impl StorefrontConfig {
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

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars(&lookup);

        let host = vars
            .get_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = vars
            .get_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = vars.get_or_default("STOREFRONT_BASE_URL", "http://localhost:3000");
        url::Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("STOREFRONT_BASE_URL".to_string(), e.to_string())
        })?;

        let static_dir = PathBuf::from(
            vars.get_or_default("STOREFRONT_STATIC_DIR", DEFAULT_STATIC_DIR),
        );
        let catalog_source = vars
            .get_or_default("CATALOG_SOURCE", DEFAULT_CATALOG_SOURCE)
            .parse::<CatalogSource>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CATALOG_SOURCE".to_string(), e.to_string())
            })?;

        let checkout = CheckoutConfig::from_vars(&vars)?;

        let featured_count = vars
            .get_or_default("FEATURED_COUNT", DEFAULT_FEATURED_COUNT)
            .parse::<usize>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("FEATURED_COUNT".to_string(), e.to_string())
            })?;

        Ok(Self {
            host,
            port,
            base_url,
            static_dir,
            catalog_source,
            checkout,
            featured_count,
            sentry_dsn: vars.get("SENTRY_DSN"),
            sentry_environment: vars.get("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: vars.sample_rate("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: vars.sample_rate("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl CheckoutConfig {
    fn from_vars(vars: &Vars<'_>) -> Result<Self, ConfigError> {
        let phone = vars.get_or_default("CHECKOUT_PHONE", DEFAULT_CHECKOUT_PHONE);
        validate_phone(&phone)?;

        Ok(Self {
            phone,
            currency_label: vars.get_or_default("CURRENCY_LABEL", DEFAULT_CURRENCY_LABEL),
        })
    }
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            phone: DEFAULT_CHECKOUT_PHONE.to_string(),
            currency_label: DEFAULT_CURRENCY_LABEL.to_string(),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup with the usual optional/default helpers.
struct Vars<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Vars<'_> {
    /// Get an optional variable; blank values count as unset.
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn get_or_default(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Get a sample rate in `0.0..=1.0`.
    fn sample_rate(&self, key: &str, default: f32) -> Result<f32, ConfigError> {
        let Some(raw) = self.get(key) else {
            return Ok(default);
        };
        let rate = raw
            .parse::<f32>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
        if (0.0..=1.0).contains(&rate) {
            Ok(rate)
        } else {
            Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("must be between 0.0 and 1.0 (got {rate})"),
            ))
        }
    }
}

/// The hand-off URL scheme takes the number as bare digits with country code.
fn validate_phone(phone: &str) -> Result<(), ConfigError> {
    if phone.len() < 8 || !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::InvalidEnvVar(
            "CHECKOUT_PHONE".to_string(),
            "must be at least 8 digits with country code and no '+' or spaces".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.checkout.phone, "201222292977");
        assert_eq!(config.checkout.currency_label, "ج.م");
        assert_eq!(config.featured_count, 9);
        assert!(matches!(config.catalog_source, CatalogSource::File(_)));
        assert!(config.sentry_dsn.is_none());
        assert!(!config.is_secure());
    }

    #[test]
    fn test_socket_addr() {
        let config =
            config_from(&[("STOREFRONT_HOST", "0.0.0.0"), ("STOREFRONT_PORT", "8080")]).unwrap();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "0.0.0.0");
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_invalid_port() {
        let err = config_from(&[("STOREFRONT_PORT", "http")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "STOREFRONT_PORT"));
    }

    #[test]
    fn test_http_catalog_source() {
        let config = config_from(&[("CATALOG_SOURCE", "https://cdn.example.com/products.json")])
            .unwrap();
        assert!(matches!(config.catalog_source, CatalogSource::Http(_)));
    }

    #[test]
    fn test_phone_must_be_digits() {
        assert!(config_from(&[("CHECKOUT_PHONE", "+20 122 229 2977")]).is_err());
        assert!(config_from(&[("CHECKOUT_PHONE", "123")]).is_err());
        assert!(config_from(&[("CHECKOUT_PHONE", "249912345678")]).is_ok());
    }

    #[test]
    fn test_sample_rate_bounds() {
        assert!(config_from(&[("SENTRY_SAMPLE_RATE", "1.5")]).is_err());
        let config = config_from(&[("SENTRY_TRACES_SAMPLE_RATE", "0.25")]).unwrap();
        assert!((config.sentry_traces_sample_rate - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = config_from(&[("CURRENCY_LABEL", "  "), ("SENTRY_DSN", "")]).unwrap();
        assert_eq!(config.checkout.currency_label, "ج.م");
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_secure_base_url() {
        let config = config_from(&[("STOREFRONT_BASE_URL", "https://shop.example.com")]).unwrap();
        assert!(config.is_secure());
        assert!(config_from(&[("STOREFRONT_BASE_URL", "not a url")]).is_err());
    }
}
