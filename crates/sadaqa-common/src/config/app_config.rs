//! Application configuration structs
//!
//! Loads configuration from environment variables and an optional .env file.

use serde::Deserialize;
use std::env;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub gateway: GatewayConfig,
    pub mail: MailConfig,
    pub donations: DonationConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Payment gateway configuration
///
/// The webhook secret signs every inbound event; the API key authorizes
/// outbound create calls. Both are required, there is no safe default.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_base_url")]
    pub base_url: String,
    pub secret_key: String,
    pub webhook_secret: String,
    #[serde(default = "default_gateway_timeout_secs")]
    pub timeout_secs: u64,
}

/// Outbound receipt mail configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    /// When false, receipts are logged instead of sent.
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub smtp_username: Option<String>,
    #[serde(default)]
    pub smtp_password: Option<String>,
    #[serde(default = "default_mail_from")]
    pub from_address: String,
    #[serde(default = "default_mail_from_name")]
    pub from_name: String,
}

/// Donation intake defaults
#[derive(Debug, Clone, Deserialize)]
pub struct DonationConfig {
    #[serde(default = "default_currency")]
    pub default_currency: String,
    /// Product label attached to recurring billing plans at the processor.
    #[serde(default = "default_recurring_product_name")]
    pub recurring_product_name: String,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

// Default value functions
fn default_app_name() -> String {
    "sadaqa-server".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_gateway_base_url() -> String {
    "https://api.stripe.com".to_string()
}

fn default_gateway_timeout_secs() -> u64 {
    30
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_mail_from() -> String {
    "donations@example.org".to_string()
}

fn default_mail_from_name() -> String {
    "Donations".to_string()
}

fn default_currency() -> String {
    "gbp".to_string()
}

fn default_recurring_product_name() -> String {
    "Recurring donation".to_string()
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            api: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| default_host()),
                port: env::var("API_PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .ok_or(ConfigError::MissingVar("API_PORT"))?,
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_max_connections),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_min_connections),
            },
            gateway: GatewayConfig {
                base_url: env::var("PAYMENT_GATEWAY_URL")
                    .unwrap_or_else(|_| default_gateway_base_url()),
                secret_key: env::var("PAYMENT_SECRET_KEY")
                    .map_err(|_| ConfigError::MissingVar("PAYMENT_SECRET_KEY"))?,
                webhook_secret: env::var("PAYMENT_WEBHOOK_SECRET")
                    .map_err(|_| ConfigError::MissingVar("PAYMENT_WEBHOOK_SECRET"))?,
                timeout_secs: env::var("PAYMENT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_gateway_timeout_secs),
            },
            mail: MailConfig {
                enabled: env::var("MAIL_ENABLED")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(false),
                smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| default_smtp_host()),
                smtp_port: env::var("SMTP_PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_smtp_port),
                smtp_username: env::var("SMTP_USERNAME").ok(),
                smtp_password: env::var("SMTP_PASSWORD").ok(),
                from_address: env::var("MAIL_FROM").unwrap_or_else(|_| default_mail_from()),
                from_name: env::var("MAIL_FROM_NAME").unwrap_or_else(|_| default_mail_from_name()),
            },
            donations: DonationConfig {
                default_currency: env::var("DONATION_CURRENCY")
                    .map(|s| s.to_lowercase())
                    .unwrap_or_else(|_| default_currency()),
                recurring_product_name: env::var("DONATION_RECURRING_PRODUCT")
                    .unwrap_or_else(|_| default_recurring_product_name()),
            },
            rate_limit: RateLimitConfig {
                requests_per_second: env::var("RATE_LIMIT_REQUESTS_PER_SECOND")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_requests_per_second),
                burst: env::var("RATE_LIMIT_BURST")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_burst),
            },
            cors: CorsConfig {
                allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .ok()
                    .map(|s| s.split(',').map(str::trim).map(String::from).collect())
                    .unwrap_or_default(),
            },
        })
    }

    /// Reject configurations that cannot safely serve production traffic
    ///
    /// # Errors
    /// Returns an error for placeholder secrets in production
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.app.env.is_production() {
            if self.gateway.secret_key.trim().is_empty()
                || self.gateway.secret_key.starts_with("sk_test")
            {
                return Err(ConfigError::InvalidValue(
                    "PAYMENT_SECRET_KEY",
                    "production requires a live secret key".to_string(),
                ));
            }
            if self.gateway.webhook_secret.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "PAYMENT_WEBHOOK_SECRET",
                    "must not be empty".to_string(),
                ));
            }
            if self.cors.allowed_origins.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "CORS_ALLOWED_ORIGINS",
                    "production requires explicit origins".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
