//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, DonationConfig, Environment,
    GatewayConfig, MailConfig, RateLimitConfig, ServerConfig,
};
