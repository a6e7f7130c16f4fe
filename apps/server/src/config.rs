//! Server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults.

use std::env;
use std::time::Duration;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP listen port
    pub http_port: u16,

    /// SQLite database file path
    pub database_path: String,

    /// Secret key for signing session tokens
    pub jwt_secret: String,

    /// Session token lifetime in seconds
    pub jwt_lifetime_secs: i64,

    /// API key for the courier tracking provider
    pub klikresi_api_key: String,

    /// Base URL of the courier tracking provider
    pub klikresi_base_url: String,

    /// Timeout for courier tracking requests
    pub tracking_timeout: Duration,

    /// Pause between calls during a tracking sweep
    pub tracking_sweep_delay: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config {
            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("HTTP_PORT".to_string()))?,

            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "./data/gudang.db".to_string()),

            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| {
                // In production, this MUST be set via environment variable
                "gudang-dev-secret-change-in-production".to_string()
            }),

            jwt_lifetime_secs: env::var("JWT_LIFETIME_SECS")
                .unwrap_or_else(|_| "86400".to_string()) // 24 hours
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JWT_LIFETIME_SECS".to_string()))?,

            klikresi_api_key: env::var("KLIKRESI_API_KEY").unwrap_or_default(),

            klikresi_base_url: env::var("KLIKRESI_BASE_URL")
                .unwrap_or_else(|_| "https://klikresi.com".to_string()),

            tracking_timeout: Duration::from_secs(
                env::var("TRACKING_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("TRACKING_TIMEOUT_SECS".to_string()))?,
            ),

            tracking_sweep_delay: Duration::from_millis(
                env::var("TRACKING_SWEEP_DELAY_MS")
                    .unwrap_or_else(|_| "500".to_string())
                    .parse()
                    .map_err(|_| {
                        ConfigError::InvalidValue("TRACKING_SWEEP_DELAY_MS".to_string())
                    })?,
            ),
        };

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
