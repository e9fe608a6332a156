//! Configuration for the bootstrap service

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Main configuration structure for the bootstrap service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub permissions_endpoint: String,
    pub request_timeout_seconds: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            server: ServerConfig::from_env()?,
            permissions_endpoint: env::var("PERMISSIONS_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:9001".to_string()),
            request_timeout_seconds: env::var("REQUEST_TIMEOUT")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("Invalid REQUEST_TIMEOUT")?,
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;
        if self.permissions_endpoint.is_empty() {
            anyhow::bail!("Permissions endpoint cannot be empty");
        }
        if self.request_timeout_seconds == 0 {
            anyhow::bail!("Request timeout must be greater than 0");
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            permissions_endpoint: "http://localhost:9001".to_string(),
            request_timeout_seconds: 30,
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8011".to_string())
                .parse()
                .context("Invalid SERVER_PORT")?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8011,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.server.port, 8011);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_empty_endpoint() {
        let mut config = Config::default();
        config.permissions_endpoint = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let mut config = Config::default();
        config.request_timeout_seconds = 0;
        assert!(config.validate().is_err());
    }
}
