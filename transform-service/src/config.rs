//! Configuration for the transform worker
//!
//! Environment-variable driven, with defaults suitable for local
//! development against a MinIO endpoint.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

use shared::storage::ObjectStoreConfig;

use crate::transforms::TransformVariant;

/// Main configuration structure for the transform worker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: ObjectStoreConfig,
    pub variant: TransformVariant,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            server: ServerConfig::from_env()?,
            storage: storage_from_env()?,
            variant: env::var("TRANSFORM_VARIANT")
                .unwrap_or_else(|_| "html".to_string())
                .parse()
                .context("Invalid TRANSFORM_VARIANT")?,
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;
        if self.storage.endpoint.is_empty() {
            anyhow::bail!("Storage endpoint cannot be empty");
        }
        if self.storage.max_object_size_bytes == 0 {
            anyhow::bail!("Max object size must be greater than 0");
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: ObjectStoreConfig::default(),
            variant: TransformVariant::Html,
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
                .unwrap_or_else(|_| "8010".to_string())
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
            port: 8010,
        }
    }
}

fn storage_from_env() -> Result<ObjectStoreConfig> {
    Ok(ObjectStoreConfig {
        endpoint: env::var("STORAGE_ENDPOINT")
            .unwrap_or_else(|_| "http://localhost:9000".to_string()),
        region: env::var("STORAGE_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
        access_key_id: env::var("STORAGE_ACCESS_KEY").unwrap_or_else(|_| "minioadmin".to_string()),
        secret_access_key: env::var("STORAGE_SECRET_KEY")
            .unwrap_or_else(|_| "minioadmin".to_string()),
        request_timeout_seconds: env::var("STORAGE_REQUEST_TIMEOUT")
            .unwrap_or_else(|_| "300".to_string())
            .parse()
            .context("Invalid STORAGE_REQUEST_TIMEOUT")?,
        max_object_size_bytes: env::var("MAX_OBJECT_SIZE_BYTES")
            .unwrap_or_else(|_| "104857600".to_string())
            .parse()
            .context("Invalid MAX_OBJECT_SIZE_BYTES")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_creation() {
        let config = Config::default();
        assert_eq!(config.server.port, 8010);
        assert_eq!(config.variant, TransformVariant::Html);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_server_config_validation() {
        let mut config = ServerConfig::default();
        assert!(config.validate().is_ok());

        config.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_storage_validation() {
        let mut config = Config::default();
        config.storage.endpoint = String::new();
        assert!(config.validate().is_err());

        config.storage.endpoint = "http://localhost:9000".to_string();
        config.storage.max_object_size_bytes = 0;
        assert!(config.validate().is_err());
    }
}
