//! Object storage collaborator for the transform pipeline
//!
//! The pipeline is a pure consumer of this interface: one fetch, one write,
//! each assumed reliable per call (no partial writes, no retries).

pub mod object_client;

pub use object_client::HttpObjectStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage error types
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Download error: {0}")]
    Download(String),

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("Storage error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Object storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectStoreConfig {
    pub endpoint: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub request_timeout_seconds: u64,
    pub max_object_size_bytes: u64,
}

impl Default for ObjectStoreConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:9000".to_string(), // MinIO default
            region: "us-east-1".to_string(),
            access_key_id: "minioadmin".to_string(),
            secret_access_key: "minioadmin".to_string(),
            request_timeout_seconds: 300,
            max_object_size_bytes: 104_857_600, // 100 MB
        }
    }
}

/// Abstraction over the container/key object store
///
/// `get_object` and `put_object` are the only suspension points in a
/// pipeline invocation; implementations are constructed once per process
/// and shared across invocations.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the full object body from `container`/`key`.
    async fn get_object(&self, container: &str, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Write `body` to `container`/`key`, tagging it with `content_type`.
    async fn put_object(
        &self,
        container: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_store_config_default() {
        let config = ObjectStoreConfig::default();
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.max_object_size_bytes, 104_857_600);
    }

    #[test]
    fn trait_is_object_safe() {
        fn _accepts(_: &dyn ObjectStore) {}
    }
}
