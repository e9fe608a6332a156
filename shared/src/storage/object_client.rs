//! S3-compatible object storage client
//!
//! Path-style HTTP client for AWS S3 or compatible services (MinIO,
//! DigitalOcean Spaces, etc.). Authentication headers are simplified; in
//! production use proper AWS SigV4 signing.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, info};

use super::{ObjectStore, ObjectStoreConfig, StorageError};

/// Object storage client backed by an S3-compatible HTTP endpoint
pub struct HttpObjectStore {
    config: ObjectStoreConfig,
    http_client: Client,
}

impl HttpObjectStore {
    /// Create a new storage client
    pub fn new(config: ObjectStoreConfig) -> anyhow::Result<Self> {
        info!(endpoint = %config.endpoint, "Initializing object storage client");

        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn object_url(&self, container: &str, key: &str) -> String {
        format!("{}/{}/{}", self.config.endpoint, container, key)
    }

    /// Build HTTP headers for a storage request
    fn build_headers(&self, content_type: &str) -> reqwest::header::HeaderMap {
        let mut headers = reqwest::header::HeaderMap::new();

        if let Ok(value) = content_type.parse() {
            headers.insert(reqwest::header::CONTENT_TYPE, value);
        }

        // Simplified auth headers; production deployments sign with SigV4.
        if let Ok(value) = chrono::Utc::now()
            .format("%Y%m%dT%H%M%SZ")
            .to_string()
            .parse()
        {
            headers.insert("x-amz-date", value);
        }
        if let Ok(value) = format!("AWS {}:{}", self.config.access_key_id, "simplified-signature")
            .parse()
        {
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }

        headers
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn get_object(&self, container: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        debug!(container, key, "Downloading object");

        let url = self.object_url(container, key);
        let response = self
            .http_client
            .get(&url)
            .headers(self.build_headers("application/octet-stream"))
            .send()
            .await
            .map_err(|e| StorageError::Download(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {
                let data = response
                    .bytes()
                    .await
                    .map_err(|e| StorageError::Download(e.to_string()))?
                    .to_vec();

                if data.len() as u64 > self.config.max_object_size_bytes {
                    return Err(StorageError::Download(format!(
                        "object {}/{} is {} bytes, limit is {}",
                        container,
                        key,
                        data.len(),
                        self.config.max_object_size_bytes
                    )));
                }

                debug!(container, key, bytes = data.len(), "Object downloaded");
                Ok(data)
            }
            reqwest::StatusCode::NOT_FOUND => {
                Err(StorageError::NotFound(format!("{}/{}", container, key)))
            }
            status => {
                let error_text = response.text().await.unwrap_or_default();
                error!(container, key, %status, "Object download failed: {}", error_text);
                Err(StorageError::Download(format!(
                    "{}/{}: {}",
                    container, key, status
                )))
            }
        }
    }

    async fn put_object(
        &self,
        container: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        debug!(container, key, bytes = body.len(), content_type, "Uploading object");

        if body.len() as u64 > self.config.max_object_size_bytes {
            return Err(StorageError::Upload(format!(
                "payload is {} bytes, limit is {}",
                body.len(),
                self.config.max_object_size_bytes
            )));
        }

        let url = self.object_url(container, key);
        let response = self
            .http_client
            .put(&url)
            .headers(self.build_headers(content_type))
            .body(body)
            .send()
            .await
            .map_err(|e| StorageError::Upload(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!(container, key, %status, "Object upload failed: {}", error_text);
            return Err(StorageError::Upload(format!(
                "{}/{}: {}",
                container, key, status
            )));
        }

        info!(container, key, "Object uploaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_url_is_path_style() {
        let client = HttpObjectStore::new(ObjectStoreConfig::default()).unwrap();
        assert_eq!(
            client.object_url("site-out", "index.html"),
            "http://localhost:9000/site-out/index.html"
        );
    }

    #[test]
    fn test_headers_carry_content_type() {
        let client = HttpObjectStore::new(ObjectStoreConfig::default()).unwrap();
        let headers = client.build_headers("text/html");
        assert_eq!(headers.get(reqwest::header::CONTENT_TYPE).unwrap(), "text/html");
        assert!(headers.contains_key("x-amz-date"));
    }
}
