//! Sequential transform pipeline driver
//!
//! One notification per invocation, driven through a strict waterfall:
//! unwrap, locate, fetch, transform, write. The first failing stage aborts
//! the rest. Internally the outcome stays an explicit `Result` for logging
//! and tests; outwardly `handle` always emits the single completion signal
//! the invoking runtime supports, so callers must inspect logs to tell
//! success from failure.

use std::sync::Arc;

use tracing::{debug, error, info};
use uuid::Uuid;

use shared::storage::ObjectStore;
use shared::types::{PipelineError, PipelineResult};

use crate::envelope;
use crate::locator::{self, TransformJob};
use crate::transforms::DocumentTransform;

/// Waterfall states of a single invocation. `Failed` is absorbing and
/// reachable from every step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Received,
    Unwrapped,
    Located,
    Fetched,
    Transformed,
    Written,
    Done,
    Failed,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Received => "received",
            PipelineStage::Unwrapped => "unwrapped",
            PipelineStage::Located => "located",
            PipelineStage::Fetched => "fetched",
            PipelineStage::Transformed => "transformed",
            PipelineStage::Written => "written",
            PipelineStage::Done => "done",
            PipelineStage::Failed => "failed",
        }
    }
}

/// Summary of a completed job, used for the success log record.
#[derive(Debug)]
pub struct JobReport {
    pub job: TransformJob,
    pub bytes_written: usize,
}

/// The one terminal signal shape the invoking runtime supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Finished,
}

/// Drives one notification through the transform stages.
pub struct TransformPipeline {
    store: Arc<dyn ObjectStore>,
    transform: Box<dyn DocumentTransform>,
}

impl TransformPipeline {
    pub fn new(store: Arc<dyn ObjectStore>, transform: Box<dyn DocumentTransform>) -> Self {
        Self { store, transform }
    }

    /// Name of the configured transform variant, for health reporting.
    pub fn transform_name(&self) -> &'static str {
        self.transform.name()
    }

    /// Run the waterfall, short-circuiting on the first failure.
    pub async fn run(&self, notification: &str) -> PipelineResult<JobReport> {
        debug!(stage = PipelineStage::Received.as_str(), "Pipeline started");

        let record = envelope::unwrap_notification(notification)?;
        debug!(
            stage = PipelineStage::Unwrapped.as_str(),
            container = %record.storage.container.name,
            key = %record.storage.object.key,
            "Notification unwrapped"
        );

        let job = locator::locate(&record, self.transform.extension());
        debug!(
            stage = PipelineStage::Located.as_str(),
            dest_container = %job.dest_container,
            dest_key = %job.dest_key,
            "Transform job located"
        );

        let raw = self
            .store
            .get_object(&job.source_container, &job.source_key)
            .await
            .map_err(|e| {
                PipelineError::Fetch(format!(
                    "s3://{}/{}: {}",
                    job.source_container, job.source_key, e
                ))
            })?;
        debug!(
            stage = PipelineStage::Fetched.as_str(),
            bytes = raw.len(),
            "Source object fetched"
        );

        let source = String::from_utf8_lossy(&raw);
        let payload = self.transform.convert(&source);
        debug!(
            stage = PipelineStage::Transformed.as_str(),
            content_type = payload.content_type,
            "Content transformed"
        );

        let content_type = payload.content_type;
        let body = payload.body.into_bytes();
        let bytes_written = body.len();
        self.store
            .put_object(&job.dest_container, &job.dest_key, body, content_type)
            .await
            .map_err(|e| {
                PipelineError::Write(format!(
                    "s3://{}/{}: {}",
                    job.dest_container, job.dest_key, e
                ))
            })?;
        debug!(
            stage = PipelineStage::Written.as_str(),
            bytes = bytes_written,
            "Derived object written"
        );

        Ok(JobReport { job, bytes_written })
    }

    /// Outward adapter for the invoking runtime.
    ///
    /// Always yields exactly one success-shaped completion signal, even
    /// after a failure; the success/failure distinction lives in the logs.
    pub async fn handle(&self, notification: &str) -> Completion {
        let invocation_id = Uuid::new_v4();
        info!(
            %invocation_id,
            transform = self.transform.name(),
            "Notification received"
        );

        match self.run(notification).await {
            Ok(report) => {
                info!(
                    %invocation_id,
                    stage = PipelineStage::Done.as_str(),
                    source = %format!("{}/{}", report.job.source_container, report.job.source_key),
                    dest = %format!("{}/{}", report.job.dest_container, report.job.dest_key),
                    bytes = report.bytes_written,
                    "Pipeline completed"
                );
            }
            Err(e) => {
                error!(
                    %invocation_id,
                    stage = PipelineStage::Failed.as_str(),
                    kind = e.kind(),
                    error = %e,
                    "Pipeline failed"
                );
            }
        }

        Completion::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::mock;

    use crate::envelope::tests::notification_fixture;
    use crate::transforms::{transform_for, TransformVariant};
    use shared::storage::StorageError;

    mock! {
        Store {}

        #[async_trait]
        impl ObjectStore for Store {
            async fn get_object(&self, container: &str, key: &str) -> Result<Vec<u8>, StorageError>;
            async fn put_object(
                &self,
                container: &str,
                key: &str,
                body: Vec<u8>,
                content_type: &str,
            ) -> Result<(), StorageError>;
        }
    }

    fn pipeline_with(store: MockStore, variant: TransformVariant) -> TransformPipeline {
        TransformPipeline::new(Arc::new(store), transform_for(variant))
    }

    #[tokio::test]
    async fn test_html_pipeline_end_to_end() {
        let mut store = MockStore::new();
        store
            .expect_get_object()
            .withf(|container, key| container == "site" && key == "index.md")
            .times(1)
            .returning(|_, _| Ok(b"# Hi".to_vec()));
        store
            .expect_put_object()
            .withf(|container, key, body, content_type| {
                container == "site-out"
                    && key == "index.html"
                    && content_type == "text/html"
                    && std::str::from_utf8(body).unwrap().contains("<h1>Hi</h1>")
            })
            .times(1)
            .returning(|_, _, _, _| Ok(()));

        let pipeline = pipeline_with(store, TransformVariant::Html);
        let report = pipeline
            .run(&notification_fixture("site", "index.md"))
            .await
            .unwrap();

        assert_eq!(report.job.dest_container, "site-out");
        assert_eq!(report.job.dest_key, "index.html");
    }

    #[tokio::test]
    async fn test_plaintext_pipeline_end_to_end() {
        let mut store = MockStore::new();
        store
            .expect_get_object()
            .times(1)
            .returning(|_, _| Ok(b"# Title\n\n**bold** text".to_vec()));
        store
            .expect_put_object()
            .withf(|container, key, body, content_type| {
                let text = std::str::from_utf8(body).unwrap();
                container == "docs-in-out"
                    && key == "notes.txt"
                    && content_type == "text/plain"
                    && text.contains("Title")
                    && text.contains("bold text")
                    && !text.contains('#')
            })
            .times(1)
            .returning(|_, _, _, _| Ok(()));

        let pipeline = pipeline_with(store, TransformVariant::Plaintext);
        pipeline
            .run(&notification_fixture("docs-in", "notes.md"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_multi_dot_key_is_truncated_at_first_dot() {
        let mut store = MockStore::new();
        store
            .expect_get_object()
            .times(1)
            .returning(|_, _| Ok(b"body".to_vec()));
        store
            .expect_put_object()
            .withf(|_, key, _, _| key == "report.html")
            .times(1)
            .returning(|_, _, _, _| Ok(()));

        let pipeline = pipeline_with(store, TransformVariant::Html);
        pipeline
            .run(&notification_fixture("docs-in", "report.v2.md"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_before_write() {
        let mut store = MockStore::new();
        store
            .expect_get_object()
            .times(1)
            .returning(|container, key| {
                Err(StorageError::NotFound(format!("{}/{}", container, key)))
            });
        // No put_object expectation: a write attempt would panic the mock.

        let pipeline = pipeline_with(store, TransformVariant::Html);
        let err = pipeline
            .run(&notification_fixture("site", "missing.md"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "fetch");
        assert!(err.to_string().contains("site/missing.md"));
    }

    #[tokio::test]
    async fn test_write_failure_surfaces_destination_coordinates() {
        let mut store = MockStore::new();
        store
            .expect_get_object()
            .times(1)
            .returning(|_, _| Ok(b"# Hi".to_vec()));
        store
            .expect_put_object()
            .times(1)
            .returning(|_, _, _, _| Err(StorageError::Upload("quota exceeded".to_string())));

        let pipeline = pipeline_with(store, TransformVariant::Html);
        let err = pipeline
            .run(&notification_fixture("site", "index.md"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "write");
        assert!(err.to_string().contains("site-out/index.html"));
    }

    #[tokio::test]
    async fn test_malformed_envelope_never_touches_storage() {
        // Any storage call would panic: the mock has no expectations.
        let store = MockStore::new();
        let pipeline = pipeline_with(store, TransformVariant::Html);

        let err = pipeline.run("not an envelope").await.unwrap_err();
        assert_eq!(err.kind(), "malformed_envelope");
    }

    #[tokio::test]
    async fn test_handle_signals_completion_after_failure() {
        let store = MockStore::new();
        let pipeline = pipeline_with(store, TransformVariant::Html);

        let completion = pipeline.handle("not an envelope").await;
        assert_eq!(completion, Completion::Finished);
    }

    #[tokio::test]
    async fn test_handle_signals_completion_after_success() {
        let mut store = MockStore::new();
        store
            .expect_get_object()
            .times(1)
            .returning(|_, _| Ok(b"# Hi".to_vec()));
        store
            .expect_put_object()
            .times(1)
            .returning(|_, _, _, _| Ok(()));

        let pipeline = pipeline_with(store, TransformVariant::Html);
        let completion = pipeline.handle(&notification_fixture("site", "index.md")).await;
        assert_eq!(completion, Completion::Finished);
    }
}
