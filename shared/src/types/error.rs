//! Error taxonomy for the transform pipeline
//!
//! Every variant is invocation-fatal: the pipeline never retries, a failing
//! stage aborts the remaining stages and the invocation reports its outcome
//! through logs only.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The notification envelope could not be decoded into a storage event,
    /// or its outer/inner structure is missing expected fields.
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// The source object could not be read from storage.
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// The transformed object could not be written to storage.
    #[error("Write error: {0}")]
    Write(String),
}

impl PipelineError {
    /// Stable lowercase tag for structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::MalformedEnvelope(_) => "malformed_envelope",
            PipelineError::Fetch(_) => "fetch",
            PipelineError::Write(_) => "write",
        }
    }
}
