//! Shared type definitions for the Docmill document pipeline

pub mod error;

pub use error::PipelineError;

/// Result alias used throughout the transform pipeline
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
