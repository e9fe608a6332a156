//! Shared utilities and types for Docmill services
//!
//! Everything that more than one service needs lives here: the pipeline
//! error taxonomy, logging setup, and the object storage client.

pub mod observability;
pub mod storage;
pub mod types;

pub use types::error::PipelineError;
