//! Observability utilities for the Docmill services
//!
//! Provides centralized logging setup; pipeline outcomes are conveyed
//! through log records, so every service initializes this first.

pub mod logging;

pub use logging::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObservabilityError {
    #[error("Logging setup error: {0}")]
    Logging(String),
}

pub type ObservabilityResult<T> = Result<T, ObservabilityError>;
