//! Error types
//!
//! Only `TurnError` ever reaches a caller. Every other error is caught at
//! its call site, logged, and replaced by that site's fallback.

use std::time::Duration;
use thiserror::Error;

/// External text generation failed
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation failed: {0}")]
    Failed(String),

    #[error("generation timed out after {0:?}")]
    Timeout(Duration),

    #[error("generator unavailable")]
    Unavailable,
}

/// External classification failed
#[derive(Debug, Error)]
pub enum ClassificationError {
    #[error("classification failed: {0}")]
    Failed(String),

    #[error("classification timed out after {0:?}")]
    Timeout(Duration),
}

/// Session store read or write failed
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("store unavailable")]
    Unavailable,
}

/// Rule config overrides could not be loaded
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Quality event could not be recorded
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sink serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Turn-level failure surfaced to the caller
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("draft generation failed: {0}")]
    Draft(#[source] GenerationError),

    #[error("empty user input")]
    EmptyInput,
}
