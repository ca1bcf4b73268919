//! Error types for the product pipeline.

use thiserror::Error;

/// Errors that can occur during pipeline evaluation and adapter I/O.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Product specification holds an unknown or inconsistent value.
    #[error("invalid product spec: {0}")]
    InvalidSpec(String),

    /// Auxiliary array shape differs from the data array.
    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// Coverage disk radius collapsed to zero pixels.
    #[error("coverage disk of radius {radius_km} km covers zero pixels")]
    EmptyDisk { radius_km: f64 },

    /// No plugin registered under (kind, name).
    #[error("no {kind} plugin registered under '{name}'")]
    PluginNotFound { kind: &'static str, name: String },

    /// Surfaced verbatim from a reader adapter.
    #[error("reader adapter error: {0}")]
    ReaderAdapter(String),

    /// Surfaced verbatim from a writer adapter.
    #[error("writer adapter error: {0}")]
    WriterAdapter(String),

    /// Filesystem failure in a built-in adapter.
    #[error("adapter I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Container serialization failure.
    #[error("container serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<sat_common::GridError> for PipelineError {
    fn from(err: sat_common::GridError) -> Self {
        match err {
            sat_common::GridError::ShapeMismatch { expected, actual } => {
                Self::ShapeMismatch { expected, actual }
            }
            other => Self::InvalidSpec(other.to_string()),
        }
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
