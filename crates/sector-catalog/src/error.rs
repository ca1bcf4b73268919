//! Error types for sector catalog operations.

use thiserror::Error;

/// Errors that can occur while building or persisting sector records.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Unknown sector type string.
    #[error("invalid sector type: {0}")]
    InvalidSectorType(String),

    /// Sector shape or resolution is not strictly positive.
    #[error("invalid sector geometry: {0}")]
    InvalidGeometry(String),

    /// Required sector_info key missing for the given sector type.
    #[error("sector_info missing required key '{key}' for sector type '{sector_type}'")]
    MissingInfo {
        key: &'static str,
        sector_type: String,
    },

    /// Catalog write or directory creation failure.
    #[error("catalog I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record serialization/deserialization failure.
    #[error("catalog serialization error: {0}")]
    Serialize(#[from] serde_yaml::Error),

    /// Serialized record did not contain exactly one named sector.
    #[error("malformed catalog record: {0}")]
    MalformedRecord(String),
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
