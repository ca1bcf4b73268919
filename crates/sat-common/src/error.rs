//! Error types shared across the toolkit crates.

use thiserror::Error;

/// Errors raised by grid construction and shape checks.
#[derive(Debug, Error)]
pub enum GridError {
    /// Buffer length does not match the declared dimensions.
    #[error("buffer length {actual} does not match {width}x{height} grid")]
    BufferMismatch {
        width: usize,
        height: usize,
        actual: usize,
    },

    /// Two grids that must share a shape do not.
    #[error("grid shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
}

/// Errors raised while parsing timestamps.
#[derive(Debug, Error)]
pub enum TimeParseError {
    #[error("invalid time format: {0}")]
    InvalidFormat(String),
}
