//! Error types for deck ingestion.

use thiserror::Error;

/// Errors that can occur during deck parsing and sector generation.
#[derive(Debug, Error)]
pub enum DeckError {
    /// A deck line that could not be parsed. Recoverable; the parser
    /// logs and skips these.
    #[error("deck parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// Storm year could not be derived from the deck filename.
    #[error("cannot derive storm year from deck filename: {0}")]
    BadFilename(String),

    /// Failure while building or writing a sector record.
    #[error(transparent)]
    Catalog(#[from] sector_catalog::CatalogError),

    /// Deck file could not be read.
    #[error("deck I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for deck ingestion.
pub type Result<T> = std::result::Result<T, DeckError>;
