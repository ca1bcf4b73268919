//! Shared types for the storm-sector imaging toolkit.
//!
//! Provides the masked pixel grid used by the product pipeline,
//! synoptic time handling, and common error types.

pub mod error;
pub mod grid;
pub mod time;

pub use error::{GridError, TimeParseError};
pub use grid::{Grid, MaskedGrid};
pub use time::{
    format_compact, format_synoptic, parse_ctime, parse_iso8601, parse_synoptic, validity_window,
    SYNOPTIC_STEP_HOURS,
};
