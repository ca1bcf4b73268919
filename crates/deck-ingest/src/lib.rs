//! Deck-to-sector generation for tropical cyclones.
//!
//! Parses ATCF deck files into time-ordered storm fixes and emits one
//! dynamic sector record per synoptic time into a sector catalog.

pub mod deck;
pub mod error;
pub mod generator;

pub use deck::{final_storm_name, parse_deck, parse_deck_line, storm_year_from_filename, StormFix};
pub use error::{DeckError, Result};
pub use generator::{generate, GeneratorConfig};
