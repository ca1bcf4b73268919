//! Shared test utilities for the storm-sector toolkit workspace.
//!
//! Provides deck-file fixtures and grid generators used by the
//! deck-ingest and product-pipeline test suites.
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod decks;
pub mod grids;
