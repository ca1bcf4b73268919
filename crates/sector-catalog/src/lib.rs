//! Sector catalog store for dynamic and static geospatial sectors.
//!
//! A sector is a georeferenced rectangular window with a projection, a
//! pixel grid, and a validity interval. Dynamic sectors follow a moving
//! phenomenon (tropical cyclone, pyroCb plume, volcano) and are written
//! one record per synoptic time into a directory-backed catalog.

pub mod error;
pub mod projection;
pub mod sector;
pub mod store;

pub use error::{CatalogError, Result};
pub use projection::{ProjectionSpec, EARTH_RADIUS_M};
pub use sector::{AreaExtent, DynamicSector, MetaValue, SectorInfo, SectorType, Shape};
pub use store::CatalogStore;
