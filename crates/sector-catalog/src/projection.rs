//! Projection parameters carried by sector records.
//!
//! The catalog does not reproject anything itself; projection codes are
//! passed through to the external resampler. Dynamic storm sectors use a
//! Lambert azimuthal equal-area projection centered on the storm fix.

use serde::{Deserialize, Serialize};

/// Earth radius used for dynamic sector projections (meters).
pub const EARTH_RADIUS_M: f64 = 6_371_228.0;

/// Projection parameters in PROJ-style keyword form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSpec {
    /// Projection code (e.g. "laea", "eqc", "geos").
    pub proj: String,
    /// Earth radius in meters.
    pub a: f64,
    /// Projected coordinate units.
    pub units: String,
    /// Latitude of projection origin, degrees.
    pub lat_0: f64,
    /// Longitude of projection origin, degrees.
    pub lon_0: f64,
}

impl ProjectionSpec {
    /// Equal-area azimuthal projection centered at the given origin.
    ///
    /// This is the projection used for all dynamic storm sectors.
    pub fn laea(lat_0: f64, lon_0: f64) -> Self {
        Self {
            proj: "laea".to_string(),
            a: EARTH_RADIUS_M,
            units: "m".to_string(),
            lat_0,
            lon_0,
        }
    }

    /// Arbitrary projection code with the standard earth radius.
    ///
    /// Code validity is the external resampler's concern; the catalog
    /// passes the string through unchanged.
    pub fn with_code(proj: impl Into<String>, lat_0: f64, lon_0: f64) -> Self {
        Self {
            proj: proj.into(),
            a: EARTH_RADIUS_M,
            units: "m".to_string(),
            lat_0,
            lon_0,
        }
    }
}
