//! Nearest-neighbor resampling seam.
//!
//! Geographic reprojection proper is an external collaborator; the
//! pipeline only needs a narrow trait to push unstructured observations
//! (wind barbs) onto a sector grid for coverage checks. The built-in
//! [`NearestNeighbor`] implementation projects each observation through
//! the sector's equal-area azimuthal projection and splats it into the
//! pixels within its radius of influence.

use sat_common::MaskedGrid;
use sector_catalog::DynamicSector;

use crate::error::Result;

/// One unstructured observation: a geographic point with a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointObs {
    /// Latitude, degrees north.
    pub lat: f64,
    /// Longitude, degrees east.
    pub lon: f64,
    /// Observed value (e.g. wind speed).
    pub value: f64,
}

/// Resamples unstructured observations onto a sector grid.
pub trait Resampler {
    /// Produce a sector-shaped grid; pixels with no nearby observation
    /// stay masked.
    fn resample(&self, obs: &[PointObs], sector: &DynamicSector) -> Result<MaskedGrid>;
}

/// Simple nearest-neighbor splatting resampler.
#[derive(Debug, Clone)]
pub struct NearestNeighbor {
    /// Observations influence pixels within this distance (meters).
    pub radius_of_influence_m: f64,
}

impl NearestNeighbor {
    pub fn new(radius_of_influence_m: f64) -> Self {
        Self {
            radius_of_influence_m,
        }
    }
}

impl Resampler for NearestNeighbor {
    fn resample(&self, obs: &[PointObs], sector: &DynamicSector) -> Result<MaskedGrid> {
        let width = sector.shape.width;
        let height = sector.shape.height;
        let mut data = vec![0.0; width * height];
        let mut mask = vec![true; width * height];

        let res_x = sector.resolution[0];
        let res_y = sector.resolution[1];
        let ll = sector.area_extent.lower_left_xy;
        let ur = sector.area_extent.upper_right_xy;

        let radius_px_x = (self.radius_of_influence_m / res_x).ceil() as isize;
        let radius_px_y = (self.radius_of_influence_m / res_y).ceil() as isize;

        for ob in obs {
            let Some((x, y)) = laea_forward(
                ob.lat,
                ob.lon,
                sector.projection.lat_0,
                sector.projection.lon_0,
                sector.projection.a,
            ) else {
                continue;
            };

            // Row 0 is the top of the grid.
            let col = ((x - ll[0]) / res_x).floor() as isize;
            let row = ((ur[1] - y) / res_y).floor() as isize;

            for dr in -radius_px_y..=radius_px_y {
                for dc in -radius_px_x..=radius_px_x {
                    let (c, r) = (col + dc, row + dr);
                    if c < 0 || r < 0 || c >= width as isize || r >= height as isize {
                        continue;
                    }
                    let dx = dc as f64 * res_x;
                    let dy = dr as f64 * res_y;
                    if (dx * dx + dy * dy).sqrt() > self.radius_of_influence_m {
                        continue;
                    }
                    let idx = r as usize * width + c as usize;
                    data[idx] = ob.value;
                    mask[idx] = false;
                }
            }
        }

        Ok(MaskedGrid::with_mask(data, mask, width, height).expect("buffer sized from shape"))
    }
}

/// Forward Lambert azimuthal equal-area projection.
///
/// Returns projected (x, y) in meters from the origin, or `None` near the
/// antipode where the projection is undefined.
fn laea_forward(lat_deg: f64, lon_deg: f64, lat0_deg: f64, lon0_deg: f64, radius: f64) -> Option<(f64, f64)> {
    let lat = lat_deg.to_radians();
    let lat0 = lat0_deg.to_radians();
    let dlon = (lon_deg - lon0_deg).to_radians();

    let cos_c = lat0.sin() * lat.sin() + lat0.cos() * lat.cos() * dlon.cos();
    if cos_c <= -1.0 + 1e-12 {
        return None;
    }

    let k = (2.0 / (1.0 + cos_c)).sqrt();
    let x = radius * k * lat.cos() * dlon.sin();
    let y = radius * k * (lat0.cos() * lat.sin() - lat0.sin() * lat.cos() * dlon.cos());
    Some((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sector_catalog::{ProjectionSpec, Shape};

    fn storm_sector() -> DynamicSector {
        DynamicSector::new(
            "tc2020sh16gabekile",
            ProjectionSpec::laea(-20.0, 80.0),
            Shape {
                width: 100,
                height: 100,
            },
            [1000.0, 1000.0],
            [0.0, 0.0],
        )
        .unwrap()
    }

    #[test]
    fn test_laea_origin_maps_to_zero() {
        let (x, y) = laea_forward(-20.0, 80.0, -20.0, 80.0, 6_371_228.0).unwrap();
        assert!(x.abs() < 1e-6);
        assert!(y.abs() < 1e-6);
    }

    #[test]
    fn test_laea_north_is_positive_y() {
        let (_, y) = laea_forward(-19.0, 80.0, -20.0, 80.0, 6_371_228.0).unwrap();
        assert!(y > 0.0);
        let (x, _) = laea_forward(-20.0, 81.0, -20.0, 80.0, 6_371_228.0).unwrap();
        assert!(x > 0.0);
    }

    #[test]
    fn test_obs_at_center_fills_center_pixel() {
        let sector = storm_sector();
        let resampler = NearestNeighbor::new(500.0);
        let obs = [PointObs {
            lat: -20.0,
            lon: 80.0,
            value: 42.0,
        }];

        let grid = resampler.resample(&obs, &sector).unwrap();
        assert_eq!(grid.get(50, 50), Some(42.0));
        assert!(grid.valid_count() >= 1);
    }

    #[test]
    fn test_radius_grows_footprint() {
        let sector = storm_sector();
        let obs = [PointObs {
            lat: -20.0,
            lon: 80.0,
            value: 1.0,
        }];

        let small = NearestNeighbor::new(1000.0)
            .resample(&obs, &sector)
            .unwrap();
        let large = NearestNeighbor::new(5000.0)
            .resample(&obs, &sector)
            .unwrap();
        assert!(large.valid_count() > small.valid_count());
    }

    #[test]
    fn test_out_of_sector_obs_leaves_grid_masked() {
        let sector = storm_sector();
        let resampler = NearestNeighbor::new(1000.0);
        let obs = [PointObs {
            lat: 45.0,
            lon: -120.0,
            value: 9.0,
        }];

        let grid = resampler.resample(&obs, &sector).unwrap();
        assert_eq!(grid.valid_count(), 0);
    }
}
