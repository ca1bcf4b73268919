//! Coverage checks: fraction of valid pixels over a region of interest.
//!
//! All variants report percent valid in [0, 100]. Products below a
//! coverage threshold are typically discarded by the driver rather than
//! rendered with large data gaps.

use sat_common::MaskedGrid;
use sector_catalog::DynamicSector;

use crate::error::{PipelineError, Result};
use crate::resample::{PointObs, Resampler};

/// Percent of unmasked pixels over the whole scene.
pub fn full_scene_coverage(grid: &MaskedGrid) -> f64 {
    if grid.is_empty() {
        return 0.0;
    }
    100.0 * grid.valid_count() as f64 / grid.len() as f64
}

/// Percent of unmasked pixels inside a disk of `radius_km` centered on
/// the grid.
///
/// The radius is converted to pixels through the sector resolution
/// (meters per pixel in x and y), so the disk is an ellipse in pixel
/// space when the resolution is anisotropic. Fails with `EmptyDisk` when
/// the radius collapses to zero pixels.
pub fn center_disk_coverage(
    grid: &MaskedGrid,
    resolution_m: [f64; 2],
    radius_km: f64,
) -> Result<f64> {
    let radius_px_x = radius_km * 1000.0 / resolution_m[0];
    let radius_px_y = radius_km * 1000.0 / resolution_m[1];

    let center_col = (grid.width as f64 - 1.0) / 2.0;
    let center_row = (grid.height as f64 - 1.0) / 2.0;

    let mut in_disk = 0usize;
    let mut valid_in_disk = 0usize;
    for row in 0..grid.height {
        for col in 0..grid.width {
            let dx = (col as f64 - center_col) / radius_px_x;
            let dy = (row as f64 - center_row) / radius_px_y;
            if dx * dx + dy * dy <= 1.0 {
                in_disk += 1;
                if !grid.is_masked(col, row) {
                    valid_in_disk += 1;
                }
            }
        }
    }

    if in_disk == 0 {
        return Err(PipelineError::EmptyDisk { radius_km });
    }
    Ok(100.0 * valid_in_disk as f64 / in_disk as f64)
}

/// Percent of pixels with a positive alpha channel in an interleaved
/// RGBA buffer of `width * height * 4` bytes.
pub fn rgba_coverage(rgba: &[u8], width: usize, height: usize) -> Result<f64> {
    let expected = width * height * 4;
    if rgba.len() != expected {
        return Err(PipelineError::ShapeMismatch {
            expected: (width, height),
            actual: (rgba.len() / 4, 1),
        });
    }
    if expected == 0 {
        return Ok(0.0);
    }

    let valid = rgba.chunks_exact(4).filter(|px| px[3] > 0).count();
    Ok(100.0 * valid as f64 / (width * height) as f64)
}

/// Coverage of an unstructured wind field after nearest-neighbor
/// resampling onto the sector grid.
pub fn windbarb_coverage(
    obs: &[PointObs],
    sector: &DynamicSector,
    resampler: &dyn Resampler,
) -> Result<f64> {
    let grid = resampler.resample(obs, sector)?;
    Ok(full_scene_coverage(&grid))
}
