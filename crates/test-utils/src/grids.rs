//! Grid generators for pipeline tests.

use sat_common::{Grid, MaskedGrid};

/// A width x height grid with values increasing left-to-right,
/// top-to-bottom: `v(col, row) = row * width + col`.
pub fn gradient_grid(width: usize, height: usize) -> MaskedGrid {
    let data = (0..width * height).map(|i| i as f64).collect();
    MaskedGrid::from_data(data, width, height).expect("generator dimensions are consistent")
}

/// A fully valid grid holding a single constant value.
pub fn constant_grid(value: f64, width: usize, height: usize) -> MaskedGrid {
    MaskedGrid::filled(value, width, height)
}

/// A grid masked everywhere except a centered `inner_w` x `inner_h` block.
pub fn center_window_grid(
    value: f64,
    width: usize,
    height: usize,
    inner_w: usize,
    inner_h: usize,
) -> MaskedGrid {
    let col0 = (width - inner_w) / 2;
    let row0 = (height - inner_h) / 2;
    let mut mask = vec![true; width * height];
    for row in row0..row0 + inner_h {
        for col in col0..col0 + inner_w {
            mask[row * width + col] = false;
        }
    }
    MaskedGrid::with_mask(vec![value; width * height], mask, width, height)
        .expect("generator dimensions are consistent")
}

/// A constant solar-zenith field in degrees.
pub fn zenith_field(zenith_deg: f64, width: usize, height: usize) -> Grid {
    Grid::filled(zenith_deg, width, height)
}
