//! The single-channel algorithm.
//!
//! A deterministic, fixed-order pipeline over a masked radiometric array.
//! Stage order is authoritative:
//!
//! 1. default range resolution
//! 2. night mask
//! 3. day mask
//! 4. solar-zenith correction
//! 5. gamma chain
//! 6. scale factor
//! 7. unit conversion
//! 8. range application, then optional normalize and invert
//!
//! Each stage is a pure function of the previous stage's output; caller
//! arrays are never mutated and masks only ever grow.

use sat_common::{Grid, MaskedGrid};

use crate::error::{PipelineError, Result};
use crate::spec::{OutboundsPolicy, ProductSpec, Unit};

/// Floor applied to cos(zenith) so the correction stays bounded near the
/// terminator.
const COS_ZENITH_FLOOR: f64 = 0.01;

/// A pipeline input: the radiometric array plus an optional solar-zenith
/// field (degrees) of identical shape.
#[derive(Debug, Clone)]
pub struct SceneInput {
    pub data: MaskedGrid,
    pub solar_zenith: Option<Grid>,
}

impl SceneInput {
    /// Pair a data array with an optional zenith field, checking shapes.
    pub fn new(data: MaskedGrid, solar_zenith: Option<Grid>) -> Result<Self> {
        if let Some(zen) = &solar_zenith {
            if zen.shape() != data.shape() {
                return Err(PipelineError::ShapeMismatch {
                    expected: data.shape(),
                    actual: zen.shape(),
                });
            }
        }
        Ok(Self { data, solar_zenith })
    }
}

/// Apply a [`ProductSpec`] to a scene, producing a display-ready array.
///
/// The output has the input's shape, and its mask is a superset of the
/// input mask.
pub fn apply_single_channel(input: &SceneInput, spec: &ProductSpec) -> Result<MaskedGrid> {
    spec.validate()?;
    let mut out = input.data.clone();

    // 1. Default range resolution: empirical min/max of the unmasked
    // input when no explicit range was configured.
    let (range_min, range_max) = match spec.output_data_range {
        Some([lo, hi]) => (lo, hi),
        None => out.min_max().unwrap_or((0.0, 1.0)),
    };

    // 2. Night mask.
    if spec.mask_night {
        if let (Some(zen), Some(threshold)) = (&input.solar_zenith, spec.min_day_zen) {
            out = out.mask_where_aux(zen, |z| z >= threshold)?;
        }
    }

    // 3. Day mask.
    if spec.mask_day {
        if let (Some(zen), Some(threshold)) = (&input.solar_zenith, spec.max_night_zen) {
            out = out.mask_where_aux(zen, |z| z <= threshold)?;
        }
    }

    // 4. Solar-zenith correction.
    if spec.sun_zen_correction {
        if let Some(zen) = &input.solar_zenith {
            out = out.map_with_aux(zen, |v, z| {
                v / z.to_radians().cos().max(COS_ZENITH_FLOOR)
            })?;
        }
    }

    // 5. Gamma chain: normalize against the current data range, apply
    // x^(1/gamma), rescale. Composition with distinct gammas is
    // non-commutative and preserved left to right.
    if !spec.gamma_list.is_empty() {
        if let Some((lo, hi)) = out.min_max() {
            let span = hi - lo;
            if span > f64::EPSILON {
                for gamma in &spec.gamma_list {
                    let exponent = 1.0 / *gamma;
                    out = out.map(|v| {
                        let normed = ((v - lo) / span).clamp(0.0, 1.0);
                        lo + span * normed.powf(exponent)
                    });
                }
            }
        }
    }

    // 6. Scale factor.
    if let Some(scale) = spec.scale_factor {
        out = out.map(|v| v * scale);
    }

    // 7. Unit conversion.
    if let (Some(from), Some(to)) = (spec.input_units, spec.output_units) {
        if from != to {
            out = convert_units(out, from, to)?;
        }
    }

    // 8. Range application with per-side outbounds policies.
    out = apply_side(out, spec.min_outbounds, |v| v < range_min, range_min);
    out = apply_side(out, spec.max_outbounds, |v| v > range_max, range_max);

    if spec.norm {
        let span = range_max - range_min;
        out = if span > f64::EPSILON {
            out.map(|v| (v - range_min) / span)
        } else {
            out.map(|_| 0.0)
        };
    }

    if spec.inverse {
        out = if spec.norm {
            out.map(|v| 1.0 - v)
        } else {
            out.map(|v| range_max - (v - range_min))
        };
    }

    Ok(out)
}

fn apply_side(
    grid: MaskedGrid,
    policy: OutboundsPolicy,
    outside: impl Fn(f64) -> bool,
    boundary: f64,
) -> MaskedGrid {
    match policy {
        OutboundsPolicy::Retain => grid,
        OutboundsPolicy::Mask => grid.mask_where(outside),
        OutboundsPolicy::Crop => grid.map(|v| if outside(v) { boundary } else { v }),
    }
}

fn convert_units(grid: MaskedGrid, from: Unit, to: Unit) -> Result<MaskedGrid> {
    match (from, to) {
        (Unit::Kelvin, Unit::Celsius) => Ok(grid.map(|v| v - 273.15)),
        (Unit::Celsius, Unit::Kelvin) => Ok(grid.map(|v| v + 273.15)),
        (from, to) => Err(PipelineError::InvalidSpec(format!(
            "no unit conversion from {from} to {to}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::grids::{constant_grid, gradient_grid, zenith_field};

    fn kelvin_3x3() -> MaskedGrid {
        MaskedGrid::from_data(
            vec![270.0, 280.0, 290.0, 260.0, 270.0, 280.0, 250.0, 260.0, 270.0],
            3,
            3,
        )
        .unwrap()
    }

    #[test]
    fn test_output_shape_matches_input() {
        let input = SceneInput::new(gradient_grid(5, 4), None).unwrap();
        let out = apply_single_channel(&input, &ProductSpec::default()).unwrap();
        assert_eq!(out.shape(), (5, 4));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let grid = kelvin_3x3();
        let original = grid.clone();
        let input = SceneInput::new(grid, None).unwrap();
        let spec = ProductSpec {
            scale_factor: Some(2.0),
            norm: true,
            ..Default::default()
        };
        apply_single_channel(&input, &spec).unwrap();
        assert_eq!(input.data, original);
    }

    #[test]
    fn test_kelvin_to_celsius_crop_and_norm() {
        // Values convert to [-3.15 .. 16.85] Celsius; -23.15 crops to -20
        // and 16.85 is masked by the max policy.
        let input = SceneInput::new(kelvin_3x3(), None).unwrap();
        let spec = ProductSpec {
            output_data_range: Some([-20.0, 10.0]),
            input_units: Some(Unit::Kelvin),
            output_units: Some(Unit::Celsius),
            min_outbounds: OutboundsPolicy::Crop,
            max_outbounds: OutboundsPolicy::Mask,
            norm: true,
            ..Default::default()
        };

        let out = apply_single_channel(&input, &spec).unwrap();
        // 290 K = 16.85 C > 10 C: masked.
        assert!(out.is_masked(2, 0));
        // 250 K = -23.15 C < -20 C: cropped to the minimum, i.e. 0.0 after norm.
        assert_eq!(out.get(0, 2), Some(0.0));
        // All surviving values normalized into [0, 1].
        for row in 0..3 {
            for col in 0..3 {
                if let Some(v) = out.get(col, row) {
                    assert!((0.0..=1.0).contains(&v), "value {v} out of [0,1]");
                }
            }
        }
    }

    #[test]
    fn test_mask_is_monotonic() {
        let mut grid = gradient_grid(4, 4);
        grid.mask[5] = true;
        let input = SceneInput::new(grid.clone(), None).unwrap();
        let spec = ProductSpec {
            output_data_range: Some([2.0, 12.0]),
            min_outbounds: OutboundsPolicy::Mask,
            max_outbounds: OutboundsPolicy::Mask,
            ..Default::default()
        };

        let out = apply_single_channel(&input, &spec).unwrap();
        for (before, after) in grid.mask.iter().zip(&out.mask) {
            assert!(!*before || *after, "a masked pixel was cleared");
        }
    }

    #[test]
    fn test_gamma_chain_identity_composition() {
        let input = SceneInput::new(constant_grid(0.5, 4, 4), None).unwrap();
        let spec = ProductSpec {
            gamma_list: vec![2.0, 0.5],
            ..Default::default()
        };

        let out = apply_single_channel(&input, &spec).unwrap();
        assert!((out.get(0, 0).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_gamma_chain_is_left_to_right() {
        let input = SceneInput::new(gradient_grid(3, 3), None).unwrap();

        let chained = apply_single_channel(
            &input,
            &ProductSpec {
                gamma_list: vec![2.0, 3.0],
                ..Default::default()
            },
        )
        .unwrap();

        let first = apply_single_channel(
            &input,
            &ProductSpec {
                gamma_list: vec![2.0],
                ..Default::default()
            },
        )
        .unwrap();
        let second = apply_single_channel(
            &SceneInput::new(first, None).unwrap(),
            &ProductSpec {
                gamma_list: vec![3.0],
                ..Default::default()
            },
        )
        .unwrap();

        for (a, b) in chained.data.iter().zip(&second.data) {
            assert!((a - b).abs() < 1e-9, "{a} != {b}");
        }
    }

    #[test]
    fn test_night_mask() {
        let grid = constant_grid(1.0, 2, 2);
        let zen = Grid::from_data(vec![80.0, 95.0, 89.0, 91.0], 2, 2).unwrap();
        let input = SceneInput::new(grid, Some(zen)).unwrap();
        let spec = ProductSpec {
            mask_night: true,
            min_day_zen: Some(90.0),
            ..Default::default()
        };

        let out = apply_single_channel(&input, &spec).unwrap();
        assert_eq!(out.mask, vec![false, true, false, true]);
    }

    #[test]
    fn test_day_mask() {
        let grid = constant_grid(1.0, 2, 2);
        let zen = Grid::from_data(vec![80.0, 95.0, 89.0, 91.0], 2, 2).unwrap();
        let input = SceneInput::new(grid, Some(zen)).unwrap();
        let spec = ProductSpec {
            mask_day: true,
            max_night_zen: Some(90.0),
            ..Default::default()
        };

        let out = apply_single_channel(&input, &spec).unwrap();
        assert_eq!(out.mask, vec![true, false, true, false]);
    }

    #[test]
    fn test_mask_night_without_zenith_is_a_no_op() {
        let input = SceneInput::new(constant_grid(1.0, 2, 2), None).unwrap();
        let spec = ProductSpec {
            mask_night: true,
            min_day_zen: Some(90.0),
            ..Default::default()
        };
        let out = apply_single_channel(&input, &spec).unwrap();
        assert_eq!(out.valid_count(), 4);
    }

    #[test]
    fn test_sun_zen_correction_is_clamped() {
        let grid = constant_grid(1.0, 2, 1);
        let zen = Grid::from_data(vec![60.0, 90.0], 2, 1).unwrap();
        let input = SceneInput::new(grid, Some(zen)).unwrap();
        let spec = ProductSpec {
            sun_zen_correction: true,
            ..Default::default()
        };

        let out = apply_single_channel(&input, &spec).unwrap();
        // cos(60 deg) = 0.5 doubles the value.
        assert!((out.get(0, 0).unwrap() - 2.0).abs() < 1e-9);
        // cos(90 deg) would explode without the floor.
        assert!((out.get(1, 0).unwrap() - 1.0 / COS_ZENITH_FLOOR).abs() < 1e-6);
    }

    #[test]
    fn test_zenith_shape_mismatch_is_fatal() {
        let grid = constant_grid(1.0, 2, 2);
        let zen = zenith_field(45.0, 3, 2);
        assert!(matches!(
            SceneInput::new(grid, Some(zen)),
            Err(PipelineError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_retain_keeps_out_of_range_values() {
        let input = SceneInput::new(gradient_grid(3, 1), None).unwrap();
        let spec = ProductSpec {
            output_data_range: Some([0.5, 1.5]),
            min_outbounds: OutboundsPolicy::Retain,
            max_outbounds: OutboundsPolicy::Retain,
            ..Default::default()
        };
        let out = apply_single_channel(&input, &spec).unwrap();
        assert_eq!(out.get(0, 0), Some(0.0));
        assert_eq!(out.get(2, 0), Some(2.0));
    }

    #[test]
    fn test_inverse_without_norm_flips_about_range() {
        let input = SceneInput::new(gradient_grid(3, 1), None).unwrap();
        let spec = ProductSpec {
            output_data_range: Some([0.0, 2.0]),
            inverse: true,
            ..Default::default()
        };
        let out = apply_single_channel(&input, &spec).unwrap();
        assert_eq!(out.get(0, 0), Some(2.0));
        assert_eq!(out.get(1, 0), Some(1.0));
        assert_eq!(out.get(2, 0), Some(0.0));
    }

    #[test]
    fn test_inverse_with_norm() {
        let input = SceneInput::new(gradient_grid(3, 1), None).unwrap();
        let spec = ProductSpec {
            output_data_range: Some([0.0, 2.0]),
            norm: true,
            inverse: true,
            ..Default::default()
        };
        let out = apply_single_channel(&input, &spec).unwrap();
        assert_eq!(out.get(0, 0), Some(1.0));
        assert_eq!(out.get(2, 0), Some(0.0));
    }

    #[test]
    fn test_default_range_uses_empirical_min_max() {
        let input = SceneInput::new(gradient_grid(3, 1), None).unwrap();
        let spec = ProductSpec {
            norm: true,
            ..Default::default()
        };
        let out = apply_single_channel(&input, &spec).unwrap();
        assert_eq!(out.get(0, 0), Some(0.0));
        assert_eq!(out.get(2, 0), Some(1.0));
    }

    #[test]
    fn test_scale_factor() {
        let input = SceneInput::new(constant_grid(3.0, 2, 2), None).unwrap();
        let spec = ProductSpec {
            scale_factor: Some(0.5),
            output_data_range: Some([0.0, 10.0]),
            ..Default::default()
        };
        let out = apply_single_channel(&input, &spec).unwrap();
        assert_eq!(out.get(0, 0), Some(1.5));
    }
}
