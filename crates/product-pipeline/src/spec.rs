//! Product specification for the single-channel pipeline.
//!
//! A [`ProductSpec`] is typically deserialized from a product YAML file;
//! every field has a conservative default so partial configs stay valid.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Physical units understood by the unit-conversion stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Kelvin,
    Celsius,
    Albedo,
    Dimensionless,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Unit::Kelvin => "kelvin",
            Unit::Celsius => "celsius",
            Unit::Albedo => "albedo",
            Unit::Dimensionless => "dimensionless",
        };
        write!(f, "{s}")
    }
}

/// Policy for pixels falling outside the output data range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutboundsPolicy {
    /// Leave the value unchanged, even outside the range.
    Retain,
    /// Mask the pixel.
    Mask,
    /// Clamp to the boundary value.
    #[default]
    Crop,
}

impl FromStr for OutboundsPolicy {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "retain" => Ok(OutboundsPolicy::Retain),
            "mask" => Ok(OutboundsPolicy::Mask),
            "crop" => Ok(OutboundsPolicy::Crop),
            other => Err(PipelineError::InvalidSpec(format!(
                "outbounds policy must be retain, mask, or crop; got '{other}'"
            ))),
        }
    }
}

/// Configuration for one single-channel product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductSpec {
    /// Target scaling bounds. Defaults to the empirical min/max of the
    /// unmasked input when absent.
    pub output_data_range: Option<[f64; 2]>,
    /// Units of the incoming data.
    pub input_units: Option<Unit>,
    /// Units the output should be expressed in.
    pub output_units: Option<Unit>,
    /// Policy for pixels below the range minimum.
    pub min_outbounds: OutboundsPolicy,
    /// Policy for pixels above the range maximum.
    pub max_outbounds: OutboundsPolicy,
    /// Rescale the final output to [0, 1].
    pub norm: bool,
    /// Flip the output (max -> min) after scaling.
    pub inverse: bool,
    /// Divide by cos(solar zenith), clamped near the terminator.
    pub sun_zen_correction: bool,
    /// Mask pixels at or beyond the day/night terminator.
    pub mask_night: bool,
    /// Zenith threshold (degrees) for night masking.
    pub min_day_zen: Option<f64>,
    /// Mask pixels on the day side.
    pub mask_day: bool,
    /// Zenith threshold (degrees) for day masking.
    pub max_night_zen: Option<f64>,
    /// Successive gamma corrections, applied left to right.
    pub gamma_list: Vec<f64>,
    /// Multiplicative scale factor.
    pub scale_factor: Option<f64>,
}

impl Default for ProductSpec {
    fn default() -> Self {
        Self {
            output_data_range: None,
            input_units: None,
            output_units: None,
            min_outbounds: OutboundsPolicy::Crop,
            max_outbounds: OutboundsPolicy::Crop,
            norm: false,
            inverse: false,
            sun_zen_correction: false,
            mask_night: false,
            min_day_zen: None,
            mask_day: false,
            max_night_zen: None,
            gamma_list: Vec::new(),
            scale_factor: None,
        }
    }
}

impl ProductSpec {
    /// Validate cross-field consistency.
    pub fn validate(&self) -> Result<()> {
        if let Some([lo, hi]) = self.output_data_range {
            if !lo.is_finite() || !hi.is_finite() || lo > hi {
                return Err(PipelineError::InvalidSpec(format!(
                    "output_data_range must be a finite [min, max] pair, got [{lo}, {hi}]"
                )));
            }
        }
        for gamma in &self.gamma_list {
            if !(*gamma > 0.0) || !gamma.is_finite() {
                return Err(PipelineError::InvalidSpec(format!(
                    "gamma values must be strictly positive, got {gamma}"
                )));
            }
        }
        match (self.input_units, self.output_units) {
            (Some(from), Some(to)) if from != to && !convertible(from, to) => {
                Err(PipelineError::InvalidSpec(format!(
                    "no unit conversion from {from} to {to}"
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Whether the conversion stage knows how to map `from` into `to`.
pub(crate) fn convertible(from: Unit, to: Unit) -> bool {
    matches!(
        (from, to),
        (Unit::Kelvin, Unit::Celsius) | (Unit::Celsius, Unit::Kelvin)
    )
}
