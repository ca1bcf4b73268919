//! Masked pixel grids for radiometric data.
//!
//! A [`MaskedGrid`] is a 2-D array of floating-point values paired with a
//! boolean mask of identical shape. Pipeline stages never mutate a grid in
//! place; every transform returns a new grid, and masking is monotonic
//! (a transform may set mask bits but never clear them).

use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// A plain 2-D array of floating-point values (row-major, top-to-bottom).
///
/// Used for auxiliary fields that carry no mask, such as solar-zenith
/// angles in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    /// The values in row-major order.
    pub data: Vec<f64>,
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
}

impl Grid {
    /// Create a grid from a row-major buffer, checking the length.
    pub fn from_data(data: Vec<f64>, width: usize, height: usize) -> Result<Self, GridError> {
        if data.len() != width * height {
            return Err(GridError::BufferMismatch {
                width,
                height,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Create a grid filled with a constant value.
    pub fn filled(value: f64, width: usize, height: usize) -> Self {
        Self {
            data: vec![value; width * height],
            width,
            height,
        }
    }

    /// Grid shape as (width, height).
    pub fn shape(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Get the value at a grid coordinate.
    pub fn get(&self, col: usize, row: usize) -> Option<f64> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.data.get(row * self.width + col).copied()
    }

    /// Total number of pixels.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the grid has no pixels.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A 2-D value array with a parallel validity mask.
///
/// `mask[i] == true` marks pixel `i` as invalid. Masked values are never
/// read when computing statistics such as the empirical min/max.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskedGrid {
    /// The values in row-major order.
    pub data: Vec<f64>,
    /// Parallel mask; `true` = invalid pixel.
    pub mask: Vec<bool>,
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
}

impl MaskedGrid {
    /// Create a fully valid grid from a row-major buffer.
    pub fn from_data(data: Vec<f64>, width: usize, height: usize) -> Result<Self, GridError> {
        if data.len() != width * height {
            return Err(GridError::BufferMismatch {
                width,
                height,
                actual: data.len(),
            });
        }
        let mask = vec![false; data.len()];
        Ok(Self {
            data,
            mask,
            width,
            height,
        })
    }

    /// Create a grid with an explicit mask.
    pub fn with_mask(
        data: Vec<f64>,
        mask: Vec<bool>,
        width: usize,
        height: usize,
    ) -> Result<Self, GridError> {
        if data.len() != width * height || mask.len() != data.len() {
            return Err(GridError::BufferMismatch {
                width,
                height,
                actual: mask.len().max(data.len()),
            });
        }
        Ok(Self {
            data,
            mask,
            width,
            height,
        })
    }

    /// Create a fully valid grid filled with a constant value.
    pub fn filled(value: f64, width: usize, height: usize) -> Self {
        Self {
            data: vec![value; width * height],
            mask: vec![false; width * height],
            width,
            height,
        }
    }

    /// Grid shape as (width, height).
    pub fn shape(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Get the value at a grid coordinate, `None` if out of bounds or masked.
    pub fn get(&self, col: usize, row: usize) -> Option<f64> {
        if col >= self.width || row >= self.height {
            return None;
        }
        let idx = row * self.width + col;
        if self.mask[idx] {
            None
        } else {
            self.data.get(idx).copied()
        }
    }

    /// Check whether a pixel is masked. Out-of-bounds counts as masked.
    pub fn is_masked(&self, col: usize, row: usize) -> bool {
        if col >= self.width || row >= self.height {
            return true;
        }
        self.mask[row * self.width + col]
    }

    /// Total number of pixels.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the grid has no pixels.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of unmasked pixels.
    pub fn valid_count(&self) -> usize {
        self.mask.iter().filter(|m| !**m).count()
    }

    /// Empirical (min, max) over unmasked values, `None` if all masked.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        let mut result: Option<(f64, f64)> = None;
        for (value, masked) in self.data.iter().zip(&self.mask) {
            if *masked || value.is_nan() {
                continue;
            }
            result = Some(match result {
                Some((lo, hi)) => (lo.min(*value), hi.max(*value)),
                None => (*value, *value),
            });
        }
        result
    }

    /// Return a new grid with `f` applied to every unmasked value.
    ///
    /// Masked values are copied through unchanged.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        let data = self
            .data
            .iter()
            .zip(&self.mask)
            .map(|(v, m)| if *m { *v } else { f(*v) })
            .collect();
        Self {
            data,
            mask: self.mask.clone(),
            width: self.width,
            height: self.height,
        }
    }

    /// Return a new grid with additional pixels masked where `pred` holds.
    ///
    /// Already-masked pixels stay masked; the predicate is only evaluated
    /// on valid values.
    pub fn mask_where(&self, pred: impl Fn(f64) -> bool) -> Self {
        let mask = self
            .data
            .iter()
            .zip(&self.mask)
            .map(|(v, m)| *m || pred(*v))
            .collect();
        Self {
            data: self.data.clone(),
            mask,
            width: self.width,
            height: self.height,
        }
    }

    /// Return a new grid masked where `pred` holds for the paired auxiliary
    /// value, e.g. a solar-zenith threshold.
    ///
    /// The auxiliary grid must have the same shape.
    pub fn mask_where_aux(
        &self,
        aux: &Grid,
        pred: impl Fn(f64) -> bool,
    ) -> Result<Self, GridError> {
        if aux.shape() != self.shape() {
            return Err(GridError::ShapeMismatch {
                expected: self.shape(),
                actual: aux.shape(),
            });
        }
        let mask = aux
            .data
            .iter()
            .zip(&self.mask)
            .map(|(a, m)| *m || pred(*a))
            .collect();
        Ok(Self {
            data: self.data.clone(),
            mask,
            width: self.width,
            height: self.height,
        })
    }

    /// Return a new grid with `f(value, aux)` applied to unmasked values.
    pub fn map_with_aux(
        &self,
        aux: &Grid,
        f: impl Fn(f64, f64) -> f64,
    ) -> Result<Self, GridError> {
        if aux.shape() != self.shape() {
            return Err(GridError::ShapeMismatch {
                expected: self.shape(),
                actual: aux.shape(),
            });
        }
        let data = self
            .data
            .iter()
            .zip(aux.data.iter())
            .zip(&self.mask)
            .map(|((v, a), m)| if *m { *v } else { f(*v, *a) })
            .collect();
        Ok(Self {
            data,
            mask: self.mask.clone(),
            width: self.width,
            height: self.height,
        })
    }
}
