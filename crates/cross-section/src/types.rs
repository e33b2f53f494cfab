//! Core types for cross-section extraction.

use serde::{Deserialize, Serialize};

use crate::error::{CrossSectionError, Result};

/// A multi-level model field, row-major `(levels, rows, cols)`.
///
/// Rows index the projected y axis and columns the projected x axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Field3DRepr")]
pub struct Field3D {
    levels: usize,
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

#[derive(Deserialize)]
struct Field3DRepr {
    levels: usize,
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl TryFrom<Field3DRepr> for Field3D {
    type Error = CrossSectionError;

    fn try_from(repr: Field3DRepr) -> Result<Self> {
        Field3D::new(repr.levels, repr.rows, repr.cols, repr.data)
    }
}

impl Field3D {
    /// Create a field, checking that `data` holds exactly `levels * rows * cols` values.
    pub fn new(levels: usize, rows: usize, cols: usize, data: Vec<f32>) -> Result<Self> {
        let expected = levels
            .checked_mul(rows)
            .and_then(|n| n.checked_mul(cols))
            .ok_or_else(|| CrossSectionError::shape_mismatch("field dimensions overflow"))?;
        if data.len() != expected {
            return Err(CrossSectionError::shape_mismatch(format!(
                "field of shape ({}, {}, {}) needs {} values, got {}",
                levels,
                rows,
                cols,
                expected,
                data.len()
            )));
        }
        Ok(Self {
            levels,
            rows,
            cols,
            data,
        })
    }

    /// Shape as `(levels, rows, cols)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.levels, self.rows, self.cols)
    }

    pub fn levels(&self) -> usize {
        self.levels
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Get the value at a specific grid position.
    pub fn get(&self, level: usize, row: usize, col: usize) -> Option<f32> {
        if level >= self.levels || row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get((level * self.rows + row) * self.cols + col).copied()
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }
}

/// A single-level field, row-major `(rows, cols)`. Used for the per-cell
/// latitude and longitude arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Field2DRepr")]
pub struct Field2D {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

#[derive(Deserialize)]
struct Field2DRepr {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl TryFrom<Field2DRepr> for Field2D {
    type Error = CrossSectionError;

    fn try_from(repr: Field2DRepr) -> Result<Self> {
        Field2D::new(repr.rows, repr.cols, repr.data)
    }
}

impl Field2D {
    pub fn new(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self> {
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(CrossSectionError::shape_mismatch(format!(
                "field of shape ({}, {}) got {} values",
                rows,
                cols,
                data.len()
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// Shape as `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col).copied()
    }
}

/// Sample points along the straight line between two projected endpoints.
///
/// Both sequences always have the same length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPath {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl ProjectedPath {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Nearest-cell indices for each point of a [`ProjectedPath`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexPath {
    /// Column (x) index per path position.
    pub cols: Vec<usize>,
    /// Row (y) index per path position.
    pub rows: Vec<usize>,
}

impl IndexPath {
    /// Number of path positions. Only meaningful once both sequences
    /// have been checked to agree.
    pub fn len(&self) -> usize {
        self.cols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cols.is_empty()
    }

    /// Iterate `(row, col)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().copied().zip(self.cols.iter().copied())
    }
}

/// A 2-D slice `(levels, positions)` of a field along the path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerticalProfile {
    levels: usize,
    positions: usize,
    data: Vec<f64>,
}

/// A profile computed pointwise from one or more sampled profiles.
pub type DerivedField = VerticalProfile;

impl VerticalProfile {
    /// Create a profile, checking that `data` holds `levels * positions` values.
    pub fn new(levels: usize, positions: usize, data: Vec<f64>) -> Result<Self> {
        if levels.checked_mul(positions) != Some(data.len()) {
            return Err(CrossSectionError::shape_mismatch(format!(
                "profile of shape ({}, {}) got {} values",
                levels,
                positions,
                data.len()
            )));
        }
        Ok(Self {
            levels,
            positions,
            data,
        })
    }

    /// Shape as `(levels, positions)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.levels, self.positions)
    }

    pub fn levels(&self) -> usize {
        self.levels
    }

    pub fn positions(&self) -> usize {
        self.positions
    }

    pub fn get(&self, level: usize, position: usize) -> Option<f64> {
        if level >= self.levels || position >= self.positions {
            return None;
        }
        self.data.get(level * self.positions + position).copied()
    }

    /// Values of one level along the path.
    pub fn level(&self, level: usize) -> Option<&[f64]> {
        if level >= self.levels {
            return None;
        }
        let start = level * self.positions;
        self.data.get(start..start + self.positions)
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Apply `f` to every value.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            levels: self.levels,
            positions: self.positions,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Combine two profiles of identical shape elementwise.
    pub fn zip_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Result<Self> {
        self.check_same_shape(other)?;
        Ok(Self {
            levels: self.levels,
            positions: self.positions,
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        })
    }

    /// Combine three profiles of identical shape elementwise.
    pub fn zip3_with(
        &self,
        b: &Self,
        c: &Self,
        f: impl Fn(f64, f64, f64) -> f64,
    ) -> Result<Self> {
        self.check_same_shape(b)?;
        self.check_same_shape(c)?;
        Ok(Self {
            levels: self.levels,
            positions: self.positions,
            data: self
                .data
                .iter()
                .zip(&b.data)
                .zip(&c.data)
                .map(|((&x, &y), &z)| f(x, y, z))
                .collect(),
        })
    }

    fn check_same_shape(&self, other: &Self) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(CrossSectionError::shape_mismatch(format!(
                "profiles have shapes {:?} and {:?}",
                self.shape(),
                other.shape()
            )));
        }
        Ok(())
    }
}
