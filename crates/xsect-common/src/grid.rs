//! Grid specifications for projected model output.
//!
//! A [`GridSpec`] describes the cell-center coordinates of a regular grid on
//! the model's native projected plane, together with the projection that
//! defines that plane. Coordinates are stored as explicit 1-D axis arrays so
//! that nearest-cell lookups can be done against the exact values the model
//! writes out.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Relative tolerance used when checking that axis spacing is uniform.
const SPACING_TOLERANCE: f64 = 1e-6;

/// Errors raised while building a grid specification.
#[derive(Debug, Error, PartialEq)]
pub enum GridSpecError {
    #[error("{axis} axis has no coordinates")]
    EmptyAxis { axis: Axis },

    #[error("{axis} axis contains a non-finite coordinate at index {index}")]
    NonFinite { axis: Axis, index: usize },

    #[error("{axis} axis is not strictly monotonic at index {index}")]
    NotMonotonic { axis: Axis, index: usize },

    #[error("{axis} axis spacing {found} at index {index} does not match cell size {expected}")]
    NonUniform {
        axis: Axis,
        index: usize,
        found: f64,
        expected: f64,
    },

    #[error("invalid cell size: {0}")]
    InvalidCellSize(f64),
}

/// One of the two horizontal axes of a projected grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Projected easting, indexes grid columns.
    X,
    /// Projected northing, indexes grid rows.
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// Defining parameters of a Lambert Conformal Conic projection.
///
/// Angles are in degrees, distances in meters. The default is the HRRR /
/// NAM CONUS projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionParams {
    /// Central meridian (LoV). Values above 180 are accepted (262.5 == -97.5).
    pub central_longitude: f64,
    /// Latitude of the projection origin.
    pub central_latitude: f64,
    /// Standard parallels; equal values give a tangent cone.
    pub standard_parallels: (f64, f64),
    pub false_easting: f64,
    pub false_northing: f64,
    /// Radius of the spherical earth model.
    pub earth_radius: f64,
}

impl ProjectionParams {
    /// HRRR earth radius (GRIB2 shape of the earth = 6).
    pub const HRRR_EARTH_RADIUS: f64 = 6_371_229.0;

    pub fn hrrr() -> Self {
        Self {
            central_longitude: 262.5,
            central_latitude: 38.5,
            standard_parallels: (38.5, 38.5),
            false_easting: 0.0,
            false_northing: 0.0,
            earth_radius: Self::HRRR_EARTH_RADIUS,
        }
    }
}

impl Default for ProjectionParams {
    fn default() -> Self {
        Self::hrrr()
    }
}

/// A regular grid of cell centers on a projected plane.
///
/// Immutable once built: both axes are finite, strictly monotonic and spaced
/// by exactly `cell_size` (within a small relative tolerance).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridSpec {
    x_coords: Vec<f64>,
    y_coords: Vec<f64>,
    cell_size: f64,
    projection: ProjectionParams,
}

impl GridSpec {
    /// Build a grid from explicit axis arrays.
    pub fn new(
        x_coords: Vec<f64>,
        y_coords: Vec<f64>,
        cell_size: f64,
        projection: ProjectionParams,
    ) -> Result<Self, GridSpecError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(GridSpecError::InvalidCellSize(cell_size));
        }
        validate_axis(Axis::X, &x_coords, cell_size)?;
        validate_axis(Axis::Y, &y_coords, cell_size)?;

        Ok(Self {
            x_coords,
            y_coords,
            cell_size,
            projection,
        })
    }

    /// Build a grid from half-open extents, `[start, stop)` stepped by `cell_size`.
    pub fn from_extent(
        x_start: f64,
        x_stop: f64,
        y_start: f64,
        y_stop: f64,
        cell_size: f64,
        projection: ProjectionParams,
    ) -> Result<Self, GridSpecError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(GridSpecError::InvalidCellSize(cell_size));
        }
        let x_coords = stepped_axis(x_start, x_stop, cell_size);
        let y_coords = stepped_axis(y_start, y_stop, cell_size);
        Self::new(x_coords, y_coords, cell_size, projection)
    }

    /// HRRR CONUS 3 km grid (1799 x 1059), anchored at the projected
    /// first grid point 21.138123N, 122.719528W.
    pub fn hrrr_conus() -> Self {
        const X0: f64 = -2_697_520.142_521_929;
        const Y0: f64 = -1_587_306.152_556_665;
        const DX: f64 = 3000.0;

        Self {
            x_coords: (0..1799).map(|i| X0 + i as f64 * DX).collect(),
            y_coords: (0..1059).map(|j| Y0 + j as f64 * DX).collect(),
            cell_size: DX,
            projection: ProjectionParams::hrrr(),
        }
    }

    pub fn x_coords(&self) -> &[f64] {
        &self.x_coords
    }

    pub fn y_coords(&self) -> &[f64] {
        &self.y_coords
    }

    /// Coordinates along one axis.
    pub fn axis_coords(&self, axis: Axis) -> &[f64] {
        match axis {
            Axis::X => &self.x_coords,
            Axis::Y => &self.y_coords,
        }
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn projection(&self) -> &ProjectionParams {
        &self.projection
    }

    /// Number of columns (x cells).
    pub fn nx(&self) -> usize {
        self.x_coords.len()
    }

    /// Number of rows (y cells).
    pub fn ny(&self) -> usize {
        self.y_coords.len()
    }

    /// Closed span covered by an axis: the outermost cell centers extended
    /// by half a cell on each side.
    pub fn covered_span(&self, axis: Axis) -> (f64, f64) {
        covered_span(self.axis_coords(axis), self.cell_size)
    }
}

/// Closed span covered by `coords`, extended by half a cell on each side.
pub fn covered_span(coords: &[f64], cell_size: f64) -> (f64, f64) {
    let (min, max) = coords
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let half = cell_size / 2.0;
    (min - half, max + half)
}

/// Half-open `[start, stop)` sequence stepped by `step`.
fn stepped_axis(start: f64, stop: f64, step: f64) -> Vec<f64> {
    let count = ((stop - start) / step).ceil();
    if !count.is_finite() || count <= 0.0 {
        return Vec::new();
    }
    (0..count as usize).map(|i| start + i as f64 * step).collect()
}

fn validate_axis(axis: Axis, coords: &[f64], cell_size: f64) -> Result<(), GridSpecError> {
    if coords.is_empty() {
        return Err(GridSpecError::EmptyAxis { axis });
    }
    if let Some(index) = coords.iter().position(|v| !v.is_finite()) {
        return Err(GridSpecError::NonFinite { axis, index });
    }
    if coords.len() < 2 {
        return Ok(());
    }

    let ascending = coords[1] > coords[0];
    for (i, pair) in coords.windows(2).enumerate() {
        let step = pair[1] - pair[0];
        if step == 0.0 || (step > 0.0) != ascending {
            return Err(GridSpecError::NotMonotonic { axis, index: i + 1 });
        }
        if (step.abs() - cell_size).abs() > cell_size * SPACING_TOLERANCE {
            return Err(GridSpecError::NonUniform {
                axis,
                index: i + 1,
                found: step.abs(),
                expected: cell_size,
            });
        }
    }
    Ok(())
}

/// Deserialized form, re-validated through [`GridSpec::new`].
#[derive(Deserialize)]
struct GridSpecRepr {
    x_coords: Vec<f64>,
    y_coords: Vec<f64>,
    cell_size: f64,
    #[serde(default)]
    projection: ProjectionParams,
}

impl<'de> Deserialize<'de> for GridSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let repr = GridSpecRepr::deserialize(deserializer)?;
        GridSpec::new(repr.x_coords, repr.y_coords, repr.cell_size, repr.projection)
            .map_err(serde::de::Error::custom)
    }
}
