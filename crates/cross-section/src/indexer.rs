//! Nearest-cell lookup on a grid's 1-D axis arrays.
//!
//! No interpolation and no clamping: a coordinate more than half a cell
//! beyond the outermost cell center is rejected.

use xsect_common::grid::covered_span;
use xsect_common::{Axis, GridSpec};

use crate::error::{CrossSectionError, Result};
use crate::types::{IndexPath, ProjectedPath};

/// Index of the coordinate in `axis_coords` closest to `value`.
///
/// Ties go to the lower index. Fails with
/// [`CrossSectionError::OutOfRange`] if `value` is outside the axis span
/// extended by half of `cell_size`.
pub fn nearest_index(value: f64, axis_coords: &[f64], cell_size: f64, axis: Axis) -> Result<usize> {
    if axis_coords.is_empty() {
        return Err(CrossSectionError::shape_mismatch(format!(
            "{} axis has no coordinates",
            axis
        )));
    }

    let (min, max) = covered_span(axis_coords, cell_size);
    // NaN fails both comparisons, so test for containment rather than exclusion
    if !(value >= min && value <= max) {
        return Err(CrossSectionError::OutOfRange {
            axis,
            value,
            min,
            max,
        });
    }

    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, &coord) in axis_coords.iter().enumerate() {
        let dist = (coord - value).abs();
        if dist < best_dist {
            best = i;
            best_dist = dist;
        }
    }
    Ok(best)
}

/// Map every point of `path` to its nearest grid cell, each axis
/// independently.
pub fn index_path(path: &ProjectedPath, grid: &GridSpec) -> Result<IndexPath> {
    if path.x.len() != path.y.len() {
        return Err(CrossSectionError::shape_mismatch(format!(
            "path has {} x values and {} y values",
            path.x.len(),
            path.y.len()
        )));
    }

    let cols = path
        .x
        .iter()
        .map(|&x| nearest_index(x, grid.x_coords(), grid.cell_size(), Axis::X))
        .collect::<Result<Vec<_>>>()?;
    let rows = path
        .y
        .iter()
        .map(|&y| nearest_index(y, grid.y_coords(), grid.cell_size(), Axis::Y))
        .collect::<Result<Vec<_>>>()?;

    Ok(IndexPath { cols, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    const AXIS: [f64; 4] = [0.0, 3000.0, 6000.0, 9000.0];

    #[test]
    fn test_exact_match() {
        for (k, &v) in AXIS.iter().enumerate() {
            assert_eq!(nearest_index(v, &AXIS, 3000.0, Axis::X).unwrap(), k);
        }
    }

    #[test]
    fn test_nearest() {
        assert_eq!(nearest_index(1400.0, &AXIS, 3000.0, Axis::X).unwrap(), 0);
        assert_eq!(nearest_index(1600.0, &AXIS, 3000.0, Axis::X).unwrap(), 1);
        assert_eq!(nearest_index(8999.0, &AXIS, 3000.0, Axis::X).unwrap(), 3);
    }

    #[test]
    fn test_tie_prefers_lower_index() {
        assert_eq!(nearest_index(1500.0, &AXIS, 3000.0, Axis::X).unwrap(), 0);
        assert_eq!(nearest_index(7500.0, &AXIS, 3000.0, Axis::X).unwrap(), 2);
    }

    #[test]
    fn test_tie_on_descending_axis() {
        let desc = [9000.0, 6000.0, 3000.0, 0.0];
        // lower index wins regardless of axis direction
        assert_eq!(nearest_index(4500.0, &desc, 3000.0, Axis::Y).unwrap(), 1);
    }

    #[test]
    fn test_half_cell_margin_is_inclusive() {
        assert_eq!(nearest_index(-1500.0, &AXIS, 3000.0, Axis::X).unwrap(), 0);
        assert_eq!(nearest_index(10500.0, &AXIS, 3000.0, Axis::X).unwrap(), 3);
    }

    #[test]
    fn test_out_of_range() {
        let err = nearest_index(10500.5, &AXIS, 3000.0, Axis::Y).unwrap_err();
        assert!(matches!(err, CrossSectionError::OutOfRange { axis: Axis::Y, .. }));
        assert!(nearest_index(-1500.5, &AXIS, 3000.0, Axis::X).is_err());
        assert!(nearest_index(f64::NAN, &AXIS, 3000.0, Axis::X).is_err());
    }

    #[test]
    fn test_empty_axis() {
        assert!(matches!(
            nearest_index(0.0, &[], 3000.0, Axis::X),
            Err(CrossSectionError::ShapeMismatch(_))
        ));
    }
}
