//! Extracting field values at the cells of an index path.

use crate::error::{CrossSectionError, Result};
use crate::types::{Field2D, Field3D, IndexPath, VerticalProfile};

/// Sample every level of `field` at each `(row, col)` of `path`.
///
/// The result has shape `(field.levels(), path.len())`.
pub fn sample(field: &Field3D, path: &IndexPath) -> Result<VerticalProfile> {
    let (levels, rows, cols) = field.shape();
    check_path(path, rows, cols)?;

    let positions = path.len();
    let mut data = Vec::with_capacity(levels * positions);
    for level in 0..levels {
        for (row, col) in path.iter() {
            // bounds checked above
            let value = field.get(level, row, col).ok_or_else(|| {
                CrossSectionError::shape_mismatch(format!(
                    "index ({}, {}, {}) outside field",
                    level, row, col
                ))
            })?;
            data.push(value as f64);
        }
    }

    VerticalProfile::new(levels, positions, data)
}

/// Sample a single-level field (e.g. latitude) along `path`.
pub fn sample_surface(field: &Field2D, path: &IndexPath) -> Result<Vec<f64>> {
    let (rows, cols) = field.shape();
    check_path(path, rows, cols)?;

    path.iter()
        .map(|(row, col)| {
            field.get(row, col).map(f64::from).ok_or_else(|| {
                CrossSectionError::shape_mismatch(format!("index ({}, {}) outside field", row, col))
            })
        })
        .collect()
}

fn check_path(path: &IndexPath, rows: usize, cols: usize) -> Result<()> {
    if path.rows.len() != path.cols.len() {
        return Err(CrossSectionError::shape_mismatch(format!(
            "index path has {} rows and {} cols",
            path.rows.len(),
            path.cols.len()
        )));
    }
    if let Some(&row) = path.rows.iter().find(|&&r| r >= rows) {
        return Err(CrossSectionError::shape_mismatch(format!(
            "row index {} outside field with {} rows",
            row, rows
        )));
    }
    if let Some(&col) = path.cols.iter().find(|&&c| c >= cols) {
        return Err(CrossSectionError::shape_mismatch(format!(
            "column index {} outside field with {} cols",
            col, cols
        )));
    }
    Ok(())
}
