//! Resampling the straight line between two projected endpoints.
//!
//! Each axis is stepped independently from start toward end by one cell
//! size, half-open so the end coordinate itself is not included. A path that
//! is not axis-aligned therefore yields sequences of different lengths; the
//! shorter one is regenerated by spreading its own span over as many evenly
//! spaced points as the longer one has.
//!
//! ```text
//!   x: x0 ──3000──► ... (Nx points)
//!   y: y0 ──3000──► ... (Ny points, Ny < Nx)
//!                     │
//!                     ▼  reconcile
//!   y: y0 ──(span/Nx)──► ... (Nx points)
//! ```

use tracing::debug;
use xsect_common::Axis;

use crate::error::{CrossSectionError, Result};
use crate::types::ProjectedPath;

/// Longest path `resample` will build, in points per axis.
pub const MAX_PATH_POINTS: usize = 100_000;

/// Resample the line from `start` to `end` (projected `(x, y)`) into
/// roughly one point per grid cell.
///
/// Fails with [`CrossSectionError::DegeneratePath`] when the endpoints share
/// an x or a y coordinate, and with [`CrossSectionError::OutOfRange`] when an
/// axis would need more than [`MAX_PATH_POINTS`] points.
pub fn resample(start: (f64, f64), end: (f64, f64), cell_size: f64) -> Result<ProjectedPath> {
    if !cell_size.is_finite() || cell_size <= 0.0 {
        return Err(CrossSectionError::config(format!(
            "cell size must be positive and finite, got {}",
            cell_size
        )));
    }

    let x = step_axis(Axis::X, start.0, end.0, cell_size)?;
    let y = step_axis(Axis::Y, start.1, end.1, cell_size)?;
    debug!(x_len = x.len(), y_len = y.len(), "Stepped path axes");

    let (x, y) = match x.len().cmp(&y.len()) {
        std::cmp::Ordering::Less => (spread(&x, y.len(), start.0 <= end.0), y),
        std::cmp::Ordering::Greater => {
            let n = x.len();
            (x, spread(&y, n, start.1 <= end.1))
        }
        std::cmp::Ordering::Equal => (x, y),
    };
    debug!(len = x.len(), "Reconciled path");

    Ok(ProjectedPath { x, y })
}

/// Half-open sequence from `start` toward `end` with step magnitude
/// `cell_size`.
fn step_axis(axis: Axis, start: f64, end: f64, cell_size: f64) -> Result<Vec<f64>> {
    let distance = end - start;
    if distance == 0.0 {
        return Err(CrossSectionError::DegeneratePath { axis, value: start });
    }
    if !distance.is_finite() {
        return Err(CrossSectionError::OutOfRange {
            axis,
            value: if start.is_finite() { end } else { start },
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
        });
    }

    let step = cell_size.copysign(distance);
    let count = (distance / step).ceil();
    if count > MAX_PATH_POINTS as f64 {
        let reach = MAX_PATH_POINTS as f64 * cell_size;
        return Err(CrossSectionError::OutOfRange {
            axis,
            value: end,
            min: start - reach,
            max: start + reach,
        });
    }
    let count = count as usize;
    Ok((0..count).map(|i| start + i as f64 * step).collect())
}

/// Regenerate `values` as `n` evenly spaced points covering its own span,
/// `min + k * span / n` for `k` in `0..n` (reversed when `ascending` is
/// false, starting from the max). The far end of the span is not reached.
fn spread(values: &[f64], n: usize, ascending: bool) -> Vec<f64> {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let step = (max - min) / n as f64;

    if ascending {
        (0..n).map(|k| min + k as f64 * step).collect()
    } else {
        (0..n).map(|k| max - k as f64 * step).collect()
    }
}
