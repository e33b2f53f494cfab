//! Test data generators for creating synthetic model-level data.
//!
//! All 3-D generators return row-major `(levels, rows, cols)` buffers, level
//! 0 first, then row 0 of that level, and so on. Values are predictable so
//! that sampled cross sections can be checked against hand-computed numbers.

/// Flat index of `(level, row, col)` in a row-major 3-D buffer.
pub fn flat_index(rows: usize, cols: usize, level: usize, row: usize, col: usize) -> usize {
    (level * rows + row) * cols + col
}

/// Creates a test field where each value encodes its own position.
///
/// Each cell value is calculated as: `level * 1_000_000 + row * 1000 + col`
///
/// # Example
///
/// ```
/// use test_utils::create_index_field;
///
/// let field = create_index_field(2, 3, 4);
/// assert_eq!(field.len(), 24);
/// assert_eq!(field[0], 0.0);
/// assert_eq!(field[5], 1001.0);        // level 0, row 1, col 1
/// assert_eq!(field[12], 1_000_000.0);  // level 1, row 0, col 0
/// ```
pub fn create_index_field(levels: usize, rows: usize, cols: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(levels * rows * cols);
    for level in 0..levels {
        for row in 0..rows {
            for col in 0..cols {
                data.push((level * 1_000_000 + row * 1000 + col) as f32);
            }
        }
    }
    data
}

/// Creates a field that is linear in every index:
/// `base + level * d_level + row * d_row + col * d_col`.
pub fn create_linear_field(
    levels: usize,
    rows: usize,
    cols: usize,
    base: f32,
    d_level: f32,
    d_row: f32,
    d_col: f32,
) -> Vec<f32> {
    let mut data = Vec::with_capacity(levels * rows * cols);
    for level in 0..levels {
        for row in 0..rows {
            for col in 0..cols {
                data.push(base + level as f32 * d_level + row as f32 * d_row + col as f32 * d_col);
            }
        }
    }
    data
}

/// Creates a temperature-like field in Kelvin.
///
/// Starts at 288 K at the lowest level and cools 6.5 K per level, with a
/// small horizontal gradient so that neighbouring cells differ.
pub fn create_temperature_field(levels: usize, rows: usize, cols: usize) -> Vec<f32> {
    create_linear_field(levels, rows, cols, 288.0, -6.5, 0.5, 0.25)
}

/// Creates a pressure-like field in pascals.
///
/// Starts near 100000 Pa at the lowest level and drops 10000 Pa per level.
pub fn create_pressure_field(levels: usize, rows: usize, cols: usize) -> Vec<f32> {
    create_linear_field(levels, rows, cols, 100_000.0, -10_000.0, -100.0, -50.0)
}

/// Creates a specific-humidity-like field (kg/kg), drying with height.
pub fn create_humidity_field(levels: usize, rows: usize, cols: usize) -> Vec<f32> {
    create_linear_field(levels, rows, cols, 0.008, -0.002, 0.0001, 0.0002)
}

/// Creates a field with the same value everywhere.
pub fn create_constant_field(levels: usize, rows: usize, cols: usize, value: f32) -> Vec<f32> {
    vec![value; levels * rows * cols]
}

/// Creates evenly spaced axis coordinates: `start + i * step` for `count` cells.
pub fn create_axis(start: f64, step: f64, count: usize) -> Vec<f64> {
    (0..count).map(|i| start + i as f64 * step).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_field_layout() {
        let field = create_index_field(3, 4, 5);
        assert_eq!(field.len(), 60);
        assert_eq!(field[flat_index(4, 5, 2, 3, 4)], 2_003_004.0);
    }

    #[test]
    fn test_linear_field() {
        let field = create_linear_field(2, 2, 2, 10.0, 100.0, 10.0, 1.0);
        assert_eq!(field, vec![10.0, 11.0, 20.0, 21.0, 110.0, 111.0, 120.0, 121.0]);
    }

    #[test]
    fn test_physical_generators_in_range() {
        let t = create_temperature_field(5, 3, 3);
        assert!(t.iter().all(|v| (250.0..300.0).contains(v)));

        let p = create_pressure_field(5, 3, 3);
        assert!(p.iter().all(|v| *v > 50_000.0 && *v <= 100_000.0));

        let q = create_humidity_field(3, 3, 3);
        assert!(q.iter().all(|v| *v > 0.0 && *v < 0.02));
    }

    #[test]
    fn test_create_axis() {
        assert_eq!(create_axis(-3000.0, 3000.0, 3), vec![-3000.0, 0.0, 3000.0]);
    }
}
