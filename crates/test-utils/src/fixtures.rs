//! Common test fixtures for cross-section tests.
//!
//! Pre-defined values that represent common scenarios: the HRRR grid and
//! projection constants, endpoint pairs used for real cross sections, and
//! model timestamps as they appear in decoded files.

use std::io::Write;
use tempfile::NamedTempFile;

/// HRRR CONUS grid constants.
pub mod hrrr {
    /// Number of x cells (columns).
    pub const NX: usize = 1799;
    /// Number of y cells (rows).
    pub const NY: usize = 1059;
    /// Cell size in meters.
    pub const CELL_SIZE: f64 = 3000.0;
    /// Projected x of the first grid point.
    pub const X0: f64 = -2_697_520.142_521_929;
    /// Projected y of the first grid point.
    pub const Y0: f64 = -1_587_306.152_556_665;
    /// Geographic first grid point (lat, lon).
    pub const FIRST_POINT: (f64, f64) = (21.138123, -122.719528);
    /// Projection origin (lat, lon).
    pub const ORIGIN: (f64, f64) = (38.5, -97.5);
}

/// Endpoint pairs as `((start_lat, start_lon), (end_lat, end_lon))`.
pub mod endpoints {
    /// Idaho to North Dakota (wind speed / theta-e section).
    pub const WIND: ((f64, f64), (f64, f64)) = ((43.3, -112.88), (46.8, -99.0));

    /// Pacific coast into Nevada (relative humidity section).
    pub const HUMIDITY: ((f64, f64), (f64, f64)) = ((34.8, -125.0), (39.4, -117.5));

    /// Arkansas to North Carolina (temperature section).
    pub const TEMPERATURE: ((f64, f64), (f64, f64)) = ((35.7, -92.7), (35.1, -79.4));

    /// Endpoints on the same latitude and longitude (zero-length section).
    pub const DEGENERATE: ((f64, f64), (f64, f64)) = ((40.0, -100.0), (40.0, -100.0));

    /// Ends well outside the HRRR domain (over the Atlantic).
    pub const OUT_OF_DOMAIN: ((f64, f64), (f64, f64)) = ((40.0, -100.0), (30.0, -20.0));
}

/// Model timestamps in the textual form decoded files carry.
pub mod time {
    /// Initialization time with nanosecond precision.
    pub const INIT_TIME: &str = "2022-12-24T18:00:00.000000000";

    /// Valid time, 16 hours after init.
    pub const VALID_TIME: &str = "2022-12-25T10:00:00.000000000";
}

/// Write `contents` to a temporary file that lives as long as the handle.
pub fn write_temp_file(contents: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("failed to write temp file");
    file.flush().expect("failed to flush temp file");
    file
}
