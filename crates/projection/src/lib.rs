//! Coordinate reference system transformations.
//!
//! Implements map projections from scratch, with no third-party math crates.
//! Every conversion is fallible: a domain error (a pole singularity, a
//! non-finite input) is reported instead of producing NaN coordinates.

pub mod error;
pub mod lambert;

pub use error::{ProjectionError, ProjectionResult};
pub use lambert::LambertConformal;

/// A map projection between geographic and planar coordinates.
pub trait MapProjection {
    /// Geographic (lat, lon) in degrees to projected (x, y).
    fn project(&self, lat: f64, lon: f64) -> ProjectionResult<(f64, f64)>;

    /// Projected (x, y) to geographic (lat, lon) in degrees.
    fn unproject(&self, x: f64, y: f64) -> ProjectionResult<(f64, f64)>;
}
