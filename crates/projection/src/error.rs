//! Projection error types.

use thiserror::Error;

/// Result type for projection operations.
pub type ProjectionResult<T> = Result<T, ProjectionError>;

/// Failures converting between geographic and projected coordinates.
#[derive(Debug, Error, PartialEq)]
pub enum ProjectionError {
    #[error("latitude {0} outside [-90, 90]")]
    InvalidLatitude(f64),

    #[error("non-finite geographic coordinate ({lat}, {lon})")]
    NonFinite { lat: f64, lon: f64 },

    #[error("non-finite projected coordinate ({x}, {y})")]
    NonFiniteProjected { x: f64, y: f64 },

    #[error("latitude {0} is a singular point of the projection")]
    PoleSingularity(f64),

    #[error("invalid projection parameters: {0}")]
    InvalidParameters(String),
}
