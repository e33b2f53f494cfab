//! Error types for cross-section extraction.

use projection::ProjectionError;
use thiserror::Error;
use xsect_common::{Axis, GridSpecError, TimeParseError};

/// Errors that can occur while extracting a cross section.
///
/// Every error aborts the current request. Nothing is retried or clamped.
#[derive(Error, Debug)]
pub enum CrossSectionError {
    /// Coordinate conversion failed.
    #[error("projection error: {0}")]
    Projection(#[from] ProjectionError),

    /// The endpoints coincide along one projected axis.
    #[error("degenerate path: start and end coincide on the {axis} axis at {value}")]
    DegeneratePath { axis: Axis, value: f64 },

    /// A path coordinate or index falls outside the grid.
    #[error("{axis} coordinate {value} outside grid span [{min}, {max}]")]
    OutOfRange {
        axis: Axis,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Index sequences or field arrays have inconsistent shapes.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A raw field needed by a requested product is absent.
    #[error("missing field '{field}' required by {product}")]
    MissingField { field: String, product: String },

    /// Run timestamps could not be parsed.
    #[error("invalid timestamp: {0}")]
    InvalidTime(#[from] TimeParseError),

    /// The grid specification is invalid.
    #[error("invalid grid: {0}")]
    InvalidGrid(#[from] GridSpecError),

    /// Configuration could not be loaded or failed validation.
    #[error("configuration error: {0}")]
    Config(String),
}

impl CrossSectionError {
    /// Create a ShapeMismatch error.
    pub fn shape_mismatch(msg: impl Into<String>) -> Self {
        Self::ShapeMismatch(msg.into())
    }

    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Stable name of the error category, for reporting by code.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Projection(_) => "ProjectionError",
            Self::DegeneratePath { .. } => "DegeneratePathError",
            Self::OutOfRange { .. } => "OutOfRangeError",
            Self::ShapeMismatch(_) => "ShapeMismatchError",
            Self::MissingField { .. } => "MissingFieldError",
            Self::InvalidTime(_) => "InvalidTimeError",
            Self::InvalidGrid(_) => "InvalidGridError",
            Self::Config(_) => "ConfigError",
        }
    }
}

impl From<std::io::Error> for CrossSectionError {
    fn from(err: std::io::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<serde_yaml::Error> for CrossSectionError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Config(format!("YAML error: {}", err))
    }
}

impl From<serde_json::Error> for CrossSectionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {}", err))
    }
}

/// Result type for cross-section operations.
pub type Result<T> = std::result::Result<T, CrossSectionError>;
