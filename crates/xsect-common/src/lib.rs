//! Common types shared across the cross-section workspace.

pub mod geo;
pub mod grid;
pub mod time;

pub use geo::{GeoParseError, GeoPoint};
pub use grid::{Axis, GridSpec, GridSpecError, ProjectionParams};
pub use time::{format_label, parse_model_timestamp, TimeParseError};
