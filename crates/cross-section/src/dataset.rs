//! The data-source seam.
//!
//! Decoding model files is the caller's job. The pipeline only needs the raw
//! multi-level fields, the optional per-cell latitude/longitude arrays and
//! the two run timestamps, all fully loaded in memory. [`FieldSource`] is
//! that contract; [`InMemoryDataset`] is a plain implementation that can
//! also be read from JSON.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::error::{CrossSectionError, Result};
use crate::types::{Field2D, Field3D};

/// Raw model fields a cross section can be built from.
///
/// Serialized with the model's short names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RawField {
    /// Temperature (K)
    #[serde(rename = "t")]
    Temperature,
    /// Pressure (Pa)
    #[serde(rename = "pres")]
    Pressure,
    /// Specific humidity (kg/kg)
    #[serde(rename = "q")]
    SpecificHumidity,
    /// Zonal wind (m/s)
    #[serde(rename = "u")]
    UWind,
    /// Meridional wind (m/s)
    #[serde(rename = "v")]
    VWind,
    /// Vertical velocity (omega)
    #[serde(rename = "w")]
    VerticalVelocity,
}

impl RawField {
    pub const ALL: [RawField; 6] = [
        RawField::Temperature,
        RawField::Pressure,
        RawField::SpecificHumidity,
        RawField::UWind,
        RawField::VWind,
        RawField::VerticalVelocity,
    ];

    /// Model short name.
    pub fn short_name(&self) -> &'static str {
        match self {
            RawField::Temperature => "t",
            RawField::Pressure => "pres",
            RawField::SpecificHumidity => "q",
            RawField::UWind => "u",
            RawField::VWind => "v",
            RawField::VerticalVelocity => "w",
        }
    }
}

impl fmt::Display for RawField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Provider of in-memory model output for one forecast.
pub trait FieldSource {
    /// A multi-level field, if present.
    fn field(&self, field: RawField) -> Option<&Field3D>;

    /// Per-cell latitude, if present.
    fn latitude(&self) -> Option<&Field2D> {
        None
    }

    /// Per-cell longitude, if present.
    fn longitude(&self) -> Option<&Field2D> {
        None
    }

    /// Model initialization time as text.
    fn init_time(&self) -> &str;

    /// Forecast valid time as text.
    fn valid_time(&self) -> &str;
}

/// A fully loaded dataset held in memory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryDataset {
    pub init_time: String,
    pub valid_time: String,
    #[serde(default)]
    pub fields: HashMap<RawField, Field3D>,
    #[serde(default)]
    pub latitude: Option<Field2D>,
    #[serde(default)]
    pub longitude: Option<Field2D>,
}

impl InMemoryDataset {
    pub fn new(init_time: impl Into<String>, valid_time: impl Into<String>) -> Self {
        Self {
            init_time: init_time.into(),
            valid_time: valid_time.into(),
            ..Default::default()
        }
    }

    /// Add a multi-level field, replacing any previous one.
    pub fn with_field(mut self, kind: RawField, field: Field3D) -> Self {
        self.fields.insert(kind, field);
        self
    }

    /// Add per-cell latitude and longitude arrays.
    pub fn with_coordinates(mut self, latitude: Field2D, longitude: Field2D) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// Read a dataset from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref()).map_err(|e| {
            CrossSectionError::config(format!("{}: {}", path.as_ref().display(), e))
        })?;
        let dataset: Self = serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(dataset)
    }
}

impl FieldSource for InMemoryDataset {
    fn field(&self, field: RawField) -> Option<&Field3D> {
        self.fields.get(&field)
    }

    fn latitude(&self) -> Option<&Field2D> {
        self.latitude.as_ref()
    }

    fn longitude(&self) -> Option<&Field2D> {
        self.longitude.as_ref()
    }

    fn init_time(&self) -> &str {
        &self.init_time
    }

    fn valid_time(&self) -> &str {
        &self.valid_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_short_names() {
        let json = r#"{
            "init_time": "2022-12-24T18:00:00",
            "valid_time": "2022-12-25T10:00:00",
            "fields": {
                "t": {"levels": 1, "rows": 1, "cols": 1, "data": [280.0]},
                "pres": {"levels": 1, "rows": 1, "cols": 1, "data": [90000.0]}
            }
        }"#;
        let ds: InMemoryDataset = serde_json::from_str(json).unwrap();

        assert_eq!(ds.field(RawField::Temperature).unwrap().get(0, 0, 0), Some(280.0));
        assert!(ds.field(RawField::Pressure).is_some());
        assert!(ds.field(RawField::UWind).is_none());
        assert!(ds.latitude().is_none());
    }

    #[test]
    fn test_unknown_field_name_rejected() {
        let json = r#"{"init_time": "", "valid_time": "", "fields": {"rh": {"levels": 1, "rows": 1, "cols": 1, "data": [1.0]}}}"#;
        assert!(serde_json::from_str::<InMemoryDataset>(json).is_err());
    }

    #[test]
    fn test_builder() {
        let field = Field3D::new(1, 1, 1, vec![1.0]).unwrap();
        let ds = InMemoryDataset::new("a", "b").with_field(RawField::VWind, field);
        assert_eq!(ds.init_time(), "a");
        assert_eq!(ds.valid_time(), "b");
        assert!(ds.field(RawField::VWind).is_some());
    }

    #[test]
    fn test_short_names_round_trip_display() {
        for field in RawField::ALL {
            let json = serde_json::to_string(&field).unwrap();
            assert_eq!(json, format!("\"{}\"", field));
        }
    }
}
