//! Geographic points and their axis labels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors parsing a `"lat,lon"` pair.
#[derive(Debug, Error, PartialEq)]
pub enum GeoParseError {
    #[error("expected 'lat,lon', got '{0}'")]
    InvalidFormat(String),

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("latitude {0} outside [-90, 90]")]
    LatitudeOutOfRange(f64),
}

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// True when the latitude is finite and within [-90, 90] and the
    /// longitude is finite.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite() && (-90.0..=90.0).contains(&self.lat)
    }

    /// Label rounded to one decimal with hemisphere suffixes, e.g.
    /// `43.3N, 112.9W`.
    pub fn label(&self) -> String {
        let lon = normalize_longitude(self.lon);
        let ns = if self.lat < 0.0 { 'S' } else { 'N' };
        let ew = if lon < 0.0 { 'W' } else { 'E' };
        format!("{:.1}{}, {:.1}{}", self.lat.abs(), ns, lon.abs(), ew)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}

impl FromStr for GeoPoint {
    type Err = GeoParseError;

    /// Parse `"lat,lon"` in decimal degrees.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| GeoParseError::InvalidFormat(s.to_string()))?;

        let parse = |v: &str| {
            v.trim()
                .parse::<f64>()
                .map_err(|_| GeoParseError::InvalidNumber(v.trim().to_string()))
        };
        let point = GeoPoint::new(parse(lat)?, parse(lon)?);

        if !(-90.0..=90.0).contains(&point.lat) {
            return Err(GeoParseError::LatitudeOutOfRange(point.lat));
        }
        Ok(point)
    }
}

/// Wrap a longitude into (-180, 180].
pub fn normalize_longitude(lon: f64) -> f64 {
    let wrapped = lon.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}
