//! Lambert Conformal Conic projection.
//!
//! This projection is commonly used for weather data including HRRR and NAM.
//! It maps a cone tangent or secant to the Earth's surface onto a flat plane.
//!
//! The projection parameters include:
//! - Central latitude (lat0): latitude of the projection origin
//! - Central longitude (lon0): the central meridian (LoV in GRIB2)
//! - Standard parallel(s): Latin1 and Latin2 (can be equal for tangent cone)
//! - False easting / northing added to projected coordinates
//!
//! Formulas follow the spherical form in Snyder, "Map Projections - A Working
//! Manual" (USGS PP 1395), section 15.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use xsect_common::ProjectionParams;

use crate::error::{ProjectionError, ProjectionResult};
use crate::MapProjection;

/// Latitudes closer than this (radians) to the pole opposite the cone apex
/// are treated as singular.
const POLE_EPSILON: f64 = 1e-10;

/// Lambert Conformal Conic projection on a sphere.
///
/// Projected coordinates are meters from the projection origin
/// (`central_latitude`, `central_longitude`) plus the false offsets.
#[derive(Debug, Clone)]
pub struct LambertConformal {
    /// Central meridian in radians
    lon0: f64,
    /// Origin latitude in radians
    lat0: f64,
    false_easting: f64,
    false_northing: f64,
    /// Earth radius (meters)
    earth_radius: f64,
    /// Cone constant (n)
    n: f64,
    /// F constant
    f: f64,
    /// Rho at the origin latitude
    rho0: f64,
}

impl LambertConformal {
    /// Create a projection from its defining parameters (degrees, meters).
    pub fn new(params: &ProjectionParams) -> ProjectionResult<Self> {
        let (latin1_deg, latin2_deg) = params.standard_parallels;
        let values = [
            params.central_longitude,
            params.central_latitude,
            latin1_deg,
            latin2_deg,
            params.false_easting,
            params.false_northing,
            params.earth_radius,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ProjectionError::InvalidParameters(
                "all parameters must be finite".to_string(),
            ));
        }
        if params.earth_radius <= 0.0 {
            return Err(ProjectionError::InvalidParameters(format!(
                "earth radius must be positive, got {}",
                params.earth_radius
            )));
        }
        for lat in [params.central_latitude, latin1_deg, latin2_deg] {
            if lat.abs() >= 90.0 {
                return Err(ProjectionError::InvalidParameters(format!(
                    "latitude {lat} must be strictly between -90 and 90"
                )));
            }
        }

        let lon0 = params.central_longitude.to_radians();
        let lat0 = params.central_latitude.to_radians();
        let latin1 = latin1_deg.to_radians();
        let latin2 = latin2_deg.to_radians();

        // Compute cone constant n
        let n = if (latin1 - latin2).abs() < 1e-10 {
            // Tangent cone (single standard parallel)
            latin1.sin()
        } else {
            // Secant cone (two standard parallels)
            let ln_ratio = (latin1.cos() / latin2.cos()).ln();
            let tan_ratio = ((FRAC_PI_4 + latin2 / 2.0).tan() / (FRAC_PI_4 + latin1 / 2.0).tan()).ln();
            ln_ratio / tan_ratio
        };
        if n.abs() < 1e-10 {
            return Err(ProjectionError::InvalidParameters(
                "standard parallels symmetric about the equator give a degenerate cone".to_string(),
            ));
        }

        let f = (latin1.cos() * (FRAC_PI_4 + latin1 / 2.0).tan().powf(n)) / n;
        let rho0 = params.earth_radius * f / (FRAC_PI_4 + lat0 / 2.0).tan().powf(n);

        Ok(Self {
            lon0,
            lat0,
            false_easting: params.false_easting,
            false_northing: params.false_northing,
            earth_radius: params.earth_radius,
            n,
            f,
            rho0,
        })
    }

    /// HRRR / NAM CONUS projection (LoV 262.5E, origin and parallels at 38.5N).
    pub fn hrrr() -> Self {
        let params = ProjectionParams::hrrr();
        let to_rad = PI / 180.0;
        let lat0 = params.central_latitude * to_rad;
        let n = lat0.sin();
        let f = (lat0.cos() * (FRAC_PI_4 + lat0 / 2.0).tan().powf(n)) / n;

        Self {
            lon0: params.central_longitude * to_rad,
            lat0,
            false_easting: 0.0,
            false_northing: 0.0,
            earth_radius: params.earth_radius,
            n,
            f,
            rho0: params.earth_radius * f / (FRAC_PI_4 + lat0 / 2.0).tan().powf(n),
        }
    }

    /// Cone constant.
    pub fn cone_constant(&self) -> f64 {
        self.n
    }

    /// Origin latitude in degrees.
    pub fn origin_latitude(&self) -> f64 {
        self.lat0.to_degrees()
    }

    fn rho_at(&self, lat: f64) -> f64 {
        self.earth_radius * self.f / (FRAC_PI_4 + lat / 2.0).tan().powf(self.n)
    }
}

impl MapProjection for LambertConformal {
    fn project(&self, lat_deg: f64, lon_deg: f64) -> ProjectionResult<(f64, f64)> {
        if !lat_deg.is_finite() || !lon_deg.is_finite() {
            return Err(ProjectionError::NonFinite { lat: lat_deg, lon: lon_deg });
        }
        if lat_deg.abs() > 90.0 {
            return Err(ProjectionError::InvalidLatitude(lat_deg));
        }

        let lat = lat_deg.to_radians();
        // The pole opposite the apex maps to infinity
        if (lat + self.n.signum() * FRAC_PI_2).abs() < POLE_EPSILON {
            return Err(ProjectionError::PoleSingularity(lat_deg));
        }

        // Normalize longitude difference to [-π, π]
        let dlon = (lon_deg.to_radians() - self.lon0 + PI).rem_euclid(2.0 * PI) - PI;

        let rho = self.rho_at(lat);
        let theta = self.n * dlon;

        let x = rho * theta.sin() + self.false_easting;
        let y = self.rho0 - rho * theta.cos() + self.false_northing;

        if !x.is_finite() || !y.is_finite() {
            return Err(ProjectionError::NonFinite { lat: lat_deg, lon: lon_deg });
        }
        Ok((x, y))
    }

    fn unproject(&self, x: f64, y: f64) -> ProjectionResult<(f64, f64)> {
        if !x.is_finite() || !y.is_finite() {
            return Err(ProjectionError::NonFiniteProjected { x, y });
        }

        let sign = self.n.signum();
        let dx = x - self.false_easting;
        let dy = self.rho0 - (y - self.false_northing);

        let rho = sign * (dx * dx + dy * dy).sqrt();
        let theta = (sign * dx).atan2(sign * dy);

        let lat = if rho == 0.0 {
            // Apex of the cone
            sign * FRAC_PI_2
        } else {
            2.0 * (self.earth_radius * self.f / rho).powf(1.0 / self.n).atan() - FRAC_PI_2
        };
        let lon = self.lon0 + theta / self.n;

        let lat_deg = lat.to_degrees();
        let lon_deg = xsect_common::geo::normalize_longitude(lon.to_degrees());
        if !lat_deg.is_finite() || !lon_deg.is_finite() {
            return Err(ProjectionError::NonFiniteProjected { x, y });
        }
        Ok((lat_deg, lon_deg))
    }
}
