//! Configuration for a cross-section request.
//!
//! Loaded from YAML (with `${VAR}` / `${VAR:-default}` substitution), then
//! optionally overridden from `XSECT_*` environment variables.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;
use xsect_common::{GeoPoint, GridSpec, ProjectionParams};

use crate::derived::Product;
use crate::error::{CrossSectionError, Result};

/// HRRR native grid spacing in meters.
pub const HRRR_CELL_SIZE: f64 = 3000.0;

/// A single cross-section request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossSectionConfig {
    pub start: GeoPoint,
    pub end: GeoPoint,
    #[serde(default)]
    pub grid: GridConfig,
    pub products: Vec<Product>,
}

impl Default for CrossSectionConfig {
    fn default() -> Self {
        Self {
            start: GeoPoint::new(43.3, -112.88),
            end: GeoPoint::new(46.8, -99.0),
            grid: GridConfig::default(),
            products: vec![Product::WindSpeed, Product::EquivalentPotentialTemperature],
        }
    }
}

/// Grid definition: spacing, projection and how the axes are laid out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_cell_size")]
    pub cell_size: f64,
    #[serde(default)]
    pub projection: ProjectionParams,
    #[serde(default)]
    pub axes: GridAxes,
}

fn default_cell_size() -> f64 {
    HRRR_CELL_SIZE
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: HRRR_CELL_SIZE,
            projection: ProjectionParams::hrrr(),
            axes: GridAxes::HrrrConus,
        }
    }
}

/// Layout of the grid's cell-center axes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridAxes {
    /// The HRRR CONUS 1799 x 1059 grid.
    #[default]
    HrrrConus,
    /// Half-open `[start, stop)` ranges stepped by the cell size.
    Extent {
        x_start: f64,
        x_stop: f64,
        y_start: f64,
        y_stop: f64,
    },
    /// Explicit cell-center coordinates.
    Explicit { x_coords: Vec<f64>, y_coords: Vec<f64> },
}

impl GridConfig {
    /// Build the validated grid.
    pub fn build_grid(&self) -> Result<GridSpec> {
        let grid = match &self.axes {
            GridAxes::HrrrConus => {
                if self.cell_size != HRRR_CELL_SIZE || self.projection != ProjectionParams::hrrr() {
                    return Err(CrossSectionError::config(
                        "hrrr_conus axes require the HRRR cell size and projection",
                    ));
                }
                GridSpec::hrrr_conus()
            }
            GridAxes::Extent {
                x_start,
                x_stop,
                y_start,
                y_stop,
            } => GridSpec::from_extent(
                *x_start,
                *x_stop,
                *y_start,
                *y_stop,
                self.cell_size,
                self.projection,
            )?,
            GridAxes::Explicit { x_coords, y_coords } => GridSpec::new(
                x_coords.clone(),
                y_coords.clone(),
                self.cell_size,
                self.projection,
            )?,
        };
        debug!(nx = grid.nx(), ny = grid.ny(), cell_size = grid.cell_size(), "Built grid");
        Ok(grid)
    }
}

impl CrossSectionConfig {
    /// Load a configuration from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            CrossSectionError::config(format!(
                "failed to read config {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse a configuration from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let expanded = expand_env_vars(content)?;
        let config: Self = serde_yaml::from_str(&expanded)?;
        Ok(config)
    }

    /// Default configuration with environment overrides applied.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Apply `XSECT_START`, `XSECT_END`, `XSECT_PRODUCTS` and
    /// `XSECT_CELL_SIZE` overrides, if set.
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("XSECT_START") {
            self.start = parse_point("XSECT_START", &val)?;
        }

        if let Ok(val) = std::env::var("XSECT_END") {
            self.end = parse_point("XSECT_END", &val)?;
        }

        if let Ok(val) = std::env::var("XSECT_PRODUCTS") {
            self.products = parse_products(&val)?;
        }

        if let Ok(val) = std::env::var("XSECT_CELL_SIZE") {
            self.grid.cell_size = val.trim().parse().map_err(|_| {
                CrossSectionError::config(format!("XSECT_CELL_SIZE: invalid number '{}'", val))
            })?;
        }

        Ok(())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        for (name, point) in [("start", &self.start), ("end", &self.end)] {
            if !point.is_valid() {
                return Err(CrossSectionError::config(format!(
                    "{} point {} is not a valid coordinate",
                    name, point
                )));
            }
        }

        if !self.grid.cell_size.is_finite() || self.grid.cell_size <= 0.0 {
            return Err(CrossSectionError::config(format!(
                "cell_size must be positive and finite, got {}",
                self.grid.cell_size
            )));
        }

        if matches!(self.grid.axes, GridAxes::HrrrConus) && self.grid.cell_size != HRRR_CELL_SIZE {
            return Err(CrossSectionError::config(format!(
                "cell_size {} does not apply to hrrr_conus axes, which are fixed at {} m; \
                 use extent or explicit axes for another spacing",
                self.grid.cell_size, HRRR_CELL_SIZE
            )));
        }

        if self.products.is_empty() {
            return Err(CrossSectionError::config("at least one product is required"));
        }

        Ok(())
    }
}

/// Parse a comma-separated product list, e.g. `wind_speed,temperature`.
pub fn parse_products(s: &str) -> Result<Vec<Product>> {
    s.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::parse)
        .collect()
}

fn parse_point(var: &str, s: &str) -> Result<GeoPoint> {
    s.parse()
        .map_err(|e| CrossSectionError::config(format!("{}: {}", var, e)))
}

/// Substitute `${VAR}` and `${VAR:-default}` with environment values.
fn expand_env_vars(content: &str) -> Result<String> {
    let mut result = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find('}').ok_or_else(|| {
            CrossSectionError::config(format!("unclosed variable substitution: ${{{}", after))
        })?;

        let expr = &after[..end];
        let (name, default) = match expr.split_once(":-") {
            Some((name, default)) => (name, Some(default)),
            None => (expr, None),
        };
        let value = match (std::env::var(name), default) {
            (Ok(value), _) => value,
            (Err(_), Some(default)) => default.to_string(),
            (Err(_), None) => {
                return Err(CrossSectionError::config(format!(
                    "environment variable {} is not set",
                    name
                )))
            }
        };
        result.push_str(&value);
        rest = &after[end + 1..];
    }
    result.push_str(rest);

    Ok(result)
}
