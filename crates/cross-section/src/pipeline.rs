//! End-to-end cross-section extraction.

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};
use xsect_common::{Axis, GeoPoint, GridSpec};

use projection::{LambertConformal, MapProjection};

use crate::config::CrossSectionConfig;
use crate::dataset::{FieldSource, RawField};
use crate::derived::{self, Product, SampledFields};
use crate::error::{CrossSectionError, Result};
use crate::indexer::index_path;
use crate::metadata::RunMetadata;
use crate::path::resample;
use crate::sampler::{sample, sample_surface};
use crate::types::{Field2D, Field3D, IndexPath, ProjectedPath, VerticalProfile};

/// One derived product along the path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedField {
    pub product: Product,
    pub units: String,
    pub values: VerticalProfile,
}

/// Everything a renderer needs to draw one cross section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossSection {
    /// Along-path position index, `0..N`.
    pub positions: Vec<usize>,
    /// `ln(P / 100)` at every level and position.
    pub log_pressure: VerticalProfile,
    /// Requested products, in request order.
    pub fields: Vec<NamedField>,
    pub metadata: RunMetadata,
    pub projected_path: ProjectedPath,
    pub index_path: IndexPath,
    /// Geographic location of each sampled cell, when the source has
    /// latitude/longitude arrays.
    pub path_points: Option<Vec<GeoPoint>>,
}

impl CrossSection {
    pub fn field(&self, product: Product) -> Option<&NamedField> {
        self.fields.iter().find(|f| f.product == product)
    }

    /// Number of positions along the path.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Stateless extractor bound to one grid and its projection.
///
/// ```text
///  (lat, lon) x2 ──► project ──► resample ──► index_path ──► sample ──► derive ──► CrossSection
/// ```
pub struct CrossSectionPipeline {
    grid: GridSpec,
    projection: LambertConformal,
}

impl CrossSectionPipeline {
    pub fn new(grid: GridSpec) -> Result<Self> {
        let projection = LambertConformal::new(grid.projection())?;
        Ok(Self { grid, projection })
    }

    /// Build the grid described by `config` and a pipeline over it.
    pub fn from_config(config: &CrossSectionConfig) -> Result<Self> {
        Self::new(config.grid.build_grid()?)
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    /// Extract the cross section described by `config` from `source`.
    pub fn run(&self, config: &CrossSectionConfig, source: &dyn FieldSource) -> Result<CrossSection> {
        config.validate()?;
        self.extract(source, config.start, config.end, &config.products)
    }

    /// Extract `products` along the straight projected line from `start` to `end`.
    pub fn extract(
        &self,
        source: &dyn FieldSource,
        start: GeoPoint,
        end: GeoPoint,
        products: &[Product],
    ) -> Result<CrossSection> {
        let started = Instant::now();
        let metadata = RunMetadata::from_source(source, start, end, products)?;

        let start_xy = self.projection.project(start.lat, start.lon)?;
        let end_xy = self.projection.project(end.lat, end.lon)?;
        debug!(
            start = %start,
            end = %end,
            start_x = start_xy.0,
            start_y = start_xy.1,
            end_x = end_xy.0,
            end_y = end_xy.1,
            "Projected endpoints"
        );
        self.check_endpoint(start_xy)?;
        self.check_endpoint(end_xy)?;

        let projected_path = resample(start_xy, end_xy, self.grid.cell_size())?;
        let index_path = index_path(&projected_path, &self.grid)?;

        let sampled = self.sample_fields(source, products, &index_path)?;
        let pressure = sampled
            .get(RawField::Pressure)
            .ok_or_else(|| CrossSectionError::MissingField {
                field: "pres".to_string(),
                product: "log_pressure".to_string(),
            })?;
        let log_pressure = derived::log_pressure(pressure);

        let fields = products
            .iter()
            .map(|&product| -> Result<NamedField> {
                let values = product.compute(&sampled)?;
                debug!(product = %product, shape = ?values.shape(), "Computed product");
                Ok(NamedField {
                    product,
                    units: product.units().to_string(),
                    values,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let path_points = match (source.latitude(), source.longitude()) {
            (Some(lat), Some(lon)) => Some(self.path_points(lat, lon, &index_path)?),
            _ => None,
        };

        info!(
            positions = index_path.len(),
            levels = log_pressure.levels(),
            products = ?products.iter().map(Product::name).collect::<Vec<_>>(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Extracted cross section"
        );

        Ok(CrossSection {
            positions: (0..index_path.len()).collect(),
            log_pressure,
            fields,
            metadata,
            projected_path,
            index_path,
            path_points,
        })
    }

    /// Both coordinates of a projected endpoint must fall inside the area
    /// the grid cells cover.
    fn check_endpoint(&self, (x, y): (f64, f64)) -> Result<()> {
        for (axis, value) in [(Axis::X, x), (Axis::Y, y)] {
            let (min, max) = self.grid.covered_span(axis);
            if !(min..=max).contains(&value) {
                return Err(CrossSectionError::OutOfRange {
                    axis,
                    value,
                    min,
                    max,
                });
            }
        }
        Ok(())
    }

    /// Sample every raw field needed by `products`, plus pressure, once each.
    fn sample_fields(
        &self,
        source: &dyn FieldSource,
        products: &[Product],
        path: &IndexPath,
    ) -> Result<SampledFields> {
        let mut sampled = SampledFields::new();
        let mut shape: Option<(usize, usize, usize)> = None;

        for raw in derived::required_fields(products) {
            let field = source.field(raw).ok_or_else(|| CrossSectionError::MissingField {
                field: raw.short_name().to_string(),
                product: requesting_product(raw, products),
            })?;
            self.check_field_shape(raw, field, &mut shape)?;
            sampled.insert(raw, sample(field, path)?);
            debug!(field = %raw, "Sampled field");
        }

        Ok(sampled)
    }

    /// Fields must match the grid and each other.
    fn check_field_shape(
        &self,
        raw: RawField,
        field: &Field3D,
        shape: &mut Option<(usize, usize, usize)>,
    ) -> Result<()> {
        let (levels, rows, cols) = field.shape();
        if rows != self.grid.ny() || cols != self.grid.nx() {
            return Err(CrossSectionError::shape_mismatch(format!(
                "field '{}' is {} x {} but the grid is {} x {}",
                raw,
                rows,
                cols,
                self.grid.ny(),
                self.grid.nx()
            )));
        }
        match shape {
            Some(expected) if *expected != (levels, rows, cols) => {
                Err(CrossSectionError::shape_mismatch(format!(
                    "field '{}' has shape {:?}, expected {:?}",
                    raw,
                    (levels, rows, cols),
                    expected
                )))
            }
            Some(_) => Ok(()),
            None => {
                *shape = Some((levels, rows, cols));
                Ok(())
            }
        }
    }

    fn path_points(&self, lat: &Field2D, lon: &Field2D, path: &IndexPath) -> Result<Vec<GeoPoint>> {
        let lats = sample_surface(lat, path)?;
        let lons = sample_surface(lon, path)?;
        Ok(lats
            .into_iter()
            .zip(lons)
            .map(|(lat, lon)| GeoPoint::new(lat, lon))
            .collect())
    }
}

/// Name of the first requested product that needs `raw`, for error reports.
fn requesting_product(raw: RawField, products: &[Product]) -> String {
    products
        .iter()
        .find(|p| p.required_fields().contains(&raw))
        .map(|p| p.name().to_string())
        .unwrap_or_else(|| "log_pressure".to_string())
}
