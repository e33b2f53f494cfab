//! Run metadata carried alongside the sampled arrays.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use xsect_common::{format_label, parse_model_timestamp, GeoPoint};

use crate::dataset::FieldSource;
use crate::derived::Product;
use crate::error::Result;

/// Forecast times and endpoint labels for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub init_time: DateTime<Utc>,
    pub valid_time: DateTime<Utc>,
    pub start: GeoPoint,
    pub end: GeoPoint,
    /// e.g. `18z Dec 24, 2022`
    pub init_label: String,
    pub valid_label: String,
    /// e.g. `43.3N, 112.9W`
    pub start_label: String,
    pub end_label: String,
    /// Plot title per requested product, in request order.
    pub titles: Vec<ProductTitle>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductTitle {
    pub product: Product,
    pub title: String,
}

impl RunMetadata {
    /// Parse the source's timestamps and label the endpoints.
    pub fn new(
        init_time: &str,
        valid_time: &str,
        start: GeoPoint,
        end: GeoPoint,
        products: &[Product],
    ) -> Result<Self> {
        let init_time = parse_model_timestamp(init_time)?;
        let valid_time = parse_model_timestamp(valid_time)?;

        let titles = products
            .iter()
            .map(|&product| ProductTitle {
                product,
                title: format!("{} ({})", product.title(), product.units()),
            })
            .collect();

        Ok(Self {
            init_label: format_label(&init_time),
            valid_label: format_label(&valid_time),
            start_label: start.label(),
            end_label: end.label(),
            init_time,
            valid_time,
            start,
            end,
            titles,
        })
    }

    pub fn from_source(
        source: &dyn FieldSource,
        start: GeoPoint,
        end: GeoPoint,
        products: &[Product],
    ) -> Result<Self> {
        Self::new(source.init_time(), source.valid_time(), start, end, products)
    }

    /// Whole hours from initialization to valid time.
    pub fn forecast_hour(&self) -> i64 {
        (self.valid_time - self.init_time).num_hours()
    }

    pub fn title(&self, product: Product) -> Option<&str> {
        self.titles
            .iter()
            .find(|t| t.product == product)
            .map(|t| t.title.as_str())
    }
}
