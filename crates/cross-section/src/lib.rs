//! Vertical Cross Sections of Gridded Model Output
//!
//! This crate extracts a (level × along-path position) slice of multi-level
//! model fields along a straight line between two geographic endpoints, on
//! the model's native projected grid, and derives meteorological quantities
//! from the sampled values. It enables:
//!
//! - **Nearest-cell sampling**: no interpolation, no clamping at the grid edge
//! - **Request sets**: any combination of [`Product`]s in one pass
//! - **Renderer-ready output**: log-pressure axis, named fields, labels
//!
//! # Architecture
//!
//! ```text
//! start, end (lat, lon)
//!      │
//!      ▼
//! LambertConformal::project
//!      │
//!      ├─► path::resample       one point per cell, axes reconciled
//!      │
//!      ├─► indexer::index_path  nearest column/row per point
//!      │
//!      ├─► sampler::sample      each required raw field, once
//!      │
//!      └─► Product::compute     derived fields + log-pressure
//!               │
//!               ▼
//!          CrossSection (+ RunMetadata)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use cross_section::{CrossSectionConfig, CrossSectionPipeline, InMemoryDataset};
//!
//! let config = CrossSectionConfig::from_yaml_file("xsect.yaml")?;
//! let dataset = InMemoryDataset::from_json_file("hrrr.json")?;
//!
//! let pipeline = CrossSectionPipeline::from_config(&config)?;
//! let section = pipeline.run(&config, &dataset)?;
//!
//! for field in &section.fields {
//!     println!("{}: {:?}", field.product, field.values.shape());
//! }
//! ```

pub mod config;
pub mod dataset;
pub mod derived;
pub mod error;
pub mod indexer;
pub mod metadata;
pub mod path;
pub mod pipeline;
pub mod sampler;
pub mod thermo;
pub mod types;

// Re-export commonly used types at crate root
pub use config::{CrossSectionConfig, GridAxes, GridConfig};
pub use dataset::{FieldSource, InMemoryDataset, RawField};
pub use derived::{Product, SampledFields};
pub use error::{CrossSectionError, Result};
pub use indexer::{index_path, nearest_index};
pub use metadata::{ProductTitle, RunMetadata};
pub use path::resample;
pub use pipeline::{CrossSection, CrossSectionPipeline, NamedField};
pub use sampler::{sample, sample_surface};
pub use types::{DerivedField, Field2D, Field3D, IndexPath, ProjectedPath, VerticalProfile};
