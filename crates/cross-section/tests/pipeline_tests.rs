//! End-to-end tests for cross-section extraction.

use cross_section::{
    CrossSectionConfig, CrossSectionError, CrossSectionPipeline, Field2D, Field3D, GridAxes,
    GridConfig, InMemoryDataset, Product, RawField,
};
use projection::{LambertConformal, MapProjection};
use test_utils::{
    assert_approx_eq, create_axis, create_constant_field, create_humidity_field,
    create_pressure_field, create_temperature_field, endpoints, flat_index, hrrr, time,
};
use xsect_common::{GeoPoint, GridSpec, ProjectionParams};

const LEVELS: usize = 3;
const N: usize = 3;

/// A 3 x 3 grid whose first cell sits exactly on `start`, and an end point
/// just past the far diagonal cell.
fn diagonal_setup() -> (GridSpec, GeoPoint, GeoPoint) {
    let projection = LambertConformal::hrrr();
    let start = GeoPoint::new(40.0, -100.0);
    let (x0, y0) = projection.project(start.lat, start.lon).unwrap();

    let grid = GridSpec::new(
        create_axis(x0, hrrr::CELL_SIZE, N),
        create_axis(y0, hrrr::CELL_SIZE, N),
        hrrr::CELL_SIZE,
        ProjectionParams::hrrr(),
    )
    .unwrap();

    let (lat, lon) = projection.unproject(x0 + 6001.0, y0 + 6001.0).unwrap();
    (grid, start, GeoPoint::new(lat, lon))
}

fn field(data: Vec<f32>) -> Field3D {
    Field3D::new(LEVELS, N, N, data).unwrap()
}

fn synthetic_dataset() -> InMemoryDataset {
    InMemoryDataset::new(time::INIT_TIME, time::VALID_TIME)
        .with_field(RawField::Temperature, field(create_temperature_field(LEVELS, N, N)))
        .with_field(RawField::Pressure, field(create_pressure_field(LEVELS, N, N)))
        .with_field(RawField::SpecificHumidity, field(create_humidity_field(LEVELS, N, N)))
        .with_field(RawField::UWind, field(create_constant_field(LEVELS, N, N, 10.0)))
        .with_field(RawField::VWind, field(create_constant_field(LEVELS, N, N, 0.0)))
}

fn rh(t: f64, p: f64, q: f64) -> f64 {
    0.263 * p * q / (17.67 * (t - 273.15) / (t - 29.65)).exp()
}

// ============================================================================
// Diagonal path on a synthetic grid
// ============================================================================

#[test]
fn test_diagonal_path_indices() {
    let (grid, start, end) = diagonal_setup();
    let pipeline = CrossSectionPipeline::new(grid).unwrap();

    let section = pipeline
        .extract(&synthetic_dataset(), start, end, &[Product::RelativeHumidity])
        .unwrap();

    assert_eq!(section.positions, vec![0, 1, 2]);
    assert_eq!(section.index_path.cols, vec![0, 1, 2]);
    assert_eq!(section.index_path.rows, vec![0, 1, 2]);
    assert_eq!(section.projected_path.x.len(), section.projected_path.y.len());
}

#[test]
fn test_relative_humidity_at_endpoint_cells() {
    let (grid, start, end) = diagonal_setup();
    let pipeline = CrossSectionPipeline::new(grid).unwrap();
    let dataset = synthetic_dataset();

    let section = pipeline
        .extract(&dataset, start, end, &[Product::RelativeHumidity])
        .unwrap();
    let values = &section.field(Product::RelativeHumidity).unwrap().values;
    assert_eq!(values.shape(), (LEVELS, N));

    let t = dataset.fields[&RawField::Temperature].data();
    let p = dataset.fields[&RawField::Pressure].data();
    let q = dataset.fields[&RawField::SpecificHumidity].data();

    for level in 0..LEVELS {
        for (position, cell) in [(0, 0), (2, 2)] {
            let i = flat_index(N, N, level, cell, cell);
            let expected = rh(t[i] as f64, p[i] as f64, q[i] as f64);
            assert_approx_eq!(values.get(level, position).unwrap(), expected, 1e-9);
        }
    }

    // 288 K, 1000 hPa, 8 g/kg at the first cell of the lowest level
    assert_approx_eq!(values.get(0, 0).unwrap(), 76.198064, 1e-5);
    // 276.5 K, 797 hPa, 4.6 g/kg at the last cell of the top level
    assert_approx_eq!(values.get(2, 2).unwrap(), 75.862705, 1e-5);
}

#[test]
fn test_log_pressure_axis() {
    let (grid, start, end) = diagonal_setup();
    let pipeline = CrossSectionPipeline::new(grid).unwrap();

    let section = pipeline
        .extract(&synthetic_dataset(), start, end, &[Product::Temperature])
        .unwrap();

    assert_eq!(section.log_pressure.shape(), (LEVELS, N));
    assert_approx_eq!(section.log_pressure.get(0, 0).unwrap(), 1000.0_f64.ln(), 1e-12);
    // pressure drops with level, so log-pressure does too
    assert!(section.log_pressure.get(2, 0).unwrap() < section.log_pressure.get(0, 0).unwrap());
}

#[test]
fn test_multiple_products_in_request_order() {
    let (grid, start, end) = diagonal_setup();
    let pipeline = CrossSectionPipeline::new(grid).unwrap();

    let products = [
        Product::WindSpeed,
        Product::EquivalentPotentialTemperature,
        Product::Temperature,
    ];
    let section = pipeline
        .extract(&synthetic_dataset(), start, end, &products)
        .unwrap();

    let names: Vec<_> = section.fields.iter().map(|f| f.product).collect();
    assert_eq!(names, products);

    let wind = &section.field(Product::WindSpeed).unwrap().values;
    assert!(wind.data().iter().all(|&v| (v - 22.3694).abs() < 1e-9));
    assert_eq!(section.field(Product::WindSpeed).unwrap().units, "mph");

    let temp = &section.field(Product::Temperature).unwrap().values;
    assert_approx_eq!(temp.get(0, 0).unwrap(), (288.0 - 273.15) * 9.0 / 5.0 + 32.0, 1e-9);
}

#[test]
fn test_metadata_labels() {
    let (grid, start, end) = diagonal_setup();
    let pipeline = CrossSectionPipeline::new(grid).unwrap();

    let section = pipeline
        .extract(&synthetic_dataset(), start, end, &[Product::Temperature])
        .unwrap();

    assert_eq!(section.metadata.init_label, "18z Dec 24, 2022");
    assert_eq!(section.metadata.valid_label, "10z Dec 25, 2022");
    assert_eq!(section.metadata.start_label, "40.0N, 100.0W");
    assert_eq!(section.metadata.forecast_hour(), 16);
}

#[test]
fn test_path_points_from_coordinate_arrays() {
    let (grid, start, end) = diagonal_setup();
    let pipeline = CrossSectionPipeline::new(grid).unwrap();

    let lat = Field2D::new(N, N, vec![40.0, 40.0, 40.0, 40.5, 40.5, 40.5, 41.0, 41.0, 41.0]).unwrap();
    let lon = Field2D::new(N, N, vec![-100.0, -99.5, -99.0, -100.0, -99.5, -99.0, -100.0, -99.5, -99.0])
        .unwrap();
    let dataset = synthetic_dataset().with_coordinates(lat, lon);

    let section = pipeline
        .extract(&dataset, start, end, &[Product::Temperature])
        .unwrap();
    let points = section.path_points.unwrap();
    assert_eq!(
        points,
        vec![
            GeoPoint::new(40.0, -100.0),
            GeoPoint::new(40.5, -99.5),
            GeoPoint::new(41.0, -99.0),
        ]
    );

    let without = pipeline
        .extract(&synthetic_dataset(), start, end, &[Product::Temperature])
        .unwrap();
    assert!(without.path_points.is_none());
}

#[test]
fn test_output_serializes_to_json() {
    let (grid, start, end) = diagonal_setup();
    let pipeline = CrossSectionPipeline::new(grid).unwrap();
    let section = pipeline
        .extract(&synthetic_dataset(), start, end, &[Product::RelativeHumidity])
        .unwrap();

    let json = serde_json::to_value(&section).unwrap();
    assert_eq!(json["fields"][0]["product"], "relative_humidity");
    assert_eq!(json["fields"][0]["units"], "%");
    assert_eq!(json["positions"].as_array().unwrap().len(), 3);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_degenerate_path() {
    let pipeline = CrossSectionPipeline::new(GridSpec::hrrr_conus()).unwrap();
    let ((lat0, lon0), (lat1, lon1)) = endpoints::DEGENERATE;

    let err = pipeline
        .extract(
            &synthetic_dataset(),
            GeoPoint::new(lat0, lon0),
            GeoPoint::new(lat1, lon1),
            &[Product::Temperature],
        )
        .unwrap_err();
    assert!(matches!(err, CrossSectionError::DegeneratePath { .. }));
    assert_eq!(err.kind(), "DegeneratePathError");
}

#[test]
fn test_out_of_domain_endpoint() {
    let pipeline = CrossSectionPipeline::new(GridSpec::hrrr_conus()).unwrap();
    let ((lat0, lon0), (lat1, lon1)) = endpoints::OUT_OF_DOMAIN;

    let err = pipeline
        .extract(
            &synthetic_dataset(),
            GeoPoint::new(lat0, lon0),
            GeoPoint::new(lat1, lon1),
            &[Product::Temperature],
        )
        .unwrap_err();
    assert_eq!(err.kind(), "OutOfRangeError");
}

#[test]
fn test_endpoint_near_south_pole() {
    // projects to a finite point hundreds of thousands of km away
    let pipeline = CrossSectionPipeline::new(GridSpec::hrrr_conus()).unwrap();
    let err = pipeline
        .extract(
            &synthetic_dataset(),
            GeoPoint::new(40.0, -100.0),
            GeoPoint::new(-89.9999999, -99.0),
            &[Product::Temperature],
        )
        .unwrap_err();
    assert_eq!(err.kind(), "OutOfRangeError");
}

#[test]
fn test_path_leaving_small_grid() {
    let (grid, start, _) = diagonal_setup();
    let projection = LambertConformal::hrrr();
    let (x0, y0) = projection.project(start.lat, start.lon).unwrap();
    // one cell beyond the half-cell margin
    let (lat, lon) = projection.unproject(x0 + 12_000.0, y0 + 3000.0).unwrap();

    let pipeline = CrossSectionPipeline::new(grid).unwrap();
    let err = pipeline
        .extract(&synthetic_dataset(), start, GeoPoint::new(lat, lon), &[Product::Temperature])
        .unwrap_err();
    assert!(matches!(err, CrossSectionError::OutOfRange { .. }));
}

#[test]
fn test_missing_field() {
    let (grid, start, end) = diagonal_setup();
    let pipeline = CrossSectionPipeline::new(grid).unwrap();

    let err = pipeline
        .extract(&synthetic_dataset(), start, end, &[Product::VerticalVelocity])
        .unwrap_err();
    match err {
        CrossSectionError::MissingField { field, product } => {
            assert_eq!(field, "w");
            assert_eq!(product, "vertical_velocity");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_pressure_reported() {
    let (grid, start, end) = diagonal_setup();
    let pipeline = CrossSectionPipeline::new(grid).unwrap();
    let mut dataset = synthetic_dataset();
    dataset.fields.remove(&RawField::Pressure);

    let err = pipeline
        .extract(&dataset, start, end, &[Product::WindSpeed])
        .unwrap_err();
    assert_eq!(err.kind(), "MissingFieldError");
}

#[test]
fn test_field_shapes_must_agree() {
    let (grid, start, end) = diagonal_setup();
    let pipeline = CrossSectionPipeline::new(grid).unwrap();
    let dataset = synthetic_dataset().with_field(
        RawField::SpecificHumidity,
        Field3D::new(2, N, N, create_humidity_field(2, N, N)).unwrap(),
    );

    let err = pipeline
        .extract(&dataset, start, end, &[Product::RelativeHumidity])
        .unwrap_err();
    assert_eq!(err.kind(), "ShapeMismatchError");
}

#[test]
fn test_field_must_match_grid() {
    let pipeline = CrossSectionPipeline::new(GridSpec::hrrr_conus()).unwrap();
    let ((lat0, lon0), (lat1, lon1)) = endpoints::TEMPERATURE;

    let err = pipeline
        .extract(
            &synthetic_dataset(),
            GeoPoint::new(lat0, lon0),
            GeoPoint::new(lat1, lon1),
            &[Product::Temperature],
        )
        .unwrap_err();
    assert_eq!(err.kind(), "ShapeMismatchError");
}

#[test]
fn test_invalid_timestamp() {
    let (grid, start, end) = diagonal_setup();
    let pipeline = CrossSectionPipeline::new(grid).unwrap();
    let mut dataset = synthetic_dataset();
    dataset.init_time = "12/24/2022".to_string();

    let err = pipeline
        .extract(&dataset, start, end, &[Product::Temperature])
        .unwrap_err();
    assert_eq!(err.kind(), "InvalidTimeError");
}

// ============================================================================
// Config-driven runs
// ============================================================================

#[test]
fn test_run_from_config() {
    let (grid, start, end) = diagonal_setup();
    let config = CrossSectionConfig {
        start,
        end,
        grid: GridConfig {
            cell_size: grid.cell_size(),
            projection: ProjectionParams::hrrr(),
            axes: GridAxes::Explicit {
                x_coords: grid.x_coords().to_vec(),
                y_coords: grid.y_coords().to_vec(),
            },
        },
        products: vec![Product::RelativeHumidity, Product::MixingRatio],
    };

    let pipeline = CrossSectionPipeline::from_config(&config).unwrap();
    let section = pipeline.run(&config, &synthetic_dataset()).unwrap();
    assert_eq!(section.fields.len(), 2);
    assert_eq!(section.len(), 3);
}

#[test]
fn test_run_rejects_empty_request() {
    let (grid, start, end) = diagonal_setup();
    let pipeline = CrossSectionPipeline::new(grid).unwrap();
    let config = CrossSectionConfig {
        start,
        end,
        products: vec![],
        ..CrossSectionConfig::default()
    };

    let err = pipeline.run(&config, &synthetic_dataset()).unwrap_err();
    assert_eq!(err.kind(), "ConfigError");
}
