//! Cross-section extractor.
//!
//! Reads a YAML request and a JSON dataset, extracts the requested products
//! along the path and writes the result as JSON for a renderer.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use cross_section::{
    config::parse_products, CrossSection, CrossSectionConfig, CrossSectionError,
    CrossSectionPipeline, InMemoryDataset,
};
use xsect_common::GeoPoint;

#[derive(Parser, Debug)]
#[command(name = "xsect")]
#[command(about = "Extract a vertical cross section from gridded model output")]
struct Args {
    /// Request configuration (YAML). Defaults plus XSECT_* overrides if omitted.
    #[arg(short, long, env = "XSECT_CONFIG")]
    config: Option<PathBuf>,

    /// Dataset file (JSON)
    #[arg(short, long)]
    dataset: PathBuf,

    /// Start point as "lat,lon"
    #[arg(long, allow_hyphen_values = true)]
    start: Option<GeoPoint>,

    /// End point as "lat,lon"
    #[arg(long, allow_hyphen_values = true)]
    end: Option<GeoPoint>,

    /// Comma-separated products, e.g. "wind_speed,equivalent_potential_temperature"
    #[arg(short, long)]
    products: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn main() -> ExitCode {
    // .env may hold XSECT_* settings, including XSECT_CONFIG
    dotenvy::dotenv().ok();

    let args = Args::parse();

    if let Err(e) = init_tracing(&args) {
        eprintln!("failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let kind = error_kind(&e);
            error!(kind, error = %format!("{e:#}"), "Cross section failed");
            eprintln!("{kind}: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(args: &Args) -> Result<()> {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // logs go to stderr so stdout stays clean for the JSON output
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(io::stderr);

    if args.json_logs {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let config = load_config(args)?;
    info!(
        start = %config.start,
        end = %config.end,
        products = ?config.products,
        "Loaded configuration"
    );

    let dataset = InMemoryDataset::from_json_file(&args.dataset)
        .with_context(|| format!("Failed to load dataset {}", args.dataset.display()))?;

    let pipeline = CrossSectionPipeline::from_config(&config)?;
    let section = pipeline.run(&config, &dataset)?;

    write_output(&section, args.output.as_deref())?;
    info!(
        positions = section.len(),
        output = %args.output.as_deref().map(|p| p.display().to_string()).unwrap_or_else(|| "stdout".to_string()),
        "Wrote cross section"
    );
    Ok(())
}

/// Config file (or defaults with env overrides), then command-line overrides.
fn load_config(args: &Args) -> Result<CrossSectionConfig> {
    let mut config = match &args.config {
        Some(path) => CrossSectionConfig::from_yaml_file(path)?,
        None => CrossSectionConfig::from_env()?,
    };

    if let Some(start) = args.start {
        config.start = start;
    }
    if let Some(end) = args.end {
        config.end = end;
    }
    if let Some(products) = &args.products {
        config.products = parse_products(products)?;
    }

    config.validate()?;
    Ok(config)
}

fn write_output(section: &CrossSection, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, section)?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            serde_json::to_writer(&mut writer, section)?;
            writeln!(writer)?;
            writer.flush()?;
        }
    }
    Ok(())
}

/// Taxonomy name of the underlying cross-section error, if any.
fn error_kind(err: &anyhow::Error) -> &'static str {
    err.chain()
        .find_map(|e| e.downcast_ref::<CrossSectionError>())
        .map(CrossSectionError::kind)
        .unwrap_or("Error")
}

#[cfg(test)]
mod tests {
    use super::*;
    use cross_section::Product;
    use test_utils::write_temp_file;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["xsect", "--dataset", "data.json"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_parse_args_defaults() {
        let args = args(&[]);
        assert_eq!(args.log_level, "info");
        assert!(!args.json_logs);
        assert!(args.output.is_none());
    }

    #[test]
    fn test_parse_negative_longitude() {
        let args = args(&["--start", "43.3,-112.88", "--end", "46.8,-99"]);
        assert_eq!(args.start, Some(GeoPoint::new(43.3, -112.88)));
        assert_eq!(args.end, Some(GeoPoint::new(46.8, -99.0)));
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let file = write_temp_file(
            "start: {lat: 35.7, lon: -92.7}\nend: {lat: 35.1, lon: -79.4}\nproducts: [temperature]\n",
            ".yaml",
        );
        let path = file.path().to_str().unwrap();
        let args = args(&["--config", path, "--products", "relative_humidity,mixing_ratio"]);

        let config = load_config(&args).unwrap();
        assert_eq!(config.start, GeoPoint::new(35.7, -92.7));
        assert_eq!(
            config.products,
            vec![Product::RelativeHumidity, Product::MixingRatio]
        );
    }

    #[test]
    fn test_invalid_override_rejected() {
        let file = write_temp_file(
            "start: {lat: 35.7, lon: -92.7}\nend: {lat: 35.1, lon: -79.4}\nproducts: [temperature]\n",
            ".yaml",
        );
        let path = file.path().to_str().unwrap();
        let args = args(&["--config", path, "--products", ","]);

        let err = load_config(&args).unwrap_err();
        assert_eq!(error_kind(&err), "ConfigError");
    }

    #[test]
    fn test_env_file_feeds_default_config() {
        let file = write_temp_file(
            "XSECT_START=40.0,-100.0\nXSECT_PRODUCTS=mixing_ratio,temperature\n",
            ".env",
        );
        dotenvy::from_path(file.path()).unwrap();
        let loaded = load_config(&args(&[]));
        std::env::remove_var("XSECT_START");
        std::env::remove_var("XSECT_PRODUCTS");

        let config = loaded.unwrap();
        assert_eq!(config.start, GeoPoint::new(40.0, -100.0));
        assert_eq!(config.products, vec![Product::MixingRatio, Product::Temperature]);
    }

    #[test]
    fn test_error_kind_through_context() {
        let err = anyhow::Error::new(CrossSectionError::DegeneratePath {
            axis: xsect_common::Axis::X,
            value: 0.0,
        })
        .context("while extracting");
        assert_eq!(error_kind(&err), "DegeneratePathError");

        let other = anyhow::anyhow!("something else");
        assert_eq!(error_kind(&other), "Error");
    }

    #[test]
    fn test_write_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let dataset_path = dir.path().join("dataset.json");
        std::fs::write(&dataset_path, small_dataset()).unwrap();
        let out = dir.path().join("out.json");

        let config = CrossSectionConfig {
            start: GeoPoint::new(38.5, -97.5),
            end: GeoPoint::new(38.55, -97.45),
            grid: cross_section::GridConfig {
                cell_size: 3000.0,
                projection: Default::default(),
                axes: cross_section::GridAxes::Extent {
                    x_start: -3000.0,
                    x_stop: 9000.0,
                    y_start: -3000.0,
                    y_stop: 9000.0,
                },
            },
            products: vec![Product::Temperature],
        };
        let dataset = InMemoryDataset::from_json_file(&dataset_path).unwrap();
        let section = CrossSectionPipeline::from_config(&config)
            .unwrap()
            .run(&config, &dataset)
            .unwrap();

        write_output(&section, Some(&out)).unwrap();
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written["fields"][0]["product"], "temperature");
        assert_eq!(written["metadata"]["init_label"], "18z Dec 24, 2022");
    }

    /// One level on a 4 x 4 grid, as the JSON a data loader would write.
    fn small_dataset() -> String {
        let temperature = vec![280.0_f32; 16];
        let pressure = vec![85_000.0_f32; 16];
        serde_json::json!({
            "init_time": test_utils::time::INIT_TIME,
            "valid_time": test_utils::time::VALID_TIME,
            "fields": {
                "t": {"levels": 1, "rows": 4, "cols": 4, "data": temperature},
                "pres": {"levels": 1, "rows": 4, "cols": 4, "data": pressure}
            }
        })
        .to_string()
    }
}
