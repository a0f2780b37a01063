//! Command-line interface for `geobound`, which downloads GADM administrative
//! boundaries for one country and converts them to `GeoJSON` and TopoJSON.
//!
//! # Architecture
//!
//! The CLI is built using [`clap`] for argument parsing and [`tracing`] for
//! structured logging. It parses arguments into a
//! [`geobound_core::config::PipelineConfig`], configures logging, and hands
//! the run to [`geobound_core::pipeline::run`].
//!
//! # Usage
//!
//! - `geobound [COUNTRY] [TOLERANCE]` - download and convert one country
//! - `geobound backends` - list the conversion backends and their capabilities

mod display;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, anyhow};
use clap::{Args, Parser, Subcommand};
use tracing::{Level, info};
use tracing_log::LogTracer;
use tracing_subscriber::FmtSubscriber;

use geobound_core::backends::get_backends;
use geobound_core::config::{DEFAULT_BACKEND, DEFAULT_TOLERANCE, PipelineConfig};
use geobound_core::country::{CountryCode, DEFAULT_COUNTRY};
use geobound_core::dataset::{Dataset, UrlTemplate};
use geobound_core::error::GeoBoundError;
use geobound_core::fetch::HttpArchiveSource;
use geobound_core::pipeline;

use crate::display::{display_backends, display_summary};

#[derive(Parser)]
#[command(
    name = "geobound",
    version,
    about = "Download GADM administrative boundaries as GeoJSON and TopoJSON",
    long_about = "geobound downloads the GADM shapefile archive of one country, extracts it into\n\
                  <COUNTRY>-SHP and converts every administrative level into\n\
                  <COUNTRY>-GeoJSON/<file>.json and <COUNTRY>-TopoJSON/<file>.json."
)]
/// Command-line arguments and options for the `geobound` CLI.
struct Cli {
    /// Enable verbose (INFO level) logging output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug (DEBUG level) logging output with detailed diagnostics.
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(flatten)]
    run: RunArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Options of a download-and-convert run.
#[derive(Args, Debug)]
struct RunArgs {
    /// ISO 3166-1 alpha-3 country code, case-insensitive.
    #[arg(value_name = "COUNTRY", default_value = DEFAULT_COUNTRY, value_parser = parse_country)]
    country: CountryCode,

    /// Simplification tolerance in degrees; 0 disables simplification.
    #[arg(value_name = "TOLERANCE", default_value_t = DEFAULT_TOLERANCE, allow_negative_numbers = true)]
    tolerance: f64,

    /// Conversion backend (see `geobound backends`).
    #[arg(short, long, env = "GEOBOUND_BACKEND", default_value = DEFAULT_BACKEND)]
    backend: String,

    /// GADM release to download from.
    #[arg(long, default_value = "gadm28", value_parser = parse_dataset)]
    dataset: Dataset,

    /// Custom archive URL containing a `{code}` placeholder; overrides `--dataset`.
    #[arg(long, env = "GEOBOUND_URL_TEMPLATE", value_name = "URL")]
    url_template: Option<String>,

    /// Directory in which the output directories are created.
    #[arg(short, long, env = "GEOBOUND_OUTPUT_DIR", value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Use a local zip archive instead of downloading.
    #[arg(long, value_name = "ZIP")]
    archive: Option<PathBuf>,

    /// Keep the downloaded archive after extraction.
    #[arg(long)]
    keep_archive: bool,

    /// Seconds to wait for the download connection to open.
    #[arg(long, value_name = "SECS", default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    connect_timeout: u64,
}

/// Available subcommands for the `geobound` CLI.
#[derive(Subcommand)]
enum Commands {
    /// Lists all conversion backends and their capabilities.
    Backends,
}

fn parse_country(value: &str) -> Result<CountryCode, String> {
    CountryCode::parse(value).map_err(|e| e.to_string())
}

fn parse_dataset(value: &str) -> Result<Dataset, String> {
    value.parse::<Dataset>().map_err(|e| e.to_string())
}

/// Entry point for the `geobound` command-line interface.
///
/// # Errors
///
/// Returns an error if the run fails or if the logging system cannot be initialized.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity flags
    let log_level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    // Bridge logs from the `log` crate to the `tracing` ecosystem.
    LogTracer::init()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Some(Commands::Backends) => handle_backends(),
        None => handle_run(cli.run).await?,
    }

    Ok(())
}

fn build_config(args: RunArgs) -> Result<PipelineConfig> {
    let url_template = match args.url_template {
        Some(template) => UrlTemplate::new(template).map_err(|e| anyhow!(e))?,
        None => args.dataset.url_template(),
    };

    let mut config = PipelineConfig::default()
        .with_country(args.country)
        .with_tolerance(args.tolerance)
        .with_backend(args.backend)
        .with_url_template(url_template)
        .with_output_root(args.output_dir)
        .with_keep_archive(args.keep_archive)
        .with_connect_timeout(Duration::from_secs(args.connect_timeout));
    if let Some(archive) = args.archive {
        config = config.with_local_archive(archive);
    }

    config.validate().map_err(|e| anyhow!(describe_error(&e)))?;
    Ok(config)
}

async fn handle_run(args: RunArgs) -> Result<()> {
    let config = build_config(args)?;
    info!(
        "Country: {}, tolerance: {}, backend: {}",
        config.country, config.tolerance, config.backend
    );

    let source = HttpArchiveSource::new(config.connect_timeout)?;
    let summary = pipeline::run(&config, &source)
        .await
        .map_err(|e| anyhow!(describe_error(&e)))?;

    display_summary(&summary);
    Ok(())
}

/// Formats an error with its recovery suggestion, if any.
fn describe_error(err: &GeoBoundError) -> String {
    match err.recovery_suggestion() {
        Some(hint) => format!("{}\n\nHint: {hint}", err.user_message()),
        None => err.user_message(),
    }
}

fn handle_backends() {
    display_backends(&get_backends());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("geobound").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]);
        assert!(cli.command.is_none());
        let config = build_config(cli.run).unwrap();
        assert_eq!(config.country.as_str(), "PAK");
        assert!((config.tolerance - 0.01).abs() < f64::EPSILON);
        assert_eq!(config.backend, "native");
        assert_eq!(config.output_root, PathBuf::from("."));
        assert!(config.local_archive.is_none());
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_connect_timeout_must_be_positive() {
        let err = Cli::try_parse_from(["geobound", "--connect-timeout", "0"])
            .err()
            .unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);

        let config = build_config(parse(&["--connect-timeout", "1"]).run).unwrap();
        assert_eq!(config.connect_timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_positional_country_and_tolerance() {
        let config = build_config(parse(&["bgd", "0.25"]).run).unwrap();
        assert_eq!(config.country.as_str(), "BGD");
        assert!((config.tolerance - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_dataset_and_template() {
        let config = build_config(parse(&["ind", "--dataset", "gadm41"]).run).unwrap();
        assert_eq!(
            config.archive_url(),
            "https://geodata.ucdavis.edu/gadm/gadm4.1/shp/gadm41_IND_shp.zip"
        );

        let config = build_config(
            parse(&["ind", "--url-template", "http://mirror.test/{code}.zip"]).run,
        )
        .unwrap();
        assert_eq!(config.archive_url(), "http://mirror.test/IND.zip");
    }

    #[test]
    fn test_invalid_values() {
        assert!(Cli::try_parse_from(["geobound", "pakistan"]).is_err());
        assert!(Cli::try_parse_from(["geobound", "PAK", "abc"]).is_err());
        assert!(Cli::try_parse_from(["geobound", "--dataset", "gadm99"]).is_err());
        assert!(Cli::try_parse_from(["geobound", "--connect-timeout", "0"]).is_err());

        let err = build_config(parse(&["PAK", "-1"]).run).unwrap_err();
        assert!(err.to_string().contains("tolerance"));

        let err = build_config(parse(&["--backend", "ogr2ogr"]).run).unwrap_err();
        assert!(err.to_string().contains("Hint: Run 'geobound backends'"));

        let err = build_config(parse(&["--url-template", "http://mirror.test/a.zip"]).run)
            .unwrap_err();
        assert!(err.to_string().contains("{code}"));
    }

    #[test]
    fn test_backends_subcommand() {
        let cli = parse(&["backends"]);
        assert!(matches!(cli.command, Some(Commands::Backends)));

        let cli = parse(&["-v", "backends"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Some(Commands::Backends)));
    }
}
