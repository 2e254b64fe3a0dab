#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line explorer for crime incident trends.
//!
//! ```text
//! safe_walk summary [--from-year 2019] [--to-year 2024] [--types THEFT,BATTERY]
//! safe_walk trend [--window 5] [--target-year 2026] [--reduction 10]
//! safe_walk types [--top 10]
//! safe_walk heatmap
//! safe_walk monthly
//! safe_walk map [--limit 8000]
//! safe_walk bounds
//! ```
//!
//! Running `safe_walk` with no subcommand enters interactive mode. Every
//! subcommand accepts `--json` for machine-readable output.
//!
//! Logging goes through [`safe_walk_cli_utils::init_logger`], so `RUST_LOG`
//! (default `safe_walk=info`) controls verbosity without tearing the load
//! progress bar.

mod commands;
mod config;
mod interactive;
mod output;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use safe_walk_analytics::summary::dataset_bounds;
use safe_walk_cli_utils::IndicatifProgress;
use safe_walk_ingest::{discovery::locate_dataset, load_incidents};

use crate::config::{Overrides, SafeWalkConfig, dataset_path, resolve};

/// Config file picked up from the working directory when `--config` is not
/// given.
const DEFAULT_CONFIG_FILE: &str = "safe_walk.toml";

/// Log filters used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTERS: &str = "safe_walk=info";

#[derive(Parser)]
#[command(
    name = "safe_walk",
    about = "Explore crime incident trends and project next year's count"
)]
struct Cli {
    /// Path to the crimes CSV export
    #[arg(long, global = true)]
    csv: Option<PathBuf>,

    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Headline metrics for the filtered incidents
    Summary {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Yearly counts and a linear projection
    Trend {
        #[command(flatten)]
        filter: FilterArgs,
        /// Apply a hypothetical reduction (percent) to the projection
        #[arg(long)]
        reduction: Option<f64>,
    },
    /// Most frequent crime types
    Types {
        #[command(flatten)]
        filter: FilterArgs,
        /// Number of types to show
        #[arg(long, default_value = "10")]
        top: usize,
    },
    /// Incidents by weekday and hour
    Heatmap {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Incidents per calendar month
    Monthly {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Sample of incident locations as CSV
    Map {
        #[command(flatten)]
        filter: FilterArgs,
        /// Maximum number of points
        #[arg(long, default_value = "8000")]
        limit: usize,
    },
    /// Year range and crime types present in the dataset
    Bounds,
}

/// Filter and projection flags shared by the analysis subcommands.
#[derive(Args)]
struct FilterArgs {
    /// First year to include
    #[arg(long)]
    from_year: Option<i32>,

    /// Last year to include
    #[arg(long)]
    to_year: Option<i32>,

    /// Comma-separated crime types to include (default: all)
    #[arg(long, value_delimiter = ',')]
    types: Option<Vec<String>>,

    /// Trailing years fitted by the projection
    #[arg(long)]
    window: Option<usize>,

    /// Year to project to (default: the year after the latest observed)
    #[arg(long)]
    target_year: Option<i32>,

    /// Leave incidents without a parseable timestamp out of totals
    #[arg(long)]
    exclude_undated: bool,
}

impl FilterArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            from_year: self.from_year,
            to_year: self.to_year,
            crime_types: self.types.clone(),
            window_size: self.window,
            target_year: self.target_year,
            exclude_undated: self.exclude_undated,
        }
    }
}

fn load_config(explicit: Option<&Path>) -> Result<SafeWalkConfig, config::ConfigError> {
    match explicit {
        Some(path) => SafeWalkConfig::load(path),
        None => {
            let path = Path::new(DEFAULT_CONFIG_FILE);
            if path.is_file() {
                SafeWalkConfig::load(path)
            } else {
                Ok(SafeWalkConfig::default())
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = safe_walk_cli_utils::init_logger(DEFAULT_LOG_FILTERS);
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;

    let explicit = dataset_path(cli.csv.as_deref(), &config);
    let path = locate_dataset(explicit.as_deref(), &std::env::current_dir()?)?;
    log::info!("Using dataset {}", path.display());

    let progress = IndicatifProgress::bytes_bar(&multi, "Loading incidents");
    let incidents = load_incidents(&path, config.load_options()?, &progress)?;
    let bounds = dataset_bounds(&incidents);

    let Some(command) = cli.command else {
        return interactive::run(&incidents, &bounds, &config);
    };

    let json = cli.json;

    match command {
        Commands::Summary { filter } => {
            let pipeline = resolve(&filter.overrides(), &config, &bounds);
            commands::overview(&incidents, &pipeline, json)?;
        }
        Commands::Trend { filter, reduction } => {
            let pipeline = resolve(&filter.overrides(), &config, &bounds);
            let reduction = reduction.or(config.reduction_percent);
            commands::trend(&incidents, &pipeline, reduction, json)?;
        }
        Commands::Types { filter, top } => {
            let pipeline = resolve(&filter.overrides(), &config, &bounds);
            commands::top_types(&incidents, &pipeline, top, json)?;
        }
        Commands::Heatmap { filter } => {
            let pipeline = resolve(&filter.overrides(), &config, &bounds);
            commands::heatmap(&incidents, &pipeline, json)?;
        }
        Commands::Monthly { filter } => {
            let pipeline = resolve(&filter.overrides(), &config, &bounds);
            commands::monthly(&incidents, &pipeline, json)?;
        }
        Commands::Map { filter, limit } => {
            let pipeline = resolve(&filter.overrides(), &config, &bounds);
            commands::map(&incidents, &pipeline, limit, json)?;
        }
        Commands::Bounds => commands::bounds(&bounds, json)?,
    }

    Ok(())
}
