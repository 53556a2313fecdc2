use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

/// SRTM elevation and geodesy CLI tool
#[derive(Parser)]
#[command(name = "alti")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the tile catalog JSON file
    #[arg(short = 't', long, env = "ALTI_CATALOG", global = true)]
    catalog: Option<PathBuf>,

    /// Directory for cached .hgt files (kept between runs)
    #[arg(short = 'c', long, env = "ALTI_CACHE_DIR", global = true)]
    cache_dir: Option<PathBuf>,

    /// Maximum number of tiles held in memory at once
    #[arg(short = 'm', long, env = "ALTI_MAX_TILES", global = true)]
    max_tiles: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query elevation for a single coordinate
    Query {
        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Process elevations for coordinates from a CSV file
    Batch {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: <input>_elevation.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Column name for longitude
        #[arg(long, default_value = "lon")]
        lon_col: String,

        /// Column name for latitude
        #[arg(long, default_value = "lat")]
        lat_col: String,
    },

    /// Geodesic distance between two points in meters
    Distance {
        /// First point as lon,lat
        #[arg(allow_hyphen_values = true)]
        from: String,

        /// Second point as lon,lat
        #[arg(allow_hyphen_values = true)]
        to: String,
    },

    /// Densify a route and print its elevation profile
    Interpolate {
        /// Route points as lon,lat pairs
        #[arg(required = true, num_args = 2.., allow_hyphen_values = true)]
        points: Vec<String>,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Check whether coordinates fall in covered cells
    Covered {
        /// Points as lon,lat pairs
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        points: Vec<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let opts = commands::SourceOpts {
        catalog: cli.catalog,
        cache_dir: cli.cache_dir,
        max_tiles: cli.max_tiles,
    };

    match cli.command {
        Commands::Query { lon, lat, json } => commands::query::run(opts, lon, lat, json),
        Commands::Batch {
            input,
            output,
            lon_col,
            lat_col,
        } => commands::batch::run(opts, input, output, lon_col, lat_col),
        Commands::Distance { from, to } => commands::distance::run(from, to),
        Commands::Interpolate { points, json } => commands::interpolate::run(opts, points, json),
        Commands::Covered { points } => commands::covered::run(opts, points),
    }
}
