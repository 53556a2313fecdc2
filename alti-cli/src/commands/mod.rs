use std::path::PathBuf;

use alti::{Coord, SrtmTiles};
use anyhow::{Context, Result};

pub mod batch;
pub mod covered;
pub mod distance;
pub mod interpolate;
pub mod query;

/// Source configuration shared by the subcommands.
pub struct SourceOpts {
    pub catalog: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,
    pub max_tiles: Option<usize>,
}

impl SourceOpts {
    /// Build the tile source from the command-line options.
    pub fn build(self) -> Result<SrtmTiles> {
        let mut builder = SrtmTiles::builder();
        if let Some(catalog) = self.catalog {
            builder = builder.catalog_path(catalog);
        }
        if let Some(cache_dir) = self.cache_dir {
            builder = builder.cache_dir(cache_dir);
        }
        if let Some(max) = self.max_tiles {
            builder = builder.max_tiles(max);
        }
        builder.build().context("Failed to create tile source")
    }
}

/// Parse a `lon,lat` argument.
pub fn parse_coord(arg: &str) -> Result<Coord> {
    let (lon, lat) = arg
        .split_once(',')
        .with_context(|| format!("expected lon,lat but got '{}'", arg))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .with_context(|| format!("invalid longitude '{}'", lon))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .with_context(|| format!("invalid latitude '{}'", lat))?;
    Ok(Coord::new(lon, lat))
}
