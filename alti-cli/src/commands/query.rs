use alti::{Coord, DataSource};
use anyhow::{Context, Result};
use serde::Serialize;

use super::SourceOpts;

#[derive(Serialize)]
struct ElevationResponse {
    lon: f64,
    lat: f64,
    elevation: Option<f64>,
    covered: bool,
}

pub fn run(opts: SourceOpts, lon: f64, lat: f64, json: bool) -> Result<()> {
    let source = opts.build()?;
    let coord = Coord::new(lon, lat);

    let covered = source.is_covered(coord).context("Coverage check failed")?;
    let elevation = source.altitude(coord).context("Failed to get elevation")?;

    if json {
        let response = ElevationResponse {
            lon,
            lat,
            elevation,
            covered,
        };
        println!("{}", serde_json::to_string(&response)?);
    } else {
        match elevation {
            Some(meters) => println!("{:.2}", meters),
            None => println!("no data"),
        }
    }

    Ok(())
}
