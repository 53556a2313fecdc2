use alti::{Alti, Coord, Input};
use anyhow::{Context, Result};
use serde::Serialize;

use super::{parse_coord, SourceOpts};

#[derive(Serialize)]
struct ProfilePoint {
    lon: f64,
    lat: f64,
    elevation: Option<f64>,
}

pub fn run(opts: SourceOpts, points: Vec<String>, json: bool) -> Result<()> {
    let route: Vec<Coord> = points
        .iter()
        .map(|p| parse_coord(p))
        .collect::<Result<_>>()?;

    let alti = Alti::new(opts.build()?);

    let dense = alti
        .interpolate(&route)
        .context("Failed to densify route")?;
    let elevations = alti
        .altitude(&Input::from_points(&dense))
        .context("Failed to get elevations")?
        .flatten();

    if json {
        let profile: Vec<ProfilePoint> = dense
            .iter()
            .zip(&elevations)
            .map(|(coord, elevation)| ProfilePoint {
                lon: coord.lon,
                lat: coord.lat,
                elevation: *elevation,
            })
            .collect();
        println!("{}", serde_json::to_string(&profile)?);
    } else {
        for (coord, elevation) in dense.iter().zip(&elevations) {
            match elevation {
                Some(meters) => println!("{:.6},{:.6},{:.2}", coord.lon, coord.lat, meters),
                None => println!("{:.6},{:.6},", coord.lon, coord.lat),
            }
        }
    }

    Ok(())
}
