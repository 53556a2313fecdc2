//! Example demonstrating path densification and elevation profiles.
//!
//! Run with: cargo run --example interpolation -- catalog.json

use alti::{Alti, AltiError, Coord, Input, SrtmTiles};
use std::env;

fn main() -> Result<(), AltiError> {
    let catalog_path = env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: cargo run --example interpolation -- catalog.json");
        std::process::exit(1);
    });

    let alti = Alti::new(SrtmTiles::builder().catalog_path(&catalog_path).build()?);

    // A short route in the Paris suburbs
    let route = [
        Coord::new(2.2001, 48.80906),
        Coord::new(2.19121, 48.80773),
        Coord::new(2.18819, 48.80749),
    ];

    let total: f64 = route
        .windows(2)
        .map(|w| alti.distance(w[0], w[1]))
        .sum::<Result<f64, AltiError>>()?;
    println!("Route length: {:.2}m over {} points", total, route.len());

    // Insert points so samples stay within the 90m data resolution
    let dense = alti.interpolate(&route)?;
    println!("Densified to {} points", dense.len());

    let profile = alti.altitude(&Input::from_points(&dense))?;
    for (coord, elevation) in dense.iter().zip(profile.flatten()) {
        match elevation {
            Some(m) => println!("({:.5}, {:.5})  {:.1}m", coord.lon, coord.lat, m),
            None => println!("({:.5}, {:.5})  void", coord.lon, coord.lat),
        }
    }

    Ok(())
}
