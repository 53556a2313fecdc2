//! Basic example demonstrating alti library usage.
//!
//! Run with: cargo run --example basic -- catalog.json /path/to/cache

use alti::{AltiError, Coord, DataSource, SrtmTiles};
use std::env;

fn main() -> Result<(), AltiError> {
    let catalog_path = env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: cargo run --example basic -- catalog.json [/path/to/cache]");
        std::process::exit(1);
    });

    let mut builder = SrtmTiles::builder().catalog_path(&catalog_path);
    if let Some(cache_dir) = env::args().nth(2) {
        builder = builder.cache_dir(cache_dir);
    }
    let source = builder.build()?;

    // Query some landmarks around Paris
    let locations = [
        ("Mont Valérien", Coord::new(2.21333, 48.87333)),
        ("Montmartre", Coord::new(2.343, 48.8861)),
        ("Parc André Citroën", Coord::new(2.27472, 48.84111)),
        ("Mariana Trench", Coord::new(142.2, 11.35)),
    ];

    println!("Elevation queries (bilinear):");
    println!("{:-<50}", "");

    for (name, coord) in &locations {
        match source.altitude(*coord)? {
            Some(elevation) => println!("{}: {:.1}m", name, elevation),
            None => println!("{}: no data", name),
        }
    }

    println!("\nLoaded tiles: {}", source.store().loaded());

    Ok(())
}
