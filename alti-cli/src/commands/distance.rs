use alti::geodesy;
use anyhow::{Context, Result};

use super::parse_coord;

pub fn run(from: String, to: String) -> Result<()> {
    let p1 = parse_coord(&from)?;
    let p2 = parse_coord(&to)?;

    let meters = geodesy::distance(p1, p2)
        .context("Distance computation did not converge (near-antipodal points?)")?;
    println!("{:.3}", meters);

    Ok(())
}
