use alti::DataSource;
use anyhow::{Context, Result};

use super::{parse_coord, SourceOpts};

pub fn run(opts: SourceOpts, points: Vec<String>) -> Result<()> {
    let source = opts.build()?;

    let mut all = true;
    for arg in &points {
        let coord = parse_coord(arg)?;
        let covered = source.is_covered(coord).context("Coverage check failed")?;
        all &= covered;
        println!("{}: {}", arg, if covered { "covered" } else { "not covered" });
    }

    if !all {
        std::process::exit(1);
    }
    Ok(())
}
