use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use alti::{Coord, DataSource};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use super::SourceOpts;

pub fn run(
    opts: SourceOpts,
    input: PathBuf,
    output: Option<PathBuf>,
    lon_col: String,
    lat_col: String,
) -> Result<()> {
    let source = opts.build()?;

    let file = File::open(&input).context("Failed to open input file")?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    // Find column indices
    let headers = reader.headers()?.clone();
    let lon_idx = headers
        .iter()
        .position(|h| h == lon_col)
        .with_context(|| format!("Column '{}' not found in CSV", lon_col))?;
    let lat_idx = headers
        .iter()
        .position(|h| h == lat_col)
        .with_context(|| format!("Column '{}' not found in CSV", lat_col))?;

    // Collect records for the progress bar
    let records: Vec<_> = reader.records().collect::<Result<_, _>>()?;

    let pb = ProgressBar::new(records.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )?
            .progress_chars("#>-"),
    );

    // Prepare output
    let output_path = output.unwrap_or_else(|| {
        let stem = input.file_stem().unwrap().to_string_lossy();
        input.with_file_name(format!("{}_elevation.csv", stem))
    });
    let output_file = File::create(&output_path).context("Failed to create output file")?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(output_file));

    // Write header
    let mut new_headers: Vec<&str> = headers.iter().collect();
    new_headers.push("elevation");
    writer.write_record(&new_headers)?;

    for record in records {
        let lon: f64 = record
            .get(lon_idx)
            .context("Missing longitude")?
            .parse()
            .context("Invalid longitude")?;
        let lat: f64 = record
            .get(lat_idx)
            .context("Missing latitude")?
            .parse()
            .context("Invalid latitude")?;

        // Out-of-range rows abort; uncovered rows just come back empty
        let elevation = source
            .altitude(Coord::new(lon, lat))
            .with_context(|| format!("Failed to get elevation at ({}, {})", lon, lat))?
            .map(|e| format!("{:.2}", e))
            .unwrap_or_default();

        let mut new_record: Vec<&str> = record.iter().collect();
        new_record.push(&elevation);
        writer.write_record(&new_record)?;

        pb.inc(1);
    }

    pb.finish_with_message("done");
    writer.flush()?;

    println!("Output written to: {}", output_path.display());
    Ok(())
}
