//! Writes `vehicles_us_sample.csv` into the data directory.
//!
//! Draws a reproducible sample from `vehicles_us.csv` when present, falls
//! back to a header-only file when that table cannot be read, and otherwise
//! writes a small synthetic table.

use anyhow::{Context, Result};

use vehicle_explorer::config::{AppConfig, FULL_DATASET_FILE, SAMPLE_DATASET_FILE};
use vehicle_explorer::data::export::write_csv_file;
use vehicle_explorer::data::sample::build_sample;

fn main() -> Result<()> {
    env_logger::init();

    let config = AppConfig::load()?;
    let full_path = config.data_dir.join(FULL_DATASET_FILE);
    let output_path = config.data_dir.join(SAMPLE_DATASET_FILE);

    let (table, origin) = build_sample(&full_path, config.sample_limit, config.sample_seed);
    write_csv_file(&table, &output_path)
        .with_context(|| format!("writing sample to {}", output_path.display()))?;

    println!(
        "Wrote {} rows ({origin}) to {}",
        table.len(),
        output_path.display()
    );
    Ok(())
}
