use std::path::Path;

use super::filter::sample_rows;
use super::loader::load_file;
use super::model::{CellValue, Dataset};

/// Columns of a typical listings table, used when no real header is available.
pub const TYPICAL_COLUMNS: [&str; 6] =
    ["price", "odometer", "model_year", "condition", "fuel", "model"];

const SYNTHETIC_ROWS: [(i64, i64, i64, &str, &str, &str); 10] = [
    (12000, 60000, 2012, "good", "gas", "sedan"),
    (8000, 120000, 2009, "fair", "gas", "pickup"),
    (15000, 45000, 2015, "like new", "gas", "sedan"),
    (5000, 180000, 2005, "salvage", "diesel", "suv"),
    (22000, 30000, 2018, "excellent", "gas", "suv"),
    (17000, 80000, 2014, "good", "gas", "sedan"),
    (9000, 110000, 2010, "good", "hybrid", "hatchback"),
    (13000, 65000, 2013, "fair", "gas", "pickup"),
    (27000, 25000, 2019, "excellent", "electric", "sedan"),
    (7000, 140000, 2007, "fair", "gas", "suv"),
];

/// Where a generated sample table came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleOrigin {
    /// Drawn from the full listings file.
    Sampled { from_rows: usize },
    /// The full file exists but could not be read.
    HeaderOnly,
    /// No full file; the built-in table.
    Synthetic,
}

impl std::fmt::Display for SampleOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SampleOrigin::Sampled { from_rows } => write!(f, "sampled from {from_rows} rows"),
            SampleOrigin::HeaderOnly => write!(f, "header only"),
            SampleOrigin::Synthetic => write!(f, "synthetic"),
        }
    }
}

fn typical_columns() -> Vec<String> {
    TYPICAL_COLUMNS.iter().map(|c| c.to_string()).collect()
}

/// The built-in 10-row listings table.
pub fn synthetic_table() -> Dataset {
    let rows = SYNTHETIC_ROWS
        .iter()
        .map(|&(price, odometer, year, condition, fuel, model)| {
            vec![
                CellValue::Integer(price),
                CellValue::Integer(odometer),
                CellValue::Integer(year),
                CellValue::Text(condition.to_string()),
                CellValue::Text(fuel.to_string()),
                CellValue::Text(model.to_string()),
            ]
        })
        .collect();
    Dataset::new(typical_columns(), rows)
}

/// Pick the sample table for `full_path`: a reproducible sample of at most
/// `limit` rows when it loads, a header-only table when it exists but fails
/// to load, the synthetic table when it is absent.
pub fn build_sample(full_path: &Path, limit: usize, seed: u64) -> (Dataset, SampleOrigin) {
    if !full_path.is_file() {
        return (synthetic_table(), SampleOrigin::Synthetic);
    }
    match load_file(full_path) {
        Ok(full) => {
            let from_rows = full.len();
            (sample_rows(&full, limit, seed), SampleOrigin::Sampled { from_rows })
        }
        Err(e) => {
            log::warn!("Could not read {}: {e:#}", full_path.display());
            (Dataset::new(typical_columns(), Vec::new()), SampleOrigin::HeaderOnly)
        }
    }
}
