use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};

use super::model::Dataset;

/// A serialized table ready to be saved under a fixed file name.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPayload {
    pub file_name: String,
    pub bytes: Arc<Vec<u8>>,
}

/// Serialize a table to UTF-8 CSV: header row, then every row in order.
pub fn to_csv_bytes(dataset: &Dataset) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(&dataset.columns)
        .context("writing CSV header")?;
    for (row_no, row) in dataset.rows.iter().enumerate() {
        writer
            .write_record(row.iter().map(|cell| cell.to_string()))
            .with_context(|| format!("writing CSV row {row_no}"))?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow!("flushing CSV buffer: {}", e.error()))
}

/// Write a table as CSV to `path`.
pub fn write_csv_file(dataset: &Dataset, path: &Path) -> Result<()> {
    let bytes = to_csv_bytes(dataset)?;
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Wrote {} rows to {}", dataset.len(), path.display());
    Ok(())
}
