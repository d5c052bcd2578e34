use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::reader::ChunkReader;
use serde_json::Value as JsonValue;

use super::filter;
use super::model::{CellValue, Dataset, LoadedData};

/// Cell texts read as missing values, on top of the empty string.
const NULL_MARKERS: &[&str] = &["NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

// ---------------------------------------------------------------------------
// Data sources
// ---------------------------------------------------------------------------

/// A file supplied by the user at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Upload {
    pub name: String,
    pub bytes: Arc<[u8]>,
}

impl Upload {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Upload {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a picked file fully into memory.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Upload::new(name, bytes))
    }
}

/// Identity of a data source, used as the dataset cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceKey {
    /// Candidate files probed inside this directory.
    Bundled(PathBuf),
    /// An upload, identified by file name and content.
    Upload(Upload),
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Probe `candidates` in order inside `dir` and return the first existing file.
pub fn probe_bundled(dir: &Path, candidates: &[String]) -> Option<PathBuf> {
    candidates
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Load the first bundled candidate, or `None` when none of them exists.
pub fn load_bundled(dir: &Path, candidates: &[String]) -> Result<Option<LoadedData>> {
    let Some(path) = probe_bundled(dir, candidates) else {
        log::warn!(
            "No bundled dataset in {} (looked for {:?})",
            dir.display(),
            candidates
        );
        return Ok(None);
    };
    let dataset = load_file(&path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Some(prepare(name, dataset)))
}

/// Clean and classify a freshly read table once; every render reuses the result.
pub fn prepare(name: impl Into<String>, raw: Dataset) -> LoadedData {
    let name = name.into();
    let dataset = filter::clean(&raw);
    log::debug!("Cleaned {name}: kept {} of {} rows", dataset.len(), raw.len());
    LoadedData {
        name,
        raw_rows: raw.len(),
        numeric_columns: dataset.numeric_columns(),
        categorical_columns: dataset.categorical_columns(),
        dataset,
    }
}

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row followed by data rows
/// * `.json`    – `[{ "price": 12000, "fuel": "gas", ... }, ...]`
/// * `.parquet` – flat scalar columns
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = extension_of(&path.to_string_lossy());
    let dataset = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV")?;
            read_csv(file)
        }
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            read_json(&text)
        }
        "parquet" | "pq" => {
            let file = std::fs::File::open(path).context("opening parquet file")?;
            read_parquet(file)
        }
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} rows x {} columns from {}",
        dataset.len(),
        dataset.columns.len(),
        path.display()
    );
    Ok(dataset)
}

/// Parse uploaded bytes.  Dispatch by the upload's file name; no extension means CSV.
pub fn load_bytes(name: &str, data: &[u8]) -> Result<Dataset> {
    let dataset = match extension_of(name).as_str() {
        "csv" | "" => read_csv(data),
        "json" => {
            let text = std::str::from_utf8(data).context("JSON upload is not valid UTF-8")?;
            read_json(text)
        }
        "parquet" | "pq" => read_parquet(bytes::Bytes::copy_from_slice(data)),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("parsing upload {name}"))?;

    log::info!(
        "Parsed upload {name}: {} rows x {} columns",
        dataset.len(),
        dataset.columns.len()
    );
    Ok(dataset)
}

fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per listing.
/// Every record must have as many fields as the header.
fn read_csv<R: Read>(input: R) -> Result<Dataset> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {}", row_no + 1))?;
        rows.push(record.iter().map(guess_cell_type).collect());
    }

    Ok(Dataset::new(headers, rows))
}

/// Infer the type of a single CSV field.
pub fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() || NULL_MARKERS.contains(&s) {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::from_f64(f);
    }
    match s {
        "true" | "True" | "TRUE" => CellValue::Bool(true),
        "false" | "False" | "FALSE" => CellValue::Bool(false),
        _ => CellValue::Text(s.to_string()),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON layout: an array of flat records, one object per listing.
///
/// ```json
/// [
///   { "price": 12000, "odometer": 60000, "fuel": "gas" },
///   ...
/// ]
/// ```
///
/// Columns appear in the order their keys are first seen; missing keys are nulls.
fn read_json(text: &str) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            columns
                .iter()
                .map(|col| obj.get(col).map(json_to_cell).unwrap_or(CellValue::Null))
                .collect()
        })
        .collect();

    Ok(Dataset::new(columns, rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::from_f64(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file whose columns are flat scalars (strings, ints, floats,
/// bools). Other column types are rendered to text; NaN floats become null.
fn read_parquet<T: ChunkReader + 'static>(input: T) -> Result<Dataset> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(input)
        .context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            rows.push(
                batch
                    .columns()
                    .iter()
                    .map(|col| arrow_cell(col, row))
                    .collect(),
            );
        }
    }

    Ok(Dataset::new(columns, rows))
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => CellValue::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => {
            CellValue::from_f64(col.as_primitive::<Float32Type>().value(row) as f64)
        }
        DataType::Float64 => CellValue::from_f64(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        _ => array_value_to_string(col.as_ref(), row)
            .map(CellValue::Text)
            .unwrap_or(CellValue::Null),
    }
}
