use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::model::{CellValue, ColumnKind, Dataset, YEAR_COLUMN};

/// Histogram bin-count bounds and step.
pub const MIN_BINS: u32 = 5;
pub const MAX_BINS: u32 = 100;
pub const BIN_STEP: u32 = 5;
pub const DEFAULT_BINS: u32 = 40;

// ---------------------------------------------------------------------------
// Filter state: the user's current selections
// ---------------------------------------------------------------------------

/// Every user-chosen parameter that shapes the derived view and the charts.
/// Column selections are names; they are validated against the dataset at
/// render time, so a stale choice just falls back to the default.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    /// Inclusive model-year range; `None` means the full range.
    pub year_range: Option<(i64, i64)>,
    /// Downsample the scatter table.
    pub use_sample: bool,
    /// Show the first rows of the filtered table.
    pub show_raw: bool,
    pub hist_column: Option<String>,
    pub bins: u32,
    pub x_column: Option<String>,
    pub y_column: Option<String>,
    /// Categorical column used to colour scatter points.
    pub color_column: Option<String>,
    /// Explicit log-Y choice; `None` means "log when Y is the price column".
    pub log_y: Option<bool>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            year_range: None,
            use_sample: true,
            show_raw: false,
            hist_column: None,
            bins: DEFAULT_BINS,
            x_column: None,
            y_column: None,
            color_column: None,
            log_y: None,
        }
    }
}

/// Snap a requested bin count onto the allowed range and step.
pub fn snap_bins(bins: u32) -> u32 {
    let clamped = bins.clamp(MIN_BINS, MAX_BINS);
    let snapped = ((clamped + BIN_STEP / 2) / BIN_STEP) * BIN_STEP;
    snapped.clamp(MIN_BINS, MAX_BINS)
}

// ---------------------------------------------------------------------------
// Cleaning, year filter, sampling
// ---------------------------------------------------------------------------

/// Drop rows whose every cell is null, then exact duplicate rows.
/// The first occurrence of each row is kept, in table order.
pub fn clean(dataset: &Dataset) -> Dataset {
    let mut seen: HashSet<&[CellValue]> = HashSet::new();
    let mut rows = Vec::new();
    for row in &dataset.rows {
        if row.iter().all(CellValue::is_null) {
            continue;
        }
        if seen.insert(row.as_slice()) {
            rows.push(row.clone());
        }
    }
    Dataset {
        columns: dataset.columns.clone(),
        rows,
    }
}

/// Index of the year column, if present and numeric.
pub fn year_column(dataset: &Dataset) -> Option<usize> {
    let idx = dataset.column_index(YEAR_COLUMN)?;
    (dataset.column_kind(idx) == ColumnKind::Numeric).then_some(idx)
}

/// Selectable year bounds: the truncated min and max of the year column.
pub fn year_bounds(dataset: &Dataset) -> Option<(i64, i64)> {
    let idx = year_column(dataset)?;
    let values = dataset.numeric_values(idx);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some((min as i64, max as i64))
}

/// Keep rows whose year lies in `[from, to]`. Rows without a year are dropped.
pub fn filter_year_range(dataset: &Dataset, from: i64, to: i64) -> Dataset {
    let Some(idx) = year_column(dataset) else {
        return dataset.clone();
    };
    let (lo, hi) = (from as f64, to as f64);
    let rows = dataset
        .rows
        .iter()
        .filter(|row| {
            row[idx]
                .as_f64()
                .is_some_and(|year| year >= lo && year <= hi)
        })
        .cloned()
        .collect();
    Dataset {
        columns: dataset.columns.clone(),
        rows,
    }
}

/// Reproducible sample of `min(limit, len)` rows, kept in table order.
pub fn sample_rows(dataset: &Dataset, limit: usize, seed: u64) -> Dataset {
    if dataset.len() <= limit {
        return dataset.clone();
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut indices = rand::seq::index::sample(&mut rng, dataset.len(), limit).into_vec();
    indices.sort_unstable();
    dataset.select_rows(&indices)
}

// ---------------------------------------------------------------------------
// Derived view
// ---------------------------------------------------------------------------

/// The cleaned table after the year filter, plus the table the scatter draws.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedView {
    /// Used by the histogram, raw table and export.
    pub filtered: Dataset,
    /// `filtered`, downsampled when sampling applies. Scatter only.
    pub scatter: Dataset,
    /// Selectable year bounds, when the table has a numeric year column.
    pub year_bounds: Option<(i64, i64)>,
    /// The effective (clamped) year selection.
    pub year_range: Option<(i64, i64)>,
    /// Whether `scatter` is a sample rather than the full filtered table.
    pub sampled: bool,
}

/// Run the year filter and sampling over an already cleaned table.
pub fn derive_view(
    cleaned: &Dataset,
    filters: &FilterState,
    sample_limit: usize,
    seed: u64,
) -> DerivedView {
    let year_bounds = year_bounds(cleaned);
    let year_range = year_bounds.map(|(lo, hi)| {
        filters
            .year_range
            .map(|(from, to)| (from.clamp(lo, hi), to.clamp(lo, hi)))
            .unwrap_or((lo, hi))
    });

    let filtered = match year_range {
        Some((from, to)) => filter_year_range(cleaned, from, to),
        None => cleaned.clone(),
    };

    let sampled = filters.use_sample && filtered.len() > sample_limit;
    let scatter = if sampled {
        sample_rows(&filtered, sample_limit, seed)
    } else {
        filtered.clone()
    };

    log::debug!(
        "Derived view: {} rows filtered, {} rows for scatter (sampled: {sampled})",
        filtered.len(),
        scatter.len()
    );

    DerivedView {
        filtered,
        scatter,
        year_bounds,
        year_range,
        sampled,
    }
}
