//! Chart data preparation
//!
//! Turns a table plus the user's column choices into chart-ready data.
//! Binning, grouping and hover text are computed here rather than in the
//! render path, so the UI only draws.

use std::collections::HashMap;

use super::model::{CellValue, Dataset};

/// Number of extra columns shown when hovering a scatter point.
pub const MAX_HOVER_COLUMNS: usize = 5;

/// Legend label for points whose colour category is missing.
pub const MISSING_CATEGORY: &str = "(missing)";

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub column: String,
    pub title: String,
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    /// Total number of values counted.
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

/// Equal-width histogram of a numeric column's non-null values.
///
/// Returns `None` when the column does not exist or holds no values.
pub fn histogram(dataset: &Dataset, column: &str, bins: u32) -> Option<Histogram> {
    let idx = dataset.column_index(column)?;
    let mut values = dataset.numeric_values(idx);
    values.retain(|v| v.is_finite());
    if values.is_empty() {
        return None;
    }
    let n_bins = bins.max(1) as usize;

    let mut min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max - min <= f64::EPSILON * max.abs().max(1.0) {
        min -= 0.5;
        max += 0.5;
    }
    let width = (max - min) / n_bins as f64;

    let mut counts = vec![0usize; n_bins];
    for v in &values {
        let slot = (((v - min) / width).floor() as usize).min(n_bins - 1);
        counts[slot] += 1;
    }

    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: min + i as f64 * width,
            end: min + (i + 1) as f64 * width,
            count,
        })
        .collect();

    Some(Histogram {
        column: column.to_string(),
        title: format!("Histogram of {column}"),
        bins,
    })
}

// ---------------------------------------------------------------------------
// Scatter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    /// `column: value` lines for the hover columns.
    pub hover: String,
}

/// Points sharing one colour category (or all points when uncoloured).
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub label: String,
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scatter {
    pub title: String,
    pub x_column: String,
    pub y_column: String,
    pub color_column: Option<String>,
    pub log_y: bool,
    pub hover_columns: Vec<String>,
    /// Series in order of first appearance of their category.
    pub series: Vec<ScatterSeries>,
    /// Rows that could not be placed (null X/Y, or Y <= 0 on a log axis).
    pub skipped: usize,
}

impl Scatter {
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }
}

/// Every column except X and Y, first [`MAX_HOVER_COLUMNS`] in table order.
pub fn hover_columns(columns: &[String], x: &str, y: &str) -> Vec<String> {
    columns
        .iter()
        .filter(|c| c.as_str() != x && c.as_str() != y)
        .take(MAX_HOVER_COLUMNS)
        .cloned()
        .collect()
}

/// Build scatter series for `x` vs `y`, optionally grouped by `color`.
///
/// Returns `None` when X or Y is not a column of the table.
pub fn scatter(
    dataset: &Dataset,
    x: &str,
    y: &str,
    color: Option<&str>,
    log_y: bool,
) -> Option<Scatter> {
    let x_idx = dataset.column_index(x)?;
    let y_idx = dataset.column_index(y)?;
    let color_idx = color.and_then(|c| dataset.column_index(c));

    let hover_columns = hover_columns(&dataset.columns, x, y);
    let hover_idx: Vec<usize> = hover_columns
        .iter()
        .filter_map(|c| dataset.column_index(c))
        .collect();

    let mut series: Vec<ScatterSeries> = Vec::new();
    let mut slot_by_label: HashMap<String, usize> = HashMap::new();
    let mut skipped = 0;

    for row in &dataset.rows {
        let (Some(xv), Some(yv)) = (row[x_idx].as_f64(), row[y_idx].as_f64()) else {
            skipped += 1;
            continue;
        };
        if log_y && yv <= 0.0 {
            skipped += 1;
            continue;
        }

        let label = match color_idx {
            Some(ci) => category_label(&row[ci]),
            None => y.to_string(),
        };
        let slot = *slot_by_label.entry(label.clone()).or_insert_with(|| {
            series.push(ScatterSeries {
                label,
                points: Vec::new(),
            });
            series.len() - 1
        });

        let hover = hover_columns
            .iter()
            .zip(&hover_idx)
            .map(|(name, &i)| format!("{name}: {}", row[i]))
            .collect::<Vec<_>>()
            .join("\n");

        series[slot].points.push(ScatterPoint { x: xv, y: yv, hover });
    }

    if skipped > 0 {
        log::debug!("Scatter {y} vs {x}: skipped {skipped} rows");
    }

    Some(Scatter {
        title: format!("{y} vs {x}"),
        x_column: x.to_string(),
        y_column: y.to_string(),
        color_column: color.filter(|_| color_idx.is_some()).map(str::to_string),
        log_y,
        hover_columns,
        series,
        skipped,
    })
}

fn category_label(cell: &CellValue) -> String {
    match cell {
        CellValue::Null => MISSING_CATEGORY.to_string(),
        other => other.to_string(),
    }
}
