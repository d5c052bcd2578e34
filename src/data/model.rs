use std::fmt;

/// Column holding the distance / usage measure (default histogram and X axis).
pub const DISTANCE_COLUMN: &str = "odometer";
/// Column holding the listing price (default Y axis).
pub const PRICE_COLUMN: &str = "price";
/// Integer model year; drives the year-range filter.
pub const YEAR_COLUMN: &str = "model_year";

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes a CSV reader would infer.
/// Rows are de-duplicated through hashing, so `CellValue` must be `Eq + Hash`.
///
/// `Float` never holds NaN, an infinity or `-0.0` once it sits in a
/// [`Dataset`]; see [`CellValue::from_f64`].
#[derive(Debug, Clone)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord/Hash so floats can take part in set lookups --
// Equality goes through `Ord` (`total_cmp` for floats), matching the
// bit-level `Hash`.

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

/// Text form used both for display and for CSV export; nulls become empty fields.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:?}"),
            CellValue::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// A float cell. NaN and infinities read as missing; `-0.0` becomes `0.0`.
    pub fn from_f64(v: f64) -> CellValue {
        if !v.is_finite() {
            CellValue::Null
        } else if v == 0.0 {
            CellValue::Float(0.0)
        } else {
            CellValue::Float(v)
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Integer(_) | CellValue::Float(_))
    }
}

// ---------------------------------------------------------------------------
// Column classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Every non-null cell is a number and at least one cell is non-null.
    Numeric,
    Categorical,
}

// ---------------------------------------------------------------------------
// Dataset – rows x named columns
// ---------------------------------------------------------------------------

/// An in-memory table. Every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Dataset {
    /// Build a table, normalizing float cells through [`CellValue::from_f64`]
    /// and promoting integer cells to floats in columns that mix both.
    pub fn new(columns: Vec<String>, mut rows: Vec<Vec<CellValue>>) -> Self {
        for cell in rows.iter_mut().flatten() {
            if let CellValue::Float(v) = *cell {
                *cell = CellValue::from_f64(v);
            }
        }
        for col in 0..columns.len() {
            let mut has_float = false;
            let mut all_numeric = true;
            for row in &rows {
                match row.get(col) {
                    Some(CellValue::Float(_)) => has_float = true,
                    Some(CellValue::Integer(_)) | Some(CellValue::Null) | None => {}
                    Some(_) => {
                        all_numeric = false;
                        break;
                    }
                }
            }
            if has_float && all_numeric {
                for cell in rows.iter_mut().filter_map(|row| row.get_mut(col)) {
                    if let CellValue::Integer(i) = *cell {
                        *cell = CellValue::Float(i as f64);
                    }
                }
            }
        }
        Dataset { columns, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Classify a column from its current values.
    pub fn column_kind(&self, index: usize) -> ColumnKind {
        let mut seen_value = false;
        for row in &self.rows {
            match row.get(index) {
                Some(cell) if cell.is_numeric() => seen_value = true,
                Some(CellValue::Null) | None => {}
                Some(_) => return ColumnKind::Categorical,
            }
        }
        if seen_value {
            ColumnKind::Numeric
        } else {
            ColumnKind::Categorical
        }
    }

    /// Names of numeric columns, in table order.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.columns_of_kind(ColumnKind::Numeric)
    }

    /// Names of categorical columns, in table order.
    pub fn categorical_columns(&self) -> Vec<String> {
        self.columns_of_kind(ColumnKind::Categorical)
    }

    fn columns_of_kind(&self, kind: ColumnKind) -> Vec<String> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(i, _)| self.column_kind(*i) == kind)
            .map(|(_, name)| name.clone())
            .collect()
    }

    /// Non-null numeric values of a column, in row order.
    pub fn numeric_values(&self, index: usize) -> Vec<f64> {
        self.rows
            .iter()
            .filter_map(|row| row.get(index).and_then(CellValue::as_f64))
            .collect()
    }

    /// A table with the same columns and only the given rows, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> Dataset {
        Dataset {
            columns: self.columns.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> Dataset {
        Dataset {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}

/// A loaded table, cleaned and classified once, with the name it is shown under.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedData {
    pub name: String,
    /// Row count as read, before cleaning.
    pub raw_rows: usize,
    /// The cleaned table every view is derived from.
    pub dataset: Dataset,
    pub numeric_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
}
