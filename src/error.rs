use std::path::PathBuf;

use thiserror::Error;

/// How a condition is presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Conditions the dashboard reports to the user instead of drawing (part of) a frame.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExplorerError {
    #[error("No dataset found in {}: looked for {}", .dir.display(), .candidates.join(", "))]
    NoDataSource {
        dir: PathBuf,
        candidates: Vec<String>,
    },

    #[error("Upload a CSV file to continue, or switch back to the bundled dataset.")]
    AwaitingUpload,

    #[error("Failed to load {name}: {message}")]
    LoadFailed { name: String, message: String },

    #[error("The dataset has no numeric columns for the histogram.")]
    NoNumericColumns,

    #[error("At least 2 numeric columns are needed for the scatter plot (found {found}).")]
    TooFewNumericColumns { found: usize },

    #[error("Export failed: {0}")]
    ExportFailed(String),
}

impl ExplorerError {
    pub fn severity(&self) -> Severity {
        match self {
            ExplorerError::AwaitingUpload => Severity::Info,
            ExplorerError::TooFewNumericColumns { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}
