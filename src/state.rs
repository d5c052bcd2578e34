use std::sync::Arc;

use crate::data::export::ExportPayload;
use crate::data::filter::{FilterState, snap_bins};
use crate::data::loader::Upload;
use crate::data::model::LoadedData;

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Where the dataset comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceChoice {
    /// A file shipped alongside the application.
    #[default]
    Bundled,
    /// A file picked by the user.
    Upload,
}

/// Which chart the user asked for last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartRequest {
    Histogram,
    Scatter,
}

/// Outcome of resolving the current source.
#[derive(Debug, Clone, PartialEq)]
pub enum DataStatus {
    /// Upload selected, no file given.
    AwaitingUpload,
    /// No bundled candidate exists.
    Missing,
    Failed { name: String, message: String },
    Ready(Arc<LoadedData>),
}

/// One user's state, independent of rendering.
///
/// Handlers never mutate a session in place; they return a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub source: SourceChoice,
    /// Last file the user picked, kept while switching sources.
    pub upload: Option<Upload>,
    pub data: DataStatus,
    pub filters: FilterState,
    /// Chart to draw; `None` until a chart button is pressed.
    pub chart: Option<ChartRequest>,
    /// Set by the export action, consumed by the UI.
    pub pending_export: Option<ExportPayload>,
    /// Feedback from the last action (e.g. a failed export).
    pub notice: Option<String>,
}

impl Session {
    /// A fresh session on the bundled source with default filters.
    pub fn new(data: DataStatus) -> Self {
        Session {
            source: SourceChoice::Bundled,
            upload: None,
            data,
            filters: FilterState::default(),
            chart: None,
            pending_export: None,
            notice: None,
        }
    }

    pub fn loaded(&self) -> Option<&Arc<LoadedData>> {
        match &self.data {
            DataStatus::Ready(loaded) => Some(loaded),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// A change to one filter or chart parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterChange {
    YearRange(i64, i64),
    UseSample(bool),
    ShowRaw(bool),
    HistColumn(String),
    Bins(u32),
    XColumn(String),
    YColumn(String),
    ColorColumn(Option<String>),
    LogY(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Clear the dataset cache and reload.
    Reset,
    ShowHistogram,
    ShowScatter,
    /// Serialize the filtered table.
    Export,
}

/// Everything the UI can report.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SourceChanged(SourceChoice),
    FileUploaded(Upload),
    /// The picked file could not be read.
    UploadFailed { name: String, message: String },
    FilterChanged(FilterChange),
    ButtonClicked(Button),
}

impl FilterState {
    /// Apply a single change, returning the new selections.
    pub fn with_change(&self, change: FilterChange) -> FilterState {
        let mut next = self.clone();
        match change {
            FilterChange::YearRange(a, b) => next.year_range = Some((a.min(b), a.max(b))),
            FilterChange::UseSample(on) => next.use_sample = on,
            FilterChange::ShowRaw(on) => next.show_raw = on,
            FilterChange::HistColumn(col) => next.hist_column = Some(col),
            FilterChange::Bins(bins) => next.bins = snap_bins(bins),
            FilterChange::XColumn(col) => next.x_column = Some(col),
            FilterChange::YColumn(col) => {
                // The log toggle's default depends on Y; a new Y starts from that default.
                if next.y_column.as_deref() != Some(col.as_str()) {
                    next.log_y = None;
                }
                next.y_column = Some(col);
            }
            FilterChange::ColorColumn(col) => next.color_column = col,
            FilterChange::LogY(on) => next.log_y = Some(on),
        }
        next
    }
}
