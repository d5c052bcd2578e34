//! Event dispatch and rendering
//!
//! The dashboard owns the only cross-event resource, the dataset cache.
//! Each handler takes the previous [`Session`] and an event and returns the
//! next session; [`Dashboard::render`] turns a session into a [`RenderState`]
//! holding everything the UI draws.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::data::cache::DatasetCache;
use crate::data::chart::{self, Histogram, Scatter};
use crate::data::export::{self, ExportPayload};
use crate::data::filter::{self, DerivedView};
use crate::data::loader::{SourceKey, Upload};
use crate::data::model::{DISTANCE_COLUMN, Dataset, PRICE_COLUMN};
use crate::error::ExplorerError;
use crate::state::{Button, ChartRequest, DataStatus, Event, FilterChange, Session, SourceChoice};

// ---------------------------------------------------------------------------
// Render state
// ---------------------------------------------------------------------------

/// Everything needed to draw one frame of the dashboard.
#[derive(Debug, Clone)]
pub struct RenderState {
    pub data_name: String,
    /// Size of the table as loaded, before cleaning.
    pub loaded_rows: usize,
    pub loaded_columns: usize,
    pub numeric_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    pub view: DerivedView,
    /// Upper bound on scatter points when sampling is on.
    pub sample_limit: usize,
    /// Effective selections after validation against the table.
    pub hist_column: String,
    pub bins: u32,
    pub x_column: String,
    pub y_column: String,
    pub color_column: Option<String>,
    pub log_y: bool,
    pub chart: Option<ChartRequest>,
    pub histogram: Option<Histogram>,
    pub scatter: Option<Scatter>,
    /// Set when the scatter cannot be drawn at all.
    pub scatter_warning: Option<ExplorerError>,
    /// First rows of the filtered table, when the raw toggle is on.
    pub raw_rows: Option<Dataset>,
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

pub struct Dashboard {
    config: AppConfig,
    cache: DatasetCache,
}

impl Dashboard {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            cache: DatasetCache::new(),
        }
    }

    pub fn cache(&self) -> &DatasetCache {
        &self.cache
    }

    /// Initial session: bundled source, default filters, data resolved.
    pub fn start(&mut self) -> Session {
        Session::new(self.lookup(SourceChoice::Bundled, None))
    }

    /// Dispatch one event.
    pub fn handle(&mut self, session: &Session, event: Event) -> Session {
        log::debug!("Handling {event:?}");
        match event {
            Event::SourceChanged(choice) => self.on_source_changed(session, choice),
            Event::FileUploaded(upload) => {
                // Only the latest upload stays cached.
                if let Some(previous) = session.upload.as_ref().filter(|p| **p != upload) {
                    self.cache.remove(&SourceKey::Upload(previous.clone()));
                }
                let mut next = Self::next_session(session);
                next.source = SourceChoice::Upload;
                next.upload = Some(upload);
                self.resolve_source(&mut next);
                next
            }
            Event::UploadFailed { name, message } => {
                log::error!("Failed to read upload {name}: {message}");
                if let Some(previous) = &session.upload {
                    self.cache.remove(&SourceKey::Upload(previous.clone()));
                }
                let mut next = Self::next_session(session);
                next.source = SourceChoice::Upload;
                next.upload = None;
                next.data = DataStatus::Failed { name, message };
                next
            }
            Event::FilterChanged(change) => Self::on_filter_changed(session, change),
            Event::ButtonClicked(button) => self.on_button_clicked(session, button),
        }
    }

    fn on_source_changed(&mut self, session: &Session, choice: SourceChoice) -> Session {
        let mut next = Self::next_session(session);
        next.source = choice;
        self.resolve_source(&mut next);
        next
    }

    fn on_filter_changed(session: &Session, change: FilterChange) -> Session {
        let mut next = Self::next_session(session);
        next.filters = session.filters.with_change(change);
        next
    }

    fn on_button_clicked(&mut self, session: &Session, button: Button) -> Session {
        let mut next = Self::next_session(session);
        match button {
            Button::Reset => {
                self.cache.clear();
                self.resolve_source(&mut next);
            }
            Button::ShowHistogram => next.chart = Some(ChartRequest::Histogram),
            Button::ShowScatter => next.chart = Some(ChartRequest::Scatter),
            Button::Export => match self.export(&next) {
                Ok(payload) => {
                    log::info!(
                        "Prepared export {} ({} bytes)",
                        payload.file_name,
                        payload.bytes.len()
                    );
                    next.pending_export = Some(payload);
                }
                Err(e) => {
                    log::warn!("{e}");
                    next.notice = Some(e.to_string());
                }
            },
        }
        next
    }

    /// The previous session minus one-shot fields.
    fn next_session(session: &Session) -> Session {
        let mut next = session.clone();
        next.pending_export = None;
        next.notice = None;
        next
    }

    /// Look the current source up in the cache and record the outcome.
    fn resolve_source(&mut self, session: &mut Session) {
        let previous = session.loaded().cloned();
        session.data = self.lookup(session.source, session.upload.as_ref());

        // A different table starts from its own full year range.
        let same_table = match (&previous, session.loaded()) {
            (Some(a), Some(b)) => a.name == b.name,
            _ => false,
        };
        if !same_table {
            session.filters.year_range = None;
        }
    }

    /// Data status for a source, loading through the cache.
    fn lookup(&mut self, source: SourceChoice, upload: Option<&Upload>) -> DataStatus {
        let key = match (source, upload) {
            (SourceChoice::Bundled, _) => SourceKey::Bundled(self.config.data_dir.clone()),
            (SourceChoice::Upload, Some(upload)) => SourceKey::Upload(upload.clone()),
            (SourceChoice::Upload, None) => return DataStatus::AwaitingUpload,
        };

        match self.cache.get_or_load(&key, &self.config.candidate_files) {
            Ok(Some(loaded)) => DataStatus::Ready(loaded),
            Ok(None) => DataStatus::Missing,
            Err(e) => {
                let name = match &key {
                    SourceKey::Upload(upload) => upload.name.clone(),
                    SourceKey::Bundled(dir) => dir.display().to_string(),
                };
                log::error!("Failed to load {name}: {e:#}");
                DataStatus::Failed {
                    name,
                    message: format!("{e:#}"),
                }
            }
        }
    }

    fn export(&self, session: &Session) -> Result<ExportPayload, ExplorerError> {
        let state = self.render(session)?;
        let bytes = export::to_csv_bytes(&state.view.filtered)
            .map_err(|e| ExplorerError::ExportFailed(format!("{e:#}")))?;
        Ok(ExportPayload {
            file_name: self.config.export_file_name.clone(),
            bytes: Arc::new(bytes),
        })
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    /// Derive the frame for `session`. Blocking conditions come back as `Err`.
    pub fn render(&self, session: &Session) -> Result<RenderState, ExplorerError> {
        let loaded = match &session.data {
            DataStatus::Ready(loaded) => loaded,
            DataStatus::AwaitingUpload => {
                return Err(ExplorerError::AwaitingUpload);
            }
            DataStatus::Missing => {
                return Err(ExplorerError::NoDataSource {
                    dir: self.config.data_dir.clone(),
                    candidates: self.config.candidate_files.clone(),
                });
            }
            DataStatus::Failed { name, message } => {
                return Err(ExplorerError::LoadFailed {
                    name: name.clone(),
                    message: message.clone(),
                });
            }
        };

        let numeric_columns = loaded.numeric_columns.clone();
        let categorical_columns = loaded.categorical_columns.clone();
        if numeric_columns.is_empty() {
            return Err(ExplorerError::NoNumericColumns);
        }

        let filters = &session.filters;
        let view = filter::derive_view(
            &loaded.dataset,
            filters,
            self.config.sample_limit,
            self.config.sample_seed,
        );

        let hist_column = pick_column(
            filters.hist_column.as_deref(),
            &numeric_columns,
            &[DISTANCE_COLUMN],
            0,
        );
        let x_column = pick_column(
            filters.x_column.as_deref(),
            &numeric_columns,
            &[DISTANCE_COLUMN],
            0,
        );
        let y_column = pick_column(
            filters.y_column.as_deref(),
            &numeric_columns,
            &[PRICE_COLUMN],
            1,
        );
        let color_column = filters
            .color_column
            .clone()
            .filter(|c| categorical_columns.contains(c));
        let log_y = filters
            .log_y
            .unwrap_or_else(|| y_column.eq_ignore_ascii_case(PRICE_COLUMN));

        let scatter_warning = (numeric_columns.len() < 2).then(|| {
            ExplorerError::TooFewNumericColumns {
                found: numeric_columns.len(),
            }
        });

        let histogram = match session.chart {
            Some(ChartRequest::Histogram) => {
                chart::histogram(&view.filtered, &hist_column, filters.bins)
            }
            _ => None,
        };
        let scatter = match session.chart {
            Some(ChartRequest::Scatter) if scatter_warning.is_none() => chart::scatter(
                &view.scatter,
                &x_column,
                &y_column,
                color_column.as_deref(),
                log_y,
            ),
            _ => None,
        };

        let raw_rows = filters
            .show_raw
            .then(|| view.filtered.head(self.config.raw_row_limit));

        Ok(RenderState {
            data_name: loaded.name.clone(),
            loaded_rows: loaded.raw_rows,
            loaded_columns: loaded.dataset.columns.len(),
            numeric_columns,
            categorical_columns,
            view,
            sample_limit: self.config.sample_limit,
            hist_column,
            bins: filters.bins,
            x_column,
            y_column,
            color_column,
            log_y,
            chart: session.chart,
            histogram,
            scatter,
            scatter_warning,
            raw_rows,
        })
    }
}

/// Resolve a column selection: the user's choice if still valid, else the
/// first preferred name present, else the numeric column at `fallback`
/// (or the first one when there are fewer).
fn pick_column(
    chosen: Option<&str>,
    numeric: &[String],
    preferred: &[&str],
    fallback: usize,
) -> String {
    if let Some(c) = chosen.filter(|c| numeric.iter().any(|n| n == c)) {
        return c.to_string();
    }
    preferred
        .iter()
        .find(|p| numeric.iter().any(|n| n == *p))
        .map(|p| p.to_string())
        .or_else(|| numeric.get(fallback).cloned())
        .or_else(|| numeric.first().cloned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_pick_column_prefers_valid_choice() {
        let numeric = cols(&["price", "odometer"]);
        assert_eq!(pick_column(Some("price"), &numeric, &["odometer"], 0), "price");
        assert_eq!(pick_column(Some("fuel"), &numeric, &["odometer"], 0), "odometer");
    }

    #[test]
    fn test_pick_column_falls_back_by_position() {
        let numeric = cols(&["a", "b"]);
        assert_eq!(pick_column(None, &numeric, &["price"], 1), "b");
        let single = cols(&["a"]);
        assert_eq!(pick_column(None, &single, &["price"], 1), "a");
    }
}
