use std::path::PathBuf;

use anyhow::{Context, Result};
use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::dashboard::RenderState;
use crate::data::export::ExportPayload;
use crate::data::filter::{BIN_STEP, MAX_BINS, MIN_BINS};
use crate::data::loader::Upload;
use crate::error::{ExplorerError, Severity};
use crate::state::{Button, ChartRequest, Event, FilterChange, Session, SourceChoice};
use crate::ui::{plot, table};

type Render = Result<RenderState, ExplorerError>;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, session: &Session, render: &Render, events: &mut Vec<Event>) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open CSV…").clicked() {
                if let Some(event) = pick_upload() {
                    events.push(event);
                }
                ui.close_menu();
            }
            let can_export = render.is_ok();
            if ui
                .add_enabled(can_export, egui::Button::new("Export filtered CSV…"))
                .clicked()
            {
                events.push(Event::ButtonClicked(Button::Export));
                ui.close_menu();
            }
        });

        ui.separator();

        if let Ok(state) = render {
            ui.label(format!(
                "{} rows loaded, {} after filters",
                thousands(state.loaded_rows),
                thousands(state.view.filtered.len())
            ));
        }

        if let Some(msg) = &session.notice {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – source and filter widgets
// ---------------------------------------------------------------------------

/// Render the left panel: data source selector, then the optional filters.
pub fn side_panel(ui: &mut Ui, session: &Session, render: &Render, events: &mut Vec<Event>) {
    ui.heading("Data source");
    ui.separator();

    let mut choice = session.source;
    ui.radio_value(&mut choice, SourceChoice::Bundled, "Bundled with the project");
    ui.radio_value(&mut choice, SourceChoice::Upload, "Upload my own CSV");
    if choice != session.source {
        events.push(Event::SourceChanged(choice));
    }

    if session.source == SourceChoice::Upload {
        if ui.button("Choose file…").clicked() {
            if let Some(event) = pick_upload() {
                events.push(event);
            }
        }
        if let Some(upload) = &session.upload {
            ui.label(RichText::new(&upload.name).italics());
        }
    }

    ui.add_space(8.0);

    let Ok(state) = render else {
        return;
    };

    egui::CollapsingHeader::new(RichText::new("Optional filters").strong())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            if let (Some((lo, hi)), Some((from, to))) =
                (state.view.year_bounds, state.view.year_range)
            {
                ui.label("Model year range");
                let (mut from, mut to) = (from, to);
                let from_changed = ui.add(Slider::new(&mut from, lo..=hi).text("from")).changed();
                let to_changed = ui.add(Slider::new(&mut to, lo..=hi).text("to")).changed();
                if from_changed {
                    to = to.max(from);
                }
                if to_changed {
                    from = from.min(to);
                }
                if from_changed || to_changed {
                    events.push(Event::FilterChanged(FilterChange::YearRange(from, to)));
                }
                ui.separator();
            }

            let mut use_sample = session.filters.use_sample;
            let label = format!(
                "Use a sample of up to {} rows for the scatter (faster)",
                thousands(state.sample_limit)
            );
            if ui.checkbox(&mut use_sample, label).changed() {
                events.push(Event::FilterChanged(FilterChange::UseSample(use_sample)));
            }

            let mut show_raw = session.filters.show_raw;
            if ui.checkbox(&mut show_raw, "Show data table").changed() {
                events.push(Event::FilterChanged(FilterChange::ShowRaw(show_raw)));
            }
        });
}

// ---------------------------------------------------------------------------
// Central panel – charts, actions, raw table
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, render: &Render, events: &mut Vec<Event>) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Vehicle Explorer");
            ui.label(
                "Explore the listings with a configurable histogram and scatter plot. \
                 Pick a chart below, tune it, and export the filtered rows.",
            );
            ui.add_space(6.0);

            let state = match render {
                Ok(state) => state,
                Err(e) => {
                    condition_label(ui, e);
                    if ui.button("Reset (reload data)").clicked() {
                        events.push(Event::ButtonClicked(Button::Reset));
                    }
                    return;
                }
            };

            ui.label(
                RichText::new(format!(
                    "Data loaded: {}  |  Rows: {}  |  Columns: {}",
                    state.data_name,
                    thousands(state.loaded_rows),
                    thousands(state.loaded_columns)
                ))
                .color(Color32::from_rgb(46, 160, 67)),
            );
            if let Some(warning) = &state.scatter_warning {
                condition_label(ui, warning);
            }

            ui.add_space(6.0);
            ui.horizontal(|ui: &mut Ui| {
                if ui.button("Show histogram").clicked() {
                    events.push(Event::ButtonClicked(Button::ShowHistogram));
                }
                if ui.button("Show scatter").clicked() {
                    events.push(Event::ButtonClicked(Button::ShowScatter));
                }
            });
            ui.separator();

            match state.chart {
                None => {
                    ui.label("Press a button above to draw a chart.");
                }
                Some(ChartRequest::Histogram) => histogram_section(ui, state, events),
                Some(ChartRequest::Scatter) => scatter_section(ui, state, events),
            }

            ui.separator();
            ui.horizontal(|ui: &mut Ui| {
                if ui.button("Reset (reload data)").clicked() {
                    events.push(Event::ButtonClicked(Button::Reset));
                }
                if ui.button("Download current data (CSV)").clicked() {
                    events.push(Event::ButtonClicked(Button::Export));
                }
            });

            if let Some(raw) = &state.raw_rows {
                ui.add_space(6.0);
                ui.strong(format!("First {} rows", raw.len()));
                table::raw_table(ui, raw);
            }
        });
}

fn histogram_section(ui: &mut Ui, state: &RenderState, events: &mut Vec<Event>) {
    ui.heading("Histogram");
    column_combo(
        ui,
        "hist_column",
        "Numeric column",
        &state.hist_column,
        &state.numeric_columns,
        events,
        FilterChange::HistColumn,
    );

    let mut bins = state.bins;
    if ui
        .add(
            Slider::new(&mut bins, MIN_BINS..=MAX_BINS)
                .step_by(BIN_STEP as f64)
                .text("bins"),
        )
        .changed()
    {
        events.push(Event::FilterChanged(FilterChange::Bins(bins)));
    }

    match &state.histogram {
        Some(hist) => plot::histogram_plot(ui, hist),
        None => {
            ui.label(format!("No values of {} to plot.", state.hist_column));
        }
    }
}

fn scatter_section(ui: &mut Ui, state: &RenderState, events: &mut Vec<Event>) {
    ui.heading("Scatter plot");
    if let Some(warning) = &state.scatter_warning {
        condition_label(ui, warning);
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        column_combo(
            ui,
            "x_column",
            "X axis",
            &state.x_column,
            &state.numeric_columns,
            events,
            FilterChange::XColumn,
        );
        column_combo(
            ui,
            "y_column",
            "Y axis",
            &state.y_column,
            &state.numeric_columns,
            events,
            FilterChange::YColumn,
        );

        let current = state.color_column.clone();
        egui::ComboBox::from_id_salt("color_column")
            .selected_text(current.as_deref().unwrap_or("None"))
            .show_ui(ui, |ui: &mut Ui| {
                if ui.selectable_label(current.is_none(), "None").clicked() {
                    events.push(Event::FilterChanged(FilterChange::ColorColumn(None)));
                }
                for col in &state.categorical_columns {
                    if ui
                        .selectable_label(current.as_ref() == Some(col), col.as_str())
                        .clicked()
                    {
                        events.push(Event::FilterChanged(FilterChange::ColorColumn(Some(
                            col.clone(),
                        ))));
                    }
                }
            });
        ui.label("Color (optional)");
    });

    let mut log_y = state.log_y;
    if ui.checkbox(&mut log_y, "Logarithmic Y axis").changed() {
        events.push(Event::FilterChanged(FilterChange::LogY(log_y)));
    }

    if state.view.sampled {
        ui.label(
            RichText::new(format!(
                "Showing a sample of {} of {} rows.",
                thousands(state.view.scatter.len()),
                thousands(state.view.filtered.len())
            ))
            .italics(),
        );
    }

    match &state.scatter {
        Some(scatter) => plot::scatter_plot(ui, scatter),
        None => {
            ui.label("Nothing to plot.");
        }
    }
}

/// A combo box over `options` that reports the picked column through `change`.
fn column_combo(
    ui: &mut Ui,
    id: &str,
    label: &str,
    current: &str,
    options: &[String],
    events: &mut Vec<Event>,
    change: fn(String) -> FilterChange,
) {
    egui::ComboBox::from_id_salt(id)
        .selected_text(current)
        .show_ui(ui, |ui: &mut Ui| {
            for col in options {
                if ui.selectable_label(current == col.as_str(), col.as_str()).clicked() {
                    events.push(Event::FilterChanged(change(col.clone())));
                }
            }
        });
    ui.label(label);
}

fn condition_label(ui: &mut Ui, condition: &ExplorerError) {
    let color = match condition.severity() {
        Severity::Info => Color32::from_rgb(52, 152, 219),
        Severity::Warning => Color32::from_rgb(243, 156, 18),
        Severity::Error => Color32::RED,
    };
    ui.label(RichText::new(condition.to_string()).color(color).strong());
}

fn thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

/// Ask for a data file and turn the outcome into an event.
pub fn pick_upload() -> Option<Event> {
    let path = rfd::FileDialog::new()
        .set_title("Open vehicle listings")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .pick_file()?;

    Some(match Upload::from_path(&path) {
        Ok(upload) => Event::FileUploaded(upload),
        Err(e) => Event::UploadFailed {
            name: path.display().to_string(),
            message: format!("{e:#}"),
        },
    })
}

/// Offer a save dialog for an export; `Ok(None)` when the user cancels.
pub fn save_export_dialog(payload: &ExportPayload) -> Result<Option<PathBuf>> {
    let Some(path) = rfd::FileDialog::new()
        .set_title("Save filtered data")
        .set_file_name(&payload.file_name)
        .add_filter("CSV", &["csv"])
        .save_file()
    else {
        return Ok(None);
    };

    std::fs::write(&path, payload.bytes.as_slice())
        .with_context(|| format!("writing {}", path.display()))?;
    log::info!("Exported {} bytes to {}", payload.bytes.len(), path.display());
    Ok(Some(path))
}
