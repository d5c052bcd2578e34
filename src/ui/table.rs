use eframe::egui::{ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::Dataset;

/// Show a table verbatim, with a leading row-number column.
pub fn raw_table(ui: &mut Ui, dataset: &Dataset) {
    ScrollArea::horizontal()
        .id_salt("raw_table_scroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .max_scroll_height(320.0)
                .columns(Column::auto().at_least(48.0), dataset.columns.len() + 1)
                .header(20.0, |mut header| {
                    header.col(|ui| {
                        ui.strong("#");
                    });
                    for name in &dataset.columns {
                        header.col(|ui| {
                            ui.strong(name.as_str());
                        });
                    }
                })
                .body(|body| {
                    body.rows(18.0, dataset.len(), |mut row| {
                        let i = row.index();
                        row.col(|ui| {
                            ui.label(i.to_string());
                        });
                        for cell in &dataset.rows[i] {
                            row.col(|ui| {
                                ui.label(cell.to_string());
                            });
                        }
                    });
                });
        });
}
