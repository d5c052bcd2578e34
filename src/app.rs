use eframe::egui;

use crate::config::AppConfig;
use crate::dashboard::{Dashboard, RenderState};
use crate::error::ExplorerError;
use crate::state::{Event, Session};
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct VehicleExplorerApp {
    dashboard: Dashboard,
    session: Session,
    /// Recomputed only after events, not on every repaint.
    render: Result<RenderState, ExplorerError>,
}

impl VehicleExplorerApp {
    pub fn new(config: AppConfig) -> Self {
        let mut dashboard = Dashboard::new(config);
        let session = dashboard.start();
        let render = dashboard.render(&session);
        Self {
            dashboard,
            session,
            render,
        }
    }

    /// Feed the frame's events through the dashboard, one at a time.
    fn dispatch(&mut self, events: Vec<Event>) {
        if events.is_empty() {
            return;
        }
        for event in events {
            self.session = self.dashboard.handle(&self.session, event);
            if let Some(payload) = self.session.pending_export.take() {
                if let Err(e) = panels::save_export_dialog(&payload) {
                    log::error!("Failed to save export: {e:#}");
                    self.session.notice = Some(format!("Error: {e:#}"));
                }
            }
        }
        self.render = self.dashboard.render(&self.session);
    }
}

impl eframe::App for VehicleExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut events = Vec::new();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.session, &self.render, &mut events);
        });

        // ---- Left side panel: source and filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &self.session, &self.render, &mut events);
            });

        // ---- Central panel: charts, actions, table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::central_panel(ui, &self.render, &mut events);
        });

        self.dispatch(events);
    }
}
