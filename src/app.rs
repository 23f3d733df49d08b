use std::time::Duration;

use eframe::egui;

use crate::config::Config;
use crate::state::AppState;
use crate::ui::{panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RustySieveApp {
    pub state: AppState,
}

impl RustySieveApp {
    /// Create the app and start loading the configured source, if any.
    pub fn new(config: Config) -> Self {
        let source = config.source.clone();
        let mut state = AppState::new(config);
        if let Some(path) = source {
            state.begin_load(path);
        }
        Self { state }
    }
}

impl eframe::App for RustySieveApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_load();
        if self.state.loading() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filter form ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: sheet table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            table::data_table(ui, self.state.store.filtered());
        });

        // ---- Dialogs ----
        panels::export_window(ctx, &mut self.state);
        panels::alert_window(ctx, &mut self.state);
    }
}
