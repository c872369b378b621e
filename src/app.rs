use eframe::egui;

use crate::config::Config;
use crate::data::cache::HourlyCache;
use crate::state::{AppState, Page};
use crate::ui::{dashboard, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PowerPulseApp {
    pub state: AppState,
}

impl PowerPulseApp {
    /// Build the app over the configured store and run the first load.
    pub fn new(config: &Config) -> Self {
        let cache = HourlyCache::new(Box::new(config.store()));
        Self {
            state: AppState::new(cache, config.table.clone()),
        }
    }
}

impl eframe::App for PowerPulseApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: date filter (dashboard only) ----
        if self.state.page == Page::Dashboard {
            egui::SidePanel::left("filter_panel")
                .default_width(220.0)
                .resizable(true)
                .show(ctx, |ui| {
                    panels::side_panel(ui, &mut self.state);
                });
        }

        // ---- Central panel: selected page ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.page {
            Page::Dashboard => dashboard::dashboard(ui, &self.state),
            Page::ProjectSummary => {
                egui::ScrollArea::vertical().show(ui, panels::project_summary);
            }
        });
    }
}
