use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{heatmap, panels, plot};

// ---------------------------------------------------------------------------
// Dashboard page (central panel)
// ---------------------------------------------------------------------------

/// Render every dashboard section over the filtered hourly rows.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("⚡ Household Power Consumption Dashboard");
            ui.label("Explore trends, patterns, and distribution in power usage data.");

            if state.table.is_none() {
                ui.add_space(12.0);
                ui.label("Open a database to view readings  (File → Open database…)");
                return;
            }

            let records = &state.filtered;

            heading(ui, "Filtered Data View");
            panels::data_table(ui, records);

            heading(ui, "🔹 Power Consumption Trends");
            if records.is_empty() {
                panels::no_data(ui, "visualization");
            } else {
                plot::active_power_plot(ui, records);
            }

            heading(ui, "🔹 Voltage Distribution");
            if records.is_empty() {
                panels::no_data(ui, "visualization");
            } else {
                plot::voltage_bars(ui, records);
            }

            heading(ui, "🔹 Sub-Metering Usage Over Time");
            if records.is_empty() {
                panels::no_data(ui, "visualization");
            } else {
                plot::sub_metering_plot(ui, records);
            }

            heading(ui, "🔹 Feature Importance - Correlation Heatmap");
            if records.is_empty() {
                panels::no_data(ui, "feature correlation analysis");
            } else {
                egui::ScrollArea::horizontal()
                    .id_salt("heatmap_scroll")
                    .show(ui, |ui: &mut Ui| {
                        heatmap::correlation_heatmap(ui, &state.correlations);
                    });
            }

            heading(ui, "🔹 Model Evaluation Metrics");
            if records.is_empty() {
                panels::no_data(ui, "model evaluation");
            } else {
                panels::evaluation_metrics(ui);
            }

            heading(ui, "🔹 Predicted vs. Actual Power Consumption");
            if records.is_empty() {
                panels::no_data(ui, "predictions");
            } else {
                plot::predicted_vs_actual_plot(ui, &state.predictions);
            }
        });
}

fn heading(ui: &mut Ui, text: &str) {
    ui.add_space(12.0);
    ui.label(RichText::new(text).heading());
    ui.separator();
}
