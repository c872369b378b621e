use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, DatePickerButton, TableBuilder};

use crate::data::evaluation::PLACEHOLDER_METRICS;
use crate::data::export;
use crate::data::loader::SqliteStore;
use crate::data::model::{Channel, HourlyRecord};
use crate::state::{AppState, Page};

// ---------------------------------------------------------------------------
// Left side panel – date filter
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Data");
    ui.separator();

    let Some(current) = state.range else {
        ui.label("No data loaded.");
        return;
    };

    let mut range = current;
    egui::Grid::new("date_filter")
        .num_columns(2)
        .spacing([8.0, 6.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("Start Date");
            ui.add(DatePickerButton::new(&mut range.start).id_salt("start_date"));
            ui.end_row();

            ui.label("End Date");
            ui.add(DatePickerButton::new(&mut range.end).id_salt("end_date"));
            ui.end_row();
        });

    if range != current {
        state.set_range(range);
    }

    ui.add_space(4.0);
    if ui.button("Reset").clicked() {
        state.reset_range();
    }

    ui.separator();
    ui.label(format!(
        "{} of {} hours selected",
        state.filtered.len(),
        state.total_records()
    ));
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open database…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = !state.filtered.is_empty();
            if ui
                .add_enabled(can_export, egui::Button::new("Export CSV…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        if ui.button("⟳ Refresh").clicked() {
            state.refresh();
        }

        ui.separator();

        for page in Page::ALL {
            ui.selectable_value(&mut state.page, page, page.title());
        }

        ui.separator();

        if state.table.is_some() {
            ui.label(format!(
                "{} hourly records from {}",
                state.total_records(),
                state.cache.source_description()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open power-consumption database")
        .add_filter("SQLite database", &["db", "sqlite", "sqlite3"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Opening {}", path.display());
        let store = SqliteStore::new(path, state.table_name.clone());
        state.open_source(Box::new(store));
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export hourly data")
        .add_filter("CSV", &["csv"])
        .set_file_name("power_pulse_hourly.csv")
        .save_file();

    if let Some(path) = file {
        if let Err(e) = export::export_file(&path, &state.filtered) {
            log::error!("Export failed: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

// ---------------------------------------------------------------------------
// Dashboard sections
// ---------------------------------------------------------------------------

/// Show the "nothing to display" notice used by every empty section.
pub fn no_data(ui: &mut Ui, what: &str) {
    ui.label(RichText::new(format!("No data available for {what}.")).color(Color32::YELLOW));
}

/// Render the filtered hourly rows as a scrollable table.
pub fn data_table(ui: &mut Ui, records: &[HourlyRecord]) {
    if records.is_empty() {
        no_data(ui, "the selected date range. Adjust your filter");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(240.0)
        .column(Column::auto().at_least(140.0))
        .columns(Column::auto().at_least(90.0), Channel::ALL.len())
        .header(20.0, |mut header| {
            header.col(|ui: &mut Ui| {
                ui.strong("Datetime");
            });
            for ch in Channel::ALL {
                header.col(|ui: &mut Ui| {
                    ui.strong(ch.column_name());
                });
            }
        })
        .body(|body| {
            body.rows(18.0, records.len(), |mut row| {
                let rec = &records[row.index()];
                row.col(|ui: &mut Ui| {
                    ui.label(rec.datetime.format("%Y-%m-%d %H:%M").to_string());
                });
                for ch in Channel::ALL {
                    row.col(|ui: &mut Ui| {
                        ui.label(format_cell(rec.value(ch)));
                    });
                }
            });
        });
}

/// Fixed-width rendering of an hourly mean; missing shows as a dash.
pub fn format_cell(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.3}"),
        None => "–".to_string(),
    }
}

/// Render the placeholder evaluation figures.
pub fn evaluation_metrics(ui: &mut Ui) {
    let m = PLACEHOLDER_METRICS;
    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new(format!("RMSE: {:.3}", m.rmse)).strong());
        ui.separator();
        ui.label(RichText::new(format!("MAE: {:.3}", m.mae)).strong());
        ui.separator();
        ui.label(RichText::new(format!("R² Score: {:.2}", m.r2)).strong());
    });
    ui.label(
        RichText::new("Placeholder figures; no model is evaluated by this dashboard.")
            .italics()
            .weak(),
    );
}

// ---------------------------------------------------------------------------
// Project summary page
// ---------------------------------------------------------------------------

pub fn project_summary(ui: &mut Ui) {
    ui.heading("📌 Project Summary");
    ui.add_space(8.0);

    section(ui, "Project Name: PowerPulse - Household Energy Usage Forecast");
    ui.label(
        "This project aims to analyze household power consumption data and build \
         predictive models to optimize energy usage.",
    );

    section(ui, "Key Objectives");
    bullet(ui, "Perform Exploratory Data Analysis (EDA) to uncover patterns in energy consumption.");
    bullet(ui, "Develop feature engineering techniques to improve prediction accuracy.");
    bullet(ui, "Build and evaluate predictive models using regression and time-series analysis.");

    section(ui, "Data Overview");
    ui.label(
        "The dataset contains power consumption metrics, including active power, \
         voltage fluctuations, and appliance-level usage.",
    );

    section(ui, "Evaluation Metrics");
    bullet(ui, "Root Mean Squared Error (RMSE): evaluates prediction errors.");
    bullet(ui, "Mean Absolute Error (MAE): measures the average magnitude of prediction errors.");
    bullet(ui, "R² Score: assesses how well the model explains variations in power consumption.");

    section(ui, "Conclusion");
    ui.label(
        "This project provides a data-driven approach to forecasting energy consumption, \
         enabling users to optimize power usage and reduce costs.",
    );
}

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(10.0);
    ui.label(RichText::new(format!("🔹 {title}")).heading().size(18.0));
}

fn bullet(ui: &mut Ui, text: &str) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.label("•");
        ui.label(text);
    });
}
