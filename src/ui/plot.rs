use chrono::{DateTime, NaiveDateTime};
use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, PlotUi};

use crate::color::channel_color;
use crate::data::evaluation::PredictedPoint;
use crate::data::model::{Channel, HourlyRecord};

const PLOT_HEIGHT: f32 = 220.0;
const SECONDS_PER_HOUR: f64 = 3600.0;

// ---------------------------------------------------------------------------
// Time axis helpers
// ---------------------------------------------------------------------------

/// Plot x coordinate for a timestamp (seconds since the epoch).
pub fn time_x(dt: NaiveDateTime) -> f64 {
    dt.and_utc().timestamp() as f64
}

fn time_axis_label(mark: GridMark, _range: &std::ops::RangeInclusive<f64>) -> String {
    DateTime::from_timestamp(mark.value as i64, 0)
        .map(|dt| dt.format("%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

/// Split a series into contiguous runs so the chart shows a gap instead of a
/// line bridging it. A run ends at a missing value and wherever neighbouring
/// points are more than an hour apart (hours with no readings at all).
pub fn segments(points: impl IntoIterator<Item = (f64, Option<f64>)>) -> Vec<Vec<[f64; 2]>> {
    let mut out: Vec<Vec<[f64; 2]>> = Vec::new();
    let mut current: Vec<[f64; 2]> = Vec::new();
    for (x, y) in points {
        let skipped_hours = current
            .last()
            .is_some_and(|last| x - last[0] > SECONDS_PER_HOUR);
        if (skipped_hours || y.is_none()) && !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
        if let Some(y) = y {
            current.push([x, y]);
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Shared chart chrome: datetime x axis, legend, zoom and drag.
fn show_time_plot(ui: &mut Ui, id: &str, y_label: &str, build: impl FnOnce(&mut PlotUi)) {
    Plot::new(id)
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_label("Datetime")
        .y_axis_label(y_label)
        .x_axis_formatter(time_axis_label)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, build);
}

fn add_lines(
    plot_ui: &mut PlotUi,
    name: &str,
    color: Color32,
    points: impl IntoIterator<Item = (f64, Option<f64>)>,
) {
    for run in segments(points) {
        let line = Line::new(PlotPoints::from(run))
            .name(name)
            .color(color)
            .width(1.5);
        plot_ui.line(line);
    }
}

fn channel_points(
    records: &[HourlyRecord],
    channel: Channel,
) -> impl Iterator<Item = (f64, Option<f64>)> + '_ {
    records
        .iter()
        .map(move |r| (time_x(r.datetime), r.value(channel)))
}

// ---------------------------------------------------------------------------
// Dashboard charts
// ---------------------------------------------------------------------------

/// Global active power over time.
pub fn active_power_plot(ui: &mut Ui, records: &[HourlyRecord]) {
    show_time_plot(ui, "active_power_plot", "kW", |plot_ui| {
        let ch = Channel::GlobalActivePower;
        add_lines(plot_ui, ch.column_name(), channel_color(ch), channel_points(records, ch));
    });
}

/// One bar per hour with the mean voltage.
pub fn voltage_bars(ui: &mut Ui, records: &[HourlyRecord]) {
    let ch = Channel::Voltage;
    let bars: Vec<Bar> = records
        .iter()
        .filter_map(|r| Some(Bar::new(time_x(r.datetime), r.value(ch)?)))
        .map(|b| b.width(SECONDS_PER_HOUR * 0.8))
        .collect();

    show_time_plot(ui, "voltage_plot", "V", |plot_ui| {
        plot_ui.bar_chart(
            BarChart::new(bars)
                .name(ch.column_name())
                .color(channel_color(ch)),
        );
    });
}

/// The three sub-metering channels on one chart.
pub fn sub_metering_plot(ui: &mut Ui, records: &[HourlyRecord]) {
    show_time_plot(ui, "sub_metering_plot", "Wh", |plot_ui| {
        for ch in [
            Channel::SubMetering1,
            Channel::SubMetering2,
            Channel::SubMetering3,
        ] {
            add_lines(plot_ui, ch.column_name(), channel_color(ch), channel_points(records, ch));
        }
    });
}

/// Active power against the placeholder prediction.
pub fn predicted_vs_actual_plot(ui: &mut Ui, points: &[PredictedPoint]) {
    show_time_plot(ui, "predicted_plot", "kW", |plot_ui| {
        add_lines(
            plot_ui,
            Channel::GlobalActivePower.column_name(),
            channel_color(Channel::GlobalActivePower),
            points.iter().map(|p| (time_x(p.datetime), p.actual)),
        );
        add_lines(
            plot_ui,
            "Predicted",
            Color32::LIGHT_GRAY,
            points.iter().map(|p| (time_x(p.datetime), p.predicted)),
        );
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::resample::resample_hourly;
    use crate::data::test_support::reading;

    #[test]
    fn segments_break_at_missing_values() {
        let runs = segments([
            (0.0, None),
            (1.0, Some(1.0)),
            (2.0, Some(2.0)),
            (3.0, None),
            (4.0, None),
            (5.0, Some(5.0)),
        ]);
        assert_eq!(runs, vec![vec![[1.0, 1.0], [2.0, 2.0]], vec![[5.0, 5.0]]]);
    }

    #[test]
    fn segments_break_across_hours_without_readings() {
        let table = resample_hourly(&[
            reading("2007-01-01 10:05:00", ["1", "1", "240", "4", "0", "1", "17"]),
            reading("2007-01-01 11:05:00", ["2", "1", "240", "4", "0", "1", "17"]),
            reading("2007-01-01 16:05:00", ["3", "1", "240", "4", "0", "1", "17"]),
        ]);
        let runs = segments(channel_points(table.records(), Channel::GlobalActivePower));

        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].len(), 2);
        assert_eq!(runs[1], vec![[time_x(table.records()[2].datetime), 3.0]]);
    }

    #[test]
    fn all_missing_series_has_no_segments() {
        assert!(segments([(0.0, None), (1.0, None)]).is_empty());
    }

    #[test]
    fn hours_are_an_hour_apart_on_the_axis() {
        let a = NaiveDateTime::parse_from_str("2007-01-01 10:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let b = NaiveDateTime::parse_from_str("2007-01-01 11:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        assert_eq!(time_x(b) - time_x(a), SECONDS_PER_HOUR);
    }
}
