use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use super::model::{Channel, HourlyRecord};

/// Timestamp layout used for the `Datetime` column on export.
pub const EXPORT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One CSV row; field names match the store's column names.
#[derive(Debug, Serialize)]
struct ExportRow {
    #[serde(rename = "Datetime")]
    datetime: String,
    #[serde(rename = "Global_active_power")]
    global_active_power: Option<f64>,
    #[serde(rename = "Global_reactive_power")]
    global_reactive_power: Option<f64>,
    #[serde(rename = "Voltage")]
    voltage: Option<f64>,
    #[serde(rename = "Global_intensity")]
    global_intensity: Option<f64>,
    #[serde(rename = "Sub_metering_1")]
    sub_metering_1: Option<f64>,
    #[serde(rename = "Sub_metering_2")]
    sub_metering_2: Option<f64>,
    #[serde(rename = "Sub_metering_3")]
    sub_metering_3: Option<f64>,
}

impl From<&HourlyRecord> for ExportRow {
    fn from(r: &HourlyRecord) -> Self {
        ExportRow {
            datetime: r.datetime.format(EXPORT_DATETIME_FORMAT).to_string(),
            global_active_power: r.value(Channel::GlobalActivePower),
            global_reactive_power: r.value(Channel::GlobalReactivePower),
            voltage: r.value(Channel::Voltage),
            global_intensity: r.value(Channel::GlobalIntensity),
            sub_metering_1: r.value(Channel::SubMetering1),
            sub_metering_2: r.value(Channel::SubMetering2),
            sub_metering_3: r.value(Channel::SubMetering3),
        }
    }
}

/// Write hourly records as CSV. Missing values become empty fields.
pub fn write_csv<W: Write>(writer: W, records: &[HourlyRecord]) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    if records.is_empty() {
        // serde only emits a header alongside the first row.
        out.write_record(
            std::iter::once("Datetime").chain(Channel::ALL.iter().map(|c| c.column_name())),
        )
        .context("writing CSV header")?;
    }
    for (i, rec) in records.iter().enumerate() {
        out.serialize(ExportRow::from(rec))
            .with_context(|| format!("writing CSV row {i}"))?;
    }
    out.flush().context("flushing CSV output")?;
    Ok(())
}

/// Export hourly records to a CSV file at `path`.
pub fn export_file(path: &Path, records: &[HourlyRecord]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(file, records)?;
    log::info!("Exported {} hourly records to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::resample::resample_hourly;
    use crate::data::test_support::reading;

    #[test]
    fn writes_header_and_blank_missing_cells() {
        let table = resample_hourly(&[reading(
            "2007-01-01 10:05:00",
            ["2.5", "?", "240", "4", "0", "1", "17"],
        )]);
        let mut buf = Vec::new();
        write_csv(&mut buf, table.records()).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Datetime,Global_active_power,Global_reactive_power,Voltage,\
             Global_intensity,Sub_metering_1,Sub_metering_2,Sub_metering_3"
        );
        assert_eq!(lines.next().unwrap(), "2007-01-01 10:00:00,2.5,,240.0,4.0,0.0,1.0,17.0");
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn empty_export_still_has_a_header() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &[]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("Datetime,Global_active_power,"));
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn export_file_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hourly.csv");
        let table = resample_hourly(&[reading(
            "2007-01-01 10:05:00",
            ["1", "1", "240", "4", "0", "1", "17"],
        )]);
        export_file(&path, table.records()).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.records().count(), 1);
    }
}
