//! Helpers for building throwaway stores and readings in unit tests.

use std::path::Path;

use chrono::{Duration, NaiveDateTime};
use rusqlite::{params_from_iter, Connection};

use super::model::{Channel, RawReading, RawValue, CHANNEL_COUNT};

pub const TABLE: &str = "power_consumption";

/// A store row: `Datetime` text plus seven channel texts.
pub type Row = (String, [String; CHANNEL_COUNT]);

pub fn row(datetime: &str, channels: [&str; CHANNEL_COUNT]) -> Row {
    (datetime.to_string(), channels.map(str::to_string))
}

/// `n` consecutive minute readings starting at `start`, all channels `1.0`.
pub fn minute_rows(start: &str, n: usize) -> Vec<Row> {
    let start = NaiveDateTime::parse_from_str(start, "%Y-%m-%d %H:%M:%S").unwrap();
    (0..n)
        .map(|i| {
            let ts = start + Duration::minutes(i as i64);
            (
                ts.format("%Y-%m-%d %H:%M:%S").to_string(),
                std::array::from_fn(|_| "1.0".to_string()),
            )
        })
        .collect()
}

/// Create the readings table at `path` and insert `rows` as text.
///
/// Channel columns carry no declared type so text such as `?` is stored
/// verbatim, the same way a raw import leaves it.
pub fn create_store(path: &Path, rows: &[Row]) {
    let mut conn = Connection::open(path).unwrap();
    let columns: Vec<&str> = Channel::ALL.iter().map(|c| c.column_name()).collect();
    conn.execute_batch(&format!(
        "CREATE TABLE {TABLE} (Datetime TEXT, {});",
        columns.join(", ")
    ))
    .unwrap();

    let tx = conn.transaction().unwrap();
    {
        let mut stmt = tx
            .prepare(&format!(
                "INSERT INTO {TABLE} (Datetime, {}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                columns.join(", ")
            ))
            .unwrap();
        for (datetime, channels) in rows {
            let values = std::iter::once(datetime).chain(channels.iter());
            stmt.execute(params_from_iter(values)).unwrap();
        }
    }
    tx.commit().unwrap();
}

/// A reading with text cells, as the loader would hand it over.
pub fn reading(datetime: &str, channels: [&str; CHANNEL_COUNT]) -> RawReading {
    RawReading {
        datetime: RawValue::from(datetime),
        channels: channels.map(RawValue::from),
    }
}
