use std::path::{Path, PathBuf};

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use thiserror::Error;

use super::model::{Channel, RawReading, RawValue, CHANNEL_COUNT, DATETIME_COLUMN};

/// Maximum number of readings ever loaded; older history is invisible.
pub const ROW_LIMIT: usize = 10_000;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure to read the row store. Fatal for the load that hit it.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot open store {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("query on table '{table}' failed: {source}")]
    Query {
        table: String,
        #[source]
        source: rusqlite::Error,
    },
    #[error("table '{table}' has no '{column}' column")]
    MissingColumn { table: String, column: &'static str },
    #[error("reading row {row} of table '{table}': {source}")]
    Row {
        table: String,
        row: usize,
        #[source]
        source: rusqlite::Error,
    },
}

// ---------------------------------------------------------------------------
// Source abstraction
// ---------------------------------------------------------------------------

/// Anything that can hand back the most recent raw readings.
pub trait ReadingSource {
    /// Human-readable origin, used in logs and the status bar.
    fn describe(&self) -> String;

    /// Return at most [`ROW_LIMIT`] readings, newest first.
    fn load_recent(&self) -> Result<Vec<RawReading>, StoreError>;
}

/// A SQLite database file holding a readings table.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pub path: PathBuf,
    pub table: String,
}

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>, table: impl Into<String>) -> Self {
        SqliteStore {
            path: path.into(),
            table: table.into(),
        }
    }
}

impl ReadingSource for SqliteStore {
    fn describe(&self) -> String {
        format!("{}#{}", self.path.display(), self.table)
    }

    fn load_recent(&self) -> Result<Vec<RawReading>, StoreError> {
        load_recent(&self.path, &self.table)
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Read the newest [`ROW_LIMIT`] rows of `table`, ordered by `Datetime`
/// descending, without transforming any value.
///
/// The store is opened read-only; the connection lives only for the
/// duration of this call and is closed on every return path.
pub fn load_recent(path: &Path, table: &str) -> Result<Vec<RawReading>, StoreError> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|source| StoreError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let readings = query_recent(&conn, table)?;
    log::debug!(
        "Loaded {} raw readings from {}#{table}",
        readings.len(),
        path.display()
    );
    Ok(readings)
}

fn query_recent(conn: &Connection, table: &str) -> Result<Vec<RawReading>, StoreError> {
    let query_err = |source: rusqlite::Error| StoreError::Query {
        table: table.to_string(),
        source,
    };

    let sql = format!(
        "SELECT * FROM {} ORDER BY {DATETIME_COLUMN} DESC LIMIT {ROW_LIMIT}",
        quote_identifier(table)
    );
    let mut stmt = conn.prepare(&sql).map_err(query_err)?;

    // Locate the required columns by name; everything else is ignored.
    let column_of = |column: &'static str| {
        stmt.column_index(column)
            .map_err(|_| StoreError::MissingColumn {
                table: table.to_string(),
                column,
            })
    };
    let datetime_idx = column_of(DATETIME_COLUMN)?;
    let mut channel_idx = [0usize; CHANNEL_COUNT];
    for ch in Channel::ALL {
        channel_idx[ch.index()] = column_of(ch.column_name())?;
    }

    let mut rows = stmt.query([]).map_err(query_err)?;
    let mut readings = Vec::new();
    let mut row_no = 0usize;

    loop {
        let row_err = |source: rusqlite::Error| StoreError::Row {
            table: table.to_string(),
            row: row_no,
            source,
        };
        let Some(row) = rows.next().map_err(row_err)? else {
            break;
        };

        let datetime = row.get_ref(datetime_idx).map(raw_value).map_err(row_err)?;
        let mut channels: [RawValue; CHANNEL_COUNT] = Default::default();
        for (slot, &idx) in channels.iter_mut().zip(channel_idx.iter()) {
            *slot = row.get_ref(idx).map(raw_value).map_err(row_err)?;
        }

        readings.push(RawReading { datetime, channels });
        row_no += 1;
    }

    Ok(readings)
}

// -- SQLite helpers --

fn raw_value(value: ValueRef<'_>) -> RawValue {
    match value {
        ValueRef::Null => RawValue::Null,
        ValueRef::Integer(i) => RawValue::Integer(i),
        ValueRef::Real(v) => RawValue::Real(v),
        ValueRef::Text(bytes) => RawValue::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => RawValue::Blob(bytes.to_vec()),
    }
}

/// Quote a table name as a SQL identifier.
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::{create_store, minute_rows, row, TABLE};

    #[test]
    fn caps_at_row_limit_keeping_newest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("power.db");
        let rows = minute_rows("2007-01-01 00:00:00", ROW_LIMIT + 50);
        create_store(&path, &rows);

        let readings = load_recent(&path, TABLE).unwrap();
        assert_eq!(readings.len(), ROW_LIMIT);

        // The 50 oldest minutes are gone; the newest comes first.
        assert_eq!(
            readings.first().unwrap().datetime,
            RawValue::from(rows.last().unwrap().0.as_str())
        );
        assert_eq!(
            readings.last().unwrap().datetime,
            RawValue::from(rows[50].0.as_str())
        );
    }

    #[test]
    fn values_come_back_untransformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("power.db");
        create_store(&path, &[row("2007-01-01 10:05:00", ["?", "0.4", "", "2", "0", "1", "17"])]);

        let readings = load_recent(&path, TABLE).unwrap();
        assert_eq!(readings.len(), 1);
        let r = &readings[0];
        assert_eq!(r.channel(Channel::GlobalActivePower), &RawValue::from("?"));
        assert_eq!(r.channel(Channel::GlobalReactivePower), &RawValue::from("0.4"));
        assert_eq!(r.channel(Channel::Voltage), &RawValue::from(""));
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.db");

        let err = load_recent(&path, TABLE).unwrap_err();
        assert!(matches!(err, StoreError::Open { .. }), "{err}");
        assert!(!path.exists(), "read-only open must not create the file");
    }

    #[test]
    fn missing_table_is_a_query_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("power.db");
        create_store(&path, &[]);

        let err = load_recent(&path, "no_such_table").unwrap_err();
        assert!(matches!(err, StoreError::Query { .. }), "{err}");
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("power.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE power_consumption (Datetime TEXT, Global_active_power, Voltage);",
        )
        .unwrap();
        drop(conn);

        let err = load_recent(&path, TABLE).unwrap_err();
        match err {
            StoreError::MissingColumn { column, .. } => {
                assert_eq!(column, "Global_reactive_power")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn identifiers_are_quoted() {
        assert_eq!(quote_identifier("power_consumption"), "\"power_consumption\"");
        assert_eq!(quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }
}
