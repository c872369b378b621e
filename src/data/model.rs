use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

// ---------------------------------------------------------------------------
// Channel – one of the seven numeric measurement columns
// ---------------------------------------------------------------------------

/// The numeric measurement columns tracked per reading, in store order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Channel {
    GlobalActivePower,
    GlobalReactivePower,
    Voltage,
    GlobalIntensity,
    SubMetering1,
    SubMetering2,
    SubMetering3,
}

/// Number of numeric channels per reading.
pub const CHANNEL_COUNT: usize = 7;

/// Name of the timestamp column in the store.
pub const DATETIME_COLUMN: &str = "Datetime";

impl Channel {
    pub const ALL: [Channel; CHANNEL_COUNT] = [
        Channel::GlobalActivePower,
        Channel::GlobalReactivePower,
        Channel::Voltage,
        Channel::GlobalIntensity,
        Channel::SubMetering1,
        Channel::SubMetering2,
        Channel::SubMetering3,
    ];

    /// Column name as it appears in the store and in exports.
    pub fn column_name(self) -> &'static str {
        match self {
            Channel::GlobalActivePower => "Global_active_power",
            Channel::GlobalReactivePower => "Global_reactive_power",
            Channel::Voltage => "Voltage",
            Channel::GlobalIntensity => "Global_intensity",
            Channel::SubMetering1 => "Sub_metering_1",
            Channel::SubMetering2 => "Sub_metering_2",
            Channel::SubMetering3 => "Sub_metering_3",
        }
    }

    /// Short label for compact headers.
    pub fn label(self) -> &'static str {
        match self {
            Channel::GlobalActivePower => "Active",
            Channel::GlobalReactivePower => "Reactive",
            Channel::Voltage => "Voltage",
            Channel::GlobalIntensity => "Intensity",
            Channel::SubMetering1 => "Sub 1",
            Channel::SubMetering2 => "Sub 2",
            Channel::SubMetering3 => "Sub 3",
        }
    }

    /// Position of the channel inside per-record value arrays.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

// ---------------------------------------------------------------------------
// RawValue – a single cell exactly as the store returned it
// ---------------------------------------------------------------------------

/// A dynamically-typed store cell mirroring SQLite's storage classes.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RawValue {
    Text(String),
    Integer(i64),
    Real(f64),
    Blob(Vec<u8>),
    #[default]
    Null,
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Text(s) => write!(f, "{s}"),
            RawValue::Integer(i) => write!(f, "{i}"),
            RawValue::Real(v) => write!(f, "{v}"),
            RawValue::Blob(b) => write!(f, "<{} bytes>", b.len()),
            RawValue::Null => write!(f, "<null>"),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// RawReading – one row of the store
// ---------------------------------------------------------------------------

/// One row per original sampling instant, untransformed.
#[derive(Debug, Clone, PartialEq)]
pub struct RawReading {
    pub datetime: RawValue,
    /// Indexed by [`Channel::index`].
    pub channels: [RawValue; CHANNEL_COUNT],
}

impl RawReading {
    pub fn channel(&self, channel: Channel) -> &RawValue {
        &self.channels[channel.index()]
    }
}

// ---------------------------------------------------------------------------
// HourlyRecord / HourlyTable – the resampled series
// ---------------------------------------------------------------------------

/// One row per calendar hour present in the loaded window.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyRecord {
    /// Start of the hour.
    pub datetime: NaiveDateTime,
    /// Per-channel hourly mean; `None` when the hour had no valid value.
    pub values: [Option<f64>; CHANNEL_COUNT],
}

impl HourlyRecord {
    pub fn value(&self, channel: Channel) -> Option<f64> {
        self.values[channel.index()]
    }
}

/// The immutable, ascending hourly series shared by every view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HourlyTable {
    records: Vec<HourlyRecord>,
}

impl HourlyTable {
    /// Wrap records that are already sorted ascending with unique hours.
    pub(crate) fn from_sorted(records: Vec<HourlyRecord>) -> Self {
        debug_assert!(records.windows(2).all(|w| w[0].datetime < w[1].datetime));
        HourlyTable { records }
    }

    pub fn records(&self) -> &[HourlyRecord] {
        &self.records
    }

    /// Number of hourly records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First and last calendar date covered, if any.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.first()?;
        let last = self.records.last()?;
        Some((first.datetime.date(), last.datetime.date()))
    }
}
