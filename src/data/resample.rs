use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use super::model::{Channel, HourlyRecord, HourlyTable, RawReading, RawValue, CHANNEL_COUNT};

// ---------------------------------------------------------------------------
// Permissive cell parsing
// ---------------------------------------------------------------------------

/// Date-time layouts accepted for the `Datetime` column, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
];

/// Parse a timestamp cell. Anything unparseable is `None`, never an error.
///
/// Offsets in RFC 3339 input are dropped after parsing, keeping the wall
/// clock time the reading was recorded at.
pub fn parse_timestamp(value: &RawValue) -> Option<NaiveDateTime> {
    let RawValue::Text(text) = value else {
        return None;
    };
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.naive_local())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Parse a numeric cell. Text that is not a finite decimal is `None`.
pub fn parse_numeric(value: &RawValue) -> Option<f64> {
    let v = match value {
        RawValue::Integer(i) => *i as f64,
        RawValue::Real(v) => *v,
        RawValue::Text(text) => text.trim().parse::<f64>().ok()?,
        RawValue::Blob(_) | RawValue::Null => return None,
    };
    v.is_finite().then_some(v)
}

/// Truncate a timestamp down to the start of its calendar hour.
pub fn hour_start(dt: NaiveDateTime) -> NaiveDateTime {
    dt.date().and_time(NaiveTime::MIN) + Duration::hours(i64::from(dt.hour()))
}

// ---------------------------------------------------------------------------
// Hourly aggregation
// ---------------------------------------------------------------------------

/// Running mean; never holds the raw sum, so finite inputs stay finite.
#[derive(Debug, Clone, Copy, Default)]
struct MeanAcc {
    mean: f64,
    count: u32,
}

impl MeanAcc {
    fn push(&mut self, v: f64) {
        self.count += 1;
        self.mean += (v - self.mean) / f64::from(self.count);
    }

    fn mean(self) -> Option<f64> {
        (self.count > 0).then_some(self.mean)
    }
}

/// Group readings into calendar-hour buckets and average each channel.
///
/// * Rows with an unparseable timestamp fall out of every bucket.
/// * A bad cell only removes that cell; the row's other channels still count.
/// * A channel with no valid value in an hour is `None`, not zero.
/// * Output is ascending by hour; hours with no rows are not synthesised.
pub fn resample_hourly(readings: &[RawReading]) -> HourlyTable {
    let mut buckets: BTreeMap<NaiveDateTime, [MeanAcc; CHANNEL_COUNT]> = BTreeMap::new();
    let mut dropped = 0usize;

    for reading in readings {
        let Some(ts) = parse_timestamp(&reading.datetime) else {
            dropped += 1;
            continue;
        };
        let acc = buckets.entry(hour_start(ts)).or_default();
        for ch in Channel::ALL {
            if let Some(v) = parse_numeric(reading.channel(ch)) {
                acc[ch.index()].push(v);
            }
        }
    }

    if dropped > 0 {
        log::debug!("Skipped {dropped} readings with an unparseable timestamp");
    }

    let records = buckets
        .into_iter()
        .map(|(datetime, acc)| HourlyRecord {
            datetime,
            values: acc.map(MeanAcc::mean),
        })
        .collect();

    HourlyTable::from_sorted(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::reading;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    const OK: [&str; CHANNEL_COUNT] = ["1", "1", "240", "4", "0", "1", "17"];

    fn with_active(v: &str) -> [&str; CHANNEL_COUNT] {
        let mut cells = OK;
        cells[Channel::GlobalActivePower.index()] = v;
        cells
    }

    #[test]
    fn timestamps_parse_permissively() {
        let ten = at("2007-01-01 10:05:00");
        for text in [
            "2007-01-01 10:05:00",
            " 2007-01-01T10:05:00 ",
            "2007-01-01 10:05",
            "01/01/2007 10:05:00",
            "2007/01/01 10:05:00",
            "2007-01-01T10:05:00+01:00",
        ] {
            assert_eq!(parse_timestamp(&RawValue::from(text)), Some(ten), "{text}");
        }
        assert_eq!(
            parse_timestamp(&RawValue::from("2007-01-01 10:05:00.250")).map(hour_start),
            Some(at("2007-01-01 10:00:00"))
        );
        assert_eq!(
            parse_timestamp(&RawValue::from("2007-01-01")),
            Some(at("2007-01-01 00:00:00"))
        );
    }

    #[test]
    fn bad_timestamps_become_none() {
        for value in [
            RawValue::from("not a date"),
            RawValue::from(""),
            RawValue::from("2007-13-45 10:00:00"),
            RawValue::Integer(1_167_645_900),
            RawValue::Null,
        ] {
            assert_eq!(parse_timestamp(&value), None, "{value}");
        }
    }

    #[test]
    fn numbers_parse_permissively() {
        assert_eq!(parse_numeric(&RawValue::from(" 4.216 ")), Some(4.216));
        assert_eq!(parse_numeric(&RawValue::Integer(3)), Some(3.0));
        assert_eq!(parse_numeric(&RawValue::Real(0.0)), Some(0.0));
        for bad in ["?", "", "abc", "NaN", "inf"] {
            assert_eq!(parse_numeric(&RawValue::from(bad)), None, "{bad}");
        }
        assert_eq!(parse_numeric(&RawValue::Real(f64::NAN)), None);
        assert_eq!(parse_numeric(&RawValue::Blob(vec![1, 2])), None);
        assert_eq!(parse_numeric(&RawValue::Null), None);
    }

    #[test]
    fn three_readings_over_two_hours() {
        let table = resample_hourly(&[
            reading("2007-01-01 11:10:00", with_active("5.0")),
            reading("2007-01-01 10:40:00", with_active("3.0")),
            reading("2007-01-01 10:05:00", with_active("1.0")),
        ]);

        let recs = table.records();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].datetime, at("2007-01-01 10:00:00"));
        assert_eq!(recs[0].value(Channel::GlobalActivePower), Some(2.0));
        assert_eq!(recs[1].datetime, at("2007-01-01 11:00:00"));
        assert_eq!(recs[1].value(Channel::GlobalActivePower), Some(5.0));
    }

    #[test]
    fn same_hour_shares_a_bucket_and_next_hour_does_not() {
        let table = resample_hourly(&[
            reading("2007-01-01 10:00:00", OK),
            reading("2007-01-01 10:59:59", OK),
            reading("2007-01-01 11:00:00", OK),
            reading("2007-01-02 10:30:00", OK),
        ]);
        let hours: Vec<_> = table.records().iter().map(|r| r.datetime).collect();
        assert_eq!(
            hours,
            vec![
                at("2007-01-01 10:00:00"),
                at("2007-01-01 11:00:00"),
                at("2007-01-02 10:00:00"),
            ]
        );
    }

    #[test]
    fn mean_is_exact() {
        let table = resample_hourly(&[
            reading("2007-01-01 10:01:00", with_active("10.0")),
            reading("2007-01-01 10:02:00", with_active("20.0")),
            reading("2007-01-01 10:03:00", with_active("30.0")),
        ]);
        assert_eq!(table.records()[0].value(Channel::GlobalActivePower), Some(20.0));
    }

    #[test]
    fn mean_of_huge_finite_values_stays_finite() {
        let big = f64::MAX / 1.5;
        let text = big.to_string();
        let table = resample_hourly(&[
            reading("2007-01-01 10:01:00", with_active(&text)),
            reading("2007-01-01 10:02:00", with_active(&text)),
        ]);
        assert_eq!(table.records()[0].value(Channel::GlobalActivePower), Some(big));
    }

    #[test]
    fn bad_cell_only_drops_its_channel() {
        let table = resample_hourly(&[
            reading("2007-01-01 10:01:00", ["?", "2", "230", "8", "2", "2", "2"]),
            reading("2007-01-01 10:02:00", ["4", "4", "250", "4", "0", "0", "0"]),
        ]);
        let rec = &table.records()[0];
        assert_eq!(rec.value(Channel::GlobalActivePower), Some(4.0));
        assert_eq!(rec.value(Channel::GlobalReactivePower), Some(3.0));
        assert_eq!(rec.value(Channel::Voltage), Some(240.0));
        assert_eq!(rec.value(Channel::GlobalIntensity), Some(6.0));
        assert_eq!(rec.value(Channel::SubMetering1), Some(1.0));
    }

    #[test]
    fn all_missing_channel_is_none_not_zero() {
        let table = resample_hourly(&[
            reading("2007-01-01 10:01:00", with_active("?")),
            reading("2007-01-01 10:02:00", with_active("")),
        ]);
        let rec = &table.records()[0];
        assert_eq!(rec.value(Channel::GlobalActivePower), None);
        assert_eq!(rec.value(Channel::Voltage), Some(240.0));
    }

    #[test]
    fn unparseable_timestamp_rows_are_excluded() {
        let table = resample_hourly(&[
            reading("garbage", with_active("100.0")),
            reading("2007-01-01 10:02:00", with_active("2.0")),
        ]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].value(Channel::GlobalActivePower), Some(2.0));
    }

    #[test]
    fn output_is_strictly_ascending_without_gap_filling() {
        let table = resample_hourly(&[
            reading("2007-01-01 15:30:00", OK),
            reading("2007-01-01 09:30:00", OK),
            reading("2007-01-01 12:30:00", OK),
            reading("2007-01-01 09:45:00", OK),
        ]);
        let recs = table.records();
        assert_eq!(recs.len(), 3);
        assert!(recs.windows(2).all(|w| w[0].datetime < w[1].datetime));
    }

    #[test]
    fn empty_input_gives_empty_table() {
        assert!(resample_hourly(&[]).is_empty());
    }

    #[test]
    fn resampling_is_deterministic() {
        let input = vec![
            reading("2007-01-01 10:01:00", ["0.1", "0.2", "233.1", "1.4", "0", "1", "17"]),
            reading("2007-01-01 10:02:00", ["0.3", "?", "234.9", "1.2", "0", "2", "16"]),
            reading("2007-01-01 11:02:00", ["0.7", "0.1", "236.0", "3.0", "1", "0", "0"]),
        ];
        assert_eq!(resample_hourly(&input), resample_hourly(&input));
    }
}
