use chrono::NaiveDate;

use super::model::{HourlyRecord, HourlyTable};

// ---------------------------------------------------------------------------
// Filter predicate: inclusive calendar-date window
// ---------------------------------------------------------------------------

/// Calendar-date window. Both ends are inclusive whole days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    /// The window spanning the whole table, or `None` for an empty table.
    pub fn covering(table: &HourlyTable) -> Option<Self> {
        table
            .date_bounds()
            .map(|(start, end)| DateRange::new(start, end))
    }

    /// Whether `record` falls on a day inside the window.
    pub fn contains(&self, record: &HourlyRecord) -> bool {
        let day = record.datetime.date();
        self.start <= day && day <= self.end
    }
}

/// Return a copy of the records inside `range`.
///
/// An inverted range (`start > end`) or a window with no data yields an
/// empty vector; callers show that as "no data" rather than failing.
pub fn filter_by_date(table: &HourlyTable, range: &DateRange) -> Vec<HourlyRecord> {
    table
        .records()
        .iter()
        .filter(|rec| range.contains(rec))
        .cloned()
        .collect()
}
