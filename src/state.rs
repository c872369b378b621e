use std::sync::Arc;

use crate::data::cache::HourlyCache;
use crate::data::evaluation::{naive_prediction, PredictedPoint};
use crate::data::filter::{filter_by_date, DateRange};
use crate::data::loader::ReadingSource;
use crate::data::model::{HourlyRecord, HourlyTable, CHANNEL_COUNT};
use crate::data::stats::{correlation_matrix, CorrelationMatrix};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    ProjectSummary,
}

impl Page {
    pub const ALL: [Page; 2] = [Page::Dashboard, Page::ProjectSummary];

    pub fn title(self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::ProjectSummary => "Project Summary",
        }
    }
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Source of the hourly table; owns the only cached copy.
    pub cache: HourlyCache,

    /// Table name used when another database file is opened.
    pub table_name: String,

    /// Shared handle on the cached table (None until a load succeeds).
    pub table: Option<Arc<HourlyTable>>,

    pub page: Page,

    /// Active date window (None while no data is loaded).
    pub range: Option<DateRange>,

    /// Filtered copy of the table for the active window (cached).
    pub filtered: Vec<HourlyRecord>,

    /// Channel correlations over `filtered` (cached).
    pub correlations: CorrelationMatrix,

    /// Placeholder prediction overlay over `filtered` (cached).
    pub predictions: Vec<PredictedPoint>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Build the state and run the first load.
    pub fn new(cache: HourlyCache, table_name: impl Into<String>) -> Self {
        let mut state = Self {
            cache,
            table_name: table_name.into(),
            table: None,
            page: Page::Dashboard,
            range: None,
            filtered: Vec::new(),
            correlations: [[None; CHANNEL_COUNT]; CHANNEL_COUNT],
            predictions: Vec::new(),
            status_message: None,
        };
        state.reload();
        state
    }

    /// Fetch the table from the cache (loading on a miss) and reset filters.
    pub fn reload(&mut self) {
        match self.cache.get() {
            Ok(table) => {
                if table.is_empty() {
                    log::warn!(
                        "{} has no readings with a usable timestamp",
                        self.cache.source_description()
                    );
                }
                self.range = DateRange::covering(&table);
                self.table = Some(table);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", self.cache.source_description());
                self.table = None;
                self.range = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
        self.refilter();
    }

    /// Drop the cached table and load it again from the store.
    pub fn refresh(&mut self) {
        self.cache.invalidate();
        self.reload();
    }

    /// Switch to a different reading source, discarding the old cache.
    pub fn open_source(&mut self, source: Box<dyn ReadingSource>) {
        self.cache = HourlyCache::new(source);
        self.reload();
    }

    /// Set the date window and recompute derived views.
    pub fn set_range(&mut self, range: DateRange) {
        self.range = Some(range);
        self.refilter();
    }

    /// Widen the date window back to the whole table.
    pub fn reset_range(&mut self) {
        self.range = self.table.as_deref().and_then(DateRange::covering);
        self.refilter();
    }

    /// Recompute `filtered` and everything derived from it.
    pub fn refilter(&mut self) {
        self.filtered = match (&self.table, &self.range) {
            (Some(table), Some(range)) => filter_by_date(table, range),
            _ => Vec::new(),
        };
        self.correlations = correlation_matrix(&self.filtered);
        self.predictions = naive_prediction(&self.filtered);
    }

    /// Number of hourly records in the cached table.
    pub fn total_records(&self) -> usize {
        self.table.as_ref().map_or(0, |t| t.len())
    }
}
