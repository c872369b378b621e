use std::sync::Arc;

use super::loader::{ReadingSource, StoreError};
use super::model::HourlyTable;
use super::resample::resample_hourly;

// ---------------------------------------------------------------------------
// Hourly cache
// ---------------------------------------------------------------------------

/// Holds the hourly table built from one [`ReadingSource`].
///
/// The cache has a single constant key: the first [`HourlyCache::get`] runs
/// the load-and-resample pipeline, later calls return the same table until
/// [`HourlyCache::invalidate`] is called. A failed load caches nothing.
pub struct HourlyCache {
    source: Box<dyn ReadingSource>,
    table: Option<Arc<HourlyTable>>,
}

impl HourlyCache {
    pub fn new(source: Box<dyn ReadingSource>) -> Self {
        HourlyCache {
            source,
            table: None,
        }
    }

    /// Where the readings come from.
    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    /// Return the cached table, loading it on a miss.
    pub fn get(&mut self) -> Result<Arc<HourlyTable>, StoreError> {
        if let Some(table) = &self.table {
            log::trace!("Hourly cache hit for {}", self.source.describe());
            return Ok(Arc::clone(table));
        }

        log::info!("Hourly cache miss, loading {}", self.source.describe());
        let readings = self.source.load_recent()?;
        let table = Arc::new(resample_hourly(&readings));
        log::info!(
            "Resampled {} readings into {} hourly records",
            readings.len(),
            table.len()
        );

        self.table = Some(Arc::clone(&table));
        Ok(table)
    }

    /// Drop the cached table so the next `get` reloads from the source.
    pub fn invalidate(&mut self) {
        if self.table.take().is_some() {
            log::debug!("Hourly cache invalidated for {}", self.source.describe());
        }
    }
}
