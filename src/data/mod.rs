/// Data layer: core types, loading, resampling, caching and filtering.
///
/// Architecture:
/// ```text
///   SQLite store (power_consumption)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  newest 10 000 rows → Vec<RawReading>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ resample  │  permissive parse, hourly mean → HourlyTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  Arc<HourlyTable>, reloaded only on invalidate
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  inclusive date window → filtered copy
///   └──────────┘
///        │
///        ▼
///   stats / evaluation / export
/// ```

pub mod cache;
pub mod evaluation;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod resample;
pub mod stats;

#[cfg(test)]
pub(crate) mod test_support;
