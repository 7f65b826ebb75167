//! Service layer: aggregation primitives and the view services built on them.
//!
//! The primitives (`grouping`, `histogram`, `spread`, `stats`) are pure and
//! synchronous over in-memory slices. Each view module pairs a pure
//! `compute_*` function with an async `get_*` that fetches rows through the
//! [`DataContext`] and memoises the result.

pub mod cache;
pub mod context;
pub mod error;
pub mod grouping;
pub mod histogram;
pub mod policy;
pub mod spread;
pub mod stats;

pub mod contracts;
pub mod customers;
pub mod execution;
pub mod market;
pub mod settlement;
pub mod weather;

pub use cache::{cache_key, CacheStats, SeriesCache};
pub use context::{date_window, DataContext, ViewSettings};
pub use error::{AggregationError, AggregationResult, ViewError, ViewResult};
pub use grouping::{align_to_domain, group_by, Field, GroupedPoint, KeyDomain, Measure};
pub use histogram::{bucketize, RangeBoundaries};
pub use policy::{FillPolicy, MissingValuePolicy};
pub use spread::{join_series, SpreadThreshold};
pub use stats::summarize;

pub use contracts::get_contract_summary;
pub use customers::get_customer_summary;
pub use execution::get_execution;
pub use market::{get_daily, get_distribution, get_hourly};
pub use settlement::get_settlements;
pub use weather::get_weather_hourly;
