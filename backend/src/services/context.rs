//! Explicit data context handed to every view service.
//!
//! Built once at startup from the configured source and settings, then shared
//! through the HTTP state. There is no process-wide accessor.

use chrono::NaiveDate;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;

use crate::config::{AggregationSettings, ConfigError, DashboardConfig};
use crate::db::DataSource;
use crate::models::DateRange;
use crate::services::cache::SeriesCache;
use crate::services::error::{AggregationError, AggregationResult, ViewResult};
use crate::services::histogram::RangeBoundaries;
use crate::services::policy::{FillPolicy, MissingValuePolicy};
use crate::services::spread::SpreadThreshold;

/// Longest date window a single view request may span.
pub const MAX_WINDOW_DAYS: usize = 366;

/// Validate a `from..=to` request window.
pub fn date_window(from: NaiveDate, to: NaiveDate) -> AggregationResult<DateRange> {
    let range = DateRange::new(from, to).map_err(AggregationError::InvalidDateRange)?;
    if range.num_days() > MAX_WINDOW_DAYS {
        return Err(AggregationError::InvalidDateRange(format!(
            "{} days requested, at most {} allowed",
            range.num_days(),
            MAX_WINDOW_DAYS
        )));
    }
    Ok(range)
}

/// Validated aggregation parameters used when a request does not override them.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSettings {
    pub missing_values: MissingValuePolicy,
    pub fill_missing: FillPolicy,
    pub spread_threshold: SpreadThreshold,
    pub execution_tolerance: SpreadThreshold,
    pub price_boundaries: RangeBoundaries,
    pub contract_price_boundaries: RangeBoundaries,
}

impl ViewSettings {
    pub fn from_settings(settings: &AggregationSettings) -> Result<Self, ConfigError> {
        Ok(Self {
            missing_values: settings.missing_values,
            fill_missing: settings.fill_missing,
            spread_threshold: settings.spread_threshold()?,
            execution_tolerance: settings.execution_tolerance()?,
            price_boundaries: settings.price_boundaries()?,
            contract_price_boundaries: settings.contract_price_boundaries()?,
        })
    }
}

#[derive(Clone)]
pub struct DataContext {
    source: Arc<dyn DataSource>,
    cache: Arc<SeriesCache>,
    settings: Arc<ViewSettings>,
}

impl DataContext {
    pub fn new(source: Arc<dyn DataSource>, cache: SeriesCache, settings: ViewSettings) -> Self {
        Self {
            source,
            cache: Arc::new(cache),
            settings: Arc::new(settings),
        }
    }

    /// Context for `source` with the cache and aggregation sections of `config`.
    pub fn from_config(
        source: Arc<dyn DataSource>,
        config: &DashboardConfig,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(
            source,
            SeriesCache::from_settings(&config.cache),
            ViewSettings::from_settings(&config.aggregation)?,
        ))
    }

    pub fn source(&self) -> &dyn DataSource {
        self.source.as_ref()
    }

    pub fn cache(&self) -> &SeriesCache {
        &self.cache
    }

    pub fn settings(&self) -> &ViewSettings {
        &self.settings
    }

    /// Memoise a view result per (view, query, source kind).
    pub async fn cached<T, Q, F, Fut>(&self, view: &str, query: &Q, compute: F) -> ViewResult<T>
    where
        T: Clone + Send + Sync + 'static,
        Q: Serialize,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ViewResult<T>>,
    {
        self.cache
            .get_or_try_compute(view, self.source.kind().as_str(), query, compute)
            .await
    }
}

impl std::fmt::Debug for DataContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataContext")
            .field("source", &self.source.kind())
            .field("cache", &self.cache)
            .field("settings", &self.settings)
            .finish()
    }
}
