//! Data source trait for filtered row-set fetches.
//!
//! Views only see [`DataSource`]; whether rows come from PostgreSQL or from
//! the seeded generator is decided once at configuration time.

pub mod error;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use error::{ErrorContext, SourceError, SourceResult};

use crate::db::filters::RowFilter;
use crate::models::{
    ContractRecord, CustomerRecord, MarketPrice, PowerPlanRecord, SettlementRecord, WeatherRecord,
};

/// Which backend a [`DataSource`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// PostgreSQL via Diesel
    Live,
    /// Seeded in-memory generator
    Synthetic,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Live => "live",
            SourceKind::Synthetic => "synthetic",
        }
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "live" | "postgres" | "pg" => Ok(Self::Live),
            "synthetic" | "mock" | "local" => Ok(Self::Synthetic),
            _ => Err(format!("Unknown source kind: {}", s)),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tabular query interface over the dashboard tables.
///
/// Every fetch applies the equality and range predicates of the given
/// [`RowFilter`]; unset predicates match all rows. Row order is not part of
/// the contract; aggregation sorts by its own keys.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to be shared across request tasks.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Check that the source can serve queries.
    async fn health_check(&self) -> SourceResult<bool>;

    fn kind(&self) -> SourceKind;

    async fn fetch_market_prices(&self, filter: &RowFilter) -> SourceResult<Vec<MarketPrice>>;

    /// `filter.category` matches the transaction type.
    async fn fetch_settlements(&self, filter: &RowFilter) -> SourceResult<Vec<SettlementRecord>>;

    /// Contracts whose validity interval overlaps the filter window.
    async fn fetch_contracts(&self, filter: &RowFilter) -> SourceResult<Vec<ContractRecord>>;

    async fn fetch_weather(&self, filter: &RowFilter) -> SourceResult<Vec<WeatherRecord>>;

    /// Customers have no date; only province and category apply.
    async fn fetch_customers(&self, filter: &RowFilter) -> SourceResult<Vec<CustomerRecord>>;

    async fn fetch_power_plans(&self, filter: &RowFilter) -> SourceResult<Vec<PowerPlanRecord>>;
}
