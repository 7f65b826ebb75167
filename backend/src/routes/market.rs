use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::{DirectionCounts, Histogram, SeriesPoint, SpreadPoint, SummaryStats};
use crate::models::DateRange;

// =========================================================
// Market price views
// =========================================================

pub const GET_MARKET_HOURLY: &str = "/market/hourly";
pub const GET_MARKET_DAILY: &str = "/market/daily";
pub const GET_MARKET_DISTRIBUTION: &str = "/market/distribution";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketHourlyQuery {
    pub date: NaiveDate,
    pub province: String,
    /// Overrides the configured spread threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
}

/// Intraday price curves of one province and day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketHourlyData {
    pub date: NaiveDate,
    pub province: String,
    pub threshold: f64,
    /// 24 points, mean day-ahead price per hour.
    pub day_ahead: Vec<SeriesPoint>,
    /// 24 points, mean realtime price per hour.
    pub realtime: Vec<SeriesPoint>,
    /// 24 points, cleared volume per hour.
    pub volume: Vec<SeriesPoint>,
    /// Day-ahead minus realtime, per hour.
    pub spread: Vec<SpreadPoint>,
    pub directions: DirectionCounts,
    pub day_ahead_stats: SummaryStats,
    pub realtime_stats: SummaryStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketDailyQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub province: String,
}

/// Daily mean prices with their intraday min/max envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketDailyData {
    pub range: DateRange,
    pub province: String,
    pub day_ahead: Vec<SeriesPoint>,
    pub realtime: Vec<SeriesPoint>,
    /// Total cleared volume per day.
    pub volume: Vec<SeriesPoint>,
}

/// Price column a distribution is computed over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceField {
    #[default]
    DayAhead,
    Realtime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketDistributionQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub province: String,
    #[serde(default)]
    pub field: PriceField,
    /// Comma-separated bucket boundaries, e.g. `"0,200,400,600"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundaries: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketDistributionData {
    pub range: DateRange,
    pub province: String,
    pub field: PriceField,
    pub histogram: Histogram,
    pub stats: SummaryStats,
}
