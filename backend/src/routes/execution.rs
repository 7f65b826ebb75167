use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::{DirectionCounts, SeriesPoint, SpreadPoint, SummaryStats};

pub const GET_PLAN_EXECUTION: &str = "/plans/execution";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionQuery {
    pub date: NaiveDate,
    pub province: String,
    /// Overrides the configured on-plan tolerance, in MW.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,
}

/// Planned against executed power over the 96 quarters of a day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionData {
    pub date: NaiveDate,
    pub province: String,
    pub tolerance: f64,
    pub planned: Vec<SeriesPoint>,
    pub actual: Vec<SeriesPoint>,
    /// Actual minus planned: `up` is over-delivery, `down` is shortfall.
    pub deviation: Vec<SpreadPoint>,
    pub directions: DirectionCounts,
    /// Statistics of the present deviations.
    pub deviation_stats: SummaryStats,
    /// Actual over planned energy in percent, over quarters with both values.
    pub completion_rate: Option<f64>,
    /// Share of classified quarters within tolerance, in percent.
    pub on_plan_rate: Option<f64>,
}
