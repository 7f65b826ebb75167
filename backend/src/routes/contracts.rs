use serde::{Deserialize, Serialize};

use crate::api::{CategoryCount, Histogram, SeriesPoint, SummaryStats};
use crate::models::ContractStatus;

pub const GET_CONTRACT_SUMMARY: &str = "/contracts/summary";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ContractStatus>,
}

/// Contract portfolio overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractSummaryData {
    pub total: usize,
    pub by_status: Vec<CategoryCount>,
    pub by_type: Vec<CategoryCount>,
    /// Contracted volume per province (sum).
    pub volume_by_province: Vec<SeriesPoint>,
    pub price_histogram: Histogram,
    pub price_stats: SummaryStats,
    pub total_volume_mwh: f64,
}
