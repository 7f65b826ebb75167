use serde::{Deserialize, Serialize};

use crate::api::{CategoryCount, SeriesPoint, SummaryStats};

pub const GET_CUSTOMER_SUMMARY: &str = "/customers/summary";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerSummaryData {
    pub total: usize,
    pub active: usize,
    pub by_category: Vec<CategoryCount>,
    /// Annual consumption per category (sum).
    pub consumption_by_category: Vec<SeriesPoint>,
    /// Annual consumption per province (sum).
    pub consumption_by_province: Vec<SeriesPoint>,
    pub consumption_stats: SummaryStats,
}
