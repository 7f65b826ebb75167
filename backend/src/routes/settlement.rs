use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::{CategoryCount, SeriesPoint};
use crate::models::{DateRange, TransactionType};

pub const GET_SETTLEMENTS: &str = "/settlements";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
}

/// Settlement overview for a date window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettlementData {
    pub range: DateRange,
    pub rows: usize,
    /// Settled volume per day (sum).
    pub volume: Vec<SeriesPoint>,
    /// Settled amount per day (sum).
    pub amount: Vec<SeriesPoint>,
    /// Mean settlement price per day, with envelope.
    pub price: Vec<SeriesPoint>,
    /// Settled volume per transaction type (sum).
    pub volume_by_type: Vec<SeriesPoint>,
    /// Settled amount per transaction type (sum).
    pub amount_by_type: Vec<SeriesPoint>,
    pub by_status: Vec<CategoryCount>,
    pub total_volume_mwh: f64,
    pub total_amount: f64,
    /// Total amount over total volume, for rows carrying both.
    pub weighted_price: Option<f64>,
}
