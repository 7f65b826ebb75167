//! Row types returned by the data sources.
//!
//! Every nullable numeric column is an `Option<f64>`; `None` means the
//! observation is absent and must not be read as zero.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::time::{HourSlot, QuarterSlot};

crate::define_id_type!(i64, SettlementId);
crate::define_id_type!(i64, ContractId);
crate::define_id_type!(i64, CustomerId);
crate::define_id_type!(i64, PlanId);

/// Market segment a settlement line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    MediumLongTerm,
    DayAhead,
    Realtime,
}

impl TransactionType {
    pub const ALL: [TransactionType; 3] = [
        TransactionType::MediumLongTerm,
        TransactionType::DayAhead,
        TransactionType::Realtime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::MediumLongTerm => "medium_long_term",
            TransactionType::DayAhead => "day_ahead",
            TransactionType::Realtime => "realtime",
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "medium_long_term" | "mlt" | "bilateral" => Ok(Self::MediumLongTerm),
            "day_ahead" | "dayahead" => Ok(Self::DayAhead),
            "realtime" | "real_time" | "spot" => Ok(Self::Realtime),
            other => Err(format!("Unknown transaction type: {}", other)),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementStatus {
    Pending,
    Confirmed,
    Disputed,
}

impl SettlementStatus {
    pub const ALL: [SettlementStatus; 3] = [
        SettlementStatus::Pending,
        SettlementStatus::Confirmed,
        SettlementStatus::Disputed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SettlementStatus::Pending => "pending",
            SettlementStatus::Confirmed => "confirmed",
            SettlementStatus::Disputed => "disputed",
        }
    }
}

impl FromStr for SettlementStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "disputed" => Ok(Self::Disputed),
            other => Err(format!("Unknown settlement status: {}", other)),
        }
    }
}

impl fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    Draft,
    Active,
    Expired,
    Terminated,
}

impl ContractStatus {
    pub const ALL: [ContractStatus; 4] = [
        ContractStatus::Draft,
        ContractStatus::Active,
        ContractStatus::Expired,
        ContractStatus::Terminated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContractStatus::Draft => "draft",
            ContractStatus::Active => "active",
            ContractStatus::Expired => "expired",
            ContractStatus::Terminated => "terminated",
        }
    }
}

impl FromStr for ContractStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "expired" => Ok(Self::Expired),
            "terminated" => Ok(Self::Terminated),
            other => Err(format!("Unknown contract status: {}", other)),
        }
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clearing price for one province and hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketPrice {
    pub trade_date: NaiveDate,
    pub hour: HourSlot,
    pub province: String,
    pub day_ahead_price: Option<f64>,
    pub realtime_price: Option<f64>,
    pub cleared_volume_mwh: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementRecord {
    pub id: SettlementId,
    pub settlement_date: NaiveDate,
    pub province: String,
    pub transaction_type: TransactionType,
    pub volume_mwh: Option<f64>,
    pub price: Option<f64>,
    pub amount: Option<f64>,
    pub status: SettlementStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractRecord {
    pub id: ContractId,
    pub customer_id: CustomerId,
    pub province: String,
    pub contract_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub contracted_volume_mwh: Option<f64>,
    pub price: Option<f64>,
    pub status: ContractStatus,
}

/// Hourly weather observation or forecast, with the load forecast that
/// depends on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub observed_date: NaiveDate,
    pub hour: HourSlot,
    pub province: String,
    pub temperature_c: Option<f64>,
    pub wind_speed_ms: Option<f64>,
    pub irradiance_wm2: Option<f64>,
    pub load_forecast_mw: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub id: CustomerId,
    pub name: String,
    pub province: String,
    pub category: String,
    pub annual_consumption_mwh: Option<f64>,
    pub active: bool,
}

/// Planned versus executed power for one quarter-hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerPlanRecord {
    pub id: PlanId,
    pub plan_date: NaiveDate,
    pub quarter: QuarterSlot,
    pub province: String,
    pub planned_mw: Option<f64>,
    pub actual_mw: Option<f64>,
}
