//! Data Transfer Objects for the HTTP API.
//!
//! View DTOs and query types live in the routes module and are re-exported
//! here; only the transport-specific types are defined locally.

use serde::{Deserialize, Serialize};

pub use crate::api::{
    // Contracts
    ContractQuery, ContractSummaryData,
    // Customers
    CustomerQuery, CustomerSummaryData,
    // Plan execution
    ExecutionData, ExecutionQuery,
    // Market
    MarketDailyData, MarketDailyQuery, MarketDistributionData, MarketDistributionQuery,
    MarketHourlyData, MarketHourlyQuery,
    // Roles
    RoleData,
    // Settlements
    SettlementData, SettlementQuery,
    // Weather
    WeatherHourlyData, WeatherQuery,
};
pub use crate::services::CacheStats;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Configured data source kind
    pub source: String,
    /// Data source connectivity
    pub database: String,
    pub cache: CacheStats,
}
