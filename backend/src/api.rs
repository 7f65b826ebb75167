//! Public API surface: chart-ready shapes and per-view DTOs.
//!
//! Everything a presentation layer consumes is re-exported here so that the
//! route modules can be reorganized without breaking callers.

pub use crate::routes::series::{
    Bucket, CategoryCount, Direction, DirectionCounts, Histogram, SeriesKey, SeriesPoint,
    SpreadPoint, SummaryStats,
};

pub use crate::routes::contracts::{ContractQuery, ContractSummaryData};
pub use crate::routes::customers::{CustomerQuery, CustomerSummaryData};
pub use crate::routes::execution::{ExecutionData, ExecutionQuery};
pub use crate::routes::market::{
    MarketDailyData, MarketDailyQuery, MarketDistributionData, MarketDistributionQuery,
    MarketHourlyData, MarketHourlyQuery, PriceField,
};
pub use crate::routes::roles::{RoleData, ROLE_HEADER};
pub use crate::routes::settlement::{SettlementData, SettlementQuery};
pub use crate::routes::weather::{WeatherHourlyData, WeatherQuery};

pub use crate::models::{
    ContractId, ContractRecord, ContractStatus, CustomerId, CustomerRecord, DateRange, HourSlot,
    MarketPrice, Permissions, PlanId, PowerPlanRecord, QuarterSlot, Role, SettlementId,
    SettlementRecord, SettlementStatus, TransactionType, WeatherRecord,
};
