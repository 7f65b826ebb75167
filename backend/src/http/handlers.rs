//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the view
//! services for fetching and aggregation.

use axum::{
    extract::{FromRequestParts, Path, Query, State},
    http::request::Parts,
    Json,
};

use super::dto::{
    ContractQuery, ContractSummaryData, CustomerQuery, CustomerSummaryData, ExecutionData,
    ExecutionQuery, HealthResponse, MarketDailyData, MarketDailyQuery, MarketDistributionData,
    MarketDistributionQuery, MarketHourlyData, MarketHourlyQuery, RoleData, SettlementData,
    SettlementQuery, WeatherHourlyData, WeatherQuery,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::ROLE_HEADER;
use crate::models::{Permissions, Role};
use crate::services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Role of the caller, from the role header or the configured default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerRole(pub Role);

impl FromRequestParts<AppState> for CallerRole {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(ROLE_HEADER) else {
            return Ok(CallerRole(state.default_role));
        };
        let raw = value
            .to_str()
            .map_err(|_| AppError::BadRequest(format!("{} is not valid text", ROLE_HEADER)))?;
        raw.parse().map(CallerRole).map_err(AppError::BadRequest)
    }
}

fn require(
    CallerRole(role): CallerRole,
    flag: fn(&Permissions) -> bool,
    view: &str,
) -> Result<(), AppError> {
    if flag(&role.permissions()) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Role '{}' may not view {}",
            role, view
        )))
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the data source
/// is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let source = state.context.source();
    let database = match source.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        source: source.kind().to_string(),
        database,
        cache: state.context.cache().stats(),
    }))
}

// =============================================================================
// Market
// =============================================================================

/// GET /v1/market/hourly?date&province[&threshold]
pub async fn get_market_hourly(
    State(state): State<AppState>,
    role: CallerRole,
    Query(query): Query<MarketHourlyQuery>,
) -> HandlerResult<MarketHourlyData> {
    require(role, |p| p.view_market, "market data")?;
    Ok(Json(services::get_hourly(&state.context, &query).await?))
}

/// GET /v1/market/daily?from&to&province
pub async fn get_market_daily(
    State(state): State<AppState>,
    role: CallerRole,
    Query(query): Query<MarketDailyQuery>,
) -> HandlerResult<MarketDailyData> {
    require(role, |p| p.view_market, "market data")?;
    Ok(Json(services::get_daily(&state.context, &query).await?))
}

/// GET /v1/market/distribution?from&to&province[&field][&boundaries]
pub async fn get_market_distribution(
    State(state): State<AppState>,
    role: CallerRole,
    Query(query): Query<MarketDistributionQuery>,
) -> HandlerResult<MarketDistributionData> {
    require(role, |p| p.view_market, "market data")?;
    Ok(Json(services::get_distribution(&state.context, &query).await?))
}

// =============================================================================
// Settlements, contracts, customers
// =============================================================================

/// GET /v1/settlements?from&to[&province][&transaction_type]
pub async fn get_settlements(
    State(state): State<AppState>,
    role: CallerRole,
    Query(query): Query<SettlementQuery>,
) -> HandlerResult<SettlementData> {
    require(role, |p| p.view_settlements, "settlements")?;
    Ok(Json(services::get_settlements(&state.context, &query).await?))
}

/// GET /v1/contracts/summary[?province][&status]
pub async fn get_contract_summary(
    State(state): State<AppState>,
    role: CallerRole,
    Query(query): Query<ContractQuery>,
) -> HandlerResult<ContractSummaryData> {
    require(role, |p| p.view_contracts, "contracts")?;
    Ok(Json(services::get_contract_summary(&state.context, &query).await?))
}

/// GET /v1/customers/summary[?province][&category]
pub async fn get_customer_summary(
    State(state): State<AppState>,
    role: CallerRole,
    Query(query): Query<CustomerQuery>,
) -> HandlerResult<CustomerSummaryData> {
    require(role, |p| p.view_customers, "customers")?;
    Ok(Json(services::get_customer_summary(&state.context, &query).await?))
}

// =============================================================================
// Weather and plan execution
// =============================================================================

/// GET /v1/weather/hourly?date&province
pub async fn get_weather_hourly(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> HandlerResult<WeatherHourlyData> {
    Ok(Json(services::get_weather_hourly(&state.context, &query).await?))
}

/// GET /v1/plans/execution?date&province[&tolerance]
pub async fn get_plan_execution(
    State(state): State<AppState>,
    Query(query): Query<ExecutionQuery>,
) -> HandlerResult<ExecutionData> {
    Ok(Json(services::get_execution(&state.context, &query).await?))
}

// =============================================================================
// Roles
// =============================================================================

/// GET /v1/roles/{role}
pub async fn get_role(Path(role): Path<String>) -> HandlerResult<RoleData> {
    let role: Role = role.parse().map_err(AppError::NotFound)?;
    Ok(Json(RoleData::from(role)))
}
