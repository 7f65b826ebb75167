//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;
use crate::routes::{contracts, customers, execution, market, roles, settlement, weather};

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Market
        .route(market::GET_MARKET_HOURLY, get(handlers::get_market_hourly))
        .route(market::GET_MARKET_DAILY, get(handlers::get_market_daily))
        .route(
            market::GET_MARKET_DISTRIBUTION,
            get(handlers::get_market_distribution),
        )
        // Back office
        .route(settlement::GET_SETTLEMENTS, get(handlers::get_settlements))
        .route(contracts::GET_CONTRACT_SUMMARY, get(handlers::get_contract_summary))
        .route(customers::GET_CUSTOMER_SUMMARY, get(handlers::get_customer_summary))
        // Operations
        .route(weather::GET_WEATHER_HOURLY, get(handlers::get_weather_hourly))
        .route(execution::GET_PLAN_EXECUTION, get(handlers::get_plan_execution))
        .route(roles::GET_ROLE, get(handlers::get_role));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(all(test, feature = "synthetic-source"))]
mod tests {
    use super::*;
    use crate::config::AggregationSettings;
    use crate::db::SyntheticSource;
    use crate::models::Role;
    use crate::services::{DataContext, SeriesCache, ViewSettings};
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let context = DataContext::new(
            Arc::new(SyntheticSource::default()),
            SeriesCache::disabled(),
            ViewSettings::from_settings(&AggregationSettings::default()).unwrap(),
        );
        let _router = create_router(AppState::new(context, Role::Viewer));
    }
}
