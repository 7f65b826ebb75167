//! PostgreSQL data source using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry with exponential backoff for transient failures
//! - Pool and query statistics
//! - Embedded migrations creating the six dashboard tables
//!
//! ## Configuration
//!
//! Built from the `[postgres]` section of `dashboard.toml`; the
//! `DATABASE_URL` and `PG_*` environment variables override it (see
//! [`crate::config::DashboardConfig::apply_env_overrides`]).

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task;
use tracing::{debug, warn};

use crate::config::PostgresSettings;
use crate::db::filters::RowFilter;
use crate::db::source::{DataSource, ErrorContext, SourceError, SourceKind, SourceResult};
use crate::models::{
    ContractRecord, CustomerRecord, MarketPrice, PowerPlanRecord, SettlementRecord, WeatherRecord,
};

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/sources/live/migrations");

/// Connection parameters for the live source.
#[derive(Debug, Clone)]
pub struct LiveConfig {
    pub database_url: String,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub connection_timeout_sec: u64,
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl From<&PostgresSettings> for LiveConfig {
    fn from(settings: &PostgresSettings) -> Self {
        Self {
            database_url: settings.database_url.clone(),
            max_pool_size: settings.max_connections,
            min_pool_size: settings.min_connections,
            connection_timeout_sec: settings.connect_timeout,
            idle_timeout_sec: settings.idle_timeout,
            max_retries: settings.max_retries,
            retry_delay_ms: settings.retry_delay_ms,
        }
    }
}

/// Pool health statistics.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct PoolStats {
    pub connections_in_use: u32,
    pub idle_connections: u32,
    pub total_connections: u32,
    pub max_size: u32,
    pub total_queries: u64,
    pub failed_queries: u64,
    pub retried_operations: u64,
}

/// Diesel-backed source over the dashboard tables.
#[derive(Clone, Debug)]
pub struct LiveSource {
    pool: PgPool,
    config: LiveConfig,
    total_queries: Arc<AtomicU64>,
    failed_queries: Arc<AtomicU64>,
    retried_operations: Arc<AtomicU64>,
}

impl LiveSource {
    /// Build the pool and run pending migrations.
    pub fn new(config: LiveConfig) -> SourceResult<Self> {
        if config.database_url.is_empty() {
            return Err(SourceError::configuration(
                "Live source requires a database URL",
            ));
        }

        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                SourceError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        {
            let mut conn = pool.get().map_err(|e| {
                SourceError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        Ok(Self {
            pool,
            config,
            total_queries: Arc::new(AtomicU64::new(0)),
            failed_queries: Arc::new(AtomicU64::new(0)),
            retried_operations: Arc::new(AtomicU64::new(0)),
        })
    }

    fn run_migrations(conn: &mut PgConnection) -> SourceResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            SourceError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;
        Ok(())
    }

    /// Run `f` on a pooled connection in a blocking task, retrying
    /// retryable failures up to `max_retries` times with doubling delays.
    async fn with_conn<T, F>(&self, operation: &'static str, f: F) -> SourceResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> SourceResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;
        let total_queries = self.total_queries.clone();
        let failed_queries = self.failed_queries.clone();
        let retried_operations = self.retried_operations.clone();

        task::spawn_blocking(move || {
            let mut last_error = None;
            let mut retry_delay = Duration::from_millis(retry_delay_ms);

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    retried_operations.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        operation,
                        attempt,
                        delay_ms = retry_delay.as_millis() as u64,
                        "retrying live source operation"
                    );
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2;
                }

                let mut conn = match pool.get() {
                    Ok(c) => c,
                    Err(e) => {
                        let err = SourceError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new(operation)
                                .with_details(format!("attempt={}", attempt + 1)),
                        );
                        if attempt < max_retries {
                            last_error = Some(err);
                            continue;
                        }
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(err);
                    }
                };

                total_queries.fetch_add(1, Ordering::Relaxed);
                match f.clone()(&mut conn) {
                    Ok(result) => return Ok(result),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        last_error = Some(e);
                        continue;
                    }
                    Err(e) => {
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(e.with_operation(operation));
                    }
                }
            }

            failed_queries.fetch_add(1, Ordering::Relaxed);
            Err(last_error.unwrap_or_else(|| {
                SourceError::internal("Max retries exceeded with no error captured")
            }))
        })
        .await
        .map_err(|e| {
            SourceError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }

    pub fn pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            total_connections: state.connections,
            max_size: self.config.max_pool_size,
            total_queries: self.total_queries.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
            retried_operations: self.retried_operations.load(Ordering::Relaxed),
        }
    }

    /// Returns (is_healthy, latency_ms, error_message).
    pub async fn health_check_detailed(&self) -> (bool, Option<u64>, Option<String>) {
        let start = Instant::now();
        match self.health_check().await {
            Ok(true) => (true, Some(start.elapsed().as_millis() as u64), None),
            Ok(false) => (
                false,
                Some(start.elapsed().as_millis() as u64),
                Some("Health check returned false".to_string()),
            ),
            Err(e) => (
                false,
                Some(start.elapsed().as_millis() as u64),
                Some(e.to_string()),
            ),
        }
    }
}

fn decode<R, T>(table: &'static str, rows: Vec<R>) -> SourceResult<Vec<T>>
where
    T: TryFrom<R, Error = SourceError>,
{
    let decoded = rows
        .into_iter()
        .map(T::try_from)
        .collect::<SourceResult<Vec<T>>>()?;
    debug!(table, rows = decoded.len(), "live fetch");
    Ok(decoded)
}

#[async_trait]
impl DataSource for LiveSource {
    async fn health_check(&self) -> SourceResult<bool> {
        self.with_conn("health_check", |conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(SourceError::from)
        })
        .await
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Live
    }

    async fn fetch_market_prices(&self, filter: &RowFilter) -> SourceResult<Vec<MarketPrice>> {
        let filter = filter.clone();
        self.with_conn("fetch_market_prices", move |conn| {
            let mut query = market_prices::table.into_boxed();
            if let Some(window) = filter.window() {
                query = query.filter(market_prices::trade_date.between(window.start, window.end));
            }
            if let Some(ref province) = filter.province {
                query = query.filter(market_prices::province.ilike(province.clone()));
            }
            let rows = query
                .order((market_prices::trade_date.asc(), market_prices::hour.asc()))
                .select(MarketPriceRow::as_select())
                .load(conn)?;
            decode("market_prices", rows)
        })
        .await
    }

    async fn fetch_settlements(&self, filter: &RowFilter) -> SourceResult<Vec<SettlementRecord>> {
        let filter = filter.clone();
        self.with_conn("fetch_settlements", move |conn| {
            let mut query = settlements::table.into_boxed();
            if let Some(window) = filter.window() {
                query =
                    query.filter(settlements::settlement_date.between(window.start, window.end));
            }
            if let Some(ref province) = filter.province {
                query = query.filter(settlements::province.ilike(province.clone()));
            }
            if let Some(ref category) = filter.category {
                query = query.filter(settlements::transaction_type.ilike(category.clone()));
            }
            if let Some(ref status) = filter.status {
                query = query.filter(settlements::status.ilike(status.clone()));
            }
            let rows = query
                .order(settlements::id.asc())
                .select(SettlementRow::as_select())
                .load(conn)?;
            decode("settlements", rows)
        })
        .await
    }

    async fn fetch_contracts(&self, filter: &RowFilter) -> SourceResult<Vec<ContractRecord>> {
        let filter = filter.clone();
        self.with_conn("fetch_contracts", move |conn| {
            let mut query = contracts::table.into_boxed();
            if let Some(window) = filter.window() {
                query = query
                    .filter(contracts::start_date.le(window.end))
                    .filter(contracts::end_date.ge(window.start));
            }
            if let Some(ref province) = filter.province {
                query = query.filter(contracts::province.ilike(province.clone()));
            }
            if let Some(ref category) = filter.category {
                query = query.filter(contracts::contract_type.ilike(category.clone()));
            }
            if let Some(ref status) = filter.status {
                query = query.filter(contracts::status.ilike(status.clone()));
            }
            let rows = query
                .order(contracts::id.asc())
                .select(ContractRow::as_select())
                .load(conn)?;
            decode("contracts", rows)
        })
        .await
    }

    async fn fetch_weather(&self, filter: &RowFilter) -> SourceResult<Vec<WeatherRecord>> {
        let filter = filter.clone();
        self.with_conn("fetch_weather", move |conn| {
            let mut query = weather::table.into_boxed();
            if let Some(window) = filter.window() {
                query = query.filter(weather::observed_date.between(window.start, window.end));
            }
            if let Some(ref province) = filter.province {
                query = query.filter(weather::province.ilike(province.clone()));
            }
            let rows = query
                .order((weather::observed_date.asc(), weather::hour.asc()))
                .select(WeatherRow::as_select())
                .load(conn)?;
            decode("weather", rows)
        })
        .await
    }

    async fn fetch_customers(&self, filter: &RowFilter) -> SourceResult<Vec<CustomerRecord>> {
        let filter = filter.clone();
        self.with_conn("fetch_customers", move |conn| {
            let mut query = customers::table.into_boxed();
            if let Some(ref province) = filter.province {
                query = query.filter(customers::province.ilike(province.clone()));
            }
            if let Some(ref category) = filter.category {
                query = query.filter(customers::category.ilike(category.clone()));
            }
            let rows = query
                .order(customers::id.asc())
                .select(CustomerRow::as_select())
                .load(conn)?;
            let records: Vec<CustomerRecord> = rows.into_iter().map(Into::into).collect();
            debug!(table = "customers", rows = records.len(), "live fetch");
            Ok(records)
        })
        .await
    }

    async fn fetch_power_plans(&self, filter: &RowFilter) -> SourceResult<Vec<PowerPlanRecord>> {
        let filter = filter.clone();
        self.with_conn("fetch_power_plans", move |conn| {
            let mut query = power_plans::table.into_boxed();
            if let Some(window) = filter.window() {
                query = query.filter(power_plans::plan_date.between(window.start, window.end));
            }
            if let Some(ref province) = filter.province {
                query = query.filter(power_plans::province.ilike(province.clone()));
            }
            let rows = query
                .order((power_plans::plan_date.asc(), power_plans::quarter.asc()))
                .select(PowerPlanRow::as_select())
                .load(conn)?;
            decode("power_plans", rows)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_config_from_settings() {
        let settings = PostgresSettings {
            database_url: "postgres://u:p@localhost/power".to_string(),
            max_connections: 20,
            retry_delay_ms: 250,
            ..Default::default()
        };
        let config = LiveConfig::from(&settings);
        assert_eq!(config.database_url, "postgres://u:p@localhost/power");
        assert_eq!(config.max_pool_size, 20);
        assert_eq!(config.min_pool_size, 1);
        assert_eq!(config.retry_delay_ms, 250);
    }

    #[test]
    fn test_empty_url_is_configuration_error() {
        let config = LiveConfig::from(&PostgresSettings::default());
        let err = LiveSource::new(config).unwrap_err();
        assert!(matches!(err, SourceError::Configuration { .. }));
    }
}
