//! Dashboard configuration file support.
//!
//! Settings are read from a TOML file (see `dashboard.toml` for every key),
//! then selectively overridden from the environment. A missing file is not an
//! error; every section has defaults.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::db::source::SourceKind;
use crate::models::Role;
use crate::services::histogram::RangeBoundaries;
use crate::services::policy::{FillPolicy, MissingValuePolicy};
use crate::services::spread::{SpreadThreshold, DEFAULT_SPREAD_THRESHOLD};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "DASHBOARD_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete dashboard configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub source: SourceSettings,
    pub synthetic: SyntheticSettings,
    pub postgres: PostgresSettings,
    pub aggregation: AggregationSettings,
    pub cache: CacheSettings,
    pub server: ServerSettings,
}

/// Data source selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// `"synthetic"` or `"live"`. When unset, a configured database URL
    /// selects the live source.
    pub kind: Option<String>,
}

/// Seeded generator parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticSettings {
    pub seed: u64,
    pub start_date: NaiveDate,
    pub days: u32,
    pub provinces: Vec<String>,
    /// Share of numeric observations left absent, in `[0, 1]`.
    pub missing_ratio: f64,
    pub customers: usize,
    pub contracts: usize,
}

impl Default for SyntheticSettings {
    fn default() -> Self {
        Self {
            seed: 42,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            days: 30,
            provinces: ["Guangdong", "Shandong", "Zhejiang", "Jiangsu"]
                .iter()
                .map(|p| p.to_string())
                .collect(),
            missing_ratio: 0.02,
            customers: 40,
            contracts: 60,
        }
    }
}

/// Postgres connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostgresSettings {
    pub database_url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: u64,
    pub idle_timeout: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

impl Default for PostgresSettings {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: 30,
            idle_timeout: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

/// Aggregation policies and chart parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationSettings {
    pub missing_values: MissingValuePolicy,
    pub fill_missing: FillPolicy,
    /// Day-ahead/realtime spread treated as flat, in price units.
    pub spread_threshold: f64,
    /// Planned/actual deviation treated as on-plan, in MW.
    pub execution_tolerance_mw: f64,
    /// Default price histogram boundaries.
    pub price_boundaries: Vec<f64>,
    /// Default contract price histogram boundaries.
    pub contract_price_boundaries: Vec<f64>,
}

impl Default for AggregationSettings {
    fn default() -> Self {
        Self {
            missing_values: MissingValuePolicy::Skip,
            fill_missing: FillPolicy::NoData,
            spread_threshold: DEFAULT_SPREAD_THRESHOLD,
            execution_tolerance_mw: 5.0,
            price_boundaries: (0..=10).map(|i| i as f64 * 100.0).collect(),
            contract_price_boundaries: vec![0.0, 300.0, 350.0, 400.0, 450.0, 500.0, 600.0],
        }
    }
}

impl AggregationSettings {
    pub fn spread_threshold(&self) -> Result<SpreadThreshold, ConfigError> {
        SpreadThreshold::new(self.spread_threshold)
            .map_err(|e| ConfigError::Invalid(format!("aggregation.spread_threshold: {}", e)))
    }

    pub fn execution_tolerance(&self) -> Result<SpreadThreshold, ConfigError> {
        SpreadThreshold::new(self.execution_tolerance_mw).map_err(|e| {
            ConfigError::Invalid(format!("aggregation.execution_tolerance_mw: {}", e))
        })
    }

    pub fn price_boundaries(&self) -> Result<RangeBoundaries, ConfigError> {
        RangeBoundaries::new(self.price_boundaries.clone())
            .map_err(|e| ConfigError::Invalid(format!("aggregation.price_boundaries: {}", e)))
    }

    pub fn contract_price_boundaries(&self) -> Result<RangeBoundaries, ConfigError> {
        RangeBoundaries::new(self.contract_price_boundaries.clone()).map_err(|e| {
            ConfigError::Invalid(format!("aggregation.contract_price_boundaries: {}", e))
        })
    }
}

/// Session-scoped series cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub enabled: bool,
    pub max_entries: usize,
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 256,
            ttl_secs: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Role assumed when a request carries no role header.
    pub default_role: Role,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            default_role: Role::Viewer,
        }
    }
}

impl DashboardConfig {
    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Locate the configuration file.
    ///
    /// Uses `DASHBOARD_CONFIG` when set, otherwise searches:
    /// 1. `dashboard.toml`
    /// 2. `backend/dashboard.toml`
    /// 3. `../dashboard.toml`
    pub fn find_file(env: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
        if let Some(path) = env(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }
        [
            "dashboard.toml",
            "backend/dashboard.toml",
            "../dashboard.toml",
        ]
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
    }

    /// Load from the standard location, apply environment overrides and
    /// validate. Falls back to defaults when no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// [`DashboardConfig::load`] with an explicit environment lookup.
    pub fn load_with(env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = match Self::find_file(&env) {
            Some(path) => {
                tracing::info!("Loading dashboard configuration from {}", path.display());
                Self::from_file(path)?
            }
            None => {
                tracing::info!("No dashboard.toml found, using defaults");
                Self::default()
            }
        };
        config.apply_env_overrides(&env)?;
        config.validate()?;
        Ok(config)
    }

    /// Override file settings from environment variables.
    ///
    /// - `SOURCE_KIND`: `synthetic` | `live`
    /// - `DATABASE_URL` or `PG_DATABASE_URL`
    /// - `PG_POOL_MAX`, `PG_POOL_MIN`, `PG_CONN_TIMEOUT_SEC`,
    ///   `PG_IDLE_TIMEOUT_SEC`, `PG_MAX_RETRIES`, `PG_RETRY_DELAY_MS`
    /// - `HOST`, `PORT`
    pub fn apply_env_overrides(
        &mut self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(kind) = env("SOURCE_KIND") {
            self.source.kind = Some(kind);
        }
        if let Some(url) = env("DATABASE_URL").or_else(|| env("PG_DATABASE_URL")) {
            self.postgres.database_url = url;
        }

        let pg = &mut self.postgres;
        override_parsed(&env, "PG_POOL_MAX", &mut pg.max_connections)?;
        override_parsed(&env, "PG_POOL_MIN", &mut pg.min_connections)?;
        override_parsed(&env, "PG_CONN_TIMEOUT_SEC", &mut pg.connect_timeout)?;
        override_parsed(&env, "PG_IDLE_TIMEOUT_SEC", &mut pg.idle_timeout)?;
        override_parsed(&env, "PG_MAX_RETRIES", &mut pg.max_retries)?;
        override_parsed(&env, "PG_RETRY_DELAY_MS", &mut pg.retry_delay_ms)?;

        if let Some(host) = env("HOST") {
            self.server.host = host;
        }
        override_parsed(&env, "PORT", &mut self.server.port)?;
        Ok(())
    }

    /// Resolve which data source to build.
    pub fn source_kind(&self) -> Result<SourceKind, ConfigError> {
        match &self.source.kind {
            Some(kind) => kind
                .parse()
                .map_err(|e: String| ConfigError::Invalid(format!("source.kind: {}", e))),
            None if !self.postgres.database_url.is_empty() => Ok(SourceKind::Live),
            None => Ok(SourceKind::Synthetic),
        }
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let kind = self.source_kind()?;
        if kind == SourceKind::Live && self.postgres.database_url.is_empty() {
            return Err(ConfigError::Invalid(
                "live source requires 'postgres.database_url' or DATABASE_URL".to_string(),
            ));
        }

        let synthetic = &self.synthetic;
        if !(0.0..=1.0).contains(&synthetic.missing_ratio) {
            return Err(ConfigError::Invalid(format!(
                "synthetic.missing_ratio must be within [0, 1], got {}",
                synthetic.missing_ratio
            )));
        }
        if synthetic.days == 0 || synthetic.provinces.is_empty() {
            return Err(ConfigError::Invalid(
                "synthetic source needs at least one day and one province".to_string(),
            ));
        }

        self.aggregation.spread_threshold()?;
        self.aggregation.execution_tolerance()?;
        self.aggregation.price_boundaries()?;
        self.aggregation.contract_price_boundaries()?;

        if self.cache.enabled && self.cache.max_entries == 0 {
            return Err(ConfigError::Invalid(
                "cache.max_entries must be positive when the cache is enabled".to_string(),
            ));
        }
        Ok(())
    }
}

fn override_parsed<T: std::str::FromStr>(
    env: impl Fn(&str) -> Option<String>,
    key: &str,
    target: &mut T,
) -> Result<(), ConfigError> {
    if let Some(raw) = env(key) {
        *target = raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("{} has an invalid value '{}'", key, raw)))?;
    }
    Ok(())
}
