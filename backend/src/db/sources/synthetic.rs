//! Seeded in-memory data source.
//!
//! Generates every dashboard table from a [`SyntheticSettings`] seed so that
//! development servers, demos and tests see plausible, reproducible data. A
//! configurable share of numeric observations is left absent to exercise the
//! missing-value handling of the aggregation layer.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;
use tracing::{debug, info};

use crate::config::SyntheticSettings;
use crate::db::filters::{self, Filterable, RowFilter};
use crate::db::source::{DataSource, SourceKind, SourceResult};
use crate::models::{
    ContractId, ContractRecord, ContractStatus, CustomerId, CustomerRecord, HourSlot, MarketPrice,
    PlanId, PowerPlanRecord, QuarterSlot, SettlementId, SettlementRecord, SettlementStatus,
    TransactionType, WeatherRecord,
};

const CUSTOMER_CATEGORIES: [&str; 3] = ["industrial", "commercial", "residential"];
const CONTRACT_TYPES: [&str; 3] = ["annual", "monthly", "spot"];

/// All tables held by a [`SyntheticSource`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyntheticTables {
    pub market_prices: Vec<MarketPrice>,
    pub settlements: Vec<SettlementRecord>,
    pub contracts: Vec<ContractRecord>,
    pub weather: Vec<WeatherRecord>,
    pub customers: Vec<CustomerRecord>,
    pub power_plans: Vec<PowerPlanRecord>,
}

/// In-memory source over generated or injected tables.
#[derive(Debug, Clone, Default)]
pub struct SyntheticSource {
    tables: SyntheticTables,
}

impl SyntheticSource {
    /// Generate all tables deterministically from `settings.seed`.
    pub fn generate(settings: &SyntheticSettings) -> Self {
        let mut generator = Generator::new(settings);
        let tables = generator.build();
        info!(
            "Generated synthetic tables: market_prices={}, settlements={}, contracts={}, weather={}, customers={}, power_plans={}",
            tables.market_prices.len(),
            tables.settlements.len(),
            tables.contracts.len(),
            tables.weather.len(),
            tables.customers.len(),
            tables.power_plans.len()
        );
        Self { tables }
    }

    /// Serve fixed rows instead of generated ones.
    pub fn with_tables(tables: SyntheticTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &SyntheticTables {
        &self.tables
    }

    fn select<R>(table: &'static str, rows: &[R], filter: &RowFilter) -> Vec<R>
    where
        R: Filterable + Clone,
    {
        let selected = filters::apply(rows, filter);
        debug!(table, ?filter, rows = selected.len(), "synthetic fetch");
        selected
    }
}

#[async_trait]
impl DataSource for SyntheticSource {
    async fn health_check(&self) -> SourceResult<bool> {
        Ok(true)
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Synthetic
    }

    async fn fetch_market_prices(&self, filter: &RowFilter) -> SourceResult<Vec<MarketPrice>> {
        Ok(Self::select("market_prices", &self.tables.market_prices, filter))
    }

    async fn fetch_settlements(&self, filter: &RowFilter) -> SourceResult<Vec<SettlementRecord>> {
        Ok(Self::select("settlements", &self.tables.settlements, filter))
    }

    async fn fetch_contracts(&self, filter: &RowFilter) -> SourceResult<Vec<ContractRecord>> {
        Ok(Self::select("contracts", &self.tables.contracts, filter))
    }

    async fn fetch_weather(&self, filter: &RowFilter) -> SourceResult<Vec<WeatherRecord>> {
        Ok(Self::select("weather", &self.tables.weather, filter))
    }

    async fn fetch_customers(&self, filter: &RowFilter) -> SourceResult<Vec<CustomerRecord>> {
        Ok(Self::select("customers", &self.tables.customers, filter))
    }

    async fn fetch_power_plans(&self, filter: &RowFilter) -> SourceResult<Vec<PowerPlanRecord>> {
        Ok(Self::select("power_plans", &self.tables.power_plans, filter))
    }
}

struct Generator<'a> {
    settings: &'a SyntheticSettings,
    rng: StdRng,
    missing_ratio: f64,
}

impl<'a> Generator<'a> {
    fn new(settings: &'a SyntheticSettings) -> Self {
        Self {
            settings,
            rng: StdRng::seed_from_u64(settings.seed),
            missing_ratio: settings.missing_ratio.clamp(0.0, 1.0),
        }
    }

    fn build(&mut self) -> SyntheticTables {
        let customers = self.customers();
        let contracts = self.contracts(&customers);
        SyntheticTables {
            market_prices: self.market_prices(),
            settlements: self.settlements(),
            contracts,
            weather: self.weather(),
            customers,
            power_plans: self.power_plans(),
        }
    }

    fn dates(&self) -> Vec<NaiveDate> {
        let start = self.settings.start_date;
        (0..self.settings.days as i64)
            .map(|d| start + Duration::days(d))
            .collect()
    }

    /// Rounded observation, or `None` with probability `missing_ratio`.
    fn observe(&mut self, value: f64) -> Option<f64> {
        if self.rng.gen_bool(self.missing_ratio) {
            None
        } else {
            Some((value * 100.0).round() / 100.0)
        }
    }

    fn noise(&mut self, amplitude: f64) -> f64 {
        if amplitude <= 0.0 {
            return 0.0;
        }
        self.rng.gen_range(-amplitude..amplitude)
    }

    fn pick<'b>(&mut self, choices: &'b [&'b str]) -> &'b str {
        choices[self.rng.gen_range(0..choices.len())]
    }

    fn province_base(index: usize) -> f64 {
        320.0 + 35.0 * index as f64
    }

    fn market_prices(&mut self) -> Vec<MarketPrice> {
        let provinces = self.settings.provinces.clone();
        let mut rows = Vec::new();
        for date in self.dates() {
            for (p, province) in provinces.iter().enumerate() {
                let base = Self::province_base(p);
                for hour in HourSlot::all() {
                    let h = hour.value() as f64;
                    // Evening peak around 19:00, trough before dawn.
                    let shape = (2.0 * PI * (h - 13.0) / 24.0).sin();
                    let day_ahead = base + 110.0 * shape + self.noise(15.0);
                    let realtime = day_ahead + self.noise(40.0);
                    let volume = 900.0 + 350.0 * shape + self.noise(60.0);
                    rows.push(MarketPrice {
                        trade_date: date,
                        hour,
                        province: province.clone(),
                        day_ahead_price: self.observe(day_ahead),
                        realtime_price: self.observe(realtime),
                        cleared_volume_mwh: self.observe(volume.max(0.0)),
                    });
                }
            }
        }
        rows
    }

    fn settlements(&mut self) -> Vec<SettlementRecord> {
        let provinces = self.settings.provinces.clone();
        let mut rows = Vec::new();
        let mut next_id = 1;
        for date in self.dates() {
            for (p, province) in provinces.iter().enumerate() {
                for transaction_type in TransactionType::ALL {
                    let (volume_scale, premium) = match transaction_type {
                        TransactionType::MediumLongTerm => (12_000.0, 0.0),
                        TransactionType::DayAhead => (4_000.0, 15.0),
                        TransactionType::Realtime => (1_200.0, 30.0),
                    };
                    let raw_volume = volume_scale * self.rng.gen_range(0.7..1.3);
                    let raw_price = Self::province_base(p) + premium + self.noise(25.0);
                    let volume = self.observe(raw_volume);
                    let price = self.observe(raw_price);
                    let amount = match (volume, price) {
                        (Some(v), Some(pr)) => Some((v * pr * 100.0).round() / 100.0),
                        _ => None,
                    };
                    let roll: f64 = self.rng.gen();
                    let status = if roll < 0.8 {
                        SettlementStatus::Confirmed
                    } else if roll < 0.95 {
                        SettlementStatus::Pending
                    } else {
                        SettlementStatus::Disputed
                    };
                    rows.push(SettlementRecord {
                        id: SettlementId::new(next_id),
                        settlement_date: date,
                        province: province.clone(),
                        transaction_type,
                        volume_mwh: volume,
                        price,
                        amount,
                        status,
                    });
                    next_id += 1;
                }
            }
        }
        rows
    }

    fn customers(&mut self) -> Vec<CustomerRecord> {
        let provinces = self.settings.provinces.clone();
        (1..=self.settings.customers as i64)
            .map(|id| {
                let category = self.pick(&CUSTOMER_CATEGORIES).to_string();
                let consumption = match category.as_str() {
                    "industrial" => self.rng.gen_range(50_000.0..400_000.0),
                    "commercial" => self.rng.gen_range(5_000.0..60_000.0),
                    _ => self.rng.gen_range(500.0..8_000.0),
                };
                CustomerRecord {
                    id: CustomerId::new(id),
                    name: format!("Customer {:03}", id),
                    province: provinces[self.rng.gen_range(0..provinces.len())].clone(),
                    category,
                    annual_consumption_mwh: self.observe(consumption),
                    active: self.rng.gen_bool(0.85),
                }
            })
            .collect()
    }

    fn contracts(&mut self, customers: &[CustomerRecord]) -> Vec<ContractRecord> {
        if customers.is_empty() {
            return Vec::new();
        }
        let start = self.settings.start_date;
        let days = self.settings.days as i64;
        (1..=self.settings.contracts as i64)
            .map(|id| {
                let customer = &customers[self.rng.gen_range(0..customers.len())];
                let contract_type = self.pick(&CONTRACT_TYPES).to_string();
                let length = match contract_type.as_str() {
                    "annual" => 365,
                    "monthly" => 30,
                    _ => self.rng.gen_range(1..15),
                };
                let start_date = start + Duration::days(self.rng.gen_range(-length..days.max(1)));
                let end_date = start_date + Duration::days(length - 1);
                let status = match self.rng.gen_range(0..10) {
                    0 => ContractStatus::Draft,
                    1 => ContractStatus::Terminated,
                    _ if end_date < start => ContractStatus::Expired,
                    _ => ContractStatus::Active,
                };
                let volume = customer.annual_consumption_mwh.unwrap_or(10_000.0)
                    * length as f64
                    / 365.0
                    * self.rng.gen_range(0.5..1.0);
                let price = self.rng.gen_range(300.0..560.0);
                ContractRecord {
                    id: ContractId::new(id),
                    customer_id: customer.id,
                    province: customer.province.clone(),
                    contract_type,
                    start_date,
                    end_date,
                    contracted_volume_mwh: self.observe(volume),
                    price: self.observe(price),
                    status,
                }
            })
            .collect()
    }

    fn weather(&mut self) -> Vec<WeatherRecord> {
        let provinces = self.settings.provinces.clone();
        let mut rows = Vec::new();
        for date in self.dates() {
            for (p, province) in provinces.iter().enumerate() {
                let climate = 12.0 + 3.0 * p as f64;
                for hour in HourSlot::all() {
                    let h = hour.value() as f64;
                    let temperature = climate + 7.0 * (2.0 * PI * (h - 9.0) / 24.0).sin();
                    let daylight = (PI * (h - 6.0) / 12.0).sin().max(0.0);
                    let load = 30_000.0 + 8_000.0 * (2.0 * PI * (h - 13.0) / 24.0).sin();
                    let temperature = temperature + self.noise(1.5);
                    let wind = self.rng.gen_range(0.0..12.0);
                    let irradiance = 950.0 * daylight * self.rng.gen_range(0.6..1.0);
                    let load = load + self.noise(900.0);
                    rows.push(WeatherRecord {
                        observed_date: date,
                        hour,
                        province: province.clone(),
                        temperature_c: self.observe(temperature),
                        wind_speed_ms: self.observe(wind),
                        irradiance_wm2: self.observe(irradiance),
                        load_forecast_mw: self.observe(load),
                    });
                }
            }
        }
        rows
    }

    fn power_plans(&mut self) -> Vec<PowerPlanRecord> {
        let provinces = self.settings.provinces.clone();
        let mut rows = Vec::new();
        let mut next_id = 1;
        for date in self.dates() {
            for province in &provinces {
                for quarter in QuarterSlot::all() {
                    let h = quarter.value() as f64 / 4.0;
                    let planned = 520.0 + 180.0 * (2.0 * PI * (h - 13.0) / 24.0).sin();
                    let actual = planned + self.noise(25.0);
                    rows.push(PowerPlanRecord {
                        id: PlanId::new(next_id),
                        plan_date: date,
                        quarter,
                        province: province.clone(),
                        planned_mw: self.observe(planned),
                        actual_mw: self.observe(actual),
                    });
                    next_id += 1;
                }
            }
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DateRange;

    fn settings() -> SyntheticSettings {
        SyntheticSettings {
            seed: 11,
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            days: 2,
            provinces: vec!["Guangdong".to_string(), "Shandong".to_string()],
            missing_ratio: 0.0,
            customers: 10,
            contracts: 12,
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = SyntheticSource::generate(&settings());
        let b = SyntheticSource::generate(&settings());
        assert_eq!(a.tables(), b.tables());

        let mut other = settings();
        other.seed = 12;
        let c = SyntheticSource::generate(&other);
        assert_ne!(a.tables().market_prices, c.tables().market_prices);
    }

    #[test]
    fn test_table_sizes() {
        let source = SyntheticSource::generate(&settings());
        let tables = source.tables();
        assert_eq!(tables.market_prices.len(), 2 * 2 * 24);
        assert_eq!(tables.weather.len(), 2 * 2 * 24);
        assert_eq!(tables.power_plans.len(), 2 * 2 * 96);
        assert_eq!(tables.settlements.len(), 2 * 2 * 3);
        assert_eq!(tables.customers.len(), 10);
        assert_eq!(tables.contracts.len(), 12);
        assert!(tables
            .contracts
            .iter()
            .all(|c| c.start_date <= c.end_date));
    }

    #[test]
    fn test_zero_missing_ratio_fills_every_value() {
        let source = SyntheticSource::generate(&settings());
        assert!(source
            .tables()
            .market_prices
            .iter()
            .all(|r| r.day_ahead_price.is_some() && r.realtime_price.is_some()));
    }

    #[test]
    fn test_full_missing_ratio_leaves_values_absent() {
        let mut s = settings();
        s.missing_ratio = 1.0;
        let source = SyntheticSource::generate(&s);
        assert!(source
            .tables()
            .power_plans
            .iter()
            .all(|r| r.planned_mw.is_none() && r.actual_mw.is_none()));
        assert!(source.tables().settlements.iter().all(|r| r.amount.is_none()));
    }

    #[tokio::test]
    async fn test_fetch_applies_filter() {
        let source = SyntheticSource::generate(&settings());
        let day = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();

        let rows = source
            .fetch_market_prices(&RowFilter::new().on(day).province("shandong"))
            .await
            .unwrap();
        assert_eq!(rows.len(), 24);
        assert!(rows.iter().all(|r| r.trade_date == day && r.province == "Shandong"));

        let range = DateRange::new(day, day + Duration::days(10)).unwrap();
        let dayahead = source
            .fetch_settlements(&RowFilter::new().between(range).category("day_ahead"))
            .await
            .unwrap();
        assert_eq!(dayahead.len(), 2);
        assert!(dayahead
            .iter()
            .all(|r| r.transaction_type == TransactionType::DayAhead));
    }

    #[tokio::test]
    async fn test_with_tables_serves_fixtures() {
        let source = SyntheticSource::with_tables(SyntheticTables::default());
        assert!(source.health_check().await.unwrap());
        assert_eq!(source.kind(), SourceKind::Synthetic);
        assert!(source
            .fetch_customers(&RowFilter::new())
            .await
            .unwrap()
            .is_empty());
    }
}
