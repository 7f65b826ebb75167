use chrono::NaiveDate;
use diesel::prelude::*;

use super::schema::{contracts, customers, market_prices, power_plans, settlements, weather};
use crate::db::source::{ErrorContext, SourceError};
use crate::models::{
    ContractId, ContractRecord, CustomerId, CustomerRecord, HourSlot, MarketPrice, PlanId,
    PowerPlanRecord, QuarterSlot, SettlementId, SettlementRecord, WeatherRecord,
};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = market_prices)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)] // id is only used for ordering
pub struct MarketPriceRow {
    pub id: i64,
    pub trade_date: NaiveDate,
    pub hour: i16,
    pub province: String,
    pub day_ahead_price: Option<f64>,
    pub realtime_price: Option<f64>,
    pub cleared_volume_mwh: Option<f64>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = settlements)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SettlementRow {
    pub id: i64,
    pub settlement_date: NaiveDate,
    pub province: String,
    pub transaction_type: String,
    pub volume_mwh: Option<f64>,
    pub price: Option<f64>,
    pub amount: Option<f64>,
    pub status: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = contracts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ContractRow {
    pub id: i64,
    pub customer_id: i64,
    pub province: String,
    pub contract_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub contracted_volume_mwh: Option<f64>,
    pub price: Option<f64>,
    pub status: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = weather)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)] // id is only used for ordering
pub struct WeatherRow {
    pub id: i64,
    pub observed_date: NaiveDate,
    pub hour: i16,
    pub province: String,
    pub temperature_c: Option<f64>,
    pub wind_speed_ms: Option<f64>,
    pub irradiance_wm2: Option<f64>,
    pub load_forecast_mw: Option<f64>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CustomerRow {
    pub id: i64,
    pub name: String,
    pub province: String,
    pub category: String,
    pub annual_consumption_mwh: Option<f64>,
    pub active: bool,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = power_plans)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PowerPlanRow {
    pub id: i64,
    pub plan_date: NaiveDate,
    pub quarter: i16,
    pub province: String,
    pub planned_mw: Option<f64>,
    pub actual_mw: Option<f64>,
}

fn invalid(entity: &str, id: i64, message: String) -> SourceError {
    SourceError::Validation {
        message,
        context: ErrorContext::new("decode_row")
            .with_entity(entity)
            .with_entity_id(id),
    }
}

fn hour_slot(entity: &str, id: i64, raw: i16) -> Result<HourSlot, SourceError> {
    u8::try_from(raw)
        .ok()
        .and_then(|h| HourSlot::new(h).ok())
        .ok_or_else(|| invalid(entity, id, format!("hour {} outside 0-23", raw)))
}

impl TryFrom<MarketPriceRow> for MarketPrice {
    type Error = SourceError;

    fn try_from(row: MarketPriceRow) -> Result<Self, Self::Error> {
        Ok(MarketPrice {
            hour: hour_slot("market_prices", row.id, row.hour)?,
            trade_date: row.trade_date,
            province: row.province,
            day_ahead_price: row.day_ahead_price,
            realtime_price: row.realtime_price,
            cleared_volume_mwh: row.cleared_volume_mwh,
        })
    }
}

impl TryFrom<SettlementRow> for SettlementRecord {
    type Error = SourceError;

    fn try_from(row: SettlementRow) -> Result<Self, Self::Error> {
        Ok(SettlementRecord {
            transaction_type: row
                .transaction_type
                .parse()
                .map_err(|e| invalid("settlements", row.id, e))?,
            status: row
                .status
                .parse()
                .map_err(|e| invalid("settlements", row.id, e))?,
            id: SettlementId::new(row.id),
            settlement_date: row.settlement_date,
            province: row.province,
            volume_mwh: row.volume_mwh,
            price: row.price,
            amount: row.amount,
        })
    }
}

impl TryFrom<ContractRow> for ContractRecord {
    type Error = SourceError;

    fn try_from(row: ContractRow) -> Result<Self, Self::Error> {
        Ok(ContractRecord {
            status: row
                .status
                .parse()
                .map_err(|e| invalid("contracts", row.id, e))?,
            id: ContractId::new(row.id),
            customer_id: CustomerId::new(row.customer_id),
            province: row.province,
            contract_type: row.contract_type,
            start_date: row.start_date,
            end_date: row.end_date,
            contracted_volume_mwh: row.contracted_volume_mwh,
            price: row.price,
        })
    }
}

impl TryFrom<WeatherRow> for WeatherRecord {
    type Error = SourceError;

    fn try_from(row: WeatherRow) -> Result<Self, Self::Error> {
        Ok(WeatherRecord {
            hour: hour_slot("weather", row.id, row.hour)?,
            observed_date: row.observed_date,
            province: row.province,
            temperature_c: row.temperature_c,
            wind_speed_ms: row.wind_speed_ms,
            irradiance_wm2: row.irradiance_wm2,
            load_forecast_mw: row.load_forecast_mw,
        })
    }
}

impl From<CustomerRow> for CustomerRecord {
    fn from(row: CustomerRow) -> Self {
        CustomerRecord {
            id: CustomerId::new(row.id),
            name: row.name,
            province: row.province,
            category: row.category,
            annual_consumption_mwh: row.annual_consumption_mwh,
            active: row.active,
        }
    }
}

impl TryFrom<PowerPlanRow> for PowerPlanRecord {
    type Error = SourceError;

    fn try_from(row: PowerPlanRow) -> Result<Self, Self::Error> {
        let quarter = u8::try_from(row.quarter)
            .ok()
            .and_then(|q| QuarterSlot::new(q).ok())
            .ok_or_else(|| {
                invalid(
                    "power_plans",
                    row.id,
                    format!("quarter {} outside 0-95", row.quarter),
                )
            })?;
        Ok(PowerPlanRecord {
            id: PlanId::new(row.id),
            plan_date: row.plan_date,
            quarter,
            province: row.province,
            planned_mw: row.planned_mw,
            actual_mw: row.actual_mw,
        })
    }
}
