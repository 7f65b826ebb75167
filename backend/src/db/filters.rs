//! Row filters shared by every data source.
//!
//! A [`RowFilter`] combines equality predicates (province, category, status)
//! with a date or date-range predicate. Unset fields match everything.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{
    ContractRecord, CustomerRecord, DateRange, MarketPrice, PowerPlanRecord, SettlementRecord,
    WeatherRecord,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowFilter {
    /// Exact date. Takes precedence over `range` when both are set.
    pub date: Option<NaiveDate>,
    pub range: Option<DateRange>,
    pub province: Option<String>,
    /// Transaction type for settlements, contract type for contracts,
    /// customer category for customers.
    pub category: Option<String>,
    pub status: Option<String>,
}

impl RowFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn between(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn province(mut self, province: impl Into<String>) -> Self {
        self.province = Some(province.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Effective date window, if any.
    pub fn window(&self) -> Option<DateRange> {
        self.date.map(DateRange::single).or(self.range)
    }

    pub fn matches_date(&self, date: NaiveDate) -> bool {
        self.window().map_or(true, |w| w.contains(date))
    }

    /// Contracts match when their validity interval overlaps the window.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.window()
            .map_or(true, |w| start <= w.end && end >= w.start)
    }

    pub fn matches_province(&self, province: &str) -> bool {
        eq_ignore_case(self.province.as_deref(), province)
    }

    pub fn matches_category(&self, category: &str) -> bool {
        eq_ignore_case(self.category.as_deref(), category)
    }

    pub fn matches_status(&self, status: &str) -> bool {
        eq_ignore_case(self.status.as_deref(), status)
    }
}

fn eq_ignore_case(wanted: Option<&str>, actual: &str) -> bool {
    wanted.map_or(true, |w| w.eq_ignore_ascii_case(actual))
}

/// Records that can be tested against a [`RowFilter`] in memory.
pub trait Filterable {
    fn matches(&self, filter: &RowFilter) -> bool;
}

impl Filterable for MarketPrice {
    fn matches(&self, filter: &RowFilter) -> bool {
        filter.matches_date(self.trade_date) && filter.matches_province(&self.province)
    }
}

impl Filterable for SettlementRecord {
    fn matches(&self, filter: &RowFilter) -> bool {
        filter.matches_date(self.settlement_date)
            && filter.matches_province(&self.province)
            && filter.matches_category(self.transaction_type.as_str())
            && filter.matches_status(self.status.as_str())
    }
}

impl Filterable for ContractRecord {
    fn matches(&self, filter: &RowFilter) -> bool {
        filter.overlaps(self.start_date, self.end_date)
            && filter.matches_province(&self.province)
            && filter.matches_category(&self.contract_type)
            && filter.matches_status(self.status.as_str())
    }
}

impl Filterable for WeatherRecord {
    fn matches(&self, filter: &RowFilter) -> bool {
        filter.matches_date(self.observed_date) && filter.matches_province(&self.province)
    }
}

impl Filterable for CustomerRecord {
    fn matches(&self, filter: &RowFilter) -> bool {
        filter.matches_province(&self.province) && filter.matches_category(&self.category)
    }
}

impl Filterable for PowerPlanRecord {
    fn matches(&self, filter: &RowFilter) -> bool {
        filter.matches_date(self.plan_date) && filter.matches_province(&self.province)
    }
}

/// Keep the rows of `rows` matching `filter`, preserving order.
pub fn apply<R: Filterable + Clone>(rows: &[R], filter: &RowFilter) -> Vec<R> {
    rows.iter().filter(|r| r.matches(filter)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContractId, ContractStatus, CustomerId};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn contract(start: &str, end: &str) -> ContractRecord {
        ContractRecord {
            id: ContractId::new(1),
            customer_id: CustomerId::new(1),
            province: "Guangdong".to_string(),
            contract_type: "annual".to_string(),
            start_date: date(start),
            end_date: date(end),
            contracted_volume_mwh: Some(100.0),
            price: Some(400.0),
            status: ContractStatus::Active,
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = RowFilter::new();
        assert!(filter.matches_date(date("1999-01-01")));
        assert!(filter.matches_province("anything"));
        assert!(contract("2024-01-01", "2024-12-31").matches(&filter));
    }

    #[test]
    fn test_date_takes_precedence_over_range() {
        let range = DateRange::new(date("2024-01-01"), date("2024-01-31")).unwrap();
        let filter = RowFilter::new().between(range).on(date("2024-02-10"));
        assert!(filter.matches_date(date("2024-02-10")));
        assert!(!filter.matches_date(date("2024-01-15")));
    }

    #[test]
    fn test_province_is_case_insensitive() {
        let filter = RowFilter::new().province("guangdong");
        assert!(contract("2024-01-01", "2024-12-31").matches(&filter));
        assert!(!RowFilter::new().province("shandong").matches_province("Guangdong"));
    }

    #[test]
    fn test_contract_overlap() {
        let range = DateRange::new(date("2024-06-01"), date("2024-06-30")).unwrap();
        let filter = RowFilter::new().between(range);
        assert!(contract("2024-01-01", "2024-06-01").matches(&filter));
        assert!(contract("2024-06-30", "2025-01-01").matches(&filter));
        assert!(!contract("2024-01-01", "2024-05-31").matches(&filter));
        assert!(!contract("2024-07-01", "2024-12-31").matches(&filter));
    }

    #[test]
    fn test_status_filter() {
        let filter = RowFilter::new().status("expired");
        assert!(!contract("2024-01-01", "2024-12-31").matches(&filter));
        assert!(contract("2024-01-01", "2024-12-31").matches(&RowFilter::new().status("active")));
    }
}
