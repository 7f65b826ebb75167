use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::services::error::AggregationError;

/// Number of hourly slots in a trading day.
pub const HOURS_PER_DAY: u8 = 24;
/// Number of 15-minute slots in a trading day.
pub const QUARTERS_PER_DAY: u8 = 96;

/// Hour-of-day slot (0–23).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HourSlot(u8);

impl HourSlot {
    /// Create a slot, rejecting values outside 0–23.
    pub fn new(hour: u8) -> Result<Self, AggregationError> {
        if hour < HOURS_PER_DAY {
            Ok(Self(hour))
        } else {
            Err(AggregationError::InvalidSlot {
                kind: "hour",
                value: hour as i64,
            })
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// All 24 slots of a day in order.
    pub fn all() -> impl Iterator<Item = HourSlot> {
        (0..HOURS_PER_DAY).map(HourSlot)
    }
}

impl TryFrom<u8> for HourSlot {
    type Error = AggregationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        HourSlot::new(value)
    }
}

impl From<HourSlot> for u8 {
    fn from(slot: HourSlot) -> Self {
        slot.0
    }
}

/// Quarter-hour slot of a day (0–95).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct QuarterSlot(u8);

impl QuarterSlot {
    /// Create a slot, rejecting values outside 0–95.
    pub fn new(quarter: u8) -> Result<Self, AggregationError> {
        if quarter < QUARTERS_PER_DAY {
            Ok(Self(quarter))
        } else {
            Err(AggregationError::InvalidSlot {
                kind: "quarter",
                value: quarter as i64,
            })
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Hour slot this quarter falls into.
    pub fn hour(&self) -> HourSlot {
        HourSlot(self.0 / 4)
    }

    /// Wall-clock label such as `"13:45"`.
    pub fn label(&self) -> String {
        format!("{:02}:{:02}", self.0 / 4, (self.0 % 4) * 15)
    }

    pub fn all() -> impl Iterator<Item = QuarterSlot> {
        (0..QUARTERS_PER_DAY).map(QuarterSlot)
    }
}

impl TryFrom<u8> for QuarterSlot {
    type Error = AggregationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        QuarterSlot::new(value)
    }
}

impl From<QuarterSlot> for u8 {
    fn from(slot: QuarterSlot) -> Self {
        slot.0
    }
}

/// Inclusive calendar date range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a range; `start` must not be after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, String> {
        if start > end {
            return Err(format!(
                "Date range start {} is after end {}",
                start, end
            ));
        }
        Ok(Self { start, end })
    }

    /// A range covering a single day.
    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of days in the range, both ends included.
    pub fn num_days(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }

    /// Iterate every date in the range in chronological order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        (0..self.num_days() as i64).map(move |offset| start + Duration::days(offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_hour_slot_bounds() {
        assert!(HourSlot::new(0).is_ok());
        assert!(HourSlot::new(23).is_ok());
        assert!(HourSlot::new(24).is_err());
        assert_eq!(HourSlot::all().count(), 24);
    }

    #[test]
    fn test_quarter_slot_bounds_and_label() {
        assert!(QuarterSlot::new(95).is_ok());
        assert!(QuarterSlot::new(96).is_err());
        let q = QuarterSlot::new(55).unwrap();
        assert_eq!(q.label(), "13:45");
        assert_eq!(q.hour().value(), 13);
        assert_eq!(QuarterSlot::all().count(), 96);
    }

    #[test]
    fn test_slot_deserialization_rejects_out_of_range() {
        assert!(serde_json::from_str::<HourSlot>("7").is_ok());
        assert!(serde_json::from_str::<HourSlot>("30").is_err());
    }

    #[test]
    fn test_date_range_days() {
        let range = DateRange::new(date("2024-02-27"), date("2024-03-01")).unwrap();
        let days: Vec<_> = range.days().collect();
        assert_eq!(days.len(), 4);
        assert_eq!(days[2], date("2024-02-29"));
        assert!(range.contains(date("2024-03-01")));
        assert!(!range.contains(date("2024-03-02")));
    }

    #[test]
    fn test_date_range_rejects_inverted() {
        assert!(DateRange::new(date("2024-03-02"), date("2024-03-01")).is_err());
        assert_eq!(DateRange::single(date("2024-03-01")).num_days(), 1);
    }
}
