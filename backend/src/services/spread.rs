//! Time-aligned join of two series with a directional classification.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::api::{Direction, SeriesKey, SeriesPoint, SpreadPoint};
use crate::services::error::{AggregationError, AggregationResult};
use crate::services::grouping::KeyDomain;

/// Price units of day-ahead/realtime spread considered flat.
pub const DEFAULT_SPREAD_THRESHOLD: f64 = 10.0;

/// Non-negative, finite tolerance around zero for [`Direction::Flat`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct SpreadThreshold(f64);

impl SpreadThreshold {
    pub fn new(value: f64) -> AggregationResult<Self> {
        if value.is_finite() && value >= 0.0 {
            Ok(Self(value))
        } else {
            Err(AggregationError::InvalidThreshold(value))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Classify a difference. The boundary is exclusive: exactly `±threshold`
    /// is [`Direction::Flat`].
    pub fn classify(&self, difference: f64) -> Direction {
        if difference > self.0 {
            Direction::Up
        } else if difference < -self.0 {
            Direction::Down
        } else {
            Direction::Flat
        }
    }
}

impl Default for SpreadThreshold {
    fn default() -> Self {
        Self(DEFAULT_SPREAD_THRESHOLD)
    }
}

impl TryFrom<f64> for SpreadThreshold {
    type Error = AggregationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        SpreadThreshold::new(value)
    }
}

impl From<SpreadThreshold> for f64 {
    fn from(t: SpreadThreshold) -> Self {
        t.0
    }
}

/// Join `primary` and `secondary` on every key of `domain`.
///
/// Each output point carries both values, `primary - secondary`, and its
/// direction. A key missing (or valued `None`) on either side produces
/// [`Direction::NoData`] with no difference; nothing is synthesized.
pub fn join_series(
    primary: &[SeriesPoint],
    secondary: &[SeriesPoint],
    domain: &KeyDomain,
    threshold: SpreadThreshold,
) -> Vec<SpreadPoint> {
    let primary = index_values(primary);
    let secondary = index_values(secondary);

    domain
        .keys()
        .into_iter()
        .map(|key| {
            let a = primary.get(&key).copied().flatten();
            let b = secondary.get(&key).copied().flatten();
            spread_point(key, a, b, threshold)
        })
        .collect()
}

/// Build one joined point from two optional values.
pub fn spread_point(
    key: SeriesKey,
    primary: Option<f64>,
    secondary: Option<f64>,
    threshold: SpreadThreshold,
) -> SpreadPoint {
    let difference = match (primary, secondary) {
        (Some(a), Some(b)) => Some(a - b),
        _ => None,
    };
    SpreadPoint {
        key,
        primary,
        secondary,
        difference,
        direction: difference.map_or(Direction::NoData, |d| threshold.classify(d)),
    }
}

fn index_values(points: &[SeriesPoint]) -> HashMap<&SeriesKey, Option<f64>> {
    points
        .iter()
        .map(|p| (&p.key, p.value.filter(|v| v.is_finite())))
        .collect()
}
