use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// =========================================================
// Chart-ready shapes shared by every view
// =========================================================

/// X-axis key of a plotted point.
///
/// Serialized untagged: hours and quarters are plain numbers, dates are ISO
/// strings, labels are strings. The wire form does not say which variant it
/// came from, so keys are write-only; a reader needs the chart's key domain.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum SeriesKey {
    Hour(u8),
    Quarter(u8),
    Date(NaiveDate),
    Label(String),
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesKey::Hour(h) => write!(f, "{:02}:00", h),
            SeriesKey::Quarter(q) => write!(f, "{:02}:{:02}", q / 4, (q % 4) * 15),
            SeriesKey::Date(d) => write!(f, "{}", d),
            SeriesKey::Label(l) => f.write_str(l),
        }
    }
}

/// One plotted observation. `value: None` means no data for this key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub key: SeriesKey,
    pub value: Option<f64>,
    /// Number of source observations behind `value`.
    pub count: usize,
    /// Lower envelope over the same observations.
    pub min: Option<f64>,
    /// Upper envelope over the same observations.
    pub max: Option<f64>,
}

impl SeriesPoint {
    /// Placeholder point for a key with no observations.
    pub fn no_data(key: SeriesKey) -> Self {
        Self {
            key,
            value: None,
            count: 0,
            min: None,
            max: None,
        }
    }

    /// Placeholder point for a key with no observations, plotted at zero.
    pub fn zero(key: SeriesKey) -> Self {
        Self {
            key,
            value: Some(0.0),
            count: 0,
            min: None,
            max: None,
        }
    }
}

/// Half-open histogram bucket `[min, max)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub range: String,
    pub min: f64,
    pub max: f64,
    pub count: usize,
    /// Share of all counted values, in percent with one decimal.
    pub percentage: Option<f64>,
}

/// Bucketed distribution of one numeric field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub buckets: Vec<Bucket>,
    /// Values that fell inside `[first_boundary, last_boundary)`.
    pub counted: usize,
    /// Present values outside the boundaries; dropped on purpose.
    pub dropped: usize,
}

/// Classification of the difference between two aligned series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Flat,
    NoData,
}

/// A point of a dual-series join, e.g. day-ahead against realtime price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpreadPoint {
    pub key: SeriesKey,
    pub primary: Option<f64>,
    pub secondary: Option<f64>,
    /// `primary - secondary` when both sides are present.
    pub difference: Option<f64>,
    pub direction: Direction,
}

/// Tally of the directions of a joined series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionCounts {
    pub up: usize,
    pub down: usize,
    pub flat: usize,
    pub no_data: usize,
}

impl DirectionCounts {
    pub fn tally(points: &[SpreadPoint]) -> Self {
        points.iter().fold(Self::default(), |mut acc, p| {
            match p.direction {
                Direction::Up => acc.up += 1,
                Direction::Down => acc.down += 1,
                Direction::Flat => acc.flat += 1,
                Direction::NoData => acc.no_data += 1,
            }
            acc
        })
    }

    /// Points that carry a difference.
    pub fn classified(&self) -> usize {
        self.up + self.down + self.flat
    }
}

/// Row count of one categorical value, e.g. a status or customer category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
    /// Share of all rows, in percent with one decimal.
    pub percentage: f64,
}

/// Descriptive statistics of one numeric field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// `max - min`.
    pub spread: f64,
    pub sum: f64,
}
