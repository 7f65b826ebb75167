//! Grouped aggregation of row-sets into chart series.
//!
//! [`group_by`] produces one [`GroupedPoint`] per distinct key with the sum,
//! mean, min and max of each requested field. [`align_to_domain`] then lays a
//! series onto a fixed key domain (24 hours, 96 quarters, every date of a
//! range) so that sparse data still yields one point per x-axis slot.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::api::{CategoryCount, SeriesKey, SeriesPoint};
use crate::models::{DateRange, HourSlot, QuarterSlot};
use crate::services::histogram::percent_of;
use crate::services::policy::{FillPolicy, MissingValuePolicy};

/// Named numeric accessor over a record type.
pub struct Field<R> {
    pub name: &'static str,
    pub get: fn(&R) -> Option<f64>,
}

impl<R> Field<R> {
    pub const fn new(name: &'static str, get: fn(&R) -> Option<f64>) -> Self {
        Self { name, get }
    }
}

impl<R> Clone for Field<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Field<R> {}

/// Aggregate of one field over the rows sharing a key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSummary {
    pub name: String,
    /// Number of present values.
    pub count: usize,
    pub sum: f64,
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// One group of the output of [`group_by`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedPoint<K> {
    pub key: K,
    /// Number of rows in the group, present values or not.
    pub rows: usize,
    pub fields: Vec<FieldSummary>,
}

/// Which aggregate of a [`FieldSummary`] to plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    Sum,
    Mean,
    Min,
    Max,
    Count,
}

#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    count: usize,
    sum: f64,
    min: Option<f64>,
    max: Option<f64>,
}

impl Accumulator {
    fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
    }

    fn finish(self, name: &str) -> FieldSummary {
        FieldSummary {
            name: name.to_string(),
            count: self.count,
            sum: self.sum,
            mean: if self.count > 0 {
                Some(self.sum / self.count as f64)
            } else {
                None
            },
            min: self.min,
            max: self.max,
        }
    }
}

/// Group `rows` by `key_fn` and aggregate every field per group.
///
/// The output has exactly one point per distinct key, sorted ascending by key.
/// Absent values are resolved through `policy`; with
/// [`MissingValuePolicy::Skip`] they do not enter count, sum, mean, min or max.
pub fn group_by<R, K, F>(
    rows: &[R],
    key_fn: F,
    fields: &[Field<R>],
    policy: MissingValuePolicy,
) -> Vec<GroupedPoint<K>>
where
    K: Ord,
    F: Fn(&R) -> K,
{
    let mut groups: BTreeMap<K, (usize, Vec<Accumulator>)> = BTreeMap::new();

    for row in rows {
        let entry = groups
            .entry(key_fn(row))
            .or_insert_with(|| (0, vec![Accumulator::default(); fields.len()]));
        entry.0 += 1;
        for (acc, field) in entry.1.iter_mut().zip(fields) {
            if let Some(value) = policy.resolve((field.get)(row)) {
                acc.push(value);
            }
        }
    }

    groups
        .into_iter()
        .map(|(key, (rows, accs))| GroupedPoint {
            key,
            rows,
            fields: accs
                .into_iter()
                .zip(fields)
                .map(|(acc, field)| acc.finish(field.name))
                .collect(),
        })
        .collect()
}

impl<K> GroupedPoint<K> {
    pub fn field(&self, name: &str) -> Option<&FieldSummary> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl<K: Clone + Into<SeriesKey>> GroupedPoint<K> {
    /// Project one field of this group into a plotted point.
    ///
    /// Returns `None` when the field was not aggregated.
    pub fn to_series_point(&self, field: &str, measure: Measure) -> Option<SeriesPoint> {
        let summary = self.field(field)?;
        let value = match measure {
            Measure::Count => Some(summary.count as f64),
            Measure::Sum if summary.count > 0 => Some(summary.sum),
            Measure::Sum => None,
            Measure::Mean => summary.mean,
            Measure::Min => summary.min,
            Measure::Max => summary.max,
        };
        Some(SeriesPoint {
            key: self.key.clone().into(),
            value,
            count: summary.count,
            min: summary.min,
            max: summary.max,
        })
    }
}

/// Project one field of every group, skipping groups without that field.
pub fn project<K>(groups: &[GroupedPoint<K>], field: &str, measure: Measure) -> Vec<SeriesPoint>
where
    K: Clone + Into<SeriesKey>,
{
    groups
        .iter()
        .filter_map(|g| g.to_series_point(field, measure))
        .collect()
}

/// Group and project a single field in one call.
pub fn series<R, K, F>(
    rows: &[R],
    key_fn: F,
    field: Field<R>,
    measure: Measure,
    policy: MissingValuePolicy,
) -> Vec<SeriesPoint>
where
    K: Ord + Clone + Into<SeriesKey>,
    F: Fn(&R) -> K,
{
    project(&group_by(rows, key_fn, &[field], policy), field.name, measure)
}

/// Fixed x-axis domain a chart is drawn over.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyDomain {
    Hours,
    Quarters,
    Dates(DateRange),
    Labels(Vec<String>),
}

impl KeyDomain {
    pub fn keys(&self) -> Vec<SeriesKey> {
        match self {
            KeyDomain::Hours => HourSlot::all().map(SeriesKey::from).collect(),
            KeyDomain::Quarters => QuarterSlot::all().map(SeriesKey::from).collect(),
            KeyDomain::Dates(range) => range.days().map(SeriesKey::Date).collect(),
            KeyDomain::Labels(labels) => labels.iter().cloned().map(SeriesKey::Label).collect(),
        }
    }
}

/// Lay `points` onto `domain`, one output point per domain key in domain
/// order. Keys without a point are filled according to `fill`; points whose
/// key is outside the domain are discarded.
pub fn align_to_domain(
    points: Vec<SeriesPoint>,
    domain: &KeyDomain,
    fill: FillPolicy,
) -> Vec<SeriesPoint> {
    let mut by_key: HashMap<SeriesKey, SeriesPoint> =
        points.into_iter().map(|p| (p.key.clone(), p)).collect();

    domain
        .keys()
        .into_iter()
        .map(|key| match by_key.remove(&key) {
            Some(point) => point,
            None => match fill {
                FillPolicy::NoData => SeriesPoint::no_data(key),
                FillPolicy::Zero => SeriesPoint::zero(key),
            },
        })
        .collect()
}

/// Count rows per categorical label.
///
/// `known` labels come first, in the given order and with zero counts kept;
/// labels outside `known` follow in ascending order.
pub fn count_labels<'a, I>(known: &[&str], labels: I) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut total = 0usize;
    for label in labels {
        *counts.entry(label).or_default() += 1;
        total += 1;
    }

    let share = |count: usize| {
        if total == 0 {
            0.0
        } else {
            percent_of(count as f64, total as f64)
        }
    };

    let mut out: Vec<CategoryCount> = known
        .iter()
        .map(|label| {
            let count = counts.remove(label).unwrap_or(0);
            CategoryCount {
                label: label.to_string(),
                count,
                percentage: share(count),
            }
        })
        .collect();
    out.extend(counts.into_iter().map(|(label, count)| CategoryCount {
        label: label.to_string(),
        count,
        percentage: share(count),
    }));
    out
}

impl From<HourSlot> for SeriesKey {
    fn from(slot: HourSlot) -> Self {
        SeriesKey::Hour(slot.value())
    }
}

impl From<QuarterSlot> for SeriesKey {
    fn from(slot: QuarterSlot) -> Self {
        SeriesKey::Quarter(slot.value())
    }
}

impl From<NaiveDate> for SeriesKey {
    fn from(date: NaiveDate) -> Self {
        SeriesKey::Date(date)
    }
}

impl From<String> for SeriesKey {
    fn from(label: String) -> Self {
        SeriesKey::Label(label)
    }
}

impl From<&str> for SeriesKey {
    fn from(label: &str) -> Self {
        SeriesKey::Label(label.to_string())
    }
}

#[cfg(test)]
#[path = "grouping_tests.rs"]
mod grouping_tests;
