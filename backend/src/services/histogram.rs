//! Range bucketing for histogram-style distributions.

use crate::api::{Bucket, Histogram};
use crate::services::error::{AggregationError, AggregationResult};

/// Ordered, validated bucket boundaries `b0 < b1 < ... < bn`.
///
/// `n` boundaries describe `n - 1` half-open buckets `[b(i), b(i+1))`.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeBoundaries(Vec<f64>);

impl RangeBoundaries {
    pub fn new(boundaries: Vec<f64>) -> AggregationResult<Self> {
        if boundaries.len() < 2 {
            return Err(AggregationError::InvalidBoundaries(format!(
                "need at least 2 boundaries, got {}",
                boundaries.len()
            )));
        }
        if let Some(bad) = boundaries.iter().find(|b| !b.is_finite()) {
            return Err(AggregationError::InvalidBoundaries(format!(
                "boundary {} is not finite",
                bad
            )));
        }
        if let Some(pair) = boundaries.windows(2).find(|w| w[0] >= w[1]) {
            return Err(AggregationError::InvalidBoundaries(format!(
                "boundaries must be strictly ascending ({} >= {})",
                pair[0], pair[1]
            )));
        }
        Ok(Self(boundaries))
    }

    /// `bins` equal-width buckets spanning `[min, max)`.
    pub fn equal_width(min: f64, max: f64, bins: usize) -> AggregationResult<Self> {
        if bins == 0 {
            return Err(AggregationError::InvalidBoundaries(
                "bin count must be positive".to_string(),
            ));
        }
        let width = (max - min) / bins as f64;
        let mut boundaries: Vec<f64> = (0..bins).map(|i| min + width * i as f64).collect();
        boundaries.push(max);
        Self::new(boundaries)
    }

    /// Parse a comma-separated list such as `"0,200,400,600"`.
    pub fn parse(list: &str) -> AggregationResult<Self> {
        let boundaries = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<f64>().map_err(|_| {
                    AggregationError::InvalidBoundaries(format!("'{}' is not a number", s))
                })
            })
            .collect::<AggregationResult<Vec<f64>>>()?;
        Self::new(boundaries)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn bucket_count(&self) -> usize {
        self.0.len() - 1
    }

    pub fn first(&self) -> f64 {
        self.0[0]
    }

    pub fn last(&self) -> f64 {
        self.0[self.0.len() - 1]
    }

    /// Index of the bucket holding `value`, or `None` outside `[first, last)`.
    fn locate(&self, value: f64) -> Option<usize> {
        if value < self.first() || value >= self.last() {
            return None;
        }
        // Number of boundaries <= value, minus one, is the bucket index.
        let upper = self.0.partition_point(|b| *b <= value);
        Some(upper - 1)
    }
}

/// Count present values into the buckets described by `boundaries`.
///
/// Values equal to an inner boundary go to the upper bucket. Values below the
/// first boundary or at/above the last one are not counted; they are reported
/// in [`Histogram::dropped`] so the chart can show them separately. Absent and
/// non-finite values are neither counted nor dropped.
pub fn bucketize<I>(values: I, boundaries: &RangeBoundaries) -> Histogram
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut counts = vec![0usize; boundaries.bucket_count()];
    let mut dropped = 0usize;

    for value in values.into_iter().flatten().filter(|v| v.is_finite()) {
        match boundaries.locate(value) {
            Some(idx) => counts[idx] += 1,
            None => dropped += 1,
        }
    }

    let bounds = boundaries.as_slice();
    let buckets = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bucket {
            range: range_label(bounds[i], bounds[i + 1]),
            min: bounds[i],
            max: bounds[i + 1],
            count,
            percentage: None,
        })
        .collect::<Vec<_>>();

    Histogram {
        counted: buckets.iter().map(|b| b.count).sum(),
        buckets,
        dropped,
    }
}

impl Histogram {
    /// Fill each bucket's share of the counted values, in percent rounded to
    /// one decimal (half-up). All shares are zero for an empty histogram.
    pub fn with_percentages(mut self) -> Self {
        let total = self.counted;
        for bucket in &mut self.buckets {
            let share = if total == 0 {
                0.0
            } else {
                percent_of(bucket.count as f64, total as f64)
            };
            bucket.percentage = Some(share);
        }
        self
    }
}

/// `part / whole` in percent, rounded half-up to one decimal place.
///
/// The ratio is scaled to tenths of a percent before dividing, so shares such
/// as 23/80 land exactly on the half and round up. `whole` must be positive.
pub fn percent_of(part: f64, whole: f64) -> f64 {
    (part * 1000.0 / whole + 0.5).floor() / 10.0
}

fn range_label(min: f64, max: f64) -> String {
    format!("{}-{}", trim_number(min), trim_number(max))
}

fn trim_number(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tens() -> RangeBoundaries {
        RangeBoundaries::new(vec![0.0, 10.0, 20.0, 30.0, 40.0]).unwrap()
    }

    #[test]
    fn test_even_spread_is_quarter_each() {
        let values = [5.0, 15.0, 25.0, 35.0].map(Some);
        let hist = bucketize(values, &tens()).with_percentages();

        let counts: Vec<usize> = hist.buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 1, 1, 1]);
        for bucket in &hist.buckets {
            assert_eq!(bucket.percentage, Some(25.0));
        }
        assert_eq!(hist.counted, 4);
        assert_eq!(hist.dropped, 0);
        assert_eq!(hist.buckets[1].range, "10-20");
    }

    #[test]
    fn test_value_on_boundary_goes_to_upper_bucket() {
        let hist = bucketize([Some(10.0), Some(0.0)], &tens());
        assert_eq!(hist.buckets[0].count, 1);
        assert_eq!(hist.buckets[1].count, 1);
    }

    #[test]
    fn test_out_of_range_values_are_dropped() {
        let values = vec![Some(-1.0), Some(40.0), Some(99.0), Some(39.999), None, Some(f64::NAN)];
        let hist = bucketize(values, &tens());
        assert_eq!(hist.counted, 1);
        assert_eq!(hist.dropped, 3);
        assert_eq!(hist.buckets[3].count, 1);
    }

    #[test]
    fn test_exact_half_shares_round_up() {
        let values = std::iter::repeat(Some(5.0))
            .take(23)
            .chain(std::iter::repeat(Some(15.0)).take(57));
        let hist = bucketize(values, &tens()).with_percentages();
        assert_eq!(hist.buckets[0].percentage, Some(28.8));
        assert_eq!(hist.buckets[1].percentage, Some(71.3));
    }

    #[test]
    fn test_empty_histogram_percentages_are_zero() {
        let hist = bucketize(Vec::<Option<f64>>::new(), &tens()).with_percentages();
        assert_eq!(hist.buckets.len(), 4);
        assert!(hist.buckets.iter().all(|b| b.percentage == Some(0.0)));
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        // 1 of 3 -> 33.33..., 2 of 3 -> 66.66...
        let hist = bucketize([Some(1.0), Some(11.0), Some(12.0)], &tens()).with_percentages();
        assert_eq!(hist.buckets[0].percentage, Some(33.3));
        assert_eq!(hist.buckets[1].percentage, Some(66.7));
        assert_eq!(percent_of(49.0, 400.0), 12.3);
        assert_eq!(percent_of(1.0, 2000.0), 0.1);
        assert_eq!(percent_of(1.0, 3.0), 33.3);
        assert_eq!(percent_of(2.0, 3.0), 66.7);
    }

    #[test]
    fn test_boundaries_validation() {
        assert!(RangeBoundaries::new(vec![1.0]).is_err());
        assert!(RangeBoundaries::new(vec![0.0, 0.0]).is_err());
        assert!(RangeBoundaries::new(vec![10.0, 5.0]).is_err());
        assert!(RangeBoundaries::new(vec![0.0, f64::INFINITY]).is_err());
        assert!(RangeBoundaries::parse("0, 100,200").is_ok());
        assert!(RangeBoundaries::parse("0,abc").is_err());
    }

    #[test]
    fn test_equal_width() {
        let b = RangeBoundaries::equal_width(0.0, 100.0, 4).unwrap();
        assert_eq!(b.as_slice(), &[0.0, 25.0, 50.0, 75.0, 100.0]);
        assert!(RangeBoundaries::equal_width(0.0, 100.0, 0).is_err());
        assert!(RangeBoundaries::equal_width(5.0, 5.0, 2).is_err());
    }

    #[test]
    fn test_fractional_labels() {
        let b = RangeBoundaries::new(vec![0.5, 1.0, 1.5]).unwrap();
        let hist = bucketize(Vec::<Option<f64>>::new(), &b);
        assert_eq!(hist.buckets[0].range, "0.5-1");
        assert_eq!(hist.buckets[1].range, "1-1.5");
    }

    proptest! {
        #[test]
        fn prop_counts_partition_in_range_values(
            values in prop::collection::vec(-50.0f64..100.0, 0..300)
        ) {
            let boundaries = tens();
            let hist = bucketize(values.iter().copied().map(Some), &boundaries);
            let in_range = values.iter().filter(|v| **v >= 0.0 && **v < 40.0).count();
            prop_assert_eq!(hist.counted, in_range);
            prop_assert_eq!(hist.dropped, values.len() - in_range);
            for bucket in &hist.buckets {
                let expected = values.iter().filter(|v| **v >= bucket.min && **v < bucket.max).count();
                prop_assert_eq!(bucket.count, expected);
            }
        }

        #[test]
        fn prop_percent_matches_integer_half_up(
            (count, total) in (1u64..=2000).prop_flat_map(|t| (0..=t, Just(t)))
        ) {
            let tenths = (2000 * count + total) / (2 * total);
            prop_assert_eq!(percent_of(count as f64, total as f64), tenths as f64 / 10.0);
        }
    }
}
