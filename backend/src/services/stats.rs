use crate::api::SummaryStats;
use crate::services::policy::MissingValuePolicy;

/// Compute count, mean, median, population standard deviation, min, max,
/// spread and sum over the present values.
///
/// Absent values are resolved through `policy`. An empty input (or one where
/// every value is absent) yields all-zero statistics rather than `NaN`.
pub fn summarize<I>(values: I, policy: MissingValuePolicy) -> SummaryStats
where
    I: IntoIterator<Item = Option<f64>>,
{
    let present: Vec<f64> = values
        .into_iter()
        .filter_map(|v| policy.resolve(v))
        .collect();
    compute_stats(&present)
}

/// Statistics over values that are already known to be present and finite.
pub fn compute_stats(values: &[f64]) -> SummaryStats {
    if values.is_empty() {
        return SummaryStats::default();
    }

    let count = values.len();
    let sum: f64 = values.iter().sum();
    let mean = sum / count as f64;

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let median = if count % 2 == 0 {
        (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
    } else {
        sorted[count / 2]
    };

    let variance = values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / count as f64;
    let std_dev = variance.sqrt();

    let min = sorted.first().copied().unwrap_or(0.0);
    let max = sorted.last().copied().unwrap_or(0.0);

    SummaryStats {
        count,
        mean,
        median,
        std_dev,
        min,
        max,
        spread: max - min,
        sum,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_stats() {
        let stats = compute_stats(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_eq!(stats.count, 5);
        assert_eq!(stats.mean, 3.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
        assert_eq!(stats.spread, 4.0);
        assert_eq!(stats.sum, 15.0);
        assert!((stats.std_dev - std::f64::consts::SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn test_empty_summary_is_all_zero() {
        let stats = summarize(Vec::<Option<f64>>::new(), MissingValuePolicy::Skip);

        assert_eq!(stats, SummaryStats::default());
        assert_eq!(stats.count, 0);
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.std_dev, 0.0);
        assert!(!stats.mean.is_nan());
    }

    #[test]
    fn test_all_absent_is_all_zero() {
        let stats = summarize(vec![None, None, Some(f64::NAN)], MissingValuePolicy::Skip);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.max, 0.0);
    }

    #[test]
    fn test_absent_values_do_not_skew_mean() {
        let values = vec![Some(300.0), None, Some(320.0)];

        let skipped = summarize(values.clone(), MissingValuePolicy::Skip);
        assert_eq!(skipped.count, 2);
        assert_eq!(skipped.mean, 310.0);

        let zeroed = summarize(values, MissingValuePolicy::TreatAsZero);
        assert_eq!(zeroed.count, 3);
        assert!((zeroed.mean - 206.666_666).abs() < 1e-3);
        assert_eq!(zeroed.min, 0.0);
    }

    #[test]
    fn test_median_even() {
        let stats = compute_stats(&[8.0, 2.0, 6.0, 4.0]);
        assert_eq!(stats.median, 5.0);
    }

    #[test]
    fn test_single_value_has_zero_deviation() {
        let stats = compute_stats(&[42.0]);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.spread, 0.0);
        assert_eq!(stats.median, 42.0);
    }
}
