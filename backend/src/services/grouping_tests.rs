#[cfg(test)]
mod tests {
    use crate::api::{SeriesKey, SeriesPoint};
    use crate::models::{DateRange, HourSlot};
    use crate::services::grouping::{
        align_to_domain, count_labels, group_by, series, Field, KeyDomain, Measure,
    };
    use crate::services::policy::{FillPolicy, MissingValuePolicy};
    use chrono::NaiveDate;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    struct Row {
        hour: u8,
        price: Option<f64>,
        volume: Option<f64>,
    }

    fn row(hour: u8, price: Option<f64>) -> Row {
        Row {
            hour,
            price,
            volume: None,
        }
    }

    const PRICE: Field<Row> = Field::new("price", |r| r.price);
    const VOLUME: Field<Row> = Field::new("volume", |r| r.volume);

    fn slot(h: u8) -> HourSlot {
        HourSlot::new(h).unwrap()
    }

    #[test]
    fn test_group_by_hour_mean_and_count() {
        let rows = vec![
            row(0, Some(300.0)),
            row(0, Some(320.0)),
            row(1, Some(310.0)),
        ];

        let grouped = group_by(&rows, |r| slot(r.hour), &[PRICE], MissingValuePolicy::Skip);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].key, slot(0));
        assert_eq!(grouped[0].fields[0].mean, Some(310.0));
        assert_eq!(grouped[0].fields[0].count, 2);
        assert_eq!(grouped[0].fields[0].sum, 620.0);
        assert_eq!(grouped[0].fields[0].min, Some(300.0));
        assert_eq!(grouped[0].fields[0].max, Some(320.0));
        assert_eq!(grouped[1].key, slot(1));
        assert_eq!(grouped[1].fields[0].mean, Some(310.0));
        assert_eq!(grouped[1].fields[0].count, 1);
    }

    #[test]
    fn test_group_by_empty_rows() {
        let rows: Vec<Row> = vec![];
        let grouped = group_by(&rows, |r| r.hour, &[PRICE], MissingValuePolicy::Skip);
        assert!(grouped.is_empty());
    }

    #[test]
    fn test_group_by_sorts_keys() {
        let rows = vec![row(5, Some(1.0)), row(2, Some(1.0)), row(9, Some(1.0))];
        let grouped = group_by(&rows, |r| r.hour, &[PRICE], MissingValuePolicy::Skip);
        let keys: Vec<u8> = grouped.iter().map(|g| g.key).collect();
        assert_eq!(keys, vec![2, 5, 9]);
    }

    #[test]
    fn test_group_by_labels_sort_lexicographically() {
        let rows = vec!["zhejiang", "guangdong", "shandong"];
        let field = Field::new("one", |_: &&str| Some(1.0));
        let grouped = group_by(&rows, |r| r.to_string(), &[field], MissingValuePolicy::Skip);
        let keys: Vec<&str> = grouped.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["guangdong", "shandong", "zhejiang"]);
    }

    #[test]
    fn test_absent_values_are_skipped_not_zeroed() {
        let rows = vec![row(0, Some(300.0)), row(0, None), row(0, Some(320.0))];

        let grouped = group_by(&rows, |r| r.hour, &[PRICE], MissingValuePolicy::Skip);
        let price = grouped[0].field("price").unwrap();
        assert_eq!(grouped[0].rows, 3);
        assert_eq!(price.count, 2);
        assert_eq!(price.mean, Some(310.0));
        assert_eq!(price.min, Some(300.0));

        let zeroed = group_by(&rows, |r| r.hour, &[PRICE], MissingValuePolicy::TreatAsZero);
        let price = zeroed[0].field("price").unwrap();
        assert_eq!(price.count, 3);
        assert_eq!(price.min, Some(0.0));
    }

    #[test]
    fn test_all_absent_field_has_no_mean() {
        let rows = vec![row(3, Some(10.0)), row(3, Some(20.0))];
        let grouped = group_by(
            &rows,
            |r| r.hour,
            &[PRICE, VOLUME],
            MissingValuePolicy::Skip,
        );

        let volume = grouped[0].field("volume").unwrap();
        assert_eq!(volume.count, 0);
        assert_eq!(volume.sum, 0.0);
        assert_eq!(volume.mean, None);
        assert_eq!(volume.min, None);
        assert_eq!(volume.max, None);
        assert_eq!(grouped[0].field("price").unwrap().mean, Some(15.0));
    }

    #[test]
    fn test_to_series_point_measures() {
        let rows = vec![row(4, Some(2.0)), row(4, Some(6.0))];
        let grouped = group_by(&rows, |r| slot(r.hour), &[PRICE], MissingValuePolicy::Skip);
        let g = &grouped[0];

        let mean = g.to_series_point("price", Measure::Mean).unwrap();
        assert_eq!(mean.key, SeriesKey::Hour(4));
        assert_eq!(mean.value, Some(4.0));
        assert_eq!(mean.min, Some(2.0));
        assert_eq!(mean.max, Some(6.0));

        assert_eq!(g.to_series_point("price", Measure::Sum).unwrap().value, Some(8.0));
        assert_eq!(g.to_series_point("price", Measure::Count).unwrap().value, Some(2.0));
        assert_eq!(g.to_series_point("price", Measure::Max).unwrap().value, Some(6.0));
        assert!(g.to_series_point("unknown", Measure::Mean).is_none());
    }

    #[test]
    fn test_sum_of_nothing_is_no_data() {
        let rows = vec![row(4, None)];
        let points = series(&rows, |r| slot(r.hour), PRICE, Measure::Sum, MissingValuePolicy::Skip);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].value, None);
        assert_eq!(points[0].count, 0);
    }

    #[test]
    fn test_align_fills_missing_hours() {
        let rows = vec![row(0, Some(300.0)), row(23, Some(280.0))];
        let points = series(&rows, |r| slot(r.hour), PRICE, Measure::Mean, MissingValuePolicy::Skip);

        let aligned = align_to_domain(points.clone(), &KeyDomain::Hours, FillPolicy::NoData);
        assert_eq!(aligned.len(), 24);
        assert_eq!(aligned[0].value, Some(300.0));
        assert_eq!(aligned[1], SeriesPoint::no_data(SeriesKey::Hour(1)));
        assert_eq!(aligned[23].value, Some(280.0));

        let zeroed = align_to_domain(points, &KeyDomain::Hours, FillPolicy::Zero);
        assert_eq!(zeroed[12].value, Some(0.0));
        assert_eq!(zeroed[12].count, 0);
    }

    #[test]
    fn test_align_dates_drops_out_of_range_keys() {
        let d = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        let range = DateRange::new(d("2024-03-01"), d("2024-03-03")).unwrap();
        let points = vec![
            SeriesPoint {
                key: SeriesKey::Date(d("2024-03-02")),
                value: Some(5.0),
                count: 1,
                min: Some(5.0),
                max: Some(5.0),
            },
            SeriesPoint {
                key: SeriesKey::Date(d("2024-04-01")),
                value: Some(9.0),
                count: 1,
                min: Some(9.0),
                max: Some(9.0),
            },
        ];

        let aligned = align_to_domain(points, &KeyDomain::Dates(range), FillPolicy::NoData);
        let keys: Vec<String> = aligned.iter().map(|p| p.key.to_string()).collect();
        assert_eq!(keys, vec!["2024-03-01", "2024-03-02", "2024-03-03"]);
        assert_eq!(aligned[1].value, Some(5.0));
        assert_eq!(aligned[0].value, None);
    }

    #[test]
    fn test_quarter_domain_has_96_keys() {
        assert_eq!(KeyDomain::Quarters.keys().len(), 96);
        assert_eq!(KeyDomain::Quarters.keys()[95], SeriesKey::Quarter(95));
    }

    fn arb_rows() -> impl Strategy<Value = Vec<Row>> {
        prop::collection::vec(
            (0u8..24, prop::option::of(-500.0f64..1500.0)).prop_map(|(h, p)| row(h, p)),
            0..200,
        )
    }

    #[test]
    fn test_count_labels_keeps_known_order_and_zeros() {
        let labels = ["active", "draft", "active", "active", "legacy"];
        let counts = count_labels(&["draft", "active", "expired"], labels.iter().copied());

        let names: Vec<_> = counts.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(names, vec!["draft", "active", "expired", "legacy"]);
        assert_eq!(counts[0].count, 1);
        assert_eq!(counts[1].count, 3);
        assert_eq!(counts[1].percentage, 60.0);
        assert_eq!(counts[2].count, 0);
        assert_eq!(counts[2].percentage, 0.0);
        assert_eq!(counts[3].count, 1);
    }

    #[test]
    fn test_count_labels_half_share_rounds_up() {
        let labels = std::iter::repeat("confirmed")
            .take(23)
            .chain(std::iter::repeat("pending").take(57));
        let counts = count_labels(&["confirmed", "pending"], labels);
        assert_eq!(counts[0].percentage, 28.8);
        assert_eq!(counts[1].percentage, 71.3);
    }

    #[test]
    fn test_count_labels_empty() {
        let counts = count_labels(&["a", "b"], std::iter::empty());
        assert_eq!(counts.len(), 2);
        assert!(counts.iter().all(|c| c.count == 0 && c.percentage == 0.0));
    }

    proptest! {
        #[test]
        fn prop_one_point_per_distinct_key(rows in arb_rows()) {
            let grouped = group_by(&rows, |r| r.hour, &[PRICE], MissingValuePolicy::Skip);
            let mut distinct: Vec<u8> = rows.iter().map(|r| r.hour).collect();
            distinct.sort_unstable();
            distinct.dedup();
            prop_assert_eq!(grouped.len(), distinct.len());
            let total: usize = grouped.iter().map(|g| g.rows).sum();
            prop_assert_eq!(total, rows.len());
        }

        #[test]
        fn prop_grouping_is_idempotent(rows in arb_rows()) {
            let first = group_by(&rows, |r| r.hour, &[PRICE], MissingValuePolicy::Skip);
            let second = group_by(&rows, |r| r.hour, &[PRICE], MissingValuePolicy::Skip);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_mean_within_envelope(rows in arb_rows()) {
            for g in group_by(&rows, |r| r.hour, &[PRICE], MissingValuePolicy::Skip) {
                let f = &g.fields[0];
                if let (Some(mean), Some(min), Some(max)) = (f.mean, f.min, f.max) {
                    prop_assert!(min <= mean + 1e-9 && mean <= max + 1e-9);
                }
            }
        }
    }
}
