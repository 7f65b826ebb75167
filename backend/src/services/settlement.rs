//! Settlement view: daily series, per-type totals and status breakdown.

use crate::api::{SettlementData, SettlementQuery};
use crate::db::RowFilter;
use crate::models::{DateRange, SettlementRecord, SettlementStatus, TransactionType};
use crate::services::context::{date_window, DataContext, ViewSettings};
use crate::services::error::{ViewError, ViewResult};
use crate::services::grouping::{
    align_to_domain, count_labels, group_by, project, Field, KeyDomain, Measure,
};

const VOLUME: &str = "volume_mwh";
const AMOUNT: &str = "amount";
const PRICE: &str = "price";

fn settlement_fields() -> [Field<SettlementRecord>; 3] {
    [
        Field::new(VOLUME, |r: &SettlementRecord| r.volume_mwh),
        Field::new(AMOUNT, |r: &SettlementRecord| r.amount),
        Field::new(PRICE, |r: &SettlementRecord| r.price),
    ]
}

pub fn compute_settlements(
    rows: &[SettlementRecord],
    range: DateRange,
    settings: &ViewSettings,
) -> SettlementData {
    let policy = settings.missing_values;
    let fill = settings.fill_missing;
    let fields = settlement_fields();

    let daily = group_by(rows, |r| r.settlement_date, &fields, policy);
    let dates = KeyDomain::Dates(range);

    let by_type = group_by(rows, |r| r.transaction_type.as_str(), &fields, policy);
    let types = KeyDomain::Labels(
        TransactionType::ALL
            .iter()
            .map(|t| t.as_str().to_string())
            .collect(),
    );

    let statuses = SettlementStatus::ALL.map(|s| s.as_str());
    let by_status = count_labels(&statuses, rows.iter().map(|r| r.status.as_str()));

    let total_volume_mwh: f64 = rows.iter().filter_map(|r| policy.resolve(r.volume_mwh)).sum();
    let total_amount: f64 = rows.iter().filter_map(|r| policy.resolve(r.amount)).sum();

    SettlementData {
        range,
        rows: rows.len(),
        volume: align_to_domain(project(&daily, VOLUME, Measure::Sum), &dates, fill),
        amount: align_to_domain(project(&daily, AMOUNT, Measure::Sum), &dates, fill),
        price: align_to_domain(project(&daily, PRICE, Measure::Mean), &dates, fill),
        volume_by_type: align_to_domain(project(&by_type, VOLUME, Measure::Sum), &types, fill),
        amount_by_type: align_to_domain(project(&by_type, AMOUNT, Measure::Sum), &types, fill),
        by_status,
        total_volume_mwh,
        total_amount,
        weighted_price: weighted_price(rows),
    }
}

/// Amount over volume across rows where both are present.
fn weighted_price(rows: &[SettlementRecord]) -> Option<f64> {
    let (amount, volume) = rows
        .iter()
        .filter_map(|r| match (r.amount, r.volume_mwh) {
            (Some(a), Some(v)) if a.is_finite() && v.is_finite() => Some((a, v)),
            _ => None,
        })
        .fold((0.0, 0.0), |(sa, sv), (a, v)| (sa + a, sv + v));
    if volume > 0.0 {
        Some(amount / volume)
    } else {
        None
    }
}

pub async fn get_settlements(
    ctx: &DataContext,
    query: &SettlementQuery,
) -> ViewResult<SettlementData> {
    let range = date_window(query.from, query.to)?;

    ctx.cached("settlements", query, || async {
        let mut filter = RowFilter::new().between(range);
        if let Some(province) = &query.province {
            filter = filter.province(province.as_str());
        }
        if let Some(kind) = query.transaction_type {
            filter = filter.category(kind.as_str());
        }
        let rows = ctx.source().fetch_settlements(&filter).await?;
        Ok::<_, ViewError>(compute_settlements(&rows, range, ctx.settings()))
    })
    .await
}

#[cfg(all(test, feature = "synthetic-source"))]
mod tests {
    use super::*;
    use crate::config::AggregationSettings;
    use crate::db::{SyntheticSource, SyntheticTables};
    use crate::models::SettlementId;
    use crate::services::cache::SeriesCache;
    use crate::services::policy::MissingValuePolicy;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn record(
        id: i64,
        day: u32,
        kind: TransactionType,
        volume: Option<f64>,
        price: Option<f64>,
        status: SettlementStatus,
    ) -> SettlementRecord {
        SettlementRecord {
            id: SettlementId::new(id),
            settlement_date: date(day),
            province: "Zhejiang".to_string(),
            transaction_type: kind,
            volume_mwh: volume,
            price,
            amount: volume.zip(price).map(|(v, p)| v * p),
            status,
        }
    }

    fn fixture() -> Vec<SettlementRecord> {
        vec![
            record(1, 1, TransactionType::DayAhead, Some(100.0), Some(400.0), SettlementStatus::Confirmed),
            record(2, 1, TransactionType::Realtime, Some(50.0), Some(420.0), SettlementStatus::Pending),
            record(3, 2, TransactionType::DayAhead, None, Some(380.0), SettlementStatus::Confirmed),
            record(4, 2, TransactionType::MediumLongTerm, Some(200.0), Some(350.0), SettlementStatus::Disputed),
        ]
    }

    fn settings() -> ViewSettings {
        ViewSettings::from_settings(&AggregationSettings::default()).unwrap()
    }

    #[test]
    fn test_daily_series_cover_the_window() {
        let range = DateRange::new(date(1), date(3)).unwrap();
        let data = compute_settlements(&fixture(), range, &settings());

        assert_eq!(data.rows, 4);
        assert_eq!(data.volume.len(), 3);
        assert_eq!(data.volume[0].value, Some(150.0));
        assert_eq!(data.volume[1].value, Some(200.0));
        assert_eq!(data.volume[1].count, 1);
        assert_eq!(data.volume[2].value, None);
        assert_eq!(data.price[0].value, Some(410.0));
        assert_eq!(data.amount[0].value, Some(100.0 * 400.0 + 50.0 * 420.0));
    }

    #[test]
    fn test_by_type_and_status() {
        let range = DateRange::new(date(1), date(2)).unwrap();
        let data = compute_settlements(&fixture(), range, &settings());

        let labels: Vec<_> = data
            .volume_by_type
            .iter()
            .map(|p| p.key.to_string())
            .collect();
        assert_eq!(labels, vec!["medium_long_term", "day_ahead", "realtime"]);
        assert_eq!(data.volume_by_type[1].value, Some(100.0));
        assert_eq!(data.volume_by_type[1].count, 1);

        let statuses: Vec<_> = data.by_status.iter().map(|c| (c.label.as_str(), c.count)).collect();
        assert_eq!(
            statuses,
            vec![("pending", 1), ("confirmed", 2), ("disputed", 1)]
        );
        assert_eq!(data.by_status[1].percentage, 50.0);
    }

    #[test]
    fn test_totals_and_weighted_price() {
        let range = DateRange::new(date(1), date(2)).unwrap();
        let data = compute_settlements(&fixture(), range, &settings());

        assert_eq!(data.total_volume_mwh, 350.0);
        let expected = (100.0 * 400.0 + 50.0 * 420.0 + 200.0 * 350.0) / 350.0;
        assert!((data.weighted_price.unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_missing_volume_as_zero_counts_the_row() {
        let mut settings = settings();
        settings.missing_values = MissingValuePolicy::TreatAsZero;
        let range = DateRange::new(date(1), date(2)).unwrap();
        let data = compute_settlements(&fixture(), range, &settings);
        assert_eq!(data.volume[1].count, 2);
        assert_eq!(data.volume[1].min, Some(0.0));
    }

    #[test]
    fn test_empty_window() {
        let range = DateRange::single(date(9));
        let data = compute_settlements(&[], range, &settings());
        assert_eq!(data.rows, 0);
        assert_eq!(data.weighted_price, None);
        assert!(data.by_status.iter().all(|c| c.count == 0));
        assert_eq!(data.volume.len(), 1);
    }

    #[tokio::test]
    async fn test_get_settlements_filters_by_type() {
        let source = SyntheticSource::with_tables(SyntheticTables {
            settlements: fixture(),
            ..Default::default()
        });
        let ctx = DataContext::new(Arc::new(source), SeriesCache::disabled(), settings());
        let query = SettlementQuery {
            from: date(1),
            to: date(2),
            province: Some("zhejiang".to_string()),
            transaction_type: Some(TransactionType::DayAhead),
        };
        let data = get_settlements(&ctx, &query).await.unwrap();
        assert_eq!(data.rows, 2);
        assert_eq!(data.volume_by_type[0].value, None);
        assert_eq!(data.total_volume_mwh, 100.0);
    }
}
