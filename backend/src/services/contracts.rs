//! Contract portfolio view.

use crate::api::{ContractQuery, ContractSummaryData};
use crate::db::RowFilter;
use crate::models::{ContractRecord, ContractStatus};
use crate::services::context::{DataContext, ViewSettings};
use crate::services::error::{ViewError, ViewResult};
use crate::services::grouping::{count_labels, series, Field, Measure};
use crate::services::histogram::{bucketize, RangeBoundaries};
use crate::services::stats::summarize;

pub fn compute_contract_summary(
    rows: &[ContractRecord],
    boundaries: &RangeBoundaries,
    settings: &ViewSettings,
) -> ContractSummaryData {
    let policy = settings.missing_values;
    let statuses = ContractStatus::ALL.map(|s| s.as_str());

    ContractSummaryData {
        total: rows.len(),
        by_status: count_labels(&statuses, rows.iter().map(|r| r.status.as_str())),
        by_type: count_labels(&[], rows.iter().map(|r| r.contract_type.as_str())),
        volume_by_province: series(
            rows,
            |r| r.province.clone(),
            Field::new("contracted_volume_mwh", |r: &ContractRecord| {
                r.contracted_volume_mwh
            }),
            Measure::Sum,
            policy,
        ),
        price_histogram: bucketize(rows.iter().map(|r| r.price), boundaries).with_percentages(),
        price_stats: summarize(rows.iter().map(|r| r.price), policy),
        total_volume_mwh: rows
            .iter()
            .filter_map(|r| policy.resolve(r.contracted_volume_mwh))
            .sum(),
    }
}

pub async fn get_contract_summary(
    ctx: &DataContext,
    query: &ContractQuery,
) -> ViewResult<ContractSummaryData> {
    ctx.cached("contract_summary", query, || async {
        let mut filter = RowFilter::new();
        if let Some(province) = &query.province {
            filter = filter.province(province.as_str());
        }
        if let Some(status) = query.status {
            filter = filter.status(status.as_str());
        }
        let rows = ctx.source().fetch_contracts(&filter).await?;
        Ok::<_, ViewError>(compute_contract_summary(
            &rows,
            &ctx.settings().contract_price_boundaries,
            ctx.settings(),
        ))
    })
    .await
}
