//! Customer base view.

use crate::api::{CustomerQuery, CustomerSummaryData};
use crate::db::RowFilter;
use crate::models::CustomerRecord;
use crate::services::context::{DataContext, ViewSettings};
use crate::services::error::{ViewError, ViewResult};
use crate::services::grouping::{count_labels, series, Field, Measure};
use crate::services::stats::summarize;

fn consumption() -> Field<CustomerRecord> {
    Field::new("annual_consumption_mwh", |r: &CustomerRecord| {
        r.annual_consumption_mwh
    })
}

pub fn compute_customer_summary(
    rows: &[CustomerRecord],
    settings: &ViewSettings,
) -> CustomerSummaryData {
    let policy = settings.missing_values;

    CustomerSummaryData {
        total: rows.len(),
        active: rows.iter().filter(|r| r.active).count(),
        by_category: count_labels(&[], rows.iter().map(|r| r.category.as_str())),
        consumption_by_category: series(
            rows,
            |r| r.category.clone(),
            consumption(),
            Measure::Sum,
            policy,
        ),
        consumption_by_province: series(
            rows,
            |r| r.province.clone(),
            consumption(),
            Measure::Sum,
            policy,
        ),
        consumption_stats: summarize(rows.iter().map(|r| r.annual_consumption_mwh), policy),
    }
}

pub async fn get_customer_summary(
    ctx: &DataContext,
    query: &CustomerQuery,
) -> ViewResult<CustomerSummaryData> {
    ctx.cached("customer_summary", query, || async {
        let mut filter = RowFilter::new();
        if let Some(province) = &query.province {
            filter = filter.province(province.as_str());
        }
        if let Some(category) = &query.category {
            filter = filter.category(category.as_str());
        }
        let rows = ctx.source().fetch_customers(&filter).await?;
        Ok::<_, ViewError>(compute_customer_summary(&rows, ctx.settings()))
    })
    .await
}
