//! Plan execution view: planned against actual power per quarter-hour.
//!
//! The deviation is `actual - planned`; a quarter within the tolerance is
//! on plan ([`Direction::Flat`](crate::api::Direction::Flat)), above it is
//! over-delivery and below it a shortfall.

use crate::api::{DirectionCounts, ExecutionData, ExecutionQuery};
use crate::db::RowFilter;
use crate::models::PowerPlanRecord;
use crate::services::context::{DataContext, ViewSettings};
use crate::services::error::{ViewError, ViewResult};
use crate::services::grouping::{align_to_domain, group_by, project, Field, KeyDomain, Measure};
use crate::services::histogram::percent_of;
use crate::services::policy::MissingValuePolicy;
use crate::services::spread::{join_series, SpreadThreshold};
use crate::services::stats::summarize;

const PLANNED: &str = "planned_mw";
const ACTUAL: &str = "actual_mw";

pub fn compute_execution(
    rows: &[PowerPlanRecord],
    query: &ExecutionQuery,
    tolerance: SpreadThreshold,
    settings: &ViewSettings,
) -> ExecutionData {
    let fields = [
        Field::new(PLANNED, |r: &PowerPlanRecord| r.planned_mw),
        Field::new(ACTUAL, |r: &PowerPlanRecord| r.actual_mw),
    ];
    let groups = group_by(rows, |r| r.quarter, &fields, settings.missing_values);
    let planned = project(&groups, PLANNED, Measure::Mean);
    let actual = project(&groups, ACTUAL, Measure::Mean);

    let deviation = join_series(&actual, &planned, &KeyDomain::Quarters, tolerance);
    let directions = DirectionCounts::tally(&deviation);

    let (actual_sum, planned_sum) = deviation
        .iter()
        .filter_map(|p| p.primary.zip(p.secondary))
        .fold((0.0, 0.0), |(sa, sp), (a, p)| (sa + a, sp + p));
    let completion_rate = if planned_sum > 0.0 {
        Some(percent_of(actual_sum, planned_sum))
    } else {
        None
    };
    let on_plan_rate = match directions.classified() {
        0 => None,
        n => Some(percent_of(directions.flat as f64, n as f64)),
    };

    ExecutionData {
        date: query.date,
        province: query.province.clone(),
        tolerance: tolerance.value(),
        planned: align_to_domain(planned, &KeyDomain::Quarters, settings.fill_missing),
        actual: align_to_domain(actual, &KeyDomain::Quarters, settings.fill_missing),
        // Deviations exist only where both sides were observed.
        deviation_stats: summarize(
            deviation.iter().map(|p| p.difference),
            MissingValuePolicy::Skip,
        ),
        deviation,
        directions,
        completion_rate,
        on_plan_rate,
    }
}

pub async fn get_execution(ctx: &DataContext, query: &ExecutionQuery) -> ViewResult<ExecutionData> {
    let tolerance = match query.tolerance {
        Some(value) => SpreadThreshold::new(value)?,
        None => ctx.settings().execution_tolerance,
    };

    ctx.cached("plan_execution", query, || async {
        let filter = RowFilter::new().on(query.date).province(query.province.as_str());
        let rows = ctx.source().fetch_power_plans(&filter).await?;
        Ok::<_, ViewError>(compute_execution(&rows, query, tolerance, ctx.settings()))
    })
    .await
}
