//! Market price views: intraday curves, daily envelopes and distributions.

use tracing::debug;

use crate::api::{
    DirectionCounts, MarketDailyData, MarketDailyQuery, MarketDistributionData,
    MarketDistributionQuery, MarketHourlyData, MarketHourlyQuery, PriceField,
};
use crate::db::RowFilter;
use crate::models::{DateRange, MarketPrice};
use crate::services::context::{date_window, DataContext, ViewSettings};
use crate::services::error::{ViewError, ViewResult};
use crate::services::grouping::{
    align_to_domain, group_by, project, Field, KeyDomain, Measure,
};
use crate::services::histogram::{bucketize, RangeBoundaries};
use crate::services::spread::{join_series, SpreadThreshold};
use crate::services::stats::summarize;

const DAY_AHEAD: &str = "day_ahead_price";
const REALTIME: &str = "realtime_price";
const VOLUME: &str = "cleared_volume_mwh";

fn price_fields() -> [Field<MarketPrice>; 3] {
    [
        Field::new(DAY_AHEAD, |r: &MarketPrice| r.day_ahead_price),
        Field::new(REALTIME, |r: &MarketPrice| r.realtime_price),
        Field::new(VOLUME, |r: &MarketPrice| r.cleared_volume_mwh),
    ]
}

impl PriceField {
    pub fn value(&self, row: &MarketPrice) -> Option<f64> {
        match self {
            PriceField::DayAhead => row.day_ahead_price,
            PriceField::Realtime => row.realtime_price,
        }
    }
}

/// Build the 24-hour view from the rows of one province and day.
///
/// The spread is joined on the observed hourly means, before any fill policy
/// is applied, so a filled hour never produces a difference.
pub fn compute_hourly(
    rows: &[MarketPrice],
    query: &MarketHourlyQuery,
    threshold: SpreadThreshold,
    settings: &ViewSettings,
) -> MarketHourlyData {
    let groups = group_by(rows, |r| r.hour, &price_fields(), settings.missing_values);

    let day_ahead = project(&groups, DAY_AHEAD, Measure::Mean);
    let realtime = project(&groups, REALTIME, Measure::Mean);
    let volume = project(&groups, VOLUME, Measure::Sum);

    let spread = join_series(&day_ahead, &realtime, &KeyDomain::Hours, threshold);
    let directions = DirectionCounts::tally(&spread);

    MarketHourlyData {
        date: query.date,
        province: query.province.clone(),
        threshold: threshold.value(),
        day_ahead: align_to_domain(day_ahead, &KeyDomain::Hours, settings.fill_missing),
        realtime: align_to_domain(realtime, &KeyDomain::Hours, settings.fill_missing),
        volume: align_to_domain(volume, &KeyDomain::Hours, settings.fill_missing),
        spread,
        directions,
        day_ahead_stats: summarize(
            rows.iter().map(|r| r.day_ahead_price),
            settings.missing_values,
        ),
        realtime_stats: summarize(rows.iter().map(|r| r.realtime_price), settings.missing_values),
    }
}

/// One point per date of `range`: the mean of the hourly prices with the
/// intraday min/max as envelope, and the total cleared volume.
pub fn compute_daily(
    rows: &[MarketPrice],
    range: DateRange,
    province: &str,
    settings: &ViewSettings,
) -> MarketDailyData {
    let groups = group_by(rows, |r| r.trade_date, &price_fields(), settings.missing_values);
    let domain = KeyDomain::Dates(range);

    MarketDailyData {
        range,
        province: province.to_string(),
        day_ahead: align_to_domain(
            project(&groups, DAY_AHEAD, Measure::Mean),
            &domain,
            settings.fill_missing,
        ),
        realtime: align_to_domain(
            project(&groups, REALTIME, Measure::Mean),
            &domain,
            settings.fill_missing,
        ),
        volume: align_to_domain(
            project(&groups, VOLUME, Measure::Sum),
            &domain,
            settings.fill_missing,
        ),
    }
}

pub fn compute_distribution(
    rows: &[MarketPrice],
    range: DateRange,
    province: &str,
    field: PriceField,
    boundaries: &RangeBoundaries,
    settings: &ViewSettings,
) -> MarketDistributionData {
    let values: Vec<Option<f64>> = rows.iter().map(|r| field.value(r)).collect();
    let histogram = bucketize(values.iter().copied(), boundaries).with_percentages();
    if histogram.dropped > 0 {
        debug!(
            dropped = histogram.dropped,
            "Price values outside histogram boundaries"
        );
    }

    MarketDistributionData {
        range,
        province: province.to_string(),
        field,
        histogram,
        stats: summarize(values, settings.missing_values),
    }
}

pub async fn get_hourly(
    ctx: &DataContext,
    query: &MarketHourlyQuery,
) -> ViewResult<MarketHourlyData> {
    let threshold = match query.threshold {
        Some(value) => SpreadThreshold::new(value)?,
        None => ctx.settings().spread_threshold,
    };

    ctx.cached("market_hourly", query, || async {
        let filter = RowFilter::new().on(query.date).province(query.province.as_str());
        let rows = ctx.source().fetch_market_prices(&filter).await?;
        Ok::<_, ViewError>(compute_hourly(&rows, query, threshold, ctx.settings()))
    })
    .await
}

pub async fn get_daily(ctx: &DataContext, query: &MarketDailyQuery) -> ViewResult<MarketDailyData> {
    let range = date_window(query.from, query.to)?;

    ctx.cached("market_daily", query, || async {
        let filter = RowFilter::new().between(range).province(query.province.as_str());
        let rows = ctx.source().fetch_market_prices(&filter).await?;
        Ok::<_, ViewError>(compute_daily(&rows, range, &query.province, ctx.settings()))
    })
    .await
}

pub async fn get_distribution(
    ctx: &DataContext,
    query: &MarketDistributionQuery,
) -> ViewResult<MarketDistributionData> {
    let range = date_window(query.from, query.to)?;
    let boundaries = match query.boundaries.as_deref() {
        Some(list) => RangeBoundaries::parse(list)?,
        None => ctx.settings().price_boundaries.clone(),
    };

    ctx.cached("market_distribution", query, || async {
        let filter = RowFilter::new().between(range).province(query.province.as_str());
        let rows = ctx.source().fetch_market_prices(&filter).await?;
        Ok::<_, ViewError>(compute_distribution(
            &rows,
            range,
            &query.province,
            query.field,
            &boundaries,
            ctx.settings(),
        ))
    })
    .await
}

#[cfg(all(test, feature = "synthetic-source"))]
#[path = "market_tests.rs"]
mod market_tests;
