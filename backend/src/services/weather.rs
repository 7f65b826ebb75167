use crate::api::{WeatherHourlyData, WeatherQuery};
use crate::db::RowFilter;
use crate::models::WeatherRecord;
use crate::services::context::{DataContext, ViewSettings};
use crate::services::error::{ViewError, ViewResult};
use crate::services::grouping::{align_to_domain, group_by, project, Field, KeyDomain, Measure};
use crate::services::stats::summarize;

const TEMPERATURE: &str = "temperature_c";
const WIND: &str = "wind_speed_ms";
const IRRADIANCE: &str = "irradiance_wm2";
const LOAD: &str = "load_forecast_mw";

pub fn compute_weather_hourly(
    rows: &[WeatherRecord],
    query: &WeatherQuery,
    settings: &ViewSettings,
) -> WeatherHourlyData {
    let fields = [
        Field::new(TEMPERATURE, |r: &WeatherRecord| r.temperature_c),
        Field::new(WIND, |r: &WeatherRecord| r.wind_speed_ms),
        Field::new(IRRADIANCE, |r: &WeatherRecord| r.irradiance_wm2),
        Field::new(LOAD, |r: &WeatherRecord| r.load_forecast_mw),
    ];
    let groups = group_by(rows, |r| r.hour, &fields, settings.missing_values);
    let hourly = |name| {
        align_to_domain(
            project(&groups, name, Measure::Mean),
            &KeyDomain::Hours,
            settings.fill_missing,
        )
    };

    WeatherHourlyData {
        date: query.date,
        province: query.province.clone(),
        temperature: hourly(TEMPERATURE),
        wind_speed: hourly(WIND),
        irradiance: hourly(IRRADIANCE),
        load_forecast: hourly(LOAD),
        temperature_stats: summarize(rows.iter().map(|r| r.temperature_c), settings.missing_values),
        load_stats: summarize(rows.iter().map(|r| r.load_forecast_mw), settings.missing_values),
    }
}

pub async fn get_weather_hourly(
    ctx: &DataContext,
    query: &WeatherQuery,
) -> ViewResult<WeatherHourlyData> {
    ctx.cached("weather_hourly", query, || async {
        let filter = RowFilter::new().on(query.date).province(query.province.as_str());
        let rows = ctx.source().fetch_weather(&filter).await?;
        Ok::<_, ViewError>(compute_weather_hourly(&rows, query, ctx.settings()))
    })
    .await
}
