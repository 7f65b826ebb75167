use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::{SeriesPoint, SummaryStats};

pub const GET_WEATHER_HOURLY: &str = "/weather/hourly";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherQuery {
    pub date: NaiveDate,
    pub province: String,
}

/// Hourly weather curves; each point is the mean of the observations in
/// that hour with their min/max envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherHourlyData {
    pub date: NaiveDate,
    pub province: String,
    pub temperature: Vec<SeriesPoint>,
    pub wind_speed: Vec<SeriesPoint>,
    pub irradiance: Vec<SeriesPoint>,
    pub load_forecast: Vec<SeriesPoint>,
    pub temperature_stats: SummaryStats,
    pub load_stats: SummaryStats,
}
