use serde::{Deserialize, Serialize};

use crate::config::DarkSkyConfig;

/// Sections of the Dark Sky payload that are never needed.
pub const EXCLUDED_BLOCKS: [&str; 4] = ["minutely", "hourly", "alerts", "flags"];

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub units: String,
}

impl From<&DarkSkyConfig> for ForecastRequest {
    fn from(cfg: &DarkSkyConfig) -> Self {
        Self {
            latitude: cfg.latitude,
            longitude: cfg.longitude,
            units: cfg.units.clone(),
        }
    }
}

/// The `currently` block, in the provider's own field names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CurrentConditions {
    pub time: Option<i64>,
    pub temperature: Option<f64>,
    pub apparent_temperature: Option<f64>,
    pub dew_point: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_bearing: Option<f64>,
    pub cloud_cover: Option<f64>,
    pub pressure: Option<f64>,
    pub ozone: Option<f64>,
    pub uv_index: Option<f64>,
    pub visibility: Option<f64>,
    pub precip_intensity: Option<f64>,
    pub precip_probability: Option<f64>,
    pub nearest_storm_distance: Option<f64>,
    pub nearest_storm_bearing: Option<f64>,
}

/// One element of `daily.data`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyConditions {
    pub time: Option<i64>,
    pub sunrise_time: Option<i64>,
    pub sunset_time: Option<i64>,
    pub temperature_high: Option<f64>,
    pub apparent_temperature_high: Option<f64>,
    pub temperature_low: Option<f64>,
    pub apparent_temperature_low: Option<f64>,
    pub temperature_max: Option<f64>,
    pub apparent_temperature_max: Option<f64>,
    pub temperature_min: Option<f64>,
    pub apparent_temperature_min: Option<f64>,
    pub dew_point: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_bearing: Option<f64>,
    pub cloud_cover: Option<f64>,
    pub pressure: Option<f64>,
    pub ozone: Option<f64>,
    pub uv_index: Option<f64>,
    pub visibility: Option<f64>,
    pub precip_intensity: Option<f64>,
    pub precip_probability: Option<f64>,
}

/// What one fetch yields: current conditions and today's forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResponse {
    pub currently: CurrentConditions,
    pub today: DailyConditions,
    /// Undecoded body, echoed in debug mode.
    pub raw: String,
}
