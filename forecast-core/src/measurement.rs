//! Measurement schema and the two points written per cycle.
//!
//! Field names are fixed: the provider's camelCase names are renamed
//! one-to-one, values are copied untouched, and absent values are left out
//! of the point rather than defaulted.

use std::collections::BTreeMap;

use crate::{
    CollectorError,
    model::{CurrentConditions, DailyConditions},
};

pub const WEATHER: &str = "weather";
pub const FORECAST: &str = "forecast";
pub const SOURCE_TAG: &str = "source";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Float,
    Integer,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Float(f64),
    Integer(i64),
}

impl FieldValue {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Float(_) => FieldType::Float,
            FieldValue::Integer(_) => FieldType::Integer,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MeasurementSchema {
    pub measurement: &'static str,
    pub tags: &'static [&'static str],
    pub fields: &'static [(&'static str, FieldType)],
}

impl MeasurementSchema {
    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, ty)| *ty)
    }
}

use FieldType::{Float, Integer};

pub const WEATHER_SCHEMA: MeasurementSchema = MeasurementSchema {
    measurement: WEATHER,
    tags: &[SOURCE_TAG],
    fields: &[
        ("temperature", Float),
        ("apparent_temperature", Float),
        ("dew_point", Float),
        ("humidity", Float),
        ("wind_speed", Float),
        ("wind_bearing", Float),
        ("cloud_cover", Float),
        ("pressure", Float),
        ("ozone", Float),
        ("uv_index", Float),
        ("visibility", Float),
        ("precip_intensity", Float),
        ("precip_probability", Float),
        ("nearest_storm_distance", Float),
        ("nearest_storm_bearing", Float),
        ("sunrise_time", Integer),
        ("sunset_time", Integer),
        ("sun_status", Integer),
    ],
};

pub const FORECAST_SCHEMA: MeasurementSchema = MeasurementSchema {
    measurement: FORECAST,
    tags: &[SOURCE_TAG],
    fields: &[
        ("temperature_high", Float),
        ("apparent_temperature_high", Float),
        ("temperature_low", Float),
        ("apparent_temperature_low", Float),
        ("temperature_max", Float),
        ("apparent_temperature_max", Float),
        ("temperature_min", Float),
        ("apparent_temperature_min", Float),
        ("dew_point", Float),
        ("humidity", Float),
        ("wind_speed", Float),
        ("wind_bearing", Float),
        ("cloud_cover", Float),
        ("pressure", Float),
        ("ozone", Float),
        ("uv_index", Float),
        ("visibility", Float),
        ("precip_intensity", Float),
        ("precip_probability", Float),
        ("sun_status", Integer),
    ],
};

pub static SCHEMA: [MeasurementSchema; 2] = [WEATHER_SCHEMA, FORECAST_SCHEMA];

/// A single time-series point. The server assigns the timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub measurement: String,
    pub tags: BTreeMap<String, String>,
    pub fields: Vec<(String, FieldValue)>,
}

impl Point {
    pub fn new(measurement: impl Into<String>) -> Self {
        Self {
            measurement: measurement.into(),
            tags: BTreeMap::new(),
            fields: Vec::new(),
        }
    }

    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn float(mut self, key: &str, value: Option<f64>) -> Self {
        if let Some(v) = value {
            self.fields.push((key.to_string(), FieldValue::Float(v)));
        }
        self
    }

    pub fn integer(mut self, key: &str, value: Option<i64>) -> Self {
        if let Some(v) = value {
            self.fields.push((key.to_string(), FieldValue::Integer(v)));
        }
        self
    }

    pub fn field(&self, key: &str) -> Option<FieldValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| *value)
    }

    /// Check the point against the declared measurement schemas.
    pub fn validate(&self, schemas: &[MeasurementSchema]) -> Result<(), CollectorError> {
        let schema = schemas
            .iter()
            .find(|s| s.measurement == self.measurement)
            .ok_or_else(|| {
                CollectorError::write(format!("no schema for measurement `{}`", self.measurement))
            })?;

        if let Some(tag) = self.tags.keys().find(|t| !schema.tags.contains(&t.as_str())) {
            return Err(CollectorError::write(format!(
                "tag `{tag}` is not declared for measurement `{}`",
                self.measurement
            )));
        }

        for (name, value) in &self.fields {
            match schema.field_type(name) {
                Some(ty) if ty == value.field_type() => {}
                Some(ty) => {
                    return Err(CollectorError::write(format!(
                        "field `{name}` of `{}` should be {ty:?}, got {value:?}",
                        self.measurement
                    )));
                }
                None => {
                    return Err(CollectorError::write(format!(
                        "field `{name}` is not declared for measurement `{}`",
                        self.measurement
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Current conditions, `weather` measurement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherObservation {
    pub source: String,
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
    pub sunrise_time: Option<i64>,
    pub sunset_time: Option<i64>,
    pub sun_status: i64,
}

impl WeatherObservation {
    /// Sunrise and sunset come from today's forecast, not from `currently`.
    pub fn new(
        source: &str,
        current: &CurrentConditions,
        today: &DailyConditions,
        sun_status: i64,
    ) -> Self {
        Self {
            source: source.to_string(),
            temperature: current.temperature,
            apparent_temperature: current.apparent_temperature,
            dew_point: current.dew_point,
            humidity: current.humidity,
            wind_speed: current.wind_speed,
            wind_bearing: current.wind_bearing,
            cloud_cover: current.cloud_cover,
            pressure: current.pressure,
            ozone: current.ozone,
            uv_index: current.uv_index,
            visibility: current.visibility,
            precip_intensity: current.precip_intensity,
            precip_probability: current.precip_probability,
            nearest_storm_distance: current.nearest_storm_distance,
            nearest_storm_bearing: current.nearest_storm_bearing,
            sunrise_time: today.sunrise_time,
            sunset_time: today.sunset_time,
            sun_status,
        }
    }

    pub fn into_point(self) -> Point {
        Point::new(WEATHER)
            .tag(SOURCE_TAG, self.source)
            .float("temperature", self.temperature)
            .float("apparent_temperature", self.apparent_temperature)
            .float("dew_point", self.dew_point)
            .float("humidity", self.humidity)
            .float("wind_speed", self.wind_speed)
            .float("wind_bearing", self.wind_bearing)
            .float("cloud_cover", self.cloud_cover)
            .float("pressure", self.pressure)
            .float("ozone", self.ozone)
            .float("uv_index", self.uv_index)
            .float("visibility", self.visibility)
            .float("precip_intensity", self.precip_intensity)
            .float("precip_probability", self.precip_probability)
            .float("nearest_storm_distance", self.nearest_storm_distance)
            .float("nearest_storm_bearing", self.nearest_storm_bearing)
            .integer("sunrise_time", self.sunrise_time)
            .integer("sunset_time", self.sunset_time)
            .integer("sun_status", Some(self.sun_status))
    }
}

/// Today's forecast, `forecast` measurement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyForecast {
    pub source: String,
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
    pub sun_status: i64,
}

impl DailyForecast {
    pub fn new(source: &str, today: &DailyConditions, sun_status: i64) -> Self {
        Self {
            source: source.to_string(),
            temperature_high: today.temperature_high,
            apparent_temperature_high: today.apparent_temperature_high,
            temperature_low: today.temperature_low,
            apparent_temperature_low: today.apparent_temperature_low,
            temperature_max: today.temperature_max,
            apparent_temperature_max: today.apparent_temperature_max,
            temperature_min: today.temperature_min,
            apparent_temperature_min: today.apparent_temperature_min,
            dew_point: today.dew_point,
            humidity: today.humidity,
            wind_speed: today.wind_speed,
            wind_bearing: today.wind_bearing,
            cloud_cover: today.cloud_cover,
            pressure: today.pressure,
            ozone: today.ozone,
            uv_index: today.uv_index,
            visibility: today.visibility,
            precip_intensity: today.precip_intensity,
            precip_probability: today.precip_probability,
            sun_status,
        }
    }

    pub fn into_point(self) -> Point {
        Point::new(FORECAST)
            .tag(SOURCE_TAG, self.source)
            .float("temperature_high", self.temperature_high)
            .float("apparent_temperature_high", self.apparent_temperature_high)
            .float("temperature_low", self.temperature_low)
            .float("apparent_temperature_low", self.apparent_temperature_low)
            .float("temperature_max", self.temperature_max)
            .float("apparent_temperature_max", self.apparent_temperature_max)
            .float("temperature_min", self.temperature_min)
            .float("apparent_temperature_min", self.apparent_temperature_min)
            .float("dew_point", self.dew_point)
            .float("humidity", self.humidity)
            .float("wind_speed", self.wind_speed)
            .float("wind_bearing", self.wind_bearing)
            .float("cloud_cover", self.cloud_cover)
            .float("pressure", self.pressure)
            .float("ozone", self.ozone)
            .float("uv_index", self.uv_index)
            .float("visibility", self.visibility)
            .float("precip_intensity", self.precip_intensity)
            .float("precip_probability", self.precip_probability)
            .integer("sun_status", Some(self.sun_status))
    }
}
