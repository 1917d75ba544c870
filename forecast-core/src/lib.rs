//! Core library for the `forecast-collector` service.
//!
//! This crate defines:
//! - Configuration loading and startup validation
//! - The Dark Sky provider and the InfluxDB writer, each behind a trait
//! - The `weather` / `forecast` measurement schema and line-protocol encoding
//! - The collection cycle and the cron or one-shot scheduler
//!
//! It is used by `forecast-cli`, but the collector can be driven by any
//! [`WeatherProvider`] / [`PointWriter`] pair.

pub mod collector;
pub mod config;
pub mod error;
pub mod line_protocol;
pub mod measurement;
pub mod model;
pub mod provider;
pub mod schedule;
pub mod storage;
pub mod sun;

#[cfg(test)]
mod test_support;

pub use collector::Collector;
pub use config::{Config, DarkSkyConfig, GeneralConfig, InfluxConfig};
pub use error::CollectorError;
pub use measurement::{DailyForecast, Point, WeatherObservation};
pub use model::{ForecastRequest, ForecastResponse};
pub use provider::{DarkSkyProvider, WeatherProvider};
pub use schedule::{Cycle, Trigger};
pub use storage::{InfluxWriter, PointWriter};
