use crate::{CollectorError, ForecastRequest, ForecastResponse};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod darksky;

pub use darksky::DarkSkyProvider;

/// Tag value written as `source` on every point.
pub const SOURCE: &str = "darksky";

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch current conditions and the daily forecast for one location.
    async fn forecast(&self, request: &ForecastRequest)
    -> Result<ForecastResponse, CollectorError>;
}

#[async_trait]
impl<T: WeatherProvider + ?Sized> WeatherProvider for Box<T> {
    async fn forecast(
        &self,
        request: &ForecastRequest,
    ) -> Result<ForecastResponse, CollectorError> {
        (**self).forecast(request).await
    }
}
