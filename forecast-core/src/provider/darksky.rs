use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    CollectorError,
    error::truncate_body,
    model::{CurrentConditions, DailyConditions, EXCLUDED_BLOCKS, ForecastRequest, ForecastResponse},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.darksky.net";

#[derive(Debug, Clone)]
pub struct DarkSkyProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl DarkSkyProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the client at a compatible mirror.
    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub fn forecast_url(&self, request: &ForecastRequest) -> String {
        format!(
            "{}/forecast/{}/{},{}",
            self.base_url, self.api_key, request.latitude, request.longitude
        )
    }
}

#[derive(Debug, Deserialize)]
struct DsDaily {
    #[serde(default)]
    data: Vec<DailyConditions>,
}

#[derive(Debug, Deserialize)]
struct DsResponse {
    currently: Option<CurrentConditions>,
    daily: Option<DsDaily>,
}

/// Decode a forecast body, keeping only `currently` and `daily.data[0]`.
pub fn parse_forecast(body: &str) -> Result<ForecastResponse, CollectorError> {
    let parsed: DsResponse = serde_json::from_str(body)
        .map_err(|e| CollectorError::fetch(format!("failed to parse Dark Sky JSON: {e}")))?;

    let currently = parsed
        .currently
        .ok_or_else(|| CollectorError::fetch("Dark Sky response contained no `currently` block"))?;

    let today = parsed
        .daily
        .and_then(|d| d.data.into_iter().next())
        .ok_or_else(|| CollectorError::fetch("Dark Sky response contained no daily data"))?;

    Ok(ForecastResponse {
        currently,
        today,
        raw: body.to_string(),
    })
}

#[async_trait]
impl WeatherProvider for DarkSkyProvider {
    async fn forecast(
        &self,
        request: &ForecastRequest,
    ) -> Result<ForecastResponse, CollectorError> {
        let exclude = EXCLUDED_BLOCKS.join(",");

        let res = self
            .http
            .get(self.forecast_url(request))
            .query(&[("exclude", exclude.as_str()), ("units", request.units.as_str())])
            .send()
            .await
            .map_err(|e| CollectorError::fetch(format!("failed to send request: {e}")))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| CollectorError::fetch(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(CollectorError::fetch(format!(
                "request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        parse_forecast(&body)
    }
}
