use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::{
    CollectorError,
    config::InfluxConfig,
    error::truncate_body,
    line_protocol,
    measurement::{MeasurementSchema, Point, SCHEMA},
};

use super::PointWriter;

/// Writes points over the InfluxDB 1.x HTTP `/write` endpoint.
#[derive(Debug, Clone)]
pub struct InfluxWriter {
    base_url: String,
    database: String,
    username: String,
    password: String,
    schema: &'static [MeasurementSchema],
    http: Client,
}

impl InfluxWriter {
    pub fn new(config: &InfluxConfig) -> Self {
        Self {
            base_url: config.base_url(),
            database: config.database.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            schema: &SCHEMA,
            http: Client::new(),
        }
    }

    pub fn write_url(&self) -> String {
        format!("{}/write", self.base_url)
    }

    fn query_params(&self) -> Vec<(&'static str, &str)> {
        let mut params = vec![("db", self.database.as_str())];
        if !self.username.is_empty() {
            params.push(("u", self.username.as_str()));
            params.push(("p", self.password.as_str()));
        }
        params
    }

    /// Reachability check against `/ping`.
    pub async fn ping(&self) -> Result<()> {
        let res = self
            .http
            .get(format!("{}/ping", self.base_url))
            .send()
            .await
            .with_context(|| format!("Failed to reach InfluxDB at {}", self.base_url))?;

        if res.status() != StatusCode::NO_CONTENT && !res.status().is_success() {
            return Err(anyhow!("InfluxDB ping returned status {}", res.status()));
        }

        Ok(())
    }
}

#[async_trait]
impl PointWriter for InfluxWriter {
    async fn write_points(&self, points: &[Point]) -> Result<(), CollectorError> {
        for point in points {
            point.validate(self.schema)?;
        }

        let body = line_protocol::encode(points)?;
        log::debug!("writing {} point(s) to {}", points.len(), self.database);

        let res = self
            .http
            .post(self.write_url())
            .query(&self.query_params())
            .body(body)
            .send()
            .await
            .map_err(|e| CollectorError::write(format!("failed to send write request: {e}")))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(CollectorError::write(format!(
                "write failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        Ok(())
    }
}
