use anyhow::Result;
use async_trait::async_trait;

use crate::{
    CollectorError, Config, ForecastRequest, ForecastResponse,
    measurement::{DailyForecast, Point, WeatherObservation},
    provider::{DarkSkyProvider, SOURCE, WeatherProvider},
    schedule::Cycle,
    storage::{InfluxWriter, PointWriter},
    sun,
};

/// One fetch, transform and write per trigger.
#[derive(Debug)]
pub struct Collector<P, W> {
    request: ForecastRequest,
    provider: P,
    writer: W,
    clock: fn() -> f64,
}

impl Collector<DarkSkyProvider, InfluxWriter> {
    /// Build the production collector. Fails if the Dark Sky key is missing.
    pub fn from_config(config: &Config) -> Result<Self> {
        let key = config.darksky_key()?;
        let provider = DarkSkyProvider::new(key.to_owned());
        let writer = InfluxWriter::new(&config.influxdb);
        Ok(Self::new(config, provider, writer))
    }
}

impl<P: WeatherProvider, W: PointWriter> Collector<P, W> {
    pub fn new(config: &Config, provider: P, writer: W) -> Self {
        Self {
            request: ForecastRequest::from(&config.darksky),
            provider,
            writer,
            clock: sun::now_epoch_secs,
        }
    }

    /// Replace the wall clock used for the sun status.
    pub fn with_clock(mut self, clock: fn() -> f64) -> Self {
        self.clock = clock;
        self
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Run a cycle, reporting the first failure instead of logging it.
    pub async fn try_cycle(&self) -> Result<(), CollectorError> {
        let response = self.provider.forecast(&self.request).await?;
        log::debug!("{}", response.raw);

        let points = build_points(&response, (self.clock)());
        self.writer.write_points(&points).await
    }
}

/// Map one provider response onto the `weather` and `forecast` points.
pub fn build_points(response: &ForecastResponse, now: f64) -> Vec<Point> {
    let today = &response.today;

    log::debug!("Sunrise: {:?}", today.sunrise_time);
    log::debug!("Sunset: {:?}", today.sunset_time);
    log::debug!("Now: {now}");

    let sun_status = sun::sun_status(now, today.sunrise_time, today.sunset_time);
    log::debug!("Sun Status: {sun_status}");

    vec![
        WeatherObservation::new(SOURCE, &response.currently, today, sun_status).into_point(),
        DailyForecast::new(SOURCE, today, sun_status).into_point(),
    ]
}

#[async_trait]
impl<P: WeatherProvider, W: PointWriter> Cycle for Collector<P, W> {
    async fn run_cycle(&self) {
        match self.try_cycle().await {
            Ok(()) => log::info!("Dark Sky data written to InfluxDB"),
            Err(e) => log::error!("{e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        measurement::{FORECAST, FieldValue, WEATHER},
        model::{CurrentConditions, DailyConditions},
    };
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const SUNRISE: i64 = 1_700_000_000;
    const SUNSET: i64 = 1_700_040_000;

    #[derive(Debug)]
    struct FakeProvider {
        fail: bool,
        calls: AtomicUsize,
    }

    impl FakeProvider {
        fn ok() -> Self {
            Self { fail: false, calls: AtomicUsize::new(0) }
        }

        fn failing() -> Self {
            Self { fail: true, calls: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn forecast(
            &self,
            _request: &ForecastRequest,
        ) -> Result<ForecastResponse, CollectorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(CollectorError::fetch("request failed with status 403"));
            }

            Ok(ForecastResponse {
                currently: CurrentConditions {
                    temperature: Some(9.41),
                    humidity: Some(0.8),
                    ..Default::default()
                },
                today: DailyConditions {
                    sunrise_time: Some(SUNRISE),
                    sunset_time: Some(SUNSET),
                    temperature_high: Some(11.2),
                    ..Default::default()
                },
                raw: "{}".to_string(),
            })
        }
    }

    #[derive(Debug, Default)]
    struct FakeWriter {
        fail: bool,
        batches: Mutex<Vec<Vec<Point>>>,
    }

    #[async_trait]
    impl PointWriter for FakeWriter {
        async fn write_points(&self, points: &[Point]) -> Result<(), CollectorError> {
            self.batches.lock().unwrap().push(points.to_vec());
            if self.fail {
                return Err(CollectorError::write("write failed with status 500"));
            }
            Ok(())
        }
    }

    fn config() -> Config {
        Config::from_toml_str("[darksky]\nkey = \"k\"\nlatitude = 1.5\nlongitude = 2.5\n").unwrap()
    }

    fn midday() -> f64 {
        1_700_020_000.0
    }

    fn at_sunset() -> f64 {
        1_700_040_000.0
    }

    #[tokio::test]
    async fn writes_both_points_in_one_batch() {
        let collector = Collector::new(&config(), FakeProvider::ok(), FakeWriter::default())
            .with_clock(midday);

        collector.try_cycle().await.expect("cycle should succeed");

        let batches = collector.writer().batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        let measurements: Vec<_> = batches[0].iter().map(|p| p.measurement.as_str()).collect();
        assert_eq!(measurements, vec![WEATHER, FORECAST]);
    }

    #[tokio::test]
    async fn sun_status_is_shared_by_both_points() {
        let cases: [(fn() -> f64, i64); 2] = [(midday, 1), (at_sunset, 0)];
        for (clock, expected) in cases {
            let collector = Collector::new(&config(), FakeProvider::ok(), FakeWriter::default())
                .with_clock(clock);
            collector.try_cycle().await.unwrap();

            let batches = collector.writer().batches.lock().unwrap();
            for point in &batches[0] {
                assert_eq!(point.field("sun_status"), Some(FieldValue::Integer(expected)));
            }
        }
    }

    #[tokio::test]
    async fn weather_point_carries_sunrise_and_sunset() {
        let collector = Collector::new(&config(), FakeProvider::ok(), FakeWriter::default())
            .with_clock(midday);
        collector.try_cycle().await.unwrap();

        let batches = collector.writer().batches.lock().unwrap();
        let weather = &batches[0][0];
        assert_eq!(weather.field("sunrise_time"), Some(FieldValue::Integer(SUNRISE)));
        assert_eq!(weather.field("sunset_time"), Some(FieldValue::Integer(SUNSET)));
        assert_eq!(weather.field("temperature"), Some(FieldValue::Float(9.41)));
        assert_eq!(batches[0][1].field("temperature_high"), Some(FieldValue::Float(11.2)));
    }

    #[tokio::test]
    async fn fetch_failure_skips_the_write() {
        let collector = Collector::new(&config(), FakeProvider::failing(), FakeWriter::default());

        let err = collector.try_cycle().await.unwrap_err();
        assert!(err.is_fetch());

        collector.run_cycle().await;
        assert!(collector.writer().batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn write_failure_is_reported_not_raised() {
        let writer = FakeWriter {
            fail: true,
            ..Default::default()
        };
        let collector = Collector::new(&config(), FakeProvider::ok(), writer).with_clock(midday);

        assert!(collector.try_cycle().await.unwrap_err().is_write());

        // completes without panicking and without retrying
        collector.run_cycle().await;
        assert_eq!(collector.writer().batches.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn each_cycle_fetches_once() {
        let collector = Collector::new(&config(), FakeProvider::ok(), FakeWriter::default());

        collector.run_cycle().await;
        collector.run_cycle().await;

        assert_eq!(collector.provider.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn request_uses_configured_location() {
        let collector = Collector::new(&config(), FakeProvider::ok(), FakeWriter::default());

        assert_eq!(collector.request.latitude, 1.5);
        assert_eq!(collector.request.longitude, 2.5);
        assert_eq!(collector.request.units, "auto");
    }

    #[test]
    fn from_config_requires_key() {
        let err = Collector::from_config(&Config::default()).unwrap_err();
        assert!(err.to_string().contains("DarkSky key should be provided"));
        assert!(Collector::from_config(&config()).is_ok());
    }

    #[test]
    fn build_points_without_sun_times_is_night() {
        let response = ForecastResponse {
            currently: CurrentConditions::default(),
            today: DailyConditions::default(),
            raw: String::new(),
        };

        let points = build_points(&response, midday());
        assert_eq!(points[0].field("sun_status"), Some(FieldValue::Integer(0)));
        assert_eq!(points[0].field("sunrise_time"), None);
    }
}
