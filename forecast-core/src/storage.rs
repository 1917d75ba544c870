use crate::{CollectorError, measurement::Point};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod influx;

pub use influx::InfluxWriter;

#[async_trait]
pub trait PointWriter: Send + Sync + Debug {
    /// Submit the whole batch in one request.
    async fn write_points(&self, points: &[Point]) -> Result<(), CollectorError>;
}

#[async_trait]
impl<T: PointWriter + ?Sized> PointWriter for Box<T> {
    async fn write_points(&self, points: &[Point]) -> Result<(), CollectorError> {
        (**self).write_points(points).await
    }
}
