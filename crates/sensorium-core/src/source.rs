// ── Data source seam ──
//
// Everything above the HTTP client talks to this trait, so pollers and
// loaders can be driven by an in-memory fake in tests.

use std::future::Future;
use std::sync::Arc;

use sensorium_api::SensoriumClient;

use crate::error::CoreError;
use crate::model::{Device, ReportPeriod, ReportRow, SensorCategory, SensorDescriptor, SensorReading};

/// Read-only access to the telemetry API in domain terms.
pub trait DataSource: Send + Sync + 'static {
    /// All registered devices.
    fn devices(&self) -> impl Future<Output = Result<Vec<Device>, CoreError>> + Send;

    /// Sensors attached to one device.
    fn sensors(
        &self,
        device_id: &str,
    ) -> impl Future<Output = Result<Vec<SensorDescriptor>, CoreError>> + Send;

    /// Current readings for every sensor in a category.
    fn live(
        &self,
        category: SensorCategory,
    ) -> impl Future<Output = Result<Vec<SensorReading>, CoreError>> + Send;

    /// Device metadata for the live view.
    fn live_devices(&self) -> impl Future<Output = Result<Vec<Device>, CoreError>> + Send;

    /// Aggregated history for one sensor.
    fn report(
        &self,
        device_id: &str,
        sensor_id: &str,
        period: ReportPeriod,
    ) -> impl Future<Output = Result<Vec<ReportRow>, CoreError>> + Send;
}

fn convert_all<W, D: From<W>>(items: Vec<W>) -> Vec<D> {
    items.into_iter().map(D::from).collect()
}

impl DataSource for SensoriumClient {
    async fn devices(&self) -> Result<Vec<Device>, CoreError> {
        Ok(convert_all(self.list_devices().await?))
    }

    async fn sensors(&self, device_id: &str) -> Result<Vec<SensorDescriptor>, CoreError> {
        Ok(convert_all(self.list_sensors(device_id).await?))
    }

    async fn live(&self, category: SensorCategory) -> Result<Vec<SensorReading>, CoreError> {
        Ok(convert_all(self.live_readings(category.slug()).await?))
    }

    async fn live_devices(&self) -> Result<Vec<Device>, CoreError> {
        Ok(convert_all(SensoriumClient::live_devices(self).await?))
    }

    async fn report(
        &self,
        device_id: &str,
        sensor_id: &str,
        period: ReportPeriod,
    ) -> Result<Vec<ReportRow>, CoreError> {
        Ok(convert_all(
            SensoriumClient::report(self, device_id, sensor_id, period.code()).await?,
        ))
    }
}

impl<S: DataSource> DataSource for Arc<S> {
    fn devices(&self) -> impl Future<Output = Result<Vec<Device>, CoreError>> + Send {
        (**self).devices()
    }

    fn sensors(
        &self,
        device_id: &str,
    ) -> impl Future<Output = Result<Vec<SensorDescriptor>, CoreError>> + Send {
        (**self).sensors(device_id)
    }

    fn live(
        &self,
        category: SensorCategory,
    ) -> impl Future<Output = Result<Vec<SensorReading>, CoreError>> + Send {
        (**self).live(category)
    }

    fn live_devices(&self) -> impl Future<Output = Result<Vec<Device>, CoreError>> + Send {
        (**self).live_devices()
    }

    fn report(
        &self,
        device_id: &str,
        sensor_id: &str,
        period: ReportPeriod,
    ) -> impl Future<Output = Result<Vec<ReportRow>, CoreError>> + Send {
        (**self).report(device_id, sensor_id, period)
    }
}
