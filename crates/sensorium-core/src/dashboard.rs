// ── Dashboard facade ──
//
// The single entry point the CLI and TUI use. Owns the data source and the
// runtime configuration; everything else in this crate is pure or driven
// from here.

use std::sync::Arc;

use chrono::Local;
use sensorium_api::SensoriumClient;
use tracing::debug;

use crate::config::DashboardConfig;
use crate::error::CoreError;
use crate::grouping::device_groups;
use crate::model::{
    Device, OverviewSummary, ReportPeriod, ReportRow, SensorCategory, SensorDescriptor,
};
use crate::overview::load_overview;
use crate::poller::{LivePoller, LiveSnapshot};
use crate::source::DataSource;

/// Cheaply cloneable handle to a telemetry API.
pub struct Dashboard<S = SensoriumClient> {
    inner: Arc<DashboardInner<S>>,
}

struct DashboardInner<S> {
    config: DashboardConfig,
    source: Arc<S>,
}

impl<S> Clone for Dashboard<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Dashboard {
    /// Build an HTTP-backed dashboard from configuration.
    pub fn new(config: DashboardConfig) -> Result<Self, CoreError> {
        let client = SensoriumClient::new(&config.api_url, &config.transport())?;
        debug!(api_url = %client.base_url(), "dashboard created");
        Ok(Self::with_source(config, client))
    }
}

impl<S: DataSource> Dashboard<S> {
    /// Use an arbitrary data source.
    pub fn with_source(config: DashboardConfig, source: S) -> Self {
        Self {
            inner: Arc::new(DashboardInner {
                config,
                source: Arc::new(source),
            }),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    pub fn source(&self) -> &Arc<S> {
        &self.inner.source
    }

    // ── One-shot reads ───────────────────────────────────────────────

    pub async fn devices(&self) -> Result<Vec<Device>, CoreError> {
        self.inner.source.devices().await
    }

    pub async fn sensors(&self, device_id: &str) -> Result<Vec<SensorDescriptor>, CoreError> {
        self.inner.source.sensors(device_id).await
    }

    /// Fetch and group one live snapshot without starting a poller.
    pub async fn live(&self, category: SensorCategory) -> Result<LiveSnapshot, CoreError> {
        let source = &self.inner.source;
        let (readings, devices) = tokio::try_join!(source.live(category), source.live_devices())?;
        Ok(LiveSnapshot {
            category,
            generation: 0,
            groups: device_groups(readings, devices),
            updated_at: Local::now(),
        })
    }

    pub async fn overview(&self) -> Result<OverviewSummary, CoreError> {
        load_overview(self.inner.source.as_ref()).await
    }

    pub async fn report(
        &self,
        device_id: &str,
        sensor_id: &str,
        period: ReportPeriod,
    ) -> Result<Vec<ReportRow>, CoreError> {
        self.inner.source.report(device_id, sensor_id, period).await
    }

    /// Report lookup keyed by sidebar label. Unmapped labels yield no rows.
    pub async fn report_for_label(
        &self,
        device_id: &str,
        sensor_id: &str,
        label: &str,
    ) -> Result<Vec<ReportRow>, CoreError> {
        match ReportPeriod::from_label(label) {
            Some(period) => self.report(device_id, sensor_id, period).await,
            None => {
                debug!(label, "unmapped report period");
                Ok(Vec::new())
            }
        }
    }

    // ── Live polling ─────────────────────────────────────────────────

    /// Start a background poller at the configured interval.
    pub fn poll_live(&self, category: SensorCategory) -> LivePoller {
        LivePoller::spawn(
            Arc::clone(&self.inner.source),
            category,
            self.inner.config.poll_interval,
        )
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn dashboard(server: &MockServer) -> Dashboard {
        Dashboard::new(DashboardConfig {
            api_url: server.uri(),
            ..DashboardConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn live_snapshot_groups_by_device() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/live/digital-sensors"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "sensorId": "1", "deviceId": "B", "temperature": 20.0, "humidity": 40.0 },
                { "sensorId": "2", "deviceId": "A" },
                { "sensorId": "3", "deviceId": "B" }
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/live/devices"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "deviceId": "B", "deviceName": "Cold Aisle" }
            ])))
            .mount(&server)
            .await;

        let snapshot = dashboard(&server).await.live(SensorCategory::Digital).await.unwrap();

        assert_eq!(snapshot.groups.len(), 2);
        assert_eq!(snapshot.groups[0].device.display_name(), "Cold Aisle");
        assert_eq!(snapshot.groups[0].readings.len(), 2);
        assert_eq!(snapshot.groups[1].device.display_name(), "Device A");
    }

    #[tokio::test]
    async fn live_fails_when_either_request_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/live/power-sensors"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/live/devices"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let result = dashboard(&server).await.live(SensorCategory::Power).await;
        assert!(matches!(result, Err(CoreError::Api { status: Some(502), .. })));
    }

    #[tokio::test]
    async fn unknown_report_label_is_empty_without_a_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reports"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "period": "x" }])))
            .expect(0)
            .mount(&server)
            .await;

        let rows = dashboard(&server)
            .await
            .report_for_label("d", "s", "Yearly Report")
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn invalid_api_url_is_a_config_error() {
        let result = Dashboard::new(DashboardConfig {
            api_url: "not a url".into(),
            ..DashboardConfig::default()
        });
        assert!(matches!(result, Err(CoreError::Config { .. })));
    }
}
