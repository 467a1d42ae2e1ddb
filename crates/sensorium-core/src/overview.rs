// ── Fleet overview ──
//
// Device count, sensor count (one sensor listing per device), and average
// live climate across digital sensors.

use chrono::Local;
use futures_util::future::try_join_all;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::{OverviewSummary, SensorCategory};
use crate::source::DataSource;

/// Fetch everything the overview needs and summarize it.
///
/// The device list and every per-device sensor listing must succeed. Live
/// readings only feed the averages, so a failure there leaves them `None`.
pub async fn load_overview<S: DataSource>(source: &S) -> Result<OverviewSummary, CoreError> {
    let devices = source.devices().await?;
    debug!(devices = devices.len(), "loading overview");

    let sensors = try_join_all(devices.iter().map(|d| source.sensors(&d.id)));
    let (sensor_lists, live) = tokio::join!(sensors, source.live(SensorCategory::Digital));
    let sensor_lists = sensor_lists?;

    let readings = live.unwrap_or_else(|e| {
        warn!(error = %e, "live readings unavailable for overview averages");
        Vec::new()
    });

    Ok(OverviewSummary {
        total_devices: devices.len(),
        total_sensors: sensor_lists.iter().map(Vec::len).sum(),
        average_temperature: mean(readings.iter().filter_map(|r| r.temperature)),
        average_humidity: mean(readings.iter().filter_map(|r| r.humidity)),
        updated_at: Local::now(),
    })
}

/// Mean of the present values; `None` when there are none.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::model::{Device, ReportPeriod, ReportRow, SensorDescriptor, SensorReading};

    struct Fleet {
        live_fails: bool,
        sensors_fail: bool,
    }

    impl DataSource for Fleet {
        async fn devices(&self) -> Result<Vec<Device>, CoreError> {
            Ok(vec![Device::placeholder("A"), Device::placeholder("B")])
        }

        async fn sensors(&self, device_id: &str) -> Result<Vec<SensorDescriptor>, CoreError> {
            if self.sensors_fail {
                return Err(CoreError::Timeout { timeout_secs: 1 });
            }
            let count = if device_id == "A" { 3 } else { 2 };
            Ok((0..count)
                .map(|i| SensorDescriptor {
                    id: i.to_string(),
                    label: None,
                })
                .collect())
        }

        async fn live(&self, _category: SensorCategory) -> Result<Vec<SensorReading>, CoreError> {
            if self.live_fails {
                return Err(CoreError::Internal("down".into()));
            }
            Ok(vec![
                SensorReading {
                    temperature: Some(20.0),
                    humidity: Some(40.0),
                    ..SensorReading::default()
                },
                SensorReading {
                    temperature: Some(24.0),
                    ..SensorReading::default()
                },
            ])
        }

        async fn live_devices(&self) -> Result<Vec<Device>, CoreError> {
            Ok(Vec::new())
        }

        async fn report(
            &self,
            _device_id: &str,
            _sensor_id: &str,
            _period: ReportPeriod,
        ) -> Result<Vec<ReportRow>, CoreError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn counts_devices_and_sensors() {
        let summary = load_overview(&Fleet {
            live_fails: false,
            sensors_fail: false,
        })
        .await
        .unwrap();

        assert_eq!(summary.total_devices, 2);
        assert_eq!(summary.total_sensors, 5);
        assert_eq!(summary.average_temperature, Some(22.0));
        assert_eq!(summary.average_humidity, Some(40.0));
    }

    #[tokio::test]
    async fn live_failure_only_drops_averages() {
        let summary = load_overview(&Fleet {
            live_fails: true,
            sensors_fail: false,
        })
        .await
        .unwrap();

        assert_eq!(summary.total_sensors, 5);
        assert_eq!(summary.average_temperature, None);
    }

    #[tokio::test]
    async fn sensor_listing_failure_fails_the_overview() {
        let result = load_overview(&Fleet {
            live_fails: false,
            sensors_fail: true,
        })
        .await;
        assert!(matches!(result, Err(CoreError::Timeout { .. })));
    }

    #[test]
    fn mean_of_nothing_is_none() {
        assert_eq!(mean(std::iter::empty()), None);
        assert_eq!(mean([1.0, 2.0].into_iter()), Some(1.5));
    }
}
