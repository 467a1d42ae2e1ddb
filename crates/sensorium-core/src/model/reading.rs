// ── Live sensor readings ──

use serde::{Deserialize, Serialize};

use super::device::display_sensor_label;

/// One live measurement from a sensor.
///
/// Every category-specific field is an explicit `Option`; a JSON `null` and
/// a missing key both arrive as `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReading {
    pub sensor_id: String,
    pub device_id: String,
    pub label: Option<String>,
    pub active: bool,

    // Digital
    pub temperature: Option<f64>,
    pub temperature_high: Option<f64>,
    pub temperature_low: Option<f64>,
    pub humidity: Option<f64>,
    pub humidity_high: Option<f64>,
    pub humidity_low: Option<f64>,
    pub heat_index: Option<f64>,
    pub heat_index_high: Option<f64>,
    pub heat_index_low: Option<f64>,
    pub dew_point: Option<f64>,

    // Switch / power / relay
    pub state: Option<i64>,
    pub enabled: Option<bool>,
    pub connected: Option<i64>,
}

impl SensorReading {
    /// Reading label, falling back to `"Sensor {id}"`.
    pub fn display_label(&self) -> String {
        display_sensor_label(self.label.as_deref(), &self.sensor_id)
    }
}
