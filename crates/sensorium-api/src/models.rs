// Wire types for the telemetry API.
//
// These mirror the JSON payloads exactly (camelCase keys, loose typing).
// Identifiers and labels may arrive as strings or numbers and numeric readings
// may be numbers, numeric strings, or null, so the lenient deserializers below
// normalize them. A field of the wrong shape decodes as absent, never as an
// error. Fields whose meaning depends on loose comparison
// (`state`, `connected`, `active`, `enabled`, `period`, `httpPort`) stay as
// raw `serde_json::Value` and are interpreted by `sensorium-core`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Device metadata from `/devices` and `/live/devices`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceResponse {
    #[serde(default, deserialize_with = "lenient::id")]
    pub device_id: String,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub device_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub serial_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub firmware_version: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub ipv4_address: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub mac_address: Option<String>,
    #[serde(default)]
    pub http_port: Option<Value>,
}

/// Sensor descriptor from `/sensors/{deviceId}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorResponse {
    #[serde(default, deserialize_with = "lenient::id")]
    pub sensor_id: String,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub label: Option<String>,
}

/// One live reading from `/live/{category}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveReadingResponse {
    #[serde(default, deserialize_with = "lenient::id")]
    pub sensor_id: String,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub device_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub label: Option<String>,
    #[serde(default)]
    pub active: Option<Value>,

    // ── Digital ──────────────────────────────────────────────────────
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub temperature_high: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub temperature_low: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub humidity: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub humidity_high: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub humidity_low: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub heat_index: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub heat_index_high: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub heat_index_low: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub dew_point: Option<f64>,

    // ── Switch / power / relay ───────────────────────────────────────
    #[serde(default)]
    pub state: Option<Value>,
    #[serde(default)]
    pub enabled: Option<Value>,
    #[serde(default)]
    pub connected: Option<Value>,
}

/// One aggregate row from `/reports`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRowResponse {
    #[serde(default)]
    pub period: Value,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub min_temp: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub avg_temp: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub max_temp: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub avg_humidity: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub avg_heat_index: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub avg_dew_point: Option<f64>,
}

pub(crate) mod lenient {
    use super::{Deserialize, Deserializer, Value};

    fn value_to_text(value: Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// String or number identifier. Anything else is an empty id.
    pub fn id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(opt_text(d)?.unwrap_or_default())
    }

    /// String, or a number rendered as text; null and other shapes map to `None`.
    pub fn opt_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(Option::<Value>::deserialize(d)?.and_then(value_to_text))
    }

    /// Number or numeric string; null and anything else map to `None`.
    pub fn opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;

    use super::*;

    #[test]
    fn reading_accepts_numeric_ids_and_string_numbers() {
        let reading: LiveReadingResponse = serde_json::from_value(json!({
            "sensorId": 7,
            "deviceId": "dev-1",
            "temperature": "21.5",
            "humidity": null,
            "state": 1
        }))
        .unwrap();

        assert_eq!(reading.sensor_id, "7");
        assert_eq!(reading.device_id.as_deref(), Some("dev-1"));
        assert_eq!(reading.temperature, Some(21.5));
        assert_eq!(reading.humidity, None);
        assert_eq!(reading.heat_index, None);
        assert_eq!(reading.state, Some(json!(1)));
    }

    #[test]
    fn reading_without_sensor_id_gets_empty_id() {
        let reading: LiveReadingResponse =
            serde_json::from_value(json!({ "deviceId": "d", "temperature": 20 })).unwrap();
        assert_eq!(reading.sensor_id, "");
        assert_eq!(reading.temperature, Some(20.0));
    }

    #[test]
    fn mistyped_text_fields_decode_as_absent_or_text() {
        let reading: LiveReadingResponse = serde_json::from_value(json!({
            "sensorId": { "nested": true },
            "label": 7,
            "deviceId": [1, 2]
        }))
        .unwrap();
        assert_eq!(reading.sensor_id, "");
        assert_eq!(reading.label.as_deref(), Some("7"));
        assert_eq!(reading.device_id, None);

        let device: DeviceResponse = serde_json::from_value(json!({
            "deviceId": 3,
            "deviceName": false,
            "macAddress": null
        }))
        .unwrap();
        assert_eq!(device.device_id, "3");
        assert_eq!(device.device_name, None);
        assert_eq!(device.mac_address, None);
    }

    #[test]
    fn report_row_keeps_nulls_as_none() {
        let row: ReportRowResponse = serde_json::from_value(json!({
            "period": "2024-03-01T10:00:00",
            "minTemp": 10.125,
            "avgTemp": null
        }))
        .unwrap();

        assert_eq!(row.min_temp, Some(10.125));
        assert_eq!(row.avg_temp, None);
        assert_eq!(row.avg_dew_point, None);
        assert_eq!(row.period, json!("2024-03-01T10:00:00"));
    }
}
