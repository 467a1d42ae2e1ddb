// ── API-to-domain type conversions ──
//
// Bridges raw `sensorium_api` response types into canonical
// `sensorium_core::model` types. Loosely typed wire values (`state`,
// `connected`, `active`, `enabled`, `period`, `httpPort`) are interpreted
// here so nothing downstream sees a `serde_json::Value`.

use serde_json::Value;

use sensorium_api::{DeviceResponse, LiveReadingResponse, ReportRowResponse, SensorResponse};

use crate::model::{Device, PeriodStamp, ReportRow, SensorDescriptor, SensorReading};

// ── Helpers ────────────────────────────────────────────────────────

/// Whole numbers only; `1.5` or NaN map to 0 so they never compare equal to 1.
#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
fn exact_int(value: f64) -> i64 {
    if value.fract() == 0.0 && value.is_finite() {
        value as i64
    } else {
        0
    }
}

/// Interpret a flag-like value as an integer.
///
/// Booleans map to 1/0, whole numbers and numeric strings keep their value,
/// and any other present value (fractions included) maps to 0. `null` is
/// absent.
fn loose_int(value: Option<Value>) -> Option<i64> {
    match value? {
        Value::Null => None,
        Value::Bool(b) => Some(i64::from(b)),
        Value::Number(n) => Some(n.as_i64().unwrap_or_else(|| n.as_f64().map_or(0, exact_int))),
        Value::String(s) => Some(s.trim().parse::<f64>().map_or(0, exact_int)),
        Value::Array(_) | Value::Object(_) => Some(0),
    }
}

/// Only a literal `true` counts as enabled. `null` is absent.
fn strict_bool(value: Option<Value>) -> Option<bool> {
    match value? {
        Value::Null => None,
        Value::Bool(b) => Some(b),
        _ => Some(false),
    }
}

/// Truthiness for the `active` indicator.
fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

fn parse_port(value: Option<&Value>) -> Option<u16> {
    match value? {
        Value::Number(n) => n.as_u64().and_then(|p| u16::try_from(p).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_period(value: &Value) -> PeriodStamp {
    match value {
        Value::String(s) => PeriodStamp::parse(s),
        Value::Number(n) => n.as_i64().map_or_else(
            || PeriodStamp::Raw(n.to_string()),
            PeriodStamp::from_epoch_millis,
        ),
        Value::Null => PeriodStamp::Raw(String::new()),
        other => PeriodStamp::Raw(other.to_string()),
    }
}

// ── Device ─────────────────────────────────────────────────────────

impl From<DeviceResponse> for Device {
    fn from(d: DeviceResponse) -> Self {
        Device {
            http_port: parse_port(d.http_port.as_ref()),
            id: d.device_id,
            name: d.device_name,
            serial_number: d.serial_number,
            firmware_version: d.firmware_version,
            ipv4_address: d.ipv4_address,
            mac_address: d.mac_address,
        }
    }
}

impl From<SensorResponse> for SensorDescriptor {
    fn from(s: SensorResponse) -> Self {
        SensorDescriptor {
            id: s.sensor_id,
            label: s.label,
        }
    }
}

// ── Live reading ───────────────────────────────────────────────────

impl From<LiveReadingResponse> for SensorReading {
    fn from(r: LiveReadingResponse) -> Self {
        SensorReading {
            active: truthy(r.active.as_ref()),
            sensor_id: r.sensor_id,
            device_id: r.device_id.unwrap_or_default(),
            label: r.label,
            temperature: r.temperature,
            temperature_high: r.temperature_high,
            temperature_low: r.temperature_low,
            humidity: r.humidity,
            humidity_high: r.humidity_high,
            humidity_low: r.humidity_low,
            heat_index: r.heat_index,
            heat_index_high: r.heat_index_high,
            heat_index_low: r.heat_index_low,
            dew_point: r.dew_point,
            state: loose_int(r.state),
            enabled: strict_bool(r.enabled),
            connected: loose_int(r.connected),
        }
    }
}

// ── Report row ─────────────────────────────────────────────────────

impl From<ReportRowResponse> for ReportRow {
    fn from(r: ReportRowResponse) -> Self {
        ReportRow {
            period: parse_period(&r.period),
            min_temp: r.min_temp,
            avg_temp: r.avg_temp,
            max_temp: r.max_temp,
            avg_humidity: r.avg_humidity,
            avg_heat_index: r.avg_heat_index,
            avg_dew_point: r.avg_dew_point,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;

    use super::*;

    fn reading(value: serde_json::Value) -> SensorReading {
        serde_json::from_value::<LiveReadingResponse>(value)
            .unwrap()
            .into()
    }

    #[test]
    fn state_accepts_numbers_booleans_and_strings() {
        assert_eq!(reading(json!({"sensorId": 1, "state": 1})).state, Some(1));
        assert_eq!(reading(json!({"sensorId": 1, "state": true})).state, Some(1));
        assert_eq!(reading(json!({"sensorId": 1, "state": false})).state, Some(0));
        assert_eq!(reading(json!({"sensorId": 1, "state": "1"})).state, Some(1));
        assert_eq!(reading(json!({"sensorId": 1, "state": "on"})).state, Some(0));
        assert_eq!(reading(json!({"sensorId": 1, "state": 1.0})).state, Some(1));
        assert_eq!(reading(json!({"sensorId": 1, "state": "1.0"})).state, Some(1));
        assert_eq!(reading(json!({"sensorId": 1, "state": null})).state, None);
        assert_eq!(reading(json!({"sensorId": 1})).state, None);
    }

    #[test]
    fn fractional_flags_are_not_on() {
        assert_eq!(reading(json!({"sensorId": 1, "state": 1.5})).state, Some(0));
        assert_eq!(reading(json!({"sensorId": 1, "state": "1.9"})).state, Some(0));
        assert_eq!(reading(json!({"sensorId": 1, "connected": 1.2})).connected, Some(0));
        assert_eq!(reading(json!({"sensorId": 1, "connected": "NaN"})).connected, Some(0));
    }

    #[test]
    fn enabled_is_true_only_for_literal_true() {
        assert_eq!(reading(json!({"sensorId": 1, "enabled": true})).enabled, Some(true));
        assert_eq!(reading(json!({"sensorId": 1, "enabled": 1})).enabled, Some(false));
        assert_eq!(reading(json!({"sensorId": 1})).enabled, None);
    }

    #[test]
    fn active_uses_truthiness() {
        assert!(reading(json!({"sensorId": 1, "active": true})).active);
        assert!(reading(json!({"sensorId": 1, "active": 1})).active);
        assert!(!reading(json!({"sensorId": 1, "active": 0})).active);
        assert!(!reading(json!({"sensorId": 1, "active": ""})).active);
        assert!(!reading(json!({"sensorId": 1})).active);
    }

    #[test]
    fn missing_device_id_groups_under_empty_key() {
        assert_eq!(reading(json!({"sensorId": 1})).device_id, "");
    }

    #[test]
    fn device_port_from_number_or_string() {
        let d: Device = serde_json::from_value::<DeviceResponse>(json!({
            "deviceId": "a", "httpPort": "8080"
        }))
        .unwrap()
        .into();
        assert_eq!(d.http_port, Some(8080));

        let d: Device = serde_json::from_value::<DeviceResponse>(json!({
            "deviceId": "a", "httpPort": 70000
        }))
        .unwrap()
        .into();
        assert_eq!(d.http_port, None);
    }

    #[test]
    fn period_from_string_number_or_other() {
        assert!(matches!(parse_period(&json!("2024-03-01T10:00:00")), PeriodStamp::At(_)));
        assert!(matches!(parse_period(&json!(1_709_287_200_000_i64)), PeriodStamp::At(_)));
        assert_eq!(parse_period(&json!(null)), PeriodStamp::Raw(String::new()));
        assert_eq!(parse_period(&json!("Q1")), PeriodStamp::Raw("Q1".into()));
    }
}
