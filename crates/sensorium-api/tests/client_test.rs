#![allow(clippy::unwrap_used)]
// Integration tests for `SensoriumClient` using wiremock.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sensorium_api::{Error, SensoriumClient, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, SensoriumClient) {
    let server = MockServer::start().await;
    let client = SensoriumClient::with_client(reqwest::Client::new(), &server.uri()).unwrap();
    (server, client)
}

// ── Devices ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_devices() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "deviceId": "RA-01",
                "deviceName": "Server Room",
                "serialNumber": "SN123",
                "firmwareVersion": "4.4.2",
                "ipv4Address": "10.0.0.20",
                "macAddress": "00:11:22:33:44:55",
                "httpPort": 80
            },
            { "deviceId": 42 }
        ])))
        .mount(&server)
        .await;

    let devices = client.list_devices().await.unwrap();

    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0].device_id, "RA-01");
    assert_eq!(devices[0].device_name.as_deref(), Some("Server Room"));
    assert_eq!(devices[0].http_port, Some(json!(80)));
    assert_eq!(devices[1].device_id, "42");
    assert!(devices[1].device_name.is_none());
}

#[tokio::test]
async fn test_live_devices_uses_live_prefix() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/live/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "deviceId": "RA-01" }])))
        .expect(1)
        .mount(&server)
        .await;

    let devices = client.live_devices().await.unwrap();
    assert_eq!(devices.len(), 1);
}

// ── Sensors ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_sensors_for_device() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/sensors/RA-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "sensorId": "1", "label": "Rack A" },
            { "sensorId": 2, "label": null }
        ])))
        .mount(&server)
        .await;

    let sensors = client.list_sensors("RA-01").await.unwrap();

    assert_eq!(sensors.len(), 2);
    assert_eq!(sensors[0].label.as_deref(), Some("Rack A"));
    assert_eq!(sensors[1].sensor_id, "2");
    assert!(sensors[1].label.is_none());
}

// ── Live readings ───────────────────────────────────────────────────

#[tokio::test]
async fn test_live_readings_by_category_slug() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/live/digital-sensors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "sensorId": "1",
                "deviceId": "RA-01",
                "label": "Rack A",
                "active": true,
                "temperature": 21.34,
                "temperatureHigh": 24.0,
                "temperatureLow": 18.5,
                "humidity": 40.2,
                "heatIndex": 21.0,
                "dewPoint": 7.4
            }
        ])))
        .mount(&server)
        .await;

    let readings = client.live_readings("digital-sensors").await.unwrap();

    assert_eq!(readings.len(), 1);
    let r = &readings[0];
    assert_eq!(r.temperature, Some(21.34));
    assert_eq!(r.temperature_high, Some(24.0));
    assert_eq!(r.humidity_high, None);
    assert_eq!(r.dew_point, Some(7.4));
    assert_eq!(r.active, Some(json!(true)));
}

// ── Reports ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_report_sends_query_parameters() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/reports"))
        .and(query_param("deviceId", "RA-01"))
        .and(query_param("sensorId", "1"))
        .and(query_param("period", "weekly"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "period": "2024-03-04T00:00:00",
                "minTemp": 18.0,
                "avgTemp": 20.5,
                "maxTemp": 23.25,
                "avgHumidity": null
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let rows = client.report("RA-01", "1", "weekly").await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].max_temp, Some(23.25));
    assert_eq!(rows[0].avg_humidity, None);
}

// ── Errors ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_server_error_maps_to_api_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database offline"))
        .mount(&server)
        .await;

    let result = client.list_devices().await;

    match result {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "database offline");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_maps_to_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/live/power-sensors"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client.live_readings("power-sensors").await;

    match result {
        Err(Error::Deserialization { body, .. }) => assert_eq!(body, "<html>oops</html>"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_slow_response_maps_to_timeout() {
    let server = MockServer::start().await;
    let transport = TransportConfig {
        timeout: Duration::from_millis(200),
        ..TransportConfig::default()
    };
    let client = SensoriumClient::new(&server.uri(), &transport).unwrap();

    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let result = client.list_devices().await;

    assert!(
        matches!(result, Err(Error::Timeout { .. })),
        "expected Timeout error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let server = MockServer::start().await;
    let transport =
        TransportConfig::default().with_token(secrecy::SecretString::from("s3cret".to_string()));
    let client = SensoriumClient::new(&server.uri(), &transport).unwrap();

    Mock::given(method("GET"))
        .and(path("/devices"))
        .and(header("authorization", "Bearer s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let devices = client.list_devices().await.unwrap();
    assert!(devices.is_empty());
}
