// Async HTTP client for the Sensorium telemetry API.
//
// Base path: configurable, defaults to https://sensorium-api.vercel.app/api
// Auth: optional bearer token (injected as a default header by TransportConfig)

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::models::{DeviceResponse, LiveReadingResponse, ReportRowResponse, SensorResponse};
use crate::transport::TransportConfig;

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://sensorium-api.vercel.app/api";

const BODY_PREVIEW_LEN: usize = 200;

/// Async client for the telemetry API.
///
/// Every endpoint is a JSON GET returning a bare array. Path segments are
/// percent-encoded, so device and sensor identifiers can contain any
/// characters. Array elements are decoded one at a time: an element that
/// does not decode is logged and skipped, and the rest still come through.
#[derive(Debug, Clone)]
pub struct SensoriumClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl SensoriumClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for `base_url` using the shared transport settings.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            timeout: transport.timeout,
        })
    }

    /// Wrap an existing `reqwest::Client` (caller manages headers and TLS).
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            timeout: TransportConfig::default().timeout,
        })
    }

    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let url = Url::parse(raw.trim())?;
        if url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }
        Ok(url)
    }

    /// The API root this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Base URLs are validated in the constructor, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    // ── HTTP ─────────────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {url}");
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.handle_response(resp).await
    }

    async fn get_with_params<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&str, &str)],
    ) -> Result<T, Error> {
        debug!("GET {url} params={params:?}");
        let resp = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.handle_response(resp).await
    }

    async fn get_records<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, Error> {
        let raw: Vec<Value> = self.get(url).await?;
        Ok(decode_records(raw))
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Transport(err)
        }
    }

    async fn handle_response<T: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: preview(&body).to_owned(),
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        })
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// `GET /devices`
    pub async fn list_devices(&self) -> Result<Vec<DeviceResponse>, Error> {
        self.get_records(self.endpoint(&["devices"])).await
    }

    /// `GET /sensors/{deviceId}`
    pub async fn list_sensors(&self, device_id: &str) -> Result<Vec<SensorResponse>, Error> {
        self.get_records(self.endpoint(&["sensors", device_id])).await
    }

    /// `GET /live/{categorySlug}`
    pub async fn live_readings(&self, category_slug: &str) -> Result<Vec<LiveReadingResponse>, Error> {
        self.get_records(self.endpoint(&["live", category_slug])).await
    }

    /// `GET /live/devices`
    pub async fn live_devices(&self) -> Result<Vec<DeviceResponse>, Error> {
        self.get_records(self.endpoint(&["live", "devices"])).await
    }

    /// `GET /reports?deviceId&sensorId&period`
    pub async fn report(
        &self,
        device_id: &str,
        sensor_id: &str,
        period: &str,
    ) -> Result<Vec<ReportRowResponse>, Error> {
        let raw: Vec<Value> = self
            .get_with_params(
                self.endpoint(&["reports"]),
                &[
                    ("deviceId", device_id),
                    ("sensorId", sensor_id),
                    ("period", period),
                ],
            )
            .await?;
        Ok(decode_records(raw))
    }
}

/// Decode each element on its own, skipping the ones that do not fit `T`.
fn decode_records<T: DeserializeOwned>(raw: Vec<Value>) -> Vec<T> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(index, error = %e, "skipping malformed record");
                None
            }
        })
        .collect()
}

/// First few hundred bytes of a body, cut on a char boundary.
fn preview(body: &str) -> &str {
    if body.len() <= BODY_PREVIEW_LEN {
        return body;
    }
    let mut end = BODY_PREVIEW_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body.get(..end).unwrap_or(body)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn client(base: &str) -> SensoriumClient {
        SensoriumClient::with_client(reqwest::Client::new(), base).unwrap()
    }

    #[test]
    fn endpoint_appends_below_api_prefix() {
        let c = client("https://sensorium-api.vercel.app/api");
        assert_eq!(
            c.endpoint(&["live", "digital-sensors"]).as_str(),
            "https://sensorium-api.vercel.app/api/live/digital-sensors"
        );
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let c = client("http://localhost:8080/api/");
        assert_eq!(
            c.endpoint(&["devices"]).as_str(),
            "http://localhost:8080/api/devices"
        );
    }

    #[test]
    fn endpoint_encodes_identifiers() {
        let c = client("http://localhost:8080");
        assert_eq!(
            c.endpoint(&["sensors", "room alert/1"]).as_str(),
            "http://localhost:8080/sensors/room%20alert%2F1"
        );
    }

    #[test]
    fn rejects_non_hierarchical_base() {
        let result = SensoriumClient::with_client(reqwest::Client::new(), "mailto:ops@example.com");
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn decode_records_skips_elements_that_are_not_records() {
        let raw = vec![
            serde_json::json!({ "sensorId": 1, "label": "Rack A" }),
            Value::Null,
            serde_json::json!("garbage"),
            serde_json::json!({ "label": 7 }),
        ];
        let sensors: Vec<crate::models::SensorResponse> = decode_records(raw);

        assert_eq!(sensors.len(), 2);
        assert_eq!(sensors[0].label.as_deref(), Some("Rack A"));
        assert_eq!(sensors[1].sensor_id, "");
        assert_eq!(sensors[1].label.as_deref(), Some("7"));
    }

    #[test]
    fn preview_cuts_on_char_boundary() {
        let body = "é".repeat(150);
        let p = preview(&body);
        assert!(p.len() <= BODY_PREVIEW_LEN);
        assert!(body.starts_with(p));
    }
}
