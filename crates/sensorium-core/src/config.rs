// ── Runtime dashboard configuration ──
//
// Describes *where* the telemetry API lives and how often to poll it.
// Never touches disk: the CLI/TUI resolve profiles and hand one of these in.

use std::time::Duration;

use secrecy::SecretString;
use sensorium_api::{TlsMode, TransportConfig};

/// Connection and polling settings for a [`Dashboard`](crate::Dashboard).
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// API root, e.g. `https://sensorium-api.vercel.app/api`.
    pub api_url: String,
    /// Optional bearer token.
    pub token: Option<SecretString>,
    /// TLS verification strategy.
    pub tls: TlsMode,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Interval between live poll cycles.
    pub poll_interval: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: sensorium_api::DEFAULT_BASE_URL.to_owned(),
            token: None,
            tls: TlsMode::default(),
            timeout: Duration::from_secs(30),
            poll_interval: Duration::from_secs(5),
        }
    }
}

impl DashboardConfig {
    /// Transport settings for the HTTP client.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls.clone(),
            timeout: self.timeout,
            token: self.token.clone(),
        }
    }
}
