// ── Core error types ──
//
// User-facing errors from sensorium-core. Consumers never see raw HTTP
// status handling or JSON parse failures; the `From<sensorium_api::Error>`
// impl translates transport-layer errors into domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach telemetry API at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Telemetry API timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Not found: {identifier}")]
    NotFound { identifier: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Export errors ────────────────────────────────────────────────
    #[error("Export failed: {message}")]
    Export { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Short message suitable for a status line.
    pub fn summary(&self) -> String {
        match self {
            Self::ConnectionFailed { .. } => "connection failed".into(),
            Self::Timeout { .. } => "request timed out".into(),
            Self::Api {
                status: Some(status),
                ..
            } => format!("HTTP {status}"),
            other => other.to_string(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<sensorium_api::Error> for CoreError {
    fn from(err: sensorium_api::Error) -> Self {
        match err {
            sensorium_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(ToString::to_string)
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            sensorium_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            sensorium_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            sensorium_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            sensorium_api::Error::InvalidToken(msg) => CoreError::Config {
                message: format!("Invalid API token: {msg}"),
            },
            sensorium_api::Error::Api { status: 404, message } => CoreError::NotFound {
                identifier: if message.is_empty() {
                    "resource".into()
                } else {
                    message
                },
            },
            sensorium_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            sensorium_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for CoreError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        CoreError::Export {
            message: err.to_string(),
        }
    }
}
