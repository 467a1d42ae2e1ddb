// sensorium-api: Async Rust client for the Sensorium telemetry API

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::{DEFAULT_BASE_URL, SensoriumClient};
pub use error::Error;
pub use models::{DeviceResponse, LiveReadingResponse, ReportRowResponse, SensorResponse};
pub use transport::{TlsMode, TransportConfig};
