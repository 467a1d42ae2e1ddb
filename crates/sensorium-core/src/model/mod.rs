// ── Domain model ──
//
// Canonical types consumed by the CLI and TUI. Wire payloads are converted
// into these in `crate::convert`.

pub mod category;
pub mod device;
pub mod reading;
pub mod report;

pub use category::{ParseLabelError, ReportPeriod, SensorCategory, slugify};
pub use device::{Device, SensorDescriptor};
pub use reading::SensorReading;
pub use report::{PeriodStamp, ReportRow};

use chrono::{DateTime, Local};
use serde::Serialize;

/// Fleet-wide summary shown on the dashboard overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewSummary {
    pub total_devices: usize,
    pub total_sensors: usize,
    /// Mean of the live digital temperatures that were reported.
    pub average_temperature: Option<f64>,
    /// Mean of the live digital humidities that were reported.
    pub average_humidity: Option<f64>,
    pub updated_at: DateTime<Local>,
}
