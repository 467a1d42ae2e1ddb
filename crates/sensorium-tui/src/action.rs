//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::sync::Arc;

use sensorium_core::{
    Device, LiveState, Navigation, OverviewSummary, ReportPeriod, ReportRow, SensorDescriptor,
};

/// One fetched report, tagged with the request that produced it.
#[derive(Debug, Clone)]
pub struct ReportData {
    pub generation: u64,
    pub device_id: String,
    pub sensor_id: String,
    pub period: ReportPeriod,
    pub rows: Arc<Vec<ReportRow>>,
}

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A toast notification.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Warning,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    Navigate(Navigation),
    ToggleFocus,
    ToggleHelp,

    // ── Overview ──────────────────────────────────────────────────
    RefreshOverview,
    OverviewLoaded(OverviewSummary),
    OverviewFailed(String),

    // ── Live readings (from the poller bridge) ────────────────────
    LiveUpdated(LiveState),

    // ── Reports ───────────────────────────────────────────────────
    DevicesLoaded(Vec<Device>),
    DevicesFailed(String),
    SelectReportDevice(String),
    SensorsLoaded {
        device_id: String,
        sensors: Vec<SensorDescriptor>,
    },
    SelectReportSensor {
        device_id: String,
        sensor_id: String,
    },
    ReportLoaded(ReportData),
    ReportFailed(String),
    ExportReport,

    // ── Notifications ─────────────────────────────────────────────
    Notify(Notification),
}
