//! sensorium-core: domain layer between `sensorium-api` and the front ends.
//!
//! Converts wire payloads into the domain model, groups live readings by
//! device, decides what each sensor card shows, formats report periods and
//! exports, and runs the live polling loop. The CLI and TUI only talk to
//! [`Dashboard`] and the pure functions re-exported here.

pub mod config;
pub mod convert;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod format;
pub mod grouping;
pub mod model;
pub mod overview;
pub mod poller;
pub mod presentation;
pub mod report;
pub mod source;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use error::CoreError;
pub use source::DataSource;

pub use export::{EXPORT_COLUMNS, ExportRecord, export_file_name, to_export_rows, write_workbook};
pub use format::{reading_value, stat_value, to_fixed};
pub use grouping::{DeviceGroup, ReadingGroups, device_groups, group_by_device, index_devices};
pub use overview::load_overview;
pub use poller::{
    DEFAULT_POLL_INTERVAL, GenerationGuard, LivePoller, LiveSnapshot, LiveState, PollStatus,
};
pub use presentation::{DisplayField, FieldKind, Range, renderable_fields};
pub use report::{
    ChartSeries, chart_series, format_axis_tick, format_period_label, format_tooltip,
    period_code, period_label_lines,
};
pub use view::{Navigation, Page, ViewState, reduce};

pub use sensorium_api::{DEFAULT_BASE_URL, TlsMode};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Device, OverviewSummary, PeriodStamp, ReportPeriod, ReportRow, SensorCategory,
    SensorDescriptor, SensorReading,
};
