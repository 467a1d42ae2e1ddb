// ── Report formatter ──
//
// Period label mapping plus every human-readable rendering of a report
// bucket's timestamp. Tables, exports, and charts all go through here so
// they agree on the text.

use serde::Serialize;

use crate::model::{PeriodStamp, ReportPeriod, ReportRow};

const DATE_FORMAT: &str = "%-m/%-d/%Y";
const TIME_FORMAT: &str = "%I:%M %p";
const TOOLTIP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Backend period code for a sidebar label; `None` for anything unmapped.
pub fn period_code(label: &str) -> Option<&'static str> {
    ReportPeriod::from_label(label).map(ReportPeriod::code)
}

/// Date line and optional time line for a bucket.
///
/// Daily buckets carry a 12-hour `hh:mm AM/PM` time; weekly and monthly
/// buckets are dated only. Unparsed stamps come back verbatim.
pub fn period_label_lines(stamp: &PeriodStamp, period: ReportPeriod) -> (String, Option<String>) {
    match stamp {
        PeriodStamp::At(dt) => {
            let date = dt.format(DATE_FORMAT).to_string();
            let time = (period == ReportPeriod::Daily).then(|| dt.format(TIME_FORMAT).to_string());
            (date, time)
        }
        PeriodStamp::Raw(raw) => (raw.clone(), None),
    }
}

/// Single-line period label, e.g. `"3/1/2024 02:05 PM"` or `"3/4/2024"`.
pub fn format_period_label(stamp: &PeriodStamp, period: ReportPeriod) -> String {
    match period_label_lines(stamp, period) {
        (date, Some(time)) => format!("{date} {time}"),
        (date, None) => date,
    }
}

/// Chart x-axis tick for a bucket.
pub fn format_axis_tick(stamp: &PeriodStamp, period: ReportPeriod) -> String {
    match stamp {
        PeriodStamp::At(dt) => {
            let fmt = match period {
                ReportPeriod::Daily => TIME_FORMAT,
                ReportPeriod::Weekly => "%b %-d",
                ReportPeriod::Monthly => "%b %Y",
            };
            dt.format(fmt).to_string()
        }
        PeriodStamp::Raw(raw) => raw.clone(),
    }
}

/// Full date and time, regardless of period.
pub fn format_tooltip(stamp: &PeriodStamp) -> String {
    match stamp {
        PeriodStamp::At(dt) => dt.format(TOOLTIP_FORMAT).to_string(),
        PeriodStamp::Raw(raw) => raw.clone(),
    }
}

// ── Chart series ────────────────────────────────────────────────────

/// One line on the report chart. Points are `(row index, value)`; rows
/// without a value are skipped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub name: &'static str,
    pub points: Vec<(f64, f64)>,
}

/// The averaged statistics plotted on the report chart.
pub fn chart_series(rows: &[ReportRow]) -> Vec<ChartSeries> {
    let series: [(&'static str, fn(&ReportRow) -> Option<f64>); 4] = [
        ("Avg Temp", |r| r.avg_temp),
        ("Avg Humidity", |r| r.avg_humidity),
        ("Avg Heat Index", |r| r.avg_heat_index),
        ("Avg Dew Point", |r| r.avg_dew_point),
    ];

    series
        .into_iter()
        .map(|(name, pick)| ChartSeries {
            name,
            points: rows
                .iter()
                .enumerate()
                .filter_map(|(i, row)| pick(row).map(|v| (index_x(i), v)))
                .collect(),
        })
        .collect()
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn index_x(i: usize) -> f64 {
    i as f64
}
