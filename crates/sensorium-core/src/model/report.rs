// ── Report aggregates ──

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Serialize, Serializer};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Start of an aggregation bucket.
///
/// Timestamps are kept as local wall-clock time. Anything the parser does
/// not recognize is carried verbatim and rendered as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodStamp {
    At(NaiveDateTime),
    Raw(String),
}

impl PeriodStamp {
    /// Parse an API timestamp.
    ///
    /// RFC 3339 values with an offset are converted to local time; naive
    /// date-times are taken as local already; a bare date means midnight.
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Self::At(dt.with_timezone(&Local).naive_local());
        }
        for fmt in NAIVE_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Self::At(dt);
            }
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Self::At(date.and_time(NaiveTime::MIN));
        }
        Self::Raw(raw.to_owned())
    }

    /// Interpret milliseconds since the Unix epoch, in local time.
    pub fn from_epoch_millis(ms: i64) -> Self {
        DateTime::from_timestamp_millis(ms).map_or_else(
            || Self::Raw(ms.to_string()),
            |dt| Self::At(dt.with_timezone(&Local).naive_local()),
        )
    }
}

impl Serialize for PeriodStamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::At(dt) => serializer.collect_str(&dt.format("%Y-%m-%dT%H:%M:%S")),
            Self::Raw(raw) => serializer.serialize_str(raw),
        }
    }
}

/// One aggregate bucket from `/reports`. Missing statistics stay `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub period: PeriodStamp,
    pub min_temp: Option<f64>,
    pub avg_temp: Option<f64>,
    pub max_temp: Option<f64>,
    pub avg_humidity: Option<f64>,
    pub avg_heat_index: Option<f64>,
    pub avg_dew_point: Option<f64>,
}

impl ReportRow {
    /// A row with only a period set.
    pub fn empty(period: PeriodStamp) -> Self {
        Self {
            period,
            min_temp: None,
            avg_temp: None,
            max_temp: None,
            avg_humidity: None,
            avg_heat_index: None,
            avg_dew_point: None,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use chrono::{TimeZone, Utc};

    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> PeriodStamp {
        PeriodStamp::At(
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(h, min, 0)
                .unwrap(),
        )
    }

    #[test]
    fn naive_timestamps_are_wall_clock() {
        assert_eq!(PeriodStamp::parse("2024-03-01T14:05:00"), at(2024, 3, 1, 14, 5));
        assert_eq!(PeriodStamp::parse("2024-03-01 14:05:00"), at(2024, 3, 1, 14, 5));
        assert_eq!(
            PeriodStamp::parse("2024-03-01T14:05:00.250"),
            PeriodStamp::At(
                NaiveDate::from_ymd_opt(2024, 3, 1)
                    .unwrap()
                    .and_hms_milli_opt(14, 5, 0, 250)
                    .unwrap()
            )
        );
    }

    #[test]
    fn bare_date_is_midnight() {
        assert_eq!(PeriodStamp::parse("2024-03-04"), at(2024, 3, 4, 0, 0));
    }

    #[test]
    fn offset_timestamps_convert_to_local() {
        let expected = Utc
            .with_ymd_and_hms(2024, 3, 1, 10, 0, 0)
            .unwrap()
            .with_timezone(&Local)
            .naive_local();
        assert_eq!(
            PeriodStamp::parse("2024-03-01T10:00:00Z"),
            PeriodStamp::At(expected)
        );
        assert_eq!(
            PeriodStamp::from_epoch_millis(1_709_287_200_000),
            PeriodStamp::At(expected)
        );
    }

    #[test]
    fn garbage_is_kept_raw() {
        assert_eq!(
            PeriodStamp::parse("week 9"),
            PeriodStamp::Raw("week 9".into())
        );
    }

    #[test]
    fn serializes_as_iso_string() {
        let row = ReportRow::empty(at(2024, 3, 1, 9, 30));
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["period"], "2024-03-01T09:30:00");
        assert!(json["avgTemp"].is_null());
    }
}
