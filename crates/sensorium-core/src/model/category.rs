// ── Sensor categories and report periods ──
//
// Closed enumerations replace the UI label strings used as dispatch keys.
// Labels, URL slugs, and backend codes are all derived from these.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::EnumIter;
use thiserror::Error;

/// The six sensor families the telemetry API serves live data for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "kebab-case")]
pub enum SensorCategory {
    Digital,
    Analog,
    Switch,
    InternalRelay,
    ExternalRelay,
    Power,
}

impl SensorCategory {
    /// Sidebar label, e.g. `"Digital Sensors"`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Digital => "Digital Sensors",
            Self::Analog => "Analog Sensors",
            Self::Switch => "Switch Sensors",
            Self::InternalRelay => "Internal Relays",
            Self::ExternalRelay => "External Relays",
            Self::Power => "Power Sensors",
        }
    }

    /// Path segment for `/live/{slug}`: the label lowercased with spaces as hyphens.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Digital => "digital-sensors",
            Self::Analog => "analog-sensors",
            Self::Switch => "switch-sensors",
            Self::InternalRelay => "internal-relays",
            Self::ExternalRelay => "external-relays",
            Self::Power => "power-sensors",
        }
    }

    /// Whether readings of this category carry a relay-style `state` flag.
    pub fn is_relay(self) -> bool {
        matches!(self, Self::InternalRelay | Self::ExternalRelay)
    }
}

impl fmt::Display for SensorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unrecognized category or period name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{input}'")]
pub struct ParseLabelError {
    kind: &'static str,
    input: String,
}

impl FromStr for SensorCategory {
    type Err = ParseLabelError;

    /// Accepts the label (`Digital Sensors`), the slug (`digital-sensors`),
    /// or the short name (`digital`, `internal-relay`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = slugify(s);
        let found = match normalized.as_str() {
            "digital-sensors" | "digital" => Some(Self::Digital),
            "analog-sensors" | "analog" => Some(Self::Analog),
            "switch-sensors" | "switch" => Some(Self::Switch),
            "internal-relays" | "internal-relay" | "internal" => Some(Self::InternalRelay),
            "external-relays" | "external-relay" | "external" => Some(Self::ExternalRelay),
            "power-sensors" | "power" => Some(Self::Power),
            _ => None,
        };
        found.ok_or_else(|| ParseLabelError {
            kind: "sensor category",
            input: s.to_owned(),
        })
    }
}

/// Lowercase a label and join its words with hyphens.
pub fn slugify(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

// ── Report periods ──────────────────────────────────────────────────

/// Aggregation granularity for historical reports.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl ReportPeriod {
    /// Sidebar label, e.g. `"Daily Report"`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Daily => "Daily Report",
            Self::Weekly => "Weekly Report",
            Self::Monthly => "Monthly Report",
        }
    }

    /// Backend `period` query value.
    pub fn code(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// Map a sidebar label to its period. Only the exact labels match.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Daily Report" => Some(Self::Daily),
            "Weekly Report" => Some(Self::Weekly),
            "Monthly Report" => Some(Self::Monthly),
            _ => None,
        }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ReportPeriod {
    type Err = ParseLabelError;

    /// Accepts the label or the backend code, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match slugify(s).as_str() {
            "daily" | "daily-report" => Ok(Self::Daily),
            "weekly" | "weekly-report" => Ok(Self::Weekly),
            "monthly" | "monthly-report" => Ok(Self::Monthly),
            _ => Err(ParseLabelError {
                kind: "report period",
                input: s.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn slug_is_label_lowercased_and_hyphenated() {
        for category in SensorCategory::iter() {
            assert_eq!(category.slug(), slugify(category.label()));
        }
        assert_eq!(SensorCategory::Digital.slug(), "digital-sensors");
    }

    #[test]
    fn category_parses_from_label_slug_or_short_name() {
        assert_eq!(
            "Internal Relays".parse::<SensorCategory>().unwrap(),
            SensorCategory::InternalRelay
        );
        assert_eq!(
            "power-sensors".parse::<SensorCategory>().unwrap(),
            SensorCategory::Power
        );
        assert_eq!(
            "SWITCH".parse::<SensorCategory>().unwrap(),
            SensorCategory::Switch
        );
        assert!("thermostat".parse::<SensorCategory>().is_err());
    }

    #[test]
    fn period_labels_round_trip() {
        for period in ReportPeriod::iter() {
            assert_eq!(ReportPeriod::from_label(period.label()), Some(period));
        }
        assert_eq!(ReportPeriod::from_label("daily report"), None);
        assert_eq!(ReportPeriod::from_label("Unknown"), None);
    }

    #[test]
    fn period_parses_code_or_label() {
        assert_eq!("weekly".parse::<ReportPeriod>().unwrap(), ReportPeriod::Weekly);
        assert_eq!(
            "Monthly Report".parse::<ReportPeriod>().unwrap(),
            ReportPeriod::Monthly
        );
        let err = "hourly".parse::<ReportPeriod>().unwrap_err();
        assert_eq!(err.to_string(), "unknown report period 'hourly'");
    }
}
