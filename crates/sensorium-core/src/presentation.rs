// ── Sensor presentation model ──
//
// Decides which display blocks apply to a reading under a sensor category
// and renders their values. Pure and total: any reading yields a (possibly
// empty) list of fields.

use serde::Serialize;

use crate::format::{MISSING_READING, reading_value};
use crate::model::{SensorCategory, SensorReading};

/// The kind of a display block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FieldKind {
    Temperature,
    Humidity,
    HeatIndex,
    DewPoint,
    State,
    Status,
}

impl FieldKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Temperature => "Temperature",
            Self::Humidity => "Humidity",
            Self::HeatIndex => "Heat Index",
            Self::DewPoint => "Dew Point",
            Self::State => "State",
            Self::Status => "Status",
        }
    }

    /// Unit suffix, if the field is a measurement.
    pub fn unit(self) -> Option<&'static str> {
        match self {
            Self::Temperature | Self::HeatIndex | Self::DewPoint => Some("°C"),
            Self::Humidity => Some("%RH"),
            Self::State | Self::Status => None,
        }
    }
}

/// High/low watermarks for a measurement, already rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Range {
    pub high: String,
    pub low: String,
}

/// One rendered block on a sensor card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayField {
    pub kind: FieldKind,
    pub value: String,
    pub range: Option<Range>,
    /// `Some(true)` for an "on"/"open"/"connected" state.
    pub indicator: Option<bool>,
}

impl DisplayField {
    fn measurement(kind: FieldKind, value: Option<f64>, high: Option<f64>, low: Option<f64>) -> Self {
        Self {
            kind,
            value: reading_value(value),
            range: Some(Range {
                high: reading_value(high),
                low: reading_value(low),
            }),
            indicator: None,
        }
    }

    fn flag(kind: FieldKind, on: bool, on_text: &str, off_text: &str) -> Self {
        Self {
            kind,
            value: if on { on_text } else { off_text }.to_owned(),
            range: None,
            indicator: Some(on),
        }
    }

    /// Value with its unit, e.g. `"21.3 °C"`. `"N/A"` is shown bare.
    pub fn value_with_unit(&self) -> String {
        with_unit(&self.value, self.kind)
    }

    /// High/low with units, if the field has a range.
    pub fn range_with_unit(&self) -> Option<(String, String)> {
        self.range
            .as_ref()
            .map(|r| (with_unit(&r.high, self.kind), with_unit(&r.low, self.kind)))
    }
}

fn with_unit(value: &str, kind: FieldKind) -> String {
    match kind.unit() {
        Some(unit) if value != MISSING_READING => format!("{value} {unit}"),
        _ => value.to_owned(),
    }
}

/// Display blocks for `reading` under `category`, in card order.
///
/// The climate blocks are gated on data presence alone. The state/status
/// blocks depend on the category and on the relevant flag being present.
pub fn renderable_fields(reading: &SensorReading, category: SensorCategory) -> Vec<DisplayField> {
    let mut fields = Vec::new();

    if reading.temperature.is_some() && reading.humidity.is_some() {
        fields.push(DisplayField::measurement(
            FieldKind::Temperature,
            reading.temperature,
            reading.temperature_high,
            reading.temperature_low,
        ));
        fields.push(DisplayField::measurement(
            FieldKind::Humidity,
            reading.humidity,
            reading.humidity_high,
            reading.humidity_low,
        ));
        if reading.heat_index.is_some() {
            fields.push(DisplayField::measurement(
                FieldKind::HeatIndex,
                reading.heat_index,
                reading.heat_index_high,
                reading.heat_index_low,
            ));
        }
        if reading.dew_point.is_some() {
            fields.push(DisplayField {
                kind: FieldKind::DewPoint,
                value: reading_value(reading.dew_point),
                range: None,
                indicator: None,
            });
        }
    }

    match category {
        SensorCategory::Switch => {
            if reading.state.is_some() {
                let open = reading.enabled == Some(true);
                fields.push(DisplayField::flag(FieldKind::State, open, "OPEN", "CLOSED"));
            }
        }
        SensorCategory::Power => {
            if let Some(connected) = reading.connected {
                fields.push(DisplayField::flag(
                    FieldKind::Status,
                    connected == 1,
                    "Connected",
                    "Disconnected",
                ));
                fields.push(DisplayField::flag(
                    FieldKind::State,
                    reading.state == Some(1),
                    "ON",
                    "OFF",
                ));
            }
        }
        relay if relay.is_relay() => {
            if let Some(state) = reading.state {
                fields.push(DisplayField::flag(FieldKind::State, state == 1, "ON", "OFF"));
            }
        }
        _ => {}
    }

    fields
}
