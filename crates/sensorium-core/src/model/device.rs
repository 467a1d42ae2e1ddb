// ── Devices and sensor descriptors ──

use serde::{Deserialize, Serialize};

/// A physical monitoring unit that hosts sensors.
///
/// Identity is [`id`](Self::id). Every descriptive field is optional because
/// the API omits whatever a unit does not report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: String,
    pub name: Option<String>,
    pub serial_number: Option<String>,
    pub firmware_version: Option<String>,
    pub ipv4_address: Option<String>,
    pub mac_address: Option<String>,
    pub http_port: Option<u16>,
}

impl Device {
    /// The empty record used when a reading references a device with no metadata.
    pub fn placeholder(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Device name, falling back to `"Device {id}"`.
    pub fn display_name(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ if self.id.is_empty() => "Unknown device".to_owned(),
            _ => format!("Device {}", self.id),
        }
    }

    /// Labelled info-card lines. Missing values render as `"-"`.
    pub fn info_lines(&self) -> [(&'static str, String); 5] {
        let text = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".into());
        [
            ("Serial Number", text(&self.serial_number)),
            ("Firmware Version", text(&self.firmware_version)),
            ("IPv4 Address", text(&self.ipv4_address)),
            ("MAC Address", text(&self.mac_address)),
            (
                "Port",
                self.http_port
                    .map_or_else(|| "-".into(), |port| port.to_string()),
            ),
        ]
    }
}

/// A sensor attached to a device, as listed by `/sensors/{deviceId}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorDescriptor {
    pub id: String,
    pub label: Option<String>,
}

impl SensorDescriptor {
    /// Sensor label, falling back to `"Sensor {id}"`.
    pub fn display_label(&self) -> String {
        display_sensor_label(self.label.as_deref(), &self.id)
    }
}

pub(crate) fn display_sensor_label(label: Option<&str>, id: &str) -> String {
    match label {
        Some(label) if !label.is_empty() => label.to_owned(),
        _ => format!("Sensor {id}"),
    }
}
