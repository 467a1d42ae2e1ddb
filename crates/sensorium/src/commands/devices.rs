//! Device command handler.

use sensorium_core::{Dashboard, Device};
use tabled::Tabled;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Serial")]
    serial: String,
    #[tabled(rename = "Firmware")]
    firmware: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Port")]
    port: String,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".into());
        Self {
            id: d.id.clone(),
            name: d.display_name(),
            serial: text(&d.serial_number),
            firmware: text(&d.firmware_version),
            ip: text(&d.ipv4_address),
            mac: text(&d.mac_address),
            port: d.http_port.map_or_else(|| "-".into(), |p| p.to_string()),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(dashboard: &Dashboard, global: &GlobalOpts) -> Result<(), CliError> {
    let devices = dashboard.devices().await?;
    let out = output::render_list(&global.output, &devices, |d| DeviceRow::from(d), |d| d.id.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}
