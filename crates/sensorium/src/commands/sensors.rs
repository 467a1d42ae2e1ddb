//! Sensor listing for one device.

use sensorium_core::{Dashboard, SensorDescriptor};
use tabled::Tabled;

use crate::cli::{GlobalOpts, SensorsArgs};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct SensorRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Label")]
    label: String,
}

impl From<&SensorDescriptor> for SensorRow {
    fn from(s: &SensorDescriptor) -> Self {
        Self {
            id: s.id.clone(),
            label: s.display_label(),
        }
    }
}

pub async fn handle(
    dashboard: &Dashboard,
    args: SensorsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let sensors = dashboard.sensors(&args.device).await.map_err(|e| match e {
        sensorium_core::CoreError::NotFound { .. } => CliError::NotFound {
            resource_type: "device".into(),
            identifier: args.device.clone(),
            list_command: "devices".into(),
        },
        other => other.into(),
    })?;
    let out = output::render_list(&global.output, &sensors, |s| SensorRow::from(s), |s| s.id.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}
