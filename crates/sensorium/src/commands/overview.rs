//! Fleet overview.

use sensorium_core::{Dashboard, OverviewSummary};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

fn detail(s: &OverviewSummary) -> String {
    let climate = |v: Option<f64>, unit: &str| {
        v.map_or_else(|| "-".into(), |v| format!("{} {unit}", sensorium_core::to_fixed(v, 1)))
    };
    [
        format!("Devices:          {}", s.total_devices),
        format!("Sensors:          {}", s.total_sensors),
        format!("Avg Temperature:  {}", climate(s.average_temperature, "°C")),
        format!("Avg Humidity:     {}", climate(s.average_humidity, "%RH")),
        format!("Updated:          {}", s.updated_at.format("%Y-%m-%d %H:%M:%S")),
    ]
    .join("\n")
}

pub async fn handle(dashboard: &Dashboard, global: &GlobalOpts) -> Result<(), CliError> {
    let summary = dashboard.overview().await?;
    let out = output::render_single(&global.output, &summary, detail, |s| {
        format!("{} {}", s.total_devices, s.total_sensors)
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
