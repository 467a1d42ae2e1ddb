//! Command dispatch: bridges CLI args -> dashboard calls -> output formatting.

pub mod config_cmd;
pub mod devices;
pub mod live;
pub mod overview;
pub mod report;
pub mod sensors;

use sensorium_core::Dashboard;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an API-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    dashboard: &Dashboard,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Devices => devices::handle(dashboard, global).await,
        Command::Sensors(args) => sensors::handle(dashboard, args, global).await,
        Command::Live(args) => live::handle(dashboard, args, global).await,
        Command::Overview => overview::handle(dashboard, global).await,
        Command::Report(args) => report::handle(dashboard, args, global).await,
        Command::Export(args) => report::export(dashboard, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
