//! `sensorium-tui`: live terminal dashboard for the Sensorium telemetry API.
//!
//! A sidebar switches between the fleet overview, the six live sensor
//! categories, and the daily/weekly/monthly reports. Live pages poll in the
//! background while shown; reports can be exported to a spreadsheet.
//!
//! Logs go to a file (default `/tmp/sensorium-tui.log`) so they never
//! corrupt the terminal.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use secrecy::SecretString;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use sensorium_config::{load_config, profile_to_dashboard_config, validate_api_url};
use sensorium_core::{Dashboard, DashboardConfig};

use crate::app::App;

/// Terminal dashboard for IoT sensor readings and reports.
#[derive(Parser, Debug)]
#[command(name = "sensorium-tui", version, about)]
struct Cli {
    /// Profile from the shared config file
    #[arg(short = 'p', long, env = "SENSORIUM_PROFILE")]
    profile: Option<String>,

    /// API root URL (overrides the profile)
    #[arg(short = 'u', long, env = "SENSORIUM_API_URL")]
    api_url: Option<String>,

    /// Bearer token (overrides the profile)
    #[arg(long, env = "SENSORIUM_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Seconds between live refreshes
    #[arg(short = 'i', long, env = "SENSORIUM_INTERVAL")]
    interval: Option<u64>,

    /// Directory report exports are written to
    #[arg(short = 'd', long, default_value = ".")]
    export_dir: PathBuf,

    /// Log file path
    #[arg(long, default_value = "/tmp/sensorium-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing. Writing to stdout/stderr would corrupt the TUI.
/// The returned guard must live until exit so buffered logs flush.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "sensorium_tui={log_level},sensorium_core={log_level},sensorium_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(std::path::Path::new("."));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("sensorium-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Profile from the config file, then command-line overrides.
fn build_dashboard_config(cli: &Cli) -> Result<DashboardConfig> {
    let cfg = load_config().wrap_err("could not read the config file")?;
    let name = cfg.active_profile_name(cli.profile.as_deref());
    let mut profile = cfg.profile(&name)?;

    if let Some(ref url) = cli.api_url {
        validate_api_url(url)?;
        profile.api_url.clone_from(url);
    }
    if let Some(secs) = cli.interval {
        profile.poll_interval = Some(secs);
    }

    let mut config = profile_to_dashboard_config(&profile, &cfg.defaults)?;
    if let Some(ref token) = cli.token {
        config.token = Some(SecretString::from(token.clone()));
    }
    info!(
        profile = %name,
        api_url = %config.api_url,
        poll_secs = config.poll_interval.as_secs(),
        "resolved dashboard config"
    );
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks go in before the terminal is touched.
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);
    info!("starting sensorium-tui");

    let config = build_dashboard_config(&cli)?;
    let dashboard = Dashboard::new(config).wrap_err("could not create the API client")?;

    let mut app = App::new(dashboard, cli.export_dir);
    app.run().await?;

    Ok(())
}
