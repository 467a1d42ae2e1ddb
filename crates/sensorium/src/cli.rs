//! Clap derive structures for the `sensorium` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use sensorium_core::{ReportPeriod, SensorCategory};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// sensorium -- live readings and reports from IoT sensor fleets
#[derive(Debug, Parser)]
#[command(
    name = "sensorium",
    version,
    about = "Query IoT sensor devices, live readings, and reports",
    long_about = "Command-line front end for the Sensorium telemetry API.\n\n\
        Lists devices and sensors, prints live readings grouped by device,\n\
        and fetches or exports daily, weekly, and monthly climate reports.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config profile to use
    #[arg(long, short = 'p', env = "SENSORIUM_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API root URL (overrides profile)
    #[arg(long, short = 'u', env = "SENSORIUM_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Bearer token (overrides profile)
    #[arg(long, env = "SENSORIUM_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SENSORIUM_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "SENSORIUM_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Live poll interval in seconds (overrides profile)
    #[arg(long, env = "SENSORIUM_INTERVAL", global = true)]
    pub interval: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List monitoring devices
    #[command(alias = "dev", alias = "d")]
    Devices,

    /// List the sensors attached to a device
    #[command(alias = "s")]
    Sensors(SensorsArgs),

    /// Show live readings for a sensor category, grouped by device
    #[command(alias = "l")]
    Live(LiveArgs),

    /// Fleet summary: device and sensor counts, average climate
    #[command(alias = "ov")]
    Overview,

    /// Fetch a report for one sensor
    #[command(alias = "r")]
    Report(ReportArgs),

    /// Export a report to an .xlsx spreadsheet
    #[command(alias = "x")]
    Export(ExportArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Data commands ────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SensorsArgs {
    /// Device ID
    pub device: String,
}

#[derive(Debug, Args)]
pub struct LiveArgs {
    /// Sensor category (digital, analog, switch, internal-relay,
    /// external-relay, power)
    pub category: SensorCategory,

    /// Keep polling and reprint every new snapshot until interrupted
    #[arg(long, short = 'w')]
    pub watch: bool,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Device ID
    pub device: String,

    /// Sensor ID
    pub sensor: String,

    /// Aggregation period (daily, weekly, monthly)
    #[arg(long, short = 'P', default_value = "daily")]
    pub period: ReportPeriod,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub report: ReportArgs,

    /// Directory to write the spreadsheet into
    #[arg(long, short = 'd', default_value = ".")]
    pub out_dir: PathBuf,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a profile to the config file (prompts unless --api-url is given)
    Init(ConfigInitArgs),

    /// Show the effective configuration
    Show,

    /// Print the config file path
    Path,
}

#[derive(Debug, Args)]
pub struct ConfigInitArgs {
    /// Profile name to create or replace
    #[arg(long, default_value = "default")]
    pub name: String,

    /// Environment variable holding the bearer token
    #[arg(long)]
    pub token_env: Option<String>,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
