//! CLI configuration: thin wrapper around `sensorium_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--api-url, --token, --timeout, --interval).

use std::time::Duration;

use secrecy::SecretString;

use sensorium_config::{Config, ConfigError, profile_to_dashboard_config, validate_api_url};
use sensorium_core::DashboardConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use sensorium_config::config_path;

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Load the config file and layer CLI flag overrides on the active profile.
pub fn build_dashboard_config(global: &GlobalOpts) -> Result<DashboardConfig, CliError> {
    let cfg = sensorium_config::load_config()?;
    resolve(global, &cfg)
}

/// Translate the active profile + global flags into a `DashboardConfig`.
///
/// Flag values take priority over profile values.
pub fn resolve(global: &GlobalOpts, cfg: &Config) -> Result<DashboardConfig, CliError> {
    let name = active_profile_name(global, cfg);
    let mut profile = cfg.profile(&name).map_err(|e| match e {
        ConfigError::UnknownProfile { name } => {
            let mut names: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
            names.sort_unstable();
            CliError::ProfileNotFound {
                name,
                available: if names.is_empty() {
                    "(none)".into()
                } else {
                    names.join(", ")
                },
            }
        }
        other => other.into(),
    })?;

    if let Some(ref url) = global.api_url {
        validate_api_url(url)?;
        profile.api_url.clone_from(url);
    }
    if let Some(secs) = global.timeout {
        profile.timeout = Some(secs);
    }
    if let Some(secs) = global.interval {
        profile.poll_interval = Some(secs);
    }

    let mut dashboard = profile_to_dashboard_config(&profile, &cfg.defaults)?;
    if let Some(ref token) = global.token {
        dashboard.token = Some(SecretString::from(token.clone()));
    }
    tracing::debug!(
        profile = %name,
        api_url = %dashboard.api_url,
        poll_secs = dashboard.poll_interval.as_secs(),
        "resolved dashboard config"
    );
    Ok(dashboard)
}

/// Poll interval shown in `--watch` output.
pub fn describe_interval(interval: Duration) -> String {
    format!("every {}s", interval.as_secs())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use clap::Parser;
    use secrecy::ExposeSecret;
    use sensorium_config::Profile;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["sensorium"];
        argv.extend_from_slice(args);
        argv.push("devices");
        Cli::try_parse_from(argv).unwrap().global
    }

    fn lab_config() -> Config {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "lab".into(),
            Profile {
                api_url: "http://lab.test/api".into(),
                poll_interval: Some(2),
                ..Profile::default()
            },
        );
        cfg
    }

    #[test]
    fn flags_override_profile_values() {
        let opts = global(&[
            "--profile",
            "lab",
            "--api-url",
            "http://override.test/api",
            "--timeout",
            "7",
            "--token",
            "t0k",
        ]);
        let resolved = resolve(&opts, &lab_config()).unwrap();
        assert_eq!(resolved.api_url, "http://override.test/api");
        assert_eq!(resolved.timeout, Duration::from_secs(7));
        assert_eq!(resolved.poll_interval, Duration::from_secs(2));
        assert_eq!(resolved.token.unwrap().expose_secret(), "t0k");
    }

    #[test]
    fn unknown_profile_lists_available_ones() {
        let opts = global(&["--profile", "prod"]);
        let err = resolve(&opts, &lab_config()).unwrap_err();
        match err {
            CliError::ProfileNotFound { name, available } => {
                assert_eq!(name, "prod");
                assert_eq!(available, "lab");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn zero_interval_is_rejected() {
        let opts = global(&["--interval", "0"]);
        let err = resolve(&opts, &Config::default()).unwrap_err();
        assert!(matches!(err, CliError::Config(ConfigError::Validation { .. })));
    }
}
