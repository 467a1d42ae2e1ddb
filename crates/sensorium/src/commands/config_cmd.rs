//! Config subcommand handlers.

use dialoguer::Input;

use sensorium_config::{Config, Profile, load_config, save_config, validate_api_url};
use sensorium_core::DEFAULT_BASE_URL;

use crate::cli::{ConfigArgs, ConfigCommand, ConfigInitArgs, GlobalOpts};
use crate::config::{self, active_profile_name};
use crate::error::CliError;
use crate::output;

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Insert or replace `name`, making it the default when none is set yet.
fn upsert_profile(cfg: &mut Config, name: &str, profile: Profile) {
    cfg.profiles.insert(name.to_owned(), profile);
    if cfg.default_profile.is_none() || cfg.profiles.len() == 1 {
        cfg.default_profile = Some(name.to_owned());
    }
}

fn detail(cfg: &Config, active: &str) -> String {
    let mut lines = vec![
        format!("Config file:    {}", config::config_path().display()),
        format!("Active profile: {active}"),
        format!("Output:         {}", cfg.defaults.output),
        format!("Timeout:        {}s", cfg.defaults.timeout),
        format!("Poll interval:  {}s", cfg.defaults.poll_interval),
    ];
    let mut names: Vec<&String> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let Some(profile) = cfg.profiles.get(name) else {
            continue;
        };
        lines.push(String::new());
        lines.push(format!("[{name}]"));
        lines.push(format!("  api_url:       {}", profile.api_url));
        if let Some(ref env) = profile.api_token_env {
            lines.push(format!("  api_token_env: {env}"));
        }
        if profile.api_token.is_some() {
            lines.push("  api_token:     (set)".into());
        }
        if let Some(ref ca) = profile.ca_cert {
            lines.push(format!("  ca_cert:       {}", ca.display()));
        }
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init(init) => init_profile(&init, global),

        ConfigCommand::Show => {
            let cfg = load_config()?;
            let active = active_profile_name(global, &cfg);
            let mut redacted = cfg;
            for profile in redacted.profiles.values_mut() {
                if profile.api_token.is_some() {
                    profile.api_token = Some("********".into());
                }
            }
            let out = output::render_single(
                &global.output,
                &redacted,
                |c| detail(c, &active),
                |_| active.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }
    }
}

/// Write a profile. `--api-url` skips the prompt for scripted setups.
fn init_profile(init: &ConfigInitArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::config_path();

    let api_url = if let Some(ref url) = global.api_url {
        url.clone()
    } else {
        eprintln!("Sensorium configuration");
        eprintln!("   Config path: {}\n", path.display());
        Input::new()
            .with_prompt("API URL")
            .default(DEFAULT_BASE_URL.to_owned())
            .interact_text()
            .map_err(prompt_err)?
    };
    validate_api_url(&api_url)?;

    let profile = Profile {
        api_url,
        api_token_env: init.token_env.clone(),
        timeout: global.timeout,
        poll_interval: global.interval,
        ..Profile::default()
    };

    let mut cfg = load_config()?;
    upsert_profile(&mut cfg, &init.name, profile);
    save_config(&cfg)?;

    if !global.quiet {
        eprintln!("Configuration written to {}", path.display());
        eprintln!("  Profile: {}", init.name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_profile_becomes_default() {
        let mut cfg = Config {
            default_profile: None,
            ..Config::default()
        };
        upsert_profile(&mut cfg, "lab", Profile::default());
        assert_eq!(cfg.default_profile.as_deref(), Some("lab"));

        upsert_profile(&mut cfg, "prod", Profile::default());
        assert_eq!(cfg.default_profile.as_deref(), Some("lab"));
        assert_eq!(cfg.profiles.len(), 2);
    }

    #[test]
    fn detail_lists_profiles_without_secrets() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "lab".into(),
            Profile {
                api_url: "http://lab.test/api".into(),
                api_token: Some("hunter2".into()),
                ..Profile::default()
            },
        );
        let text = detail(&cfg, "lab");
        assert!(text.contains("[lab]"));
        assert!(text.contains("http://lab.test/api"));
        assert!(text.contains("(set)"));
        assert!(!text.contains("hunter2"));
    }
}
