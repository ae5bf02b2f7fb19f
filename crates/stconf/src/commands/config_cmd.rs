//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "********";

/// Render config as TOML with plaintext API keys masked.
fn format_config_redacted(mut cfg: Config) -> Result<String, CliError> {
    for profile in cfg.profiles.values_mut() {
        if profile.api_key.is_some() {
            profile.api_key = Some(REDACTED.into());
        }
    }
    toml::to_string_pretty(&cfg).map_err(|e| CliError::Config {
        message: format!("failed to serialize config: {e}"),
    })
}

fn prompt_err(e: std::io::Error) -> CliError {
    CliError::Validation {
        field: "api_key".into(),
        reason: format!("failed to read from terminal: {e}"),
    }
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = stconf_config::load_config()?;
            let profile_name = config::active_profile_name(global, &cfg);
            let discovery = config::discovery_path(&cfg, &profile_name);

            let mut out = format_config_redacted(cfg)?;
            out.push_str(&format!("\n# active profile: {profile_name}\n"));
            if let Some(path) = discovery {
                out.push_str(&format!("# Syncthing config.xml: {}\n", path.display()));
            }
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        // ── SetKey ──────────────────────────────────────────────────
        ConfigCommand::SetKey => {
            let cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);

            let key = rpassword::prompt_password("API key: ").map_err(prompt_err)?;
            let key = key.trim();
            if key.is_empty() {
                return Err(CliError::Validation {
                    field: "api_key".into(),
                    reason: "API key cannot be empty".into(),
                });
            }

            stconf_config::store_api_key(&profile_name, key)?;
            if !global.quiet {
                eprintln!("✓ API key stored in system keyring for profile '{profile_name}'");
            }
            Ok(())
        }
    }
}
