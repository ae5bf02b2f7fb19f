//! CLI configuration: a thin wrapper around `stconf_config`.
//!
//! Adds the resolution steps that respect `GlobalOpts` flag overrides
//! (--host, --api-key, --insecure, --timeout).

use clap::ValueEnum;
use secrecy::SecretString;
use stconf_config::{Connection, discovery};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output::{self, RenderOpts};

pub use stconf_config::{Config, config_path, load_config_or_default};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a [`Connection`] from the config file, active profile and flags.
///
/// Flags win over profile values, which win over built-in defaults. An
/// explicitly requested profile must exist; the implicit default may not.
pub fn resolve_connection(global: &GlobalOpts) -> Result<Connection, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);
    let profile = cfg.profiles.get(&profile_name);

    if profile.is_none() && global.profile.is_some() {
        return Err(profile_not_found(&profile_name, &cfg));
    }

    // 1. Host (flag > env > profile > default)
    let host = global
        .host
        .clone()
        .or_else(|| profile.map(|p| p.host.clone()))
        .unwrap_or_else(|| stconf_api::DEFAULT_HOST.into());
    stconf_config::validate_host(&host)?;

    // 2. API key (flag > env > profile chain > config.xml)
    let api_key = match global.api_key.as_deref() {
        Some(key) => SecretString::from(key.to_owned()),
        None => stconf_config::resolve_api_key(profile, &profile_name)
            .map_err(|e| CliError::from(e).with_profile(&profile_name))?,
    };

    // 3. TLS and timeout
    let insecure = global.insecure || profile.and_then(|p| p.insecure).unwrap_or(false);
    let tls = stconf_config::tls_mode(insecure, profile.and_then(|p| p.ca_cert.as_ref()));
    let timeout = global
        .timeout
        .or_else(|| profile.and_then(|p| p.timeout))
        .unwrap_or(cfg.defaults.timeout);

    tracing::debug!(profile = %profile_name, %host, timeout, "resolved connection");

    Ok(Connection {
        host,
        api_key,
        transport: stconf_config::transport(timeout, tls),
    })
}

/// Output format and color: flag or env first, then `[defaults]`.
pub fn resolve_render(global: &GlobalOpts) -> Result<RenderOpts, CliError> {
    render_opts(global, &load_config_or_default())
}

fn render_opts(global: &GlobalOpts, cfg: &Config) -> Result<RenderOpts, CliError> {
    let format = match &global.output {
        Some(format) => format.clone(),
        None => parse_default::<OutputFormat>("output", &cfg.defaults.output)?,
    };
    let color = match &global.color {
        Some(mode) => mode.clone(),
        None => parse_default::<ColorMode>("color", &cfg.defaults.color)?,
    };

    Ok(RenderOpts {
        format,
        color: output::should_color(&color),
        quiet: global.quiet,
    })
}

fn parse_default<T: ValueEnum>(key: &str, value: &str) -> Result<T, CliError> {
    T::from_str(value, true).map_err(|reason| CliError::Config {
        message: format!("defaults.{key} = {value:?}: {reason}"),
    })
}

/// Where a key would be auto-discovered for `profile_name`, for display.
pub fn discovery_path(config: &Config, profile_name: &str) -> Option<std::path::PathBuf> {
    config
        .profiles
        .get(profile_name)
        .and_then(|p| p.syncthing_config.clone())
        .or_else(discovery::default_settings_path)
}

pub fn profile_not_found(name: &str, config: &Config) -> CliError {
    let mut available: Vec<_> = config.profiles.keys().cloned().collect();
    available.sort();
    CliError::ProfileNotFound {
        name: name.to_owned(),
        available: if available.is_empty() {
            "(none)".into()
        } else {
            available.join(", ")
        },
        path: config_path().display().to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["stconf"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["device", "list"]);
        Cli::try_parse_from(argv).unwrap().global
    }

    fn config_with(output: &str, color: &str) -> Config {
        let mut cfg = Config::default();
        cfg.defaults.output = output.into();
        cfg.defaults.color = color.into();
        cfg
    }

    #[test]
    fn config_defaults_apply_without_flags() {
        let opts = render_opts(&global(&[]), &config_with("json-compact", "always")).unwrap();

        assert!(matches!(opts.format, OutputFormat::JsonCompact));
        assert!(opts.color);
    }

    #[test]
    fn flags_win_over_config_defaults() {
        let opts = render_opts(
            &global(&["--output", "plain", "--color", "never"]),
            &config_with("yaml", "always"),
        )
        .unwrap();

        assert!(matches!(opts.format, OutputFormat::Plain));
        assert!(!opts.color);
    }

    #[test]
    fn builtin_defaults_are_table_and_auto() {
        let opts = render_opts(&global(&["--color", "never"]), &Config::default()).unwrap();
        assert!(matches!(opts.format, OutputFormat::Table));
    }

    #[test]
    fn unknown_config_default_is_reported() {
        let err = render_opts(&global(&[]), &config_with("xml", "auto")).unwrap_err();

        assert!(matches!(err, CliError::Config { .. }));
        assert!(err.to_string().contains("defaults.output"), "{err}");
    }
}
