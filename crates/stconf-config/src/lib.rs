//! Shared configuration for stconf.
//!
//! TOML profiles, the API key credential chain (env + keyring + plaintext
//! + Syncthing's own `config.xml`), and translation into the transport
//! settings used by `stconf_api::ConfigClient`. The CLI adds flag-aware
//! wrappers on top.

pub mod discovery;

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use stconf_api::{ConfigClient, TlsMode, TransportConfig};
use thiserror::Error;
use tracing::{debug, warn};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Reading the API key from Syncthing's `config.xml` failed.
    #[error(
        "Auto-configuration failed ({}): {reason}. Please specify the API key manually.",
        .path.display()
    )]
    AutoDiscovery { path: PathBuf, reason: String },

    #[error("no home directory to locate Syncthing's config.xml; please specify the API key")]
    NoSettingsPath,

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named Syncthing instances.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named Syncthing instance.
#[derive(Debug, Deserialize, Serialize)]
pub struct Profile {
    /// GUI address (e.g., "http://127.0.0.1:8384").
    #[serde(default = "default_host")]
    pub host: String,

    /// API key (plaintext; prefer the keyring or api_key_env).
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,

    /// Syncthing `config.xml` to read the API key from, instead of the
    /// platform default.
    pub syncthing_config: Option<PathBuf>,

    /// Path to custom CA certificate for an HTTPS GUI.
    pub ca_cert: Option<PathBuf>,

    /// Accept the GUI's self-signed certificate.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            host: default_host(),
            api_key: None,
            api_key_env: None,
            syncthing_config: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
        }
    }
}

fn default_host() -> String {
    stconf_api::DEFAULT_HOST.into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "stconf", "stconf").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("stconf");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
///
/// Nested keys use a double underscore: `STCONF_DEFAULTS__TIMEOUT=60`.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config layered over an explicit TOML file.
pub fn load_config_from(path: &std::path::Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("STCONF_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file is missing or invalid.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_else(|e| {
        warn!("ignoring unreadable config: {e}");
        Config::default()
    })
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new("stconf", &format!("{profile_name}/api-key"))
}

/// Store an API key for `profile_name` in the system keyring.
pub fn store_api_key(profile_name: &str, key: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(key)?;
    Ok(())
}

/// Resolve an API key from the credential chain (no CLI flag step).
///
/// Order: profile `api_key_env` → system keyring → plaintext `api_key` →
/// Syncthing's `config.xml` (profile `syncthing_config` or the OS default).
pub fn resolve_api_key(
    profile: Option<&Profile>,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's api_key_env → env var lookup
    if let Some(env_name) = profile.and_then(|p| p.api_key_env.as_ref()) {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(key) = profile.and_then(|p| p.api_key.as_ref()) {
        return Ok(SecretString::from(key.clone()));
    }

    // 4. Syncthing's own config.xml
    let path = profile
        .and_then(|p| p.syncthing_config.clone())
        .or_else(discovery::default_settings_path)
        .ok_or(ConfigError::NoSettingsPath)?;
    debug!(path = %path.display(), "falling back to Syncthing config.xml for API key");
    discovery::read_api_key(&path)
}

// ── Connection ──────────────────────────────────────────────────────

/// Everything needed to talk to one Syncthing GUI.
#[derive(Debug, Clone)]
pub struct Connection {
    pub host: String,
    pub api_key: SecretString,
    pub transport: TransportConfig,
}

impl Connection {
    /// Build the HTTP client for this connection.
    pub fn client(&self) -> Result<ConfigClient, stconf_api::Error> {
        ConfigClient::new(&self.host, &self.api_key, &self.transport)
    }
}

/// Check that `host` is an absolute http(s) URL.
pub fn validate_host(host: &str) -> Result<(), ConfigError> {
    let url: url::Url = host.parse().map_err(|_| ConfigError::Validation {
        field: "host".into(),
        reason: format!("invalid URL: {host}"),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::Validation {
            field: "host".into(),
            reason: format!("unsupported scheme '{other}', expected http or https"),
        }),
    }
}

/// Pick the TLS mode: `insecure` wins over a custom CA.
pub fn tls_mode(insecure: bool, ca_cert: Option<&PathBuf>) -> TlsMode {
    if insecure {
        TlsMode::DangerAcceptInvalid
    } else if let Some(path) = ca_cert {
        TlsMode::CustomCa(path.clone())
    } else {
        TlsMode::System
    }
}

/// Build transport settings from resolved values.
pub fn transport(timeout_secs: u64, tls: TlsMode) -> TransportConfig {
    TransportConfig {
        tls,
        timeout: Duration::from_secs(timeout_secs),
    }
}
