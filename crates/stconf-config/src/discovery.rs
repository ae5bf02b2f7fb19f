//! API key discovery from a local Syncthing installation.
//!
//! Syncthing keeps its GUI API key in `config.xml` under
//! `<configuration><gui><apikey>`. The file lives in a per-OS default
//! location; [`settings_path_for`] is the lookup table.

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use secrecy::SecretString;
use tracing::debug;

use crate::ConfigError;

/// Default `config.xml` location for an OS identifier as reported by
/// `std::env::consts::OS`.
pub fn settings_path_for(os: &str, home: &Path, local_data: &Path) -> PathBuf {
    match os {
        "windows" => local_data.join("Syncthing").join("config.xml"),
        "macos" => home
            .join("Library")
            .join("Application Support")
            .join("Syncthing")
            .join("config.xml"),
        _ => home.join(".config").join("syncthing").join("config.xml"),
    }
}

/// Default `config.xml` location on this machine, if a home directory
/// can be determined.
pub fn default_settings_path() -> Option<PathBuf> {
    let base = BaseDirs::new()?;
    Some(settings_path_for(
        std::env::consts::OS,
        base.home_dir(),
        base.data_local_dir(),
    ))
}

/// Read `gui.apikey` from a Syncthing `config.xml`.
pub fn read_api_key(path: &Path) -> Result<SecretString, ConfigError> {
    let fail = |reason: String| ConfigError::AutoDiscovery {
        path: path.to_path_buf(),
        reason,
    };

    let text = std::fs::read_to_string(path).map_err(|e| fail(e.to_string()))?;
    let doc = roxmltree::Document::parse(&text).map_err(|e| fail(format!("invalid XML: {e}")))?;

    let key = doc
        .root_element()
        .children()
        .find(|n| n.has_tag_name("gui"))
        .ok_or_else(|| fail("no <gui> element".into()))?
        .children()
        .find(|n| n.has_tag_name("apikey"))
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| fail("no <apikey> value under <gui>".into()))?;

    debug!(path = %path.display(), "API key read from Syncthing config");
    Ok(SecretString::from(key.to_owned()))
}
