//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use stconf_config::ConfigError;
use stconf_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const REJECTED: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to Syncthing at {url}")]
    #[diagnostic(
        code(stconf::connection_failed),
        help(
            "Check that Syncthing is running and its GUI listens on that address.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(stconf::timeout),
        help("Increase the timeout with --timeout or check that Syncthing is responsive.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────
    #[error("API key rejected by {url} (HTTP {status})")]
    #[diagnostic(
        code(stconf::auth_failed),
        help(
            "Copy the key from Actions > Settings > General in the Syncthing GUI,\n\
             then pass --api-key or run: stconf config set-key"
        )
    )]
    AuthFailed { url: String, status: u16 },

    #[error("No API key for profile '{profile}'")]
    #[diagnostic(
        code(stconf::no_credentials),
        help(
            "{reason}\n\
             Pass --api-key, set STCONF_API_KEY, or run: stconf config set-key"
        )
    )]
    NoCredentials { profile: String, reason: String },

    // ── Remote ───────────────────────────────────────────────────────
    #[error("{method} {url} was rejected with HTTP {status}")]
    #[diagnostic(code(stconf::rejected), help("Syncthing responded:\n{response}"))]
    Rejected {
        method: String,
        url: String,
        status: u16,
        response: String,
    },

    #[error("Syncthing returned an unreadable configuration: {message}")]
    #[diagnostic(code(stconf::invalid_document), help("Response body:\n{response}"))]
    InvalidDocument { message: String, response: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(stconf::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(stconf::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Add one under [profiles.<name>] in: {path}"
        )
    )]
    ProfileNotFound {
        name: String,
        available: String,
        path: String,
    },

    #[error("{message}")]
    #[diagnostic(code(stconf::config))]
    Config { message: String },

    #[error("Keyring error: {message}")]
    #[diagnostic(
        code(stconf::keyring),
        help("Store the key in the profile's api_key or api_key_env instead.")
    )]
    Keyring { message: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(stconf::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::Rejected { .. } | Self::InvalidDocument { .. } => exit_code::REJECTED,
            Self::Validation { .. } | Self::ProfileNotFound { .. } => exit_code::USAGE,
            Self::Config { .. } | Self::Keyring { .. } | Self::Io(_) | Self::Render(_) => {
                exit_code::GENERAL
            }
        }
    }

    /// Attach the profile name to a credential lookup failure.
    pub fn with_profile(self, profile: &str) -> Self {
        match self {
            Self::NoCredentials { reason, .. } => Self::NoCredentials {
                profile: profile.to_owned(),
                reason,
            },
            other => other,
        }
    }
}

// ── Conversions ──────────────────────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation { field, reason } => Self::Validation { field, reason },
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Unauthorized { url, status } => Self::AuthFailed { url, status },
            CoreError::Timeout { timeout_secs } => Self::Timeout {
                seconds: timeout_secs,
            },
            CoreError::Rejected {
                method,
                url,
                status,
                body,
            } => Self::Rejected {
                method,
                url,
                status,
                response: body,
            },
            CoreError::InvalidDocument { message, body } => Self::InvalidDocument {
                message,
                response: body,
            },
            CoreError::Config { message } => Self::Config { message },
        }
    }
}

impl From<stconf_api::Error> for CliError {
    fn from(err: stconf_api::Error) -> Self {
        CoreError::from(err).into()
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::AutoDiscovery { .. } | ConfigError::NoSettingsPath => {
                Self::NoCredentials {
                    profile: "default".into(),
                    reason: err.to_string(),
                }
            }
            ConfigError::Keyring(e) => Self::Keyring {
                message: e.to_string(),
            },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config {
                message: other.to_string(),
            },
        }
    }
}
