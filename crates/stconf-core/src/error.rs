// ── Core error types ──
//
// Domain-level errors from stconf-core. Consumers never match on reqwest
// or serde errors directly: the `From<stconf_api::Error>` impl translates
// transport-layer failures into the variants below.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Boundary validation ──────────────────────────────────────────
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    // ── Transport errors ─────────────────────────────────────────────
    #[error("Cannot connect to Syncthing at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("API key rejected by {url} (HTTP {status})")]
    Unauthorized { url: String, status: u16 },

    #[error("Syncthing did not answer within {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("{method} {url} failed with HTTP {status}")]
    Rejected {
        method: String,
        url: String,
        status: u16,
        /// Raw (truncated) response body for diagnostics.
        body: String,
    },

    #[error("Unreadable configuration document: {message}")]
    InvalidDocument { message: String, body: String },

    // ── Setup errors ─────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn missing(field: &str, reason: &str) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// `true` for failures of the fetch or replace exchange.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed { .. }
                | Self::Unauthorized { .. }
                | Self::Timeout { .. }
                | Self::Rejected { .. }
                | Self::InvalidDocument { .. }
        )
    }

    /// The raw remote response attached to this error, if any.
    pub fn response(&self) -> Option<&str> {
        match self {
            Self::Rejected { body, .. } | Self::InvalidDocument { body, .. } => Some(body),
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<stconf_api::Error> for CoreError {
    fn from(err: stconf_api::Error) -> Self {
        match err {
            stconf_api::Error::InvalidApiKey { message } => CoreError::Config {
                message: format!("API key: {message}"),
            },
            stconf_api::Error::Unauthorized { url, status } => {
                CoreError::Unauthorized { url, status }
            }
            // Timeouts arrive as `Error::Timeout` with the configured limit.
            stconf_api::Error::Transport(e) => CoreError::ConnectionFailed {
                url: e.url().map_or_else(|| "<unknown>".into(), ToString::to_string),
                reason: e.to_string(),
            },
            stconf_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid host URL: {e}"),
            },
            stconf_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            stconf_api::Error::Tls(message) => CoreError::Config { message },
            stconf_api::Error::Status {
                method,
                url,
                status,
                body,
            } => CoreError::Rejected {
                method: method.into(),
                url,
                status,
                body,
            },
            stconf_api::Error::Deserialization { message, body } => {
                CoreError::InvalidDocument { message, body }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_keeps_configured_seconds() {
        let err = CoreError::from(stconf_api::Error::Timeout { timeout_secs: 30 });

        assert!(err.is_transport());
        assert!(matches!(err, CoreError::Timeout { timeout_secs: 30 }));
        assert_eq!(err.to_string(), "Syncthing did not answer within 30s");
    }

    #[test]
    fn status_error_keeps_raw_response() {
        let err = CoreError::from(stconf_api::Error::Status {
            method: "POST",
            url: "http://127.0.0.1:8384/rest/system/config".into(),
            status: 500,
            body: "boom".into(),
        });

        assert!(err.is_transport());
        assert_eq!(err.response(), Some("boom"));
        assert_eq!(
            err.to_string(),
            "POST http://127.0.0.1:8384/rest/system/config failed with HTTP 500"
        );
    }

    #[test]
    fn validation_is_not_transport() {
        let err = CoreError::missing("name", "required unless state is absent");
        assert!(!err.is_transport());
        assert_eq!(err.to_string(), "invalid name: required unless state is absent");
    }
}
