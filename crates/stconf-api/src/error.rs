use thiserror::Error;

/// Top-level error type for the `stconf-api` crate.
///
/// Covers every failure mode of the REST configuration endpoint:
/// transport, non-success status, and body decoding. `stconf-core` maps
/// these into domain-level diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The API key could not be used as a header value.
    #[error("Invalid API key: {message}")]
    InvalidApiKey { message: String },

    /// The GUI rejected the API key (HTTP 401/403).
    #[error("API key rejected by {url} (HTTP {status})")]
    Unauthorized { url: String, status: u16 },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Remote ──────────────────────────────────────────────────────
    /// Anything other than HTTP 200 from the config endpoint.
    #[error("{method} {url} returned HTTP {status}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
        body: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON (de)serialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the request never got a response in time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns `true` if the remote could not be reached at all.
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_connect())
    }

    /// Raw response body carried by the error, if any.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } | Self::Deserialization { body, .. } => Some(body),
            _ => None,
        }
    }
}
