// HTTP client for Syncthing's full-configuration endpoint.
//
// Path: /rest/system/config
// Auth: X-Api-Key header
//
// The endpoint is all-or-nothing: GET returns the whole document and POST
// replaces it. The client stays generic over the body type so the domain
// model lives in `stconf-core`.

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Fixed path of the configuration resource, relative to the GUI address.
pub const CONFIG_PATH: &str = "/rest/system/config";

/// Default GUI address of a local Syncthing instance.
pub const DEFAULT_HOST: &str = "http://127.0.0.1:8384";

/// Header carrying the GUI API key.
pub const API_KEY_HEADER: &str = "X-Api-Key";

const BODY_PREVIEW_CHARS: usize = 200;

/// Async client for `GET`/`POST /rest/system/config`.
pub struct ConfigClient {
    http: reqwest::Client,
    config_url: Url,
    timeout_secs: u64,
}

impl ConfigClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a GUI address, an API key, and transport settings.
    ///
    /// Injects `X-Api-Key` as a sensitive default header on every request.
    pub fn new(
        host: &str,
        api_key: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut key_value =
            HeaderValue::from_str(api_key.expose_secret()).map_err(|e| Error::InvalidApiKey {
                message: format!("not a valid header value: {e}"),
            })?;
        key_value.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key_value);

        let http = transport.build_client_with_headers(headers)?;
        Ok(Self {
            http,
            config_url: Self::config_url_for(host)?,
            timeout_secs: transport.timeout_secs(),
        })
    }

    /// Append [`CONFIG_PATH`] to the GUI address, keeping any path prefix
    /// (e.g. a reverse proxy mount point).
    fn config_url_for(host: &str) -> Result<Url, Error> {
        let base = Url::parse(host)?;
        let prefix = base.path().trim_end_matches('/');
        let mut url = base.clone();
        url.set_path(&format!("{prefix}{CONFIG_PATH}"));
        url.set_query(None);
        Ok(url)
    }

    /// The fully-qualified configuration URL.
    pub fn config_url(&self) -> &Url {
        &self.config_url
    }

    // ── Endpoint ─────────────────────────────────────────────────────

    /// Fetch and decode the current configuration document.
    pub async fn get_config<T: DeserializeOwned>(&self) -> Result<T, Error> {
        let url = self.config_url.clone();
        debug!("GET {url}");

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        let body = self.check_status("GET", resp).await?;
        trace!(bytes = body.len(), "config body received");

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        })
    }

    /// Replace the whole configuration document.
    ///
    /// The body is sent as `application/json`; the response body is ignored
    /// on success.
    pub async fn post_config<T: Serialize + Sync + ?Sized>(&self, config: &T) -> Result<(), Error> {
        let url = self.config_url.clone();
        debug!("POST {url}");

        let resp = self
            .http
            .post(url)
            .json(config)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        self.check_status("POST", resp).await?;
        Ok(())
    }

    // ── Response handling ────────────────────────────────────────────

    /// Accept HTTP 200 only and hand back the body text.
    async fn check_status(
        &self,
        method: &'static str,
        resp: reqwest::Response,
    ) -> Result<String, Error> {
        let status = resp.status();
        let url = self.config_url.to_string();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(Error::Unauthorized {
                url,
                status: status.as_u16(),
            });
        }

        if status != reqwest::StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Status {
                method,
                url,
                status: status.as_u16(),
                body: preview(&body).to_owned(),
            });
        }

        resp.text().await.map_err(|e| self.map_send_error(e))
    }

    fn map_send_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            Error::Transport(err)
        }
    }
}

/// First [`BODY_PREVIEW_CHARS`] characters of a response body.
fn preview(body: &str) -> &str {
    match body.char_indices().nth(BODY_PREVIEW_CHARS) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn config_url_appends_fixed_path() {
        let url = ConfigClient::config_url_for("http://127.0.0.1:8384").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8384/rest/system/config");
    }

    #[test]
    fn config_url_keeps_proxy_prefix() {
        let url = ConfigClient::config_url_for("https://nas.local/syncthing/").unwrap();
        assert_eq!(url.as_str(), "https://nas.local/syncthing/rest/system/config");
    }

    #[test]
    fn config_url_rejects_garbage() {
        assert!(ConfigClient::config_url_for("not a url").is_err());
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        let body = "é".repeat(300);
        assert_eq!(preview(&body).chars().count(), BODY_PREVIEW_CHARS);
        assert_eq!(preview("short"), "short");
    }
}
