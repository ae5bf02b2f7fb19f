//! HTTP transport for Syncthing's `/rest/system/config` endpoint.
//!
//! [`ConfigClient`] performs exactly two operations: fetch the whole
//! configuration document and replace it. Both are single request/response
//! exchanges with no retries; anything but HTTP 200 is an [`Error`].

pub mod client;
pub mod error;
pub mod transport;

pub use client::{API_KEY_HEADER, CONFIG_PATH, ConfigClient, DEFAULT_HOST};
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
