//! Transport port
//!
//! A transport is one HTTP client with its own cookie jar. The session opens
//! a fresh one for discovery and for every login, and keeps the logged-in
//! ones around per domain.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use smc_domain::{TlsVerify, TransportRequest, TransportResponse};

/// Errors raised below the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request did not complete within the timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Timeout that was exceeded, in milliseconds.
        timeout_ms: u64,
    },

    /// The connection could not be established or was dropped.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// TLS handshake or certificate problem.
    #[error("TLS error: {0}")]
    Tls(String),

    /// The URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Any other failure.
    #[error("transport error: {0}")]
    Other(String),
}

/// Settings a transport is created with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Server base URL; session cookies are scoped to it.
    pub base_url: String,
    /// Connect and read timeout.
    pub timeout: Duration,
    /// TLS verification mode.
    pub verify: TlsVerify,
}

/// Port for sending requests over one HTTP session.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a request and returns the response, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns an error only when no response was received.
    async fn send(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError>;

    /// Returns the value of a cookie held for the base URL.
    fn cookie(&self, name: &str) -> Option<String>;
}

/// Port for opening new transports.
pub trait TransportFactory: Send + Sync {
    /// Opens a transport with an empty cookie jar.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built, e.g. an unreadable CA bundle.
    fn connect(&self, options: &ConnectOptions) -> Result<Arc<dyn Transport>, TransportError>;
}
