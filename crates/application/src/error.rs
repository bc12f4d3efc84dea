//! Session error types

use smc_domain::{DomainError, TransportResponse};
use thiserror::Error;

use crate::ports::{ConfigError, TransportError};

/// Errors surfaced by the session manager.
///
/// Transport failures never escape raw: every network-calling operation maps
/// them into [`SessionError::Connection`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// No usable login parameters were found in any configuration source.
    #[error("configuration error: {0}")]
    ConfigLoad(String),

    /// The server could not be reached or answered with an unexpected status.
    #[error("connection error: {message}")]
    Connection {
        /// Human readable description.
        message: String,
        /// HTTP status, when a response was received.
        status: Option<u16>,
        /// Reason text, when a response was received.
        reason: Option<String>,
    },

    /// An entry point, link or resource does not exist.
    #[error("resource not found: {0}")]
    ResourceNotFound(String),
}

impl SessionError {
    /// Connection error without a response.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            status: None,
            reason: None,
        }
    }

    /// Connection error for a response with an unexpected status.
    #[must_use]
    pub fn unexpected_status(context: &str, response: &TransportResponse) -> Self {
        Self::Connection {
            message: format!(
                "{context}, HTTP status code: {} and reason: {}",
                response.status.as_u16(),
                response.reason
            ),
            status: Some(response.status.as_u16()),
            reason: Some(response.reason.clone()),
        }
    }

    /// HTTP status carried by a connection error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Connection { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<DomainError> for SessionError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::ResourceNotFound(message) => Self::ResourceNotFound(message),
            other => Self::connection(other.to_string()),
        }
    }
}

impl From<TransportError> for SessionError {
    fn from(error: TransportError) -> Self {
        Self::connection(error.to_string())
    }
}

impl From<ConfigError> for SessionError {
    fn from(error: ConfigError) -> Self {
        Self::ConfigLoad(error.to_string())
    }
}

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
