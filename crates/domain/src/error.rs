//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or lookup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A named resource, link or entry point does not exist.
    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    /// An API version string could not be interpreted as a number.
    #[error("invalid API version: {0}")]
    InvalidApiVersion(String),

    /// The server advertised no usable API version.
    #[error("no API versions available")]
    NoApiVersions,

    /// A response body could not be decoded.
    #[error("invalid body: {0}")]
    InvalidBody(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
