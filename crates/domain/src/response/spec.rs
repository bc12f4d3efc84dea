//! Response specification returned by a transport
//!
//! Contains the status code helpers and the raw response body.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// HTTP status code with semantic helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct StatusCode(pub u16);

impl StatusCode {
    /// 200 OK
    pub const OK: Self = Self(200);
    /// 201 Created
    pub const CREATED: Self = Self(201);
    /// 204 No Content
    pub const NO_CONTENT: Self = Self(204);
    /// 401 Unauthorized
    pub const UNAUTHORIZED: Self = Self(401);
    /// 503 Service Unavailable
    pub const SERVICE_UNAVAILABLE: Self = Self(503);

    /// Creates a new `StatusCode`.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric status code.
    #[must_use]
    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// Returns true if this is a 2xx success status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Returns the canonical reason phrase for common status codes.
    #[must_use]
    pub const fn reason_phrase(&self) -> &'static str {
        match self.0 {
            200 => "OK",
            201 => "Created",
            204 => "No Content",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            408 => "Request Timeout",
            409 => "Conflict",
            429 => "Too Many Requests",
            500 => "Internal Server Error",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            504 => "Gateway Timeout",
            _ => "Unknown",
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.0, self.reason_phrase())
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

/// Response as seen by the session layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// Status code.
    pub status: StatusCode,
    /// Reason text sent by the server, or the canonical phrase.
    pub reason: String,
    /// Raw body bytes.
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Creates a response using the canonical reason phrase.
    #[must_use]
    pub fn new(status: impl Into<StatusCode>, body: Vec<u8>) -> Self {
        let status = status.into();
        Self {
            status,
            reason: status.reason_phrase().to_string(),
            body,
        }
    }

    /// Creates a response with a JSON body.
    #[must_use]
    pub fn json_body(status: impl Into<StatusCode>, body: &serde_json::Value) -> Self {
        Self::new(status, body.to_string().into_bytes())
    }

    /// Creates a response with no body.
    #[must_use]
    pub fn empty(status: impl Into<StatusCode>) -> Self {
        Self::new(status, Vec::new())
    }

    /// Overrides the reason text.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    /// Returns the body as UTF-8 text, replacing invalid sequences.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidBody` if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> DomainResult<T> {
        serde_json::from_slice(&self.body).map_err(|e| DomainError::InvalidBody(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    #[test]
    fn test_status_code_categories() {
        assert!(StatusCode::OK.is_success());
        assert!(StatusCode::NO_CONTENT.is_success());
        assert!(!StatusCode::UNAUTHORIZED.is_success());
        assert!(!StatusCode::SERVICE_UNAVAILABLE.is_success());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(StatusCode(503).to_string(), "503 Service Unavailable");
        assert_eq!(StatusCode(599).to_string(), "599 Unknown");
    }

    #[test]
    fn test_json_body() {
        let response = TransportResponse::json_body(200, &json!({"value": "href"}));
        let value: Value = response.json().unwrap();
        assert_eq!(value["value"], "href");
        assert_eq!(response.reason, "OK");
    }

    #[test]
    fn test_invalid_json_body() {
        let response = TransportResponse::new(200, b"not json".to_vec());
        let result: DomainResult<Value> = response.json();
        assert!(matches!(result, Err(DomainError::InvalidBody(_))));
    }
}
