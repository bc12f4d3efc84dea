//! Request specification handed to a transport

use serde::Serialize;
use serde_json::Value;

use super::HttpMethod;

/// A single request against the management server.
///
/// The href is absolute: entry points advertised by the server are full URLs
/// and every other path is built from the session's base URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransportRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute URL.
    pub url: String,
    /// Query parameters, appended in order.
    pub query: Vec<(String, String)>,
    /// Extra headers, appended in order.
    pub headers: Vec<(String, String)>,
    /// Optional JSON body.
    pub json: Option<Value>,
}

impl TransportRequest {
    /// Creates a request without body, query or headers.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            json: None,
        }
    }

    /// Shorthand for a GET request.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    /// Shorthand for a POST request.
    #[must_use]
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    /// Shorthand for a PUT request.
    #[must_use]
    pub fn put(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, url)
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn with_json(mut self, body: Value) -> Self {
        self.json = Some(body);
        self
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Returns the value of a header, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
