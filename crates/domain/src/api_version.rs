//! API version selection.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Body of the unauthenticated `GET {base_url}/api` discovery call.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionDocument {
    /// Advertised versions.
    pub version: Vec<VersionEntry>,
}

/// One advertised version.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionEntry {
    /// Version number as text, e.g. `"6.5"`.
    pub rel: String,
}

impl VersionDocument {
    /// Returns the advertised version strings in server order.
    #[must_use]
    pub fn versions(self) -> Vec<String> {
        self.version.into_iter().map(|entry| entry.rel).collect()
    }
}

/// An API version as advertised by the server.
///
/// The spelling is kept verbatim because it becomes a URL path segment;
/// ordering uses the floating-point value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiVersion {
    raw: String,
    value: f64,
}

impl ApiVersion {
    /// Parses a version string such as `"6.5"`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidApiVersion` if the string is not numeric.
    pub fn parse(raw: impl Into<String>) -> DomainResult<Self> {
        let raw = raw.into();
        let value = raw
            .trim()
            .parse::<f64>()
            .map_err(|_| DomainError::InvalidApiVersion(raw.clone()))?;
        Ok(Self { raw, value })
    }

    /// Returns the version as advertised.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Picks the version to use from the advertised list.
    ///
    /// The requested version is used when advertised; otherwise, or when
    /// nothing is requested, the numerically greatest version wins.
    ///
    /// # Errors
    ///
    /// Returns an error if a version string is not numeric or the list is empty.
    pub fn select(available: &[String], requested: Option<&str>) -> DomainResult<Self> {
        let versions = available
            .iter()
            .map(|v| Self::parse(v.as_str()))
            .collect::<DomainResult<Vec<_>>>()?;

        if let Some(requested) = requested
            && let Some(found) = versions.iter().find(|v| v.raw == requested)
        {
            return Ok(found.clone());
        }

        versions
            .into_iter()
            .max_by(|a, b| a.value.total_cmp(&b.value))
            .ok_or(DomainError::NoApiVersions)
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn available() -> Vec<String> {
        vec!["6.1".to_string(), "6.2".to_string(), "6.5".to_string()]
    }

    #[test]
    fn test_requested_version_is_used_when_available() {
        let version = ApiVersion::select(&available(), Some("6.2")).unwrap();
        assert_eq!(version.as_str(), "6.2");
    }

    #[test]
    fn test_unknown_requested_version_falls_back_to_newest() {
        let version = ApiVersion::select(&available(), Some("9.9")).unwrap();
        assert_eq!(version.as_str(), "6.5");
    }

    #[test]
    fn test_no_request_picks_newest() {
        let version = ApiVersion::select(&available(), None).unwrap();
        assert_eq!(version.as_str(), "6.5");
        assert!((version.value() - 6.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_numeric_not_lexical_ordering() {
        let versions = vec!["10.0".to_string(), "6.5".to_string(), "9.1".to_string()];
        let version = ApiVersion::select(&versions, None).unwrap();
        assert_eq!(version.as_str(), "10.0");
    }

    #[test]
    fn test_version_document() {
        let document: VersionDocument =
            serde_json::from_str(r#"{"version":[{"rel":"6.1"},{"rel":"6.5"}]}"#).unwrap();
        assert_eq!(document.versions(), vec!["6.1", "6.5"]);
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(ApiVersion::select(&[], None), Err(DomainError::NoApiVersions));
    }

    #[test]
    fn test_non_numeric_version() {
        let versions = vec!["latest".to_string()];
        assert_eq!(
            ApiVersion::select(&versions, None),
            Err(DomainError::InvalidApiVersion("latest".to_string()))
        );
    }
}
