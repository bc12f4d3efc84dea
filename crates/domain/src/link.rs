//! Hypermedia links as returned by the server.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A `{rel, href, type}` reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Relation name.
    pub rel: String,
    /// Absolute href.
    pub href: String,
    /// Declared resource type, if any.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Link {
    /// Creates a link.
    #[must_use]
    pub fn new(rel: impl Into<String>, href: impl Into<String>, kind: Option<&str>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
            kind: kind.map(str::to_string),
        }
    }
}

/// Finds the href of the link named `rel`.
///
/// # Errors
///
/// Returns `DomainError::ResourceNotFound` if no link has that name.
pub fn find_link_by_name<'a>(rel: &str, links: &'a [Link]) -> DomainResult<&'a str> {
    links
        .iter()
        .find(|link| link.rel == rel)
        .map(|link| link.href.as_str())
        .ok_or_else(|| DomainError::ResourceNotFound(format!("Resource link {rel} not found.")))
}

/// Returns the resource type declared by the `self` link.
///
/// # Errors
///
/// Returns `DomainError::ResourceNotFound` if there is no `self` link.
pub fn find_type_from_self(links: &[Link]) -> DomainResult<Option<&str>> {
    links
        .iter()
        .find(|link| link.rel == "self")
        .map(|link| link.kind.as_deref())
        .ok_or_else(|| DomainError::ResourceNotFound("Self link not found.".to_string()))
}
