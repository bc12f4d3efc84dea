//! Registry of server-advertised entry points.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{DomainError, DomainResult};
use crate::link::Link;

/// Message used when the registry is consulted without a login.
const NO_SESSION_MESSAGE: &str =
    "No entry points found, it is likely there is no valid login session.";

/// Body of `GET {base_url}/{api_version}/api`.
#[derive(Debug, Clone, Deserialize)]
pub struct EntryPointDocument {
    /// Advertised entry points.
    pub entry_point: Vec<Link>,
}

/// Maps entry point names (`rel`) to their links.
#[derive(Debug, Clone, Default)]
pub struct EntryPointRegistry {
    entries: HashMap<String, Link>,
}

impl EntryPointRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every entry with the given links.
    pub fn replace(&mut self, links: impl IntoIterator<Item = Link>) {
        self.entries.clear();
        self.entries
            .extend(links.into_iter().map(|link| (link.rel.clone(), link)));
    }

    /// Fails unless at least one entry point is registered.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ResourceNotFound` when the registry is empty.
    pub fn ensure_loaded(&self) -> DomainResult<()> {
        if self.entries.is_empty() {
            Err(DomainError::ResourceNotFound(NO_SESSION_MESSAGE.to_string()))
        } else {
            Ok(())
        }
    }

    /// Returns the href registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ResourceNotFound`; the message differs when the
    /// registry is empty, which usually means nobody logged in.
    pub fn get(&self, name: &str) -> DomainResult<&str> {
        self.entry(name).map(|link| link.href.as_str())
    }

    /// Returns the full link registered under `name`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`EntryPointRegistry::get`].
    pub fn entry(&self, name: &str) -> DomainResult<&Link> {
        self.ensure_loaded()?;
        self.entries.get(name).ok_or_else(|| {
            DomainError::ResourceNotFound(format!("Entry point '{name}' not found."))
        })
    }

    /// True if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no entries are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered entry point names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Iterates over the registered links in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Link> {
        self.entries.values()
    }
}
