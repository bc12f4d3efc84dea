//! Credentials used to authenticate against the management server.
//!
//! Two flavours exist: an API client key, posted in the login body to the
//! `login` entry point, and an administrator login/password pair, sent as
//! query parameters to the `lms_login` entry point.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Which authentication entry point a credential targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthProvider {
    /// API client key authentication.
    Login,
    /// Administrator login form authentication.
    LmsLogin,
}

impl AuthProvider {
    /// Returns the path segment of the entry point.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::LmsLogin => "lms_login",
        }
    }
}

impl fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable credential value.
///
/// The API key path is active whenever a key is present, even if a
/// login/password pair was also supplied.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential {
    api_key: Option<String>,
    login: Option<String>,
    pwd: Option<String>,
}

impl Credential {
    /// Creates a credential from optional parts.
    #[must_use]
    pub const fn new(api_key: Option<String>, login: Option<String>, pwd: Option<String>) -> Self {
        Self {
            api_key,
            login,
            pwd,
        }
    }

    /// Creates an API key credential.
    #[must_use]
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::new(Some(key.into()), None, None)
    }

    /// Creates a login/password credential.
    #[must_use]
    pub fn login(login: impl Into<String>, pwd: impl Into<String>) -> Self {
        Self::new(None, Some(login.into()), Some(pwd.into()))
    }

    /// Returns the authentication provider this credential targets.
    #[must_use]
    pub const fn provider_name(&self) -> AuthProvider {
        if self.api_key.is_some() {
            AuthProvider::Login
        } else {
            AuthProvider::LmsLogin
        }
    }

    /// Builds `{base_url}/{api_version}/{provider_name}`.
    #[must_use]
    pub fn entry_point(&self, base_url: &str, api_version: &str) -> String {
        format!("{base_url}/{api_version}/{}", self.provider_name())
    }

    /// True iff an API key, or both login and password, are present.
    #[must_use]
    pub const fn has_credentials(&self) -> bool {
        self.api_key.is_some() || (self.login.is_some() && self.pwd.is_some())
    }

    /// Returns the API key, if any.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Returns the credential as named fields.
    ///
    /// `{api_key}` for key credentials, `{login, pwd}` for login credentials,
    /// empty when incomplete.
    #[must_use]
    pub fn credentials_as_map(&self) -> BTreeMap<&'static str, String> {
        let mut map = BTreeMap::new();
        if let Some(key) = &self.api_key {
            map.insert("api_key", key.clone());
        } else if let (Some(login), Some(pwd)) = (&self.login, &self.pwd) {
            map.insert("login", login.clone());
            map.insert("pwd", pwd.clone());
        }
        map
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("provider", &self.provider_name())
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("login", &self.login)
            .field("pwd", &self.pwd.as_ref().map(|_| "***"))
            .finish()
    }
}
