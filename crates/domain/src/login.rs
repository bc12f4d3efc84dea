//! Login parameters and the configuration record they can be loaded from.

use std::path::PathBuf;
use std::time::Duration;

use serde_json::{Map, Value};

use crate::credential::Credential;
use crate::retry::RetryPolicy;

/// Domain used when none is given.
pub const DEFAULT_DOMAIN: &str = "Shared Domain";

/// Timeout used when none is given.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Extra argument that enables the retry adapter instead of being sent.
pub const RETRY_ON_BUSY_ARG: &str = "retry_on_busy";

/// TLS certificate verification mode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TlsVerify {
    /// Verify against the system roots.
    #[default]
    Enabled,
    /// Accept any certificate.
    Disabled,
    /// Verify against the PEM bundle at this path.
    CaBundle(PathBuf),
}

impl TlsVerify {
    /// True unless verification is disabled.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }
}

impl From<bool> for TlsVerify {
    fn from(verify: bool) -> Self {
        if verify { Self::Enabled } else { Self::Disabled }
    }
}

/// Parameters of a single login call.
///
/// Anything left unset falls back to the session's current value or the
/// crate defaults. When the URL or the credential is missing the session
/// consults its configuration sources instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginParams {
    /// Server base URL, e.g. `https://smc.example.com:8082`.
    pub url: Option<String>,
    /// Credential to authenticate with.
    pub credential: Credential,
    /// Requested API version.
    pub api_version: Option<String>,
    /// Connect and read timeout.
    pub timeout: Option<Duration>,
    /// TLS verification mode.
    pub verify: TlsVerify,
    /// Domain to log in to.
    pub domain: Option<String>,
    /// Extra fields merged into the login body.
    pub extra_args: Map<String, Value>,
    /// Retry-on-busy policy to install on the new transport.
    pub retry_on_busy: Option<RetryPolicy>,
}

impl LoginParams {
    /// Creates parameters for `url` with no credential.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Uses an API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.credential = Credential::api_key(api_key);
        self
    }

    /// Uses an administrator login and password.
    #[must_use]
    pub fn with_login(mut self, login: impl Into<String>, pwd: impl Into<String>) -> Self {
        self.credential = Credential::login(login, pwd);
        self
    }

    /// Requests an API version.
    #[must_use]
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = Some(api_version.into());
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the TLS verification mode.
    #[must_use]
    pub fn with_verify(mut self, verify: impl Into<TlsVerify>) -> Self {
        self.verify = verify.into();
        self
    }

    /// Sets the domain.
    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Adds an extra login argument.
    #[must_use]
    pub fn with_extra_arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra_args.insert(name.into(), value.into());
        self
    }

    /// Installs a retry-on-busy policy after login.
    #[must_use]
    pub fn with_retry_on_busy(mut self, policy: RetryPolicy) -> Self {
        self.retry_on_busy = Some(policy);
        self
    }

    /// True if the URL or a usable credential is missing.
    #[must_use]
    pub const fn needs_configuration(&self) -> bool {
        self.url.is_none() || !self.credential.has_credentials()
    }

    /// Moves a `retry_on_busy` flag out of the extra arguments.
    ///
    /// A truthy flag installs the default policy unless one is already set;
    /// the flag itself is never sent to the server.
    pub fn take_retry_flag(&mut self) {
        if let Some(flag) = self.extra_args.remove(RETRY_ON_BUSY_ARG)
            && flag.as_bool().unwrap_or(false)
            && self.retry_on_busy.is_none()
        {
            self.retry_on_busy = Some(RetryPolicy::default());
        }
    }
}

/// Login settings produced by a configuration source.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginConfig {
    /// Server base URL.
    pub url: String,
    /// API client key.
    pub api_key: String,
    /// Requested API version.
    pub api_version: Option<String>,
    /// TLS verification mode.
    pub verify: TlsVerify,
    /// Timeout.
    pub timeout: Option<Duration>,
    /// Domain.
    pub domain: Option<String>,
    /// Extra login arguments.
    pub kwargs: Map<String, Value>,
}

impl From<LoginConfig> for LoginParams {
    fn from(config: LoginConfig) -> Self {
        let mut params = Self {
            url: Some(config.url),
            credential: Credential::api_key(config.api_key),
            api_version: config.api_version,
            timeout: config.timeout,
            verify: config.verify,
            domain: config.domain,
            extra_args: config.kwargs,
            retry_on_busy: None,
        };
        params.take_retry_flag();
        params
    }
}
