//! Session manager
//!
//! A [`Session`] is the explicit client context shared by everything that
//! talks to the management server. It is created empty, populated by
//! [`Session::login`], mutated by [`Session::switch_domain`] and
//! [`Session::refresh`], and emptied by [`Session::logout`]. All mutating
//! operations take `&mut self`, so one coordinating caller drives it.

mod auth;
mod lifecycle;
mod logout;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use smc_domain::{
    ApiVersion, Credential, DEFAULT_DOMAIN, DEFAULT_TIMEOUT, EntryPointRegistry, LoginParams,
    RetryPolicy, StatusCode, TlsVerify, TransportRequest, TransportResponse,
};

use crate::error::{SessionError, SessionResult};
use crate::ports::{ConfigSource, ResourceRegistrar, Transport, TransportFactory};
use crate::retry::RetryingTransport;

pub use logout::{LogoutOutcome, LogoutReport};

/// Name of the session cookie set by the server.
pub const SESSION_COOKIE: &str = "JSESSIONID";

/// Transport established for one domain.
///
/// `base` is the plain logged-in transport; `active` is what requests go
/// through, possibly wrapped in a [`RetryingTransport`].
#[derive(Clone)]
struct DomainTransport {
    base: Arc<dyn Transport>,
    active: Arc<dyn Transport>,
}

impl DomainTransport {
    fn new(base: Arc<dyn Transport>, policy: Option<&RetryPolicy>) -> Self {
        let active = Self::decorate(&base, policy);
        Self { base, active }
    }

    fn decorate(base: &Arc<dyn Transport>, policy: Option<&RetryPolicy>) -> Arc<dyn Transport> {
        match policy {
            Some(policy) => Arc::new(RetryingTransport::new(base.clone(), policy.clone())),
            None => base.clone(),
        }
    }

    fn apply(&mut self, policy: Option<&RetryPolicy>) {
        self.active = Self::decorate(&self.base, policy);
    }
}

/// Client session against one management server.
pub struct Session<F> {
    factory: F,
    config_sources: Vec<Box<dyn ConfigSource>>,
    registrar: Option<Box<dyn ResourceRegistrar>>,
    resources_registered: bool,
    url: Option<String>,
    api_version: Option<ApiVersion>,
    domain: String,
    timeout: Duration,
    verify: TlsVerify,
    credential: Credential,
    extra_args: Map<String, Value>,
    retry_policy: Option<RetryPolicy>,
    current: Option<Arc<dyn Transport>>,
    transports: BTreeMap<String, DomainTransport>,
    entry_points: EntryPointRegistry,
}

impl<F: TransportFactory> Session<F> {
    /// Creates an unauthenticated session that opens transports with `factory`.
    #[must_use]
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            config_sources: Vec::new(),
            registrar: None,
            resources_registered: false,
            url: None,
            api_version: None,
            domain: DEFAULT_DOMAIN.to_string(),
            timeout: DEFAULT_TIMEOUT,
            verify: TlsVerify::Enabled,
            credential: Credential::default(),
            extra_args: Map::new(),
            retry_policy: None,
            current: None,
            transports: BTreeMap::new(),
            entry_points: EntryPointRegistry::new(),
        }
    }

    /// Appends a configuration source, consulted in insertion order when a
    /// login lacks a URL or credential.
    #[must_use]
    pub fn with_config_source(mut self, source: impl ConfigSource + 'static) -> Self {
        self.config_sources.push(Box::new(source));
        self
    }

    /// Sets the hook run once after the first successful login.
    #[must_use]
    pub fn with_registrar(mut self, registrar: impl ResourceRegistrar + 'static) -> Self {
        self.registrar = Some(Box::new(registrar));
        self
    }

    /// Resolved API version.
    #[must_use]
    pub const fn api_version(&self) -> Option<&ApiVersion> {
        self.api_version.as_ref()
    }

    /// Server base URL.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Active domain.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// TLS verification mode of the last login.
    #[must_use]
    pub const fn verify(&self) -> &TlsVerify {
        &self.verify
    }

    /// Credential of the last login.
    #[must_use]
    pub const fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Current authenticated transport, if logged in.
    #[must_use]
    pub fn transport(&self) -> Option<Arc<dyn Transport>> {
        self.current.clone()
    }

    /// True if a transport is current.
    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }

    /// Domains with an established transport, sorted.
    #[must_use]
    pub fn domains(&self) -> Vec<&str> {
        self.transports.keys().map(String::as_str).collect()
    }

    /// Entry points of the current login.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ResourceNotFound` when nothing is loaded,
    /// which usually means there is no valid login session.
    pub fn entry_points(&self) -> SessionResult<&EntryPointRegistry> {
        self.entry_points.ensure_loaded()?;
        Ok(&self.entry_points)
    }

    /// Session id in cookie header form, `JSESSIONID=<value>`.
    #[must_use]
    pub fn session_id(&self) -> Option<String> {
        let value = self.current.as_ref()?.cookie(SESSION_COOKIE)?;
        Some(format!("{SESSION_COOKIE}={value}"))
    }

    /// True if a session exists and the URL uses https.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.current.is_some()
            && self
                .url
                .as_deref()
                .is_some_and(|url| url.starts_with("https"))
    }

    /// Websocket URL of the current API version, e.g. `wss://host:8082/6.5`.
    #[must_use]
    pub fn web_socket_url(&self) -> Option<String> {
        let url = self.url.as_deref()?;
        let version = self.api_version.as_ref()?;
        let scheme = if self.is_secure() { "wss" } else { "ws" };
        let host = url.rsplit("://").next().unwrap_or(url);
        Some(format!("{scheme}://{host}/{version}"))
    }

    /// Parameters that reproduce the current login.
    ///
    /// Used by [`Session::refresh`] and [`Session::switch_domain`].
    #[must_use]
    pub fn login_params(&self) -> LoginParams {
        LoginParams {
            url: self.url.clone(),
            credential: self.credential.clone(),
            api_version: self.api_version.as_ref().map(|v| v.as_str().to_string()),
            timeout: Some(self.timeout),
            verify: self.verify.clone(),
            domain: Some(self.domain.clone()),
            extra_args: self.extra_args.clone(),
            retry_on_busy: self.retry_policy.clone(),
        }
    }

    /// Sends a request through the current transport.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Connection` if not logged in or if the request
    /// could not be sent. Statuses are not inspected.
    pub async fn send(&self, request: &TransportRequest) -> SessionResult<TransportResponse> {
        let transport = self
            .current
            .as_ref()
            .ok_or_else(|| SessionError::connection("No valid login session."))?;
        Ok(transport.send(request).await?)
    }

    /// Href of the API client the session is logged in as.
    ///
    /// Returns `None` when not logged in or when the server does not answer
    /// with 200 or 201.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ResourceNotFound` if the server has no
    /// `current_user` entry point, and `SessionError::Connection` on
    /// transport failures.
    pub async fn current_user(&self) -> SessionResult<Option<String>> {
        if self.current.is_none() {
            return Ok(None);
        }
        let href = self.entry_points.get("current_user")?;
        let response = self.send(&TransportRequest::get(href)).await?;
        if ![StatusCode::OK, StatusCode::CREATED].contains(&response.status) {
            return Ok(None);
        }
        let body: Value = response.json()?;
        Ok(body.get("value").and_then(Value::as_str).map(str::to_string))
    }

    /// Log schema of the server's API version.
    ///
    /// Returns `None` without a session or session cookie, or when the server
    /// does not answer with 200 or 201.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Connection` on transport or decoding failures.
    pub async fn log_schema(&self) -> SessionResult<Option<Value>> {
        let (Some(url), Some(version), Some(session_id)) =
            (self.url.as_deref(), self.api_version.as_ref(), self.session_id())
        else {
            return Ok(None);
        };

        let request = TransportRequest::get(format!("{url}/{version}/monitoring/log/schemas"))
            .with_header("cookie", session_id)
            .with_header("content-type", "application/json");
        let response = self.send(&request).await?;
        if ![StatusCode::OK, StatusCode::CREATED].contains(&response.status) {
            return Ok(None);
        }
        Ok(Some(response.json()?))
    }
}
