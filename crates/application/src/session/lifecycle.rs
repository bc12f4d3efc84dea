//! Login, refresh, domain switching and retry installation.

use smc_domain::{EntryPointRegistry, LoginParams, RetryPolicy, StatusCode, merge_objects};
use tracing::{debug, info, warn};

use super::auth::build_auth_request;
use super::{DomainTransport, Session};
use crate::discovery::{load_entry_points, resolve_api_version};
use crate::error::{SessionError, SessionResult};
use crate::ports::{ConnectOptions, TransportFactory};

impl<F: TransportFactory> Session<F> {
    /// Authenticates against the server and makes the new transport current.
    ///
    /// Missing URL or credential is filled from the configuration sources.
    /// The session's URL, version, domain, credential, extra arguments and
    /// entry points are only updated once the server accepted the login and
    /// its entry points were loaded.
    ///
    /// # Errors
    ///
    /// - `SessionError::ConfigLoad` if no source could supply the parameters
    /// - `SessionError::Connection` on discovery, login or entry point
    ///   failures, carrying the HTTP status when one was received
    pub async fn login(&mut self, params: LoginParams) -> SessionResult<()> {
        let mut params = if params.needs_configuration() {
            self.load_configuration(params).await?
        } else {
            params
        };
        params.take_retry_flag();

        let url = params
            .url
            .as_deref()
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| SessionError::ConfigLoad("No SMC URL was provided.".to_string()))?;
        let timeout = params.timeout.unwrap_or(self.timeout);
        let domain = params.domain.clone().unwrap_or_else(|| self.domain.clone());
        let options = ConnectOptions {
            base_url: url.clone(),
            timeout,
            verify: params.verify.clone(),
        };

        let discovery = self.factory.connect(&options)?;
        let api_version =
            resolve_api_version(discovery.as_ref(), &url, params.api_version.as_deref()).await?;

        let request = build_auth_request(
            &url,
            &api_version,
            &params.credential,
            &domain,
            &params.extra_args,
        );
        let transport = self.factory.connect(&options)?;
        let response = transport.send(&request).await?;
        if response.status != StatusCode::OK {
            return Err(SessionError::unexpected_status("Login failed", &response));
        }

        let policy = params.retry_on_busy.or_else(|| self.retry_policy.clone());
        let entry = DomainTransport::new(transport, policy.as_ref());
        let mut entry_points = EntryPointRegistry::new();
        load_entry_points(entry.active.as_ref(), &url, &api_version, &mut entry_points).await?;

        self.current = Some(entry.active.clone());
        self.url = Some(url);
        self.api_version = Some(api_version);
        self.timeout = timeout;
        self.verify = params.verify;
        self.credential = params.credential;
        self.extra_args = params.extra_args;
        self.retry_policy = policy;
        self.domain.clone_from(&domain);
        self.transports.insert(domain, entry);
        self.entry_points = entry_points;

        debug!(
            session_id = self.session_id().as_deref().unwrap_or("<none>"),
            domain = %self.domain,
            "Login succeeded and session retrieved"
        );

        if !self.resources_registered {
            if let Some(registrar) = &self.registrar {
                registrar.register(&self.entry_points);
            }
            self.resources_registered = true;
        }
        Ok(())
    }

    /// Replays the last login after the server expired the session.
    ///
    /// Performs no network call unless a transport is current and both a URL
    /// and a usable credential were captured.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Connection` if the prerequisites are missing
    /// or the new login fails.
    pub async fn refresh(&mut self) -> SessionResult<()> {
        if self.current.is_some() && self.credential.has_credentials() && self.url.is_some() {
            info!(domain = %self.domain, "Session expired, attempting to refresh login");
            return self.login(self.login_params()).await;
        }
        Err(SessionError::connection(
            "Session expired and attempted refresh failed.",
        ))
    }

    /// Makes `domain` the active domain.
    ///
    /// Reuses an existing transport for that domain without any network
    /// call; otherwise logs in to it with the captured parameters.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Session::login`] when a new login is needed.
    pub async fn switch_domain(&mut self, domain: &str) -> SessionResult<()> {
        if self.domain == domain {
            return Ok(());
        }

        if let Some(existing) = self.transports.get(domain) {
            self.current = Some(existing.active.clone());
            domain.clone_into(&mut self.domain);
            info!(domain, "Switched to existing domain session");
            return Ok(());
        }

        info!(domain, "Logging in to new domain");
        let params = self.login_params().with_domain(domain);
        self.login(params).await
    }

    /// Installs or removes the retry-on-busy policy.
    ///
    /// Applies to every established transport and is remembered for later
    /// logins, refreshes and domain switches.
    pub fn set_retry_on_busy(&mut self, policy: Option<RetryPolicy>) {
        if policy.is_some() && self.current.is_none() {
            warn!("Retry policy set without a login session; it applies from the next login");
        }

        for entry in self.transports.values_mut() {
            entry.apply(policy.as_ref());
        }
        self.current = self
            .current
            .as_ref()
            .and_then(|_| self.transports.get(&self.domain))
            .map(|entry| entry.active.clone());
        self.retry_policy = policy;
    }

    async fn load_configuration(&self, requested: LoginParams) -> SessionResult<LoginParams> {
        let mut failures = Vec::new();

        for source in &self.config_sources {
            match source.load().await {
                Ok(config) => {
                    debug!(source = source.name(), "Loaded login configuration");
                    let mut params = LoginParams::from(config);
                    if requested.domain.is_some() {
                        params.domain = requested.domain;
                    }
                    if requested.api_version.is_some() {
                        params.api_version = requested.api_version;
                    }
                    if requested.timeout.is_some() {
                        params.timeout = requested.timeout;
                    }
                    if requested.retry_on_busy.is_some() {
                        params.retry_on_busy = requested.retry_on_busy;
                    }
                    merge_objects(&mut params.extra_args, &requested.extra_args, false);
                    return Ok(params);
                }
                Err(e) => {
                    debug!(source = source.name(), error = %e, "Configuration source unusable");
                    failures.push(format!("{}: {e}", source.name()));
                }
            }
        }

        let message = if failures.is_empty() {
            "No URL or credentials were provided and no configuration source is available."
                .to_string()
        } else {
            format!(
                "Unable to load login configuration ({}).",
                failures.join("; ")
            )
        };
        Err(SessionError::ConfigLoad(message))
    }
}
