//! Transport implementation using reqwest.
//!
//! Each transport owns a `reqwest::Client` and the cookie jar behind it, so
//! the session cookie issued at login stays with the transport that logged in.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Certificate, Client, Method, Url};
use smc_application::ports::{ConnectOptions, Transport, TransportError, TransportFactory};
use smc_domain::{HttpMethod, TlsVerify, TransportRequest, TransportResponse};
use tracing::trace;

/// Transport backed by a reqwest client with its own cookie jar.
pub struct ReqwestTransport {
    client: Client,
    jar: Arc<Jar>,
    base_url: Url,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Creates a transport for `options`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid, the CA bundle cannot be
    /// read, or the client cannot be built.
    pub fn new(options: &ConnectOptions) -> Result<Self, TransportError> {
        let base_url = Url::parse(&options.base_url)
            .map_err(|e| TransportError::InvalidUrl(format!("{e}: {}", options.base_url)))?;
        let jar = Arc::new(Jar::default());

        let mut builder = Client::builder()
            .user_agent(concat!("smc-session/", env!("CARGO_PKG_VERSION")))
            .cookie_provider(jar.clone())
            .connect_timeout(options.timeout)
            .timeout(options.timeout);

        builder = match &options.verify {
            TlsVerify::Enabled => builder,
            TlsVerify::Disabled => builder.danger_accept_invalid_certs(true),
            TlsVerify::CaBundle(path) => {
                let pem = std::fs::read(path).map_err(|e| {
                    TransportError::Tls(format!("cannot read CA bundle {}: {e}", path.display()))
                })?;
                let certificate = Certificate::from_pem(&pem)
                    .map_err(|e| TransportError::Tls(format!("invalid CA bundle: {e}")))?;
                builder.add_root_certificate(certificate)
            }
        };

        let client = builder
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(Self {
            client,
            jar,
            base_url,
            timeout: options.timeout,
        })
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Parses the request URL and appends its query parameters.
    fn build_url(request: &TransportRequest) -> Result<Url, TransportError> {
        let mut url = Url::parse(&request.url)
            .map_err(|e| TransportError::InvalidUrl(format!("{e}: {}", request.url)))?;
        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &request.query {
                pairs.append_pair(name, value);
            }
        }
        Ok(url)
    }

    /// Maps reqwest errors to `TransportError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout { timeout_ms };
        }

        let message = error.to_string();
        let lowered = format!("{error:?}").to_lowercase();
        if lowered.contains("certificate") || lowered.contains("tls") {
            return TransportError::Tls(message);
        }

        if error.is_connect() || error.is_request() {
            return TransportError::ConnectionFailed(message);
        }

        TransportError::Other(message)
    }

    /// Returns every cookie held for the base URL as `(name, value)` pairs.
    fn cookies(&self) -> Vec<(String, String)> {
        let Some(header) = self.jar.cookies(&self.base_url) else {
            return Vec::new();
        };
        let Ok(header) = header.to_str() else {
            return Vec::new();
        };
        parse_cookie_header(header)
    }
}

/// Splits a `Cookie` header value such as `a=b; c=d` into pairs.
fn parse_cookie_header(header: &str) -> Vec<(String, String)> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError> {
        let url = Self::build_url(request)?;
        let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.json {
            builder = builder.json(body);
        }

        trace!(method = %request.method, url = %request.url, "Sending request");
        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(&e, timeout_ms))?;

        let status = response.status();
        let reason = status
            .canonical_reason()
            .unwrap_or_else(|| smc_domain::StatusCode(status.as_u16()).reason_phrase())
            .to_string();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Other(format!("Failed to read body: {e}")))?
            .to_vec();

        Ok(TransportResponse::new(status.as_u16(), body).with_reason(reason))
    }

    fn cookie(&self, name: &str) -> Option<String> {
        self.cookies()
            .into_iter()
            .find(|(cookie, _)| cookie == name)
            .map(|(_, value)| value)
    }
}

/// Opens [`ReqwestTransport`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReqwestTransportFactory;

impl ReqwestTransportFactory {
    /// Creates the factory.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl TransportFactory for ReqwestTransportFactory {
    fn connect(&self, options: &ConnectOptions) -> Result<Arc<dyn Transport>, TransportError> {
        Ok(Arc::new(ReqwestTransport::new(options)?))
    }
}
