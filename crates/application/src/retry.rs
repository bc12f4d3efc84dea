//! Retry-on-busy transport decorator.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use smc_domain::{RetryPolicy, TransportRequest, TransportResponse};
use tracing::debug;

use crate::ports::{Transport, TransportError};

/// Sends requests again while the server answers with a busy status.
///
/// Wraps any transport regardless of URL scheme. Responses whose status and
/// method match the policy are retried, and so are connection failures of
/// eligible methods; both count against the same retry budget. Timeouts,
/// TLS errors and `Retry-After` headers are not considered. After the last
/// retry the final response or error is returned as is.
pub struct RetryingTransport {
    inner: Arc<dyn Transport>,
    policy: RetryPolicy,
}

impl RetryingTransport {
    /// Wraps `inner` with `policy`.
    #[must_use]
    pub fn new(inner: Arc<dyn Transport>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

impl fmt::Debug for RetryingTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryingTransport")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

fn describe(outcome: &Result<TransportResponse, TransportError>) -> String {
    match outcome {
        Ok(response) => response.status.to_string(),
        Err(e) => e.to_string(),
    }
}

#[async_trait]
impl Transport for RetryingTransport {
    async fn send(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError> {
        let mut retries = 0;
        loop {
            let outcome = self.inner.send(request).await;
            let retry = match &outcome {
                Ok(response) => self
                    .policy
                    .should_retry(request.method, response.status, retries),
                Err(TransportError::ConnectionFailed(_)) => {
                    self.policy.should_retry_connect(request.method, retries)
                }
                Err(_) => false,
            };
            if !retry {
                return outcome;
            }

            retries += 1;
            let delay = self.policy.backoff(retries);
            debug!(
                method = %request.method,
                url = %request.url,
                cause = %describe(&outcome),
                retry = retries,
                delay_ms = delay.as_millis(),
                "Server busy or unreachable, retrying request"
            );
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }

    fn cookie(&self, name: &str) -> Option<String> {
        self.inner.cookie(name)
    }
}
