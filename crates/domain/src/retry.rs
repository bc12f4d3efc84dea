//! Retry-on-busy policy.

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::request::HttpMethod;
use crate::response::StatusCode;

/// Upper bound for a single backoff sleep.
pub const MAX_BACKOFF: Duration = Duration::from_secs(120);

/// Policy describing when a request is sent again.
///
/// Defaults: retry `503 Service Unavailable` up to 5 times for GET, POST and
/// PUT with a backoff factor of 0.1 seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt.
    pub total: u32,
    /// Base of the exponential backoff, in seconds.
    pub backoff_factor: f64,
    /// Status codes that trigger a retry.
    pub status_forcelist: BTreeSet<u16>,
    /// Methods eligible for retry.
    pub methods: BTreeSet<HttpMethod>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            total: 5,
            backoff_factor: 0.1,
            status_forcelist: BTreeSet::from([StatusCode::SERVICE_UNAVAILABLE.as_u16()]),
            methods: BTreeSet::from([HttpMethod::Get, HttpMethod::Post, HttpMethod::Put]),
        }
    }
}

impl RetryPolicy {
    /// Sets the number of retries.
    #[must_use]
    pub const fn with_total(mut self, total: u32) -> Self {
        self.total = total;
        self
    }

    /// Sets the backoff factor in seconds.
    #[must_use]
    pub const fn with_backoff_factor(mut self, backoff_factor: f64) -> Self {
        self.backoff_factor = backoff_factor;
        self
    }

    /// Replaces the retried status codes. An empty list keeps the default.
    #[must_use]
    pub fn with_status_forcelist(mut self, statuses: impl IntoIterator<Item = u16>) -> Self {
        let statuses: BTreeSet<u16> = statuses.into_iter().collect();
        if !statuses.is_empty() {
            self.status_forcelist = statuses;
        }
        self
    }

    /// Replaces the retried methods. An empty list keeps the default.
    #[must_use]
    pub fn with_methods(mut self, methods: impl IntoIterator<Item = HttpMethod>) -> Self {
        let methods: BTreeSet<HttpMethod> = methods.into_iter().collect();
        if !methods.is_empty() {
            self.methods = methods;
        }
        self
    }

    /// True if a response with `status` to `method` should be retried after
    /// `retries_done` retries.
    #[must_use]
    pub fn should_retry(&self, method: HttpMethod, status: StatusCode, retries_done: u32) -> bool {
        self.should_retry_connect(method, retries_done)
            && self.status_forcelist.contains(&status.as_u16())
    }

    /// True if `method` should be sent again after a failed connection
    /// attempt, `retries_done` retries in.
    #[must_use]
    pub fn should_retry_connect(&self, method: HttpMethod, retries_done: u32) -> bool {
        retries_done < self.total && self.methods.contains(&method)
    }

    /// Sleep before retry number `retry` (starting at 1):
    /// `backoff_factor * 2^(retry - 1)`, capped at [`MAX_BACKOFF`].
    #[must_use]
    pub fn backoff(&self, retry: u32) -> Duration {
        if retry == 0 || self.backoff_factor <= 0.0 {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(retry - 1).unwrap_or(i32::MAX);
        let seconds = self.backoff_factor * 2f64.powi(exponent);
        if seconds.is_finite() && seconds < MAX_BACKOFF.as_secs_f64() {
            Duration::from_secs_f64(seconds)
        } else {
            MAX_BACKOFF
        }
    }
}
