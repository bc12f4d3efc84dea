//! Best-effort logout across every established domain.

use std::fmt;

use smc_domain::{StatusCode, TransportRequest};
use tracing::{error, info, warn};

use super::Session;
use crate::ports::TransportFactory;

/// Result of logging out of one domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoutOutcome {
    /// The server answered 204.
    LoggedOut,
    /// The server answered with another status.
    UnexpectedStatus(u16),
    /// The request could not be sent, or there was nothing to send it to.
    Failed(String),
}

impl LogoutOutcome {
    /// True for [`LogoutOutcome::LoggedOut`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::LoggedOut)
    }
}

impl fmt::Display for LogoutOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoggedOut => f.write_str("logged out"),
            Self::UnexpectedStatus(status) => write!(f, "unexpected status {status}"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Per-domain outcomes of [`Session::logout`], in domain order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogoutReport {
    outcomes: Vec<(String, LogoutOutcome)>,
}

impl LogoutReport {
    /// Domains that were attempted.
    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.outcomes.iter().map(|(domain, _)| domain.as_str())
    }

    /// Outcome for `domain`, if it was attempted.
    #[must_use]
    pub fn outcome(&self, domain: &str) -> Option<&LogoutOutcome> {
        self.outcomes
            .iter()
            .find(|(name, _)| name == domain)
            .map(|(_, outcome)| outcome)
    }

    /// All outcomes.
    #[must_use]
    pub fn outcomes(&self) -> &[(String, LogoutOutcome)] {
        &self.outcomes
    }

    /// True if every domain logged out cleanly.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|(_, outcome)| outcome.is_success())
    }

    /// True if no domain was attempted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

impl<F: TransportFactory> Session<F> {
    /// Logs out of every domain with an established transport.
    ///
    /// Never fails: each domain is attempted in turn and its outcome logged
    /// and recorded. Afterwards the per-domain map is drained, the entry
    /// point registry cleared and the current transport unset.
    pub async fn logout(&mut self) -> LogoutReport {
        let mut report = LogoutReport::default();
        let href = self.entry_points.get("logout").map(str::to_string);
        let transports = std::mem::take(&mut self.transports);

        for (domain, transport) in transports {
            let outcome = match &href {
                Ok(href) => match transport.active.send(&TransportRequest::put(href)).await {
                    Ok(response) if response.status == StatusCode::NO_CONTENT => {
                        info!(domain = %domain, "Logged out successfully");
                        LogoutOutcome::LoggedOut
                    }
                    Ok(response) => {
                        warn!(
                            domain = %domain,
                            status = response.status.as_u16(),
                            reason = %response.reason,
                            "Logout status was unexpected"
                        );
                        LogoutOutcome::UnexpectedStatus(response.status.as_u16())
                    }
                    Err(e) => {
                        error!(domain = %domain, error = %e, "Logout failed");
                        LogoutOutcome::Failed(e.to_string())
                    }
                },
                Err(e) => {
                    error!(domain = %domain, error = %e, "Logout failed");
                    LogoutOutcome::Failed(e.to_string())
                }
            };
            report.outcomes.push((domain, outcome));
        }

        self.entry_points.clear();
        self.current = None;
        report
    }
}
