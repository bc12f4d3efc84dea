//! SMC Session Application - Session lifecycle and ports
//!
//! This crate holds the session manager and the ports it depends on.
//! Concrete transports and configuration sources live in the
//! infrastructure layer.

pub mod discovery;
pub mod error;
pub mod ports;
pub mod retry;
pub mod session;

#[cfg(test)]
mod test_support;

pub use discovery::{list_available_versions, load_entry_points, resolve_api_version};
pub use error::{SessionError, SessionResult};
pub use ports::{
    ConfigError, ConfigSource, ConnectOptions, ResourceRegistrar, Transport, TransportError,
    TransportFactory,
};
pub use retry::RetryingTransport;
pub use session::{LogoutOutcome, LogoutReport, SESSION_COOKIE, Session};
