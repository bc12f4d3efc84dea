//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the session core and external systems.
//! Each port is a trait implemented by adapters in the infrastructure layer.

mod config_source;
mod resource_registrar;
mod transport;

pub use config_source::{ConfigError, ConfigSource};
pub use resource_registrar::ResourceRegistrar;
pub use transport::{ConnectOptions, Transport, TransportError, TransportFactory};
