//! SMC Session Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer.

pub mod adapters;
pub mod config;
pub mod logging;

pub use adapters::{ReqwestTransport, ReqwestTransportFactory};
pub use config::{EnvConfigSource, FileConfigSource};
pub use logging::{LoggingError, init_file_logger, init_stream_logger};
