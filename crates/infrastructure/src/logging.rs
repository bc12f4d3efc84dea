//! Logger initialisers.
//!
//! Both install a global `tracing` subscriber. `RUST_LOG` overrides the
//! given level when set.
//!
//! ```bash
//! RUST_LOG=smc_application=debug,warn smc-session
//! ```

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Errors raised while installing a logger.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The log file could not be opened.
    #[error("cannot open log file: {0}")]
    Io(#[from] std::io::Error),

    /// A global subscriber is already installed.
    #[error("logger already initialised: {0}")]
    Init(String),
}

fn filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_ascii_lowercase()))
}

/// Logs to stderr at `level`.
///
/// # Errors
///
/// Returns `LoggingError::Init` if a subscriber is already installed.
pub fn init_stream_logger(level: Level) -> Result<(), LoggingError> {
    tracing_subscriber::registry()
        .with(filter(level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))
}

/// Appends log lines to the file at `path`, creating it if needed.
///
/// # Errors
///
/// Returns `LoggingError::Io` if the file cannot be opened and
/// `LoggingError::Init` if a subscriber is already installed.
pub fn init_file_logger(path: &Path, level: Level) -> Result<(), LoggingError> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::registry()
        .with(filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))
}
