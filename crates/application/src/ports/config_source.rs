//! Configuration source port

use async_trait::async_trait;
use smc_domain::LoginConfig;

/// Errors that can occur while loading login configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The source has nothing to offer, e.g. a missing file.
    #[error("configuration not found: {0}")]
    NotFound(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The source exists but could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// A required setting is absent.
    #[error("missing setting: {0}")]
    Missing(String),

    /// A setting has an unusable value.
    #[error("invalid setting {name}: {message}")]
    Invalid {
        /// Setting name.
        name: String,
        /// What is wrong with it.
        message: String,
    },
}

/// Port for loading login settings from outside the program.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Short name used in log messages.
    fn name(&self) -> &str;

    /// Loads the login settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is absent or incomplete.
    async fn load(&self) -> Result<LoginConfig, ConfigError>;
}
