//! YAML configuration file.
//!
//! The default location is `~/.smcrc`:
//!
//! ```yaml
//! smc_address: 192.168.1.10
//! smc_port: 8082
//! smc_ssl: true
//! smc_apikey: xxxxxxxxxxxxxxxxxxxx
//! api_version: "6.5"
//! verify_ssl: true
//! ssl_cert_file: /etc/ssl/smc-ca.pem
//! timeout: 30
//! domain: Shared Domain
//! kwargs:
//!   beta: true
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use smc_application::ports::{ConfigError, ConfigSource};
use smc_domain::LoginConfig;
use tokio::fs;

use super::tls_verify;

/// Port used when the file does not name one.
pub const DEFAULT_PORT: u16 = 8082;

/// File name looked up in the home directory.
pub const DEFAULT_FILE_NAME: &str = ".smcrc";

#[derive(Debug, Deserialize)]
struct FileSettings {
    smc_address: Option<String>,
    smc_port: Option<u16>,
    #[serde(default)]
    smc_ssl: bool,
    smc_apikey: Option<String>,
    api_version: Option<ApiVersionSetting>,
    #[serde(default = "default_true")]
    verify_ssl: bool,
    ssl_cert_file: Option<PathBuf>,
    timeout: Option<u64>,
    domain: Option<String>,
    #[serde(default)]
    kwargs: Map<String, Value>,
}

/// YAML reads `6.5` as a number and `"6.5"` as a string; accept both.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ApiVersionSetting {
    Text(String),
    Number(f64),
}

impl ApiVersionSetting {
    fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

const fn default_true() -> bool {
    true
}

/// Loads login settings from a YAML file.
#[derive(Debug, Clone)]
pub struct FileConfigSource {
    path: Option<PathBuf>,
}

impl FileConfigSource {
    /// Uses `~/.smcrc`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            path: dirs::home_dir().map(|home| home.join(DEFAULT_FILE_NAME)),
        }
    }

    /// Uses the file at `path`.
    #[must_use]
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Returns the file that will be read, if a home directory was found.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn into_config(settings: FileSettings) -> Result<LoginConfig, ConfigError> {
        let address = settings
            .smc_address
            .filter(|a| !a.trim().is_empty())
            .ok_or_else(|| ConfigError::Missing("smc_address".to_string()))?;
        let api_key = settings
            .smc_apikey
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::Missing("smc_apikey".to_string()))?;

        let scheme = if settings.smc_ssl { "https" } else { "http" };
        let port = settings.smc_port.unwrap_or(DEFAULT_PORT);
        let url = format!("{scheme}://{}:{port}", address.trim());

        Ok(LoginConfig {
            url,
            api_key,
            api_version: settings.api_version.map(ApiVersionSetting::into_string),
            verify: tls_verify(settings.verify_ssl, settings.ssl_cert_file),
            timeout: settings.timeout.map(Duration::from_secs),
            domain: settings.domain,
            kwargs: settings.kwargs,
        })
    }
}

impl Default for FileConfigSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigSource for FileConfigSource {
    fn name(&self) -> &str {
        "file"
    }

    async fn load(&self) -> Result<LoginConfig, ConfigError> {
        let Some(path) = &self.path else {
            return Err(ConfigError::NotFound(
                "could not determine home directory".to_string(),
            ));
        };

        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound(path.display().to_string()));
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        let settings: FileSettings = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("{}: {e}", path.display())))?;
        Self::into_config(settings)
    }
}
