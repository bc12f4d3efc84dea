//! Environment variable configuration.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use smc_application::ports::{ConfigError, ConfigSource};
use smc_domain::LoginConfig;

use super::{parse_bool, tls_verify};

/// Full server URL, e.g. `https://192.168.1.10:8082`.
pub const SMC_ADDRESS: &str = "SMC_ADDRESS";
/// API client key.
pub const SMC_API_KEY: &str = "SMC_API_KEY";
/// Requested API version.
pub const SMC_API_VERSION: &str = "SMC_API_VERSION";
/// Timeout in seconds.
pub const SMC_TIMEOUT: &str = "SMC_TIMEOUT";
/// Domain to log in to.
pub const SMC_DOMAIN: &str = "SMC_DOMAIN";
/// Whether to verify TLS certificates.
pub const SMC_VERIFY_SSL: &str = "SMC_VERIFY_SSL";
/// PEM bundle used for verification.
pub const SMC_SSL_CERT_FILE: &str = "SMC_SSL_CERT_FILE";
/// Extra login arguments as a JSON object.
pub const SMC_EXTRA_ARGS: &str = "SMC_EXTRA_ARGS";

/// Loads login settings from `SMC_*` variables.
///
/// Variables are captured when the source is created.
#[derive(Debug, Clone, Default)]
pub struct EnvConfigSource {
    vars: HashMap<String, String>,
}

impl EnvConfigSource {
    /// Captures the `SMC_*` variables of the current process.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars().filter(|(name, _)| name.starts_with("SMC_")))
    }

    /// Uses the given variables instead of the process environment.
    #[must_use]
    pub fn from_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn require(&self, name: &str) -> Result<String, ConfigError> {
        self.get(name)
            .map(str::to_string)
            .ok_or_else(|| ConfigError::Missing(name.to_string()))
    }

    fn timeout(&self) -> Result<Option<Duration>, ConfigError> {
        self.get(SMC_TIMEOUT)
            .map(|raw| {
                raw.parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|e| ConfigError::Invalid {
                        name: SMC_TIMEOUT.to_string(),
                        message: e.to_string(),
                    })
            })
            .transpose()
    }

    fn extra_args(&self) -> Result<Map<String, Value>, ConfigError> {
        let Some(raw) = self.get(SMC_EXTRA_ARGS) else {
            return Ok(Map::new());
        };
        match serde_json::from_str(raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(ConfigError::Invalid {
                name: SMC_EXTRA_ARGS.to_string(),
                message: "expected a JSON object".to_string(),
            }),
            Err(e) => Err(ConfigError::Invalid {
                name: SMC_EXTRA_ARGS.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

#[async_trait]
impl ConfigSource for EnvConfigSource {
    fn name(&self) -> &str {
        "environment"
    }

    async fn load(&self) -> Result<LoginConfig, ConfigError> {
        let url = self.require(SMC_ADDRESS)?;
        let api_key = self.require(SMC_API_KEY)?;
        let verify = match self.get(SMC_VERIFY_SSL) {
            Some(raw) => parse_bool(SMC_VERIFY_SSL, raw)?,
            None => true,
        };

        Ok(LoginConfig {
            url,
            api_key,
            api_version: self.get(SMC_API_VERSION).map(str::to_string),
            verify: tls_verify(verify, self.get(SMC_SSL_CERT_FILE).map(PathBuf::from)),
            timeout: self.timeout()?,
            domain: self.get(SMC_DOMAIN).map(str::to_string),
            kwargs: self.extra_args()?,
        })
    }
}
