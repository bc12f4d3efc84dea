//! Configuration sources
//!
//! Login settings can come from a YAML file in the user's home directory or
//! from `SMC_*` environment variables. Both produce a [`LoginConfig`].
//!
//! [`LoginConfig`]: smc_domain::LoginConfig

mod env_source;
mod file_source;

use std::path::PathBuf;

use smc_application::ports::ConfigError;
use smc_domain::TlsVerify;

pub use env_source::EnvConfigSource;
pub use file_source::FileConfigSource;

/// Picks the verification mode from the usual trio of settings.
///
/// A CA bundle only applies when verification is on.
fn tls_verify(verify: bool, cert_file: Option<PathBuf>) -> TlsVerify {
    match (verify, cert_file) {
        (false, _) => TlsVerify::Disabled,
        (true, Some(path)) => TlsVerify::CaBundle(path),
        (true, None) => TlsVerify::Enabled,
    }
}

/// Parses a boolean setting such as `true`, `False`, `1` or `no`.
fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Invalid {
            name: name.to_string(),
            message: format!("expected a boolean, got '{other}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tls_verify() {
        assert_eq!(tls_verify(false, Some("/ca.pem".into())), TlsVerify::Disabled);
        assert_eq!(
            tls_verify(true, Some("/ca.pem".into())),
            TlsVerify::CaBundle("/ca.pem".into())
        );
        assert_eq!(tls_verify(true, None), TlsVerify::Enabled);
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("x", "True").unwrap_or(false));
        assert!(!parse_bool("x", "0").unwrap_or(true));
        assert!(matches!(
            parse_bool("SMC_VERIFY_SSL", "maybe"),
            Err(ConfigError::Invalid { name, .. }) if name == "SMC_VERIFY_SSL"
        ));
    }
}
