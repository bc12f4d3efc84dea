//! API version resolution.

use smc_domain::{ApiVersion, StatusCode, TransportRequest, VersionDocument};
use tracing::debug;

use crate::error::{SessionError, SessionResult};
use crate::ports::Transport;

/// Lists the API versions the server supports.
///
/// Issues an unauthenticated `GET {base_url}/api`. Timeout and TLS settings
/// are those the transport was opened with.
///
/// # Errors
///
/// Returns `SessionError::Connection` on any status other than 200, on a
/// transport failure, or on an unreadable body.
pub async fn list_available_versions(
    transport: &dyn Transport,
    base_url: &str,
) -> SessionResult<Vec<String>> {
    let response = transport
        .send(&TransportRequest::get(format!("{base_url}/api")))
        .await?;

    if response.status != StatusCode::OK {
        return Err(SessionError::unexpected_status(
            "Invalid status received while getting API versions from SMC",
            &response,
        ));
    }

    let document: VersionDocument = response.json()?;
    let versions = document.versions();
    debug!(?versions, "Available API versions");
    Ok(versions)
}

/// Resolves the API version to use.
///
/// The requested version wins when the server advertises it; otherwise the
/// newest advertised version is used.
///
/// # Errors
///
/// Returns `SessionError::Connection` if discovery fails or no usable
/// version is advertised.
pub async fn resolve_api_version(
    transport: &dyn Transport,
    base_url: &str,
    requested: Option<&str>,
) -> SessionResult<ApiVersion> {
    let available = list_available_versions(transport, base_url).await?;
    let version = ApiVersion::select(&available, requested)?;
    if let Some(requested) = requested
        && requested != version.as_str()
    {
        debug!(requested, using = %version, "Requested API version not available");
    }
    Ok(version)
}
