//! Entry point loading.

use smc_domain::{ApiVersion, EntryPointDocument, EntryPointRegistry, StatusCode, TransportRequest};
use tracing::debug;

use crate::error::{SessionError, SessionResult};
use crate::ports::Transport;

/// Loads the entry points advertised to an authenticated transport.
///
/// Issues `GET {base_url}/{api_version}/api` and, on success, replaces the
/// registry content. On failure the registry is left untouched.
///
/// # Errors
///
/// Returns `SessionError::Connection` with status and reason on any status
/// other than 200, and on transport or decoding failures.
pub async fn load_entry_points(
    transport: &dyn Transport,
    base_url: &str,
    api_version: &ApiVersion,
    registry: &mut EntryPointRegistry,
) -> SessionResult<()> {
    let response = transport
        .send(&TransportRequest::get(format!("{base_url}/{api_version}/api")))
        .await?;

    if response.status != StatusCode::OK {
        return Err(SessionError::unexpected_status(
            "Invalid status received while getting entry points from SMC",
            &response,
        ));
    }

    let document: EntryPointDocument = response.json()?;
    registry.replace(document.entry_point);
    debug!(count = registry.len(), "Loaded entry points with obtained session");
    Ok(())
}
