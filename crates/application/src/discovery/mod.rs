//! Server capability discovery
//!
//! API version negotiation and entry point loading. Both operations turn
//! transport failures and unexpected statuses into
//! [`SessionError::Connection`](crate::SessionError::Connection).

mod entry_points;
mod version;

pub use entry_points::load_entry_points;
pub use version::{list_available_versions, resolve_api_version};
