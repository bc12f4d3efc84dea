//! SMC Domain - Core session types
//!
//! This crate defines the value types shared by the session client:
//! credentials, API versions, entry points, retry policy and the request and
//! response shapes exchanged with a transport. Nothing here performs I/O.

pub mod api_version;
pub mod credential;
pub mod entry_point;
pub mod error;
pub mod json;
pub mod link;
pub mod login;
pub mod request;
pub mod response;
pub mod retry;

pub use api_version::{ApiVersion, VersionDocument, VersionEntry};
pub use credential::{AuthProvider, Credential};
pub use entry_point::{EntryPointDocument, EntryPointRegistry};
pub use error::{DomainError, DomainResult};
pub use json::merge_objects;
pub use link::{Link, find_link_by_name, find_type_from_self};
pub use login::{
    DEFAULT_DOMAIN, DEFAULT_TIMEOUT, LoginConfig, LoginParams, RETRY_ON_BUSY_ARG, TlsVerify,
};
pub use request::{HttpMethod, TransportRequest};
pub use response::{StatusCode, TransportResponse};
pub use retry::RetryPolicy;
