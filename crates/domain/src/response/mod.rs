//! Incoming response types

mod spec;

pub use spec::{StatusCode, TransportResponse};
