//! Resource registration hook

use smc_domain::EntryPointRegistry;

/// Registers the resource types a client knows about.
///
/// Invoked once per session, right after the first successful login, with
/// the freshly discovered entry points.
pub trait ResourceRegistrar: Send + Sync {
    /// Registers resource types.
    fn register(&self, entry_points: &EntryPointRegistry);
}
