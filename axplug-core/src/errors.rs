//! Error types for `axplug_core`.
//!
//! All Rust-side failures are funnelled through [`PluginError`], which uses
//! `thiserror` for `Display` and `Error` derives.  Nothing in this enum ever
//! crosses the ABI boundary directly; the tool layer converts every variant
//! into a JSON error document before returning to the host.

use thiserror::Error;

/// Top-level error type for the `axplug_core` library.
///
/// Each variant corresponds to a distinct subsystem.
#[derive(Debug, Error)]
pub enum PluginError {
    /// Two tools were registered under the same id.  The registry treats
    /// this as a construction-time failure rather than silently keeping
    /// the last registration.
    #[error("RegistryError: duplicate tool id '{0}'")]
    DuplicateTool(String),

    /// The engine worker thread could not be started, or it stopped
    /// before completing a dispatched operation.
    #[error("BridgeError: {0}")]
    Bridge(String),
}
