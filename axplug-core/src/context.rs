//! One loaded-plugin instance.
//!
//! A [`PluginContext`] owns the immutable tool registry and the engine
//! worker.  Hosts may create any number of independent contexts; each is
//! destroyed exactly once (FFI `destroy` drops the box).  The registry is
//! never mutated after construction, so `invoke` is safe to call from any
//! number of threads concurrently -- each call blocks only for its own
//! bridged engine operation.

use crate::bridge::EngineHandle;
use crate::codec::encode_error;
use crate::engine::{AutomationEngine, UnavailableEngine};
use crate::errors::PluginError;
use crate::manifest;
use crate::tools::ToolRegistry;

pub struct PluginContext {
    registry: ToolRegistry,
    engine: EngineHandle,
}

impl PluginContext {
    /// Construct a context with the default (unavailable) engine.  Hosts
    /// embedding a real automation engine use [`PluginContext::with_engine`].
    pub fn new() -> Result<Self, PluginError> {
        Self::with_engine(|| Box::new(UnavailableEngine))
    }

    /// Construct a context whose engine is built by `factory` *on* the
    /// engine worker thread.
    pub fn with_engine<F>(factory: F) -> Result<Self, PluginError>
    where
        F: FnOnce() -> Box<dyn AutomationEngine> + Send + 'static,
    {
        Ok(Self {
            registry: ToolRegistry::new()?,
            engine: EngineHandle::spawn(factory)?,
        })
    }

    /// The capability manifest.  Static content; ignores context state.
    pub fn manifest(&self) -> String {
        manifest::manifest_json()
    }

    /// Dispatch one invocation.  Total: every outcome, including unknown
    /// capability types and tool ids, is a JSON document.
    pub fn invoke(&self, capability_type: &str, capability_id: &str, payload: &[u8]) -> String {
        if capability_type != "tool" {
            return encode_error(&format!("Unknown capability type: {capability_type}"));
        }
        match self.registry.get(capability_id) {
            Some(tool) => tool.run(&self.engine, payload),
            None => encode_error(&format!("Unknown tool: {capability_id}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_capability_type() {
        let ctx = PluginContext::new().unwrap();
        assert_eq!(
            ctx.invoke("other", "x", b"{}"),
            "{\"error\": \"Unknown capability type: other\"}"
        );
    }

    #[test]
    fn test_unknown_tool() {
        let ctx = PluginContext::new().unwrap();
        assert_eq!(
            ctx.invoke("tool", "nonexistent", b"{}"),
            "{\"error\": \"Unknown tool: nonexistent\"}"
        );
    }

    #[test]
    fn test_invoke_with_default_engine_is_well_formed() {
        let ctx = PluginContext::new().unwrap();
        let out = ctx.invoke("tool", "refresh_traversal", br#"{"pid":1}"#);
        let doc: serde_json::Value = serde_json::from_str(&out).unwrap();
        // Engine unavailability is reported inside the result document,
        // not as a top-level invoke error.
        assert!(doc.get("error").is_none());
        assert!(doc["primary_action_error"].is_string());
    }

    #[test]
    fn test_manifest_matches_registry() {
        let ctx = PluginContext::new().unwrap();
        let doc: serde_json::Value = serde_json::from_str(&ctx.manifest()).unwrap();
        assert_eq!(doc["capabilities"]["tools"].as_array().unwrap().len(), 5);
    }
}
