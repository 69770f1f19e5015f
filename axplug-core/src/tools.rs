//! Tool handlers and the fixed tool registry.
//!
//! Each tool is one composition: strict-decode the JSON payload into its
//! typed args, assemble an [`ActionRequest`] + [`ActionOptions`], run the
//! engine through the blocking bridge, and encode the outcome.  Every
//! failure mode comes back as an error document; a payload that fails to
//! decode never reaches the engine.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::bridge::EngineHandle;
use crate::codec::{encode_error, encode_result};
use crate::engine::{ActionOptions, ActionRequest, InputAction};
use crate::errors::PluginError;
use crate::flags::ModifierFlags;

// ---------------------------------------------------------------------------
// Argument decoding
// ---------------------------------------------------------------------------

/// Strict decode of a tool payload.
///
/// Invalid UTF-8, malformed JSON, a missing required field, and a
/// mistyped field all collapse into one decode failure naming the
/// tool's required fields.  Unknown extra fields are ignored.
fn decode_args<T: DeserializeOwned>(payload: &[u8], expected: &str) -> Result<T, String> {
    serde_json::from_slice(payload)
        .map_err(|_| format!("Invalid arguments: expected {expected}"))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OpenApplicationArgs {
    identifier: String,
    #[serde(default)]
    only_visible_elements: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClickArgs {
    pid: i32,
    x: f64,
    y: f64,
    #[serde(default)]
    only_visible_elements: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TypeArgs {
    pid: i32,
    text: String,
    #[serde(default)]
    only_visible_elements: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PressKeyArgs {
    pid: i32,
    key_name: String,
    #[serde(default)]
    modifier_flags: Vec<String>,
    #[serde(default)]
    only_visible_elements: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshArgs {
    pid: i32,
    #[serde(default)]
    only_visible_elements: bool,
}

// ---------------------------------------------------------------------------
// Shared action plumbing
// ---------------------------------------------------------------------------

/// Options common to every tool: traversal always follows the action,
/// animation is always off.
fn traversal_options(pid: Option<i32>, only_visible: bool) -> ActionOptions {
    ActionOptions {
        traverse_after: true,
        only_visible_elements: only_visible,
        show_animation: false,
        pid_for_traversal: pid,
    }
}

fn run_action(engine: &EngineHandle, action: ActionRequest, options: ActionOptions) -> String {
    match engine.perform(action, options) {
        Ok(result) => encode_result(&result),
        Err(e) => encode_error(&e.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tool handlers
// ---------------------------------------------------------------------------

fn open_application(engine: &EngineHandle, payload: &[u8]) -> String {
    let args: OpenApplicationArgs = match decode_args(payload, "'identifier' field") {
        Ok(a) => a,
        Err(msg) => return encode_error(&msg),
    };
    run_action(
        engine,
        ActionRequest::Open {
            identifier: args.identifier,
        },
        traversal_options(None, args.only_visible_elements),
    )
}

fn click(engine: &EngineHandle, payload: &[u8]) -> String {
    let args: ClickArgs = match decode_args(payload, "'pid', 'x', and 'y' fields") {
        Ok(a) => a,
        Err(msg) => return encode_error(&msg),
    };
    run_action(
        engine,
        ActionRequest::Input(InputAction::Click {
            x: args.x,
            y: args.y,
        }),
        traversal_options(Some(args.pid), args.only_visible_elements),
    )
}

fn type_text(engine: &EngineHandle, payload: &[u8]) -> String {
    let args: TypeArgs = match decode_args(payload, "'pid' and 'text' fields") {
        Ok(a) => a,
        Err(msg) => return encode_error(&msg),
    };
    run_action(
        engine,
        ActionRequest::Input(InputAction::Type { text: args.text }),
        traversal_options(Some(args.pid), args.only_visible_elements),
    )
}

fn press_key(engine: &EngineHandle, payload: &[u8]) -> String {
    let args: PressKeyArgs = match decode_args(payload, "'pid' and 'keyName' fields") {
        Ok(a) => a,
        Err(msg) => return encode_error(&msg),
    };
    let flags = ModifierFlags::from_names(&args.modifier_flags);
    run_action(
        engine,
        ActionRequest::Input(InputAction::Press {
            key_name: args.key_name,
            flags,
        }),
        traversal_options(Some(args.pid), args.only_visible_elements),
    )
}

fn refresh_traversal(engine: &EngineHandle, payload: &[u8]) -> String {
    let args: RefreshArgs = match decode_args(payload, "'pid' field") {
        Ok(a) => a,
        Err(msg) => return encode_error(&msg),
    };
    run_action(
        engine,
        ActionRequest::TraverseOnly,
        traversal_options(Some(args.pid), args.only_visible_elements),
    )
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Tagged handler variant, one per tool the plugin exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    OpenApplication,
    Click,
    Type,
    PressKey,
    RefreshTraversal,
}

impl ToolKind {
    /// Every tool, in manifest order.
    pub const ALL: [ToolKind; 5] = [
        ToolKind::OpenApplication,
        ToolKind::Click,
        ToolKind::Type,
        ToolKind::PressKey,
        ToolKind::RefreshTraversal,
    ];

    /// The capability id the host invokes this tool by.
    pub fn id(self) -> &'static str {
        match self {
            ToolKind::OpenApplication => "open_application_and_traverse",
            ToolKind::Click => "click_and_traverse",
            ToolKind::Type => "type_and_traverse",
            ToolKind::PressKey => "press_key_and_traverse",
            ToolKind::RefreshTraversal => "refresh_traversal",
        }
    }

    /// Run this tool against a raw JSON payload.  Total: always returns a
    /// JSON document.
    pub fn run(self, engine: &EngineHandle, payload: &[u8]) -> String {
        match self {
            ToolKind::OpenApplication => open_application(engine, payload),
            ToolKind::Click => click(engine, payload),
            ToolKind::Type => type_text(engine, payload),
            ToolKind::PressKey => press_key(engine, payload),
            ToolKind::RefreshTraversal => refresh_traversal(engine, payload),
        }
    }
}

/// Fixed id -> tool mapping, populated once at context creation and never
/// mutated after.
#[derive(Debug)]
pub struct ToolRegistry {
    tools: BTreeMap<&'static str, ToolKind>,
}

impl ToolRegistry {
    /// Build the registry over [`ToolKind::ALL`].
    pub fn new() -> Result<Self, PluginError> {
        Self::from_tools(&ToolKind::ALL)
    }

    /// Duplicate ids are a construction-time error, not a silent
    /// overwrite.
    fn from_tools(tools: &[ToolKind]) -> Result<Self, PluginError> {
        let mut map = BTreeMap::new();
        for &tool in tools {
            if map.insert(tool.id(), tool).is_some() {
                return Err(PluginError::DuplicateTool(tool.id().to_owned()));
            }
        }
        Ok(Self { tools: map })
    }

    pub fn get(&self, id: &str) -> Option<ToolKind> {
        self.tools.get(id).copied()
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tools.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ActionResult, AutomationEngine};
    use parking_lot::Mutex;
    use serde_json::json;
    use std::sync::Arc;

    /// Records every call it receives and answers with a fixed document.
    struct Recorder {
        calls: Arc<Mutex<Vec<(ActionRequest, ActionOptions)>>>,
    }

    impl AutomationEngine for Recorder {
        fn perform_action(
            &mut self,
            action: ActionRequest,
            options: ActionOptions,
        ) -> ActionResult {
            self.calls.lock().push((action, options));
            json!({ "ok": true })
        }
    }

    fn recording_engine() -> (EngineHandle, Arc<Mutex<Vec<(ActionRequest, ActionOptions)>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let shared = Arc::clone(&calls);
        let handle = EngineHandle::spawn(move || Box::new(Recorder { calls: shared })).unwrap();
        (handle, calls)
    }

    #[test]
    fn test_open_application_dispatch() {
        let (engine, calls) = recording_engine();
        let out = ToolKind::OpenApplication.run(&engine, br#"{"identifier":"Calculator"}"#);
        assert_eq!(out, encode_result(&json!({"ok": true})));

        let calls = calls.lock();
        assert_eq!(calls.len(), 1);
        let (action, options) = &calls[0];
        assert_eq!(
            *action,
            ActionRequest::Open {
                identifier: "Calculator".to_owned()
            }
        );
        assert!(options.traverse_after);
        assert!(!options.only_visible_elements);
        assert!(!options.show_animation);
        assert_eq!(options.pid_for_traversal, None);
    }

    #[test]
    fn test_click_dispatch() {
        let (engine, calls) = recording_engine();
        ToolKind::Click.run(&engine, br#"{"pid":123,"x":10.5,"y":20.0}"#);

        let calls = calls.lock();
        let (action, options) = &calls[0];
        assert_eq!(
            *action,
            ActionRequest::Input(InputAction::Click { x: 10.5, y: 20.0 })
        );
        assert_eq!(options.pid_for_traversal, Some(123));
        assert!(options.traverse_after);
    }

    #[test]
    fn test_type_dispatch() {
        let (engine, calls) = recording_engine();
        ToolKind::Type.run(&engine, br#"{"pid":7,"text":"hello","onlyVisibleElements":true}"#);

        let calls = calls.lock();
        let (action, options) = &calls[0];
        assert_eq!(
            *action,
            ActionRequest::Input(InputAction::Type {
                text: "hello".to_owned()
            })
        );
        assert_eq!(options.pid_for_traversal, Some(7));
        assert!(options.only_visible_elements);
    }

    #[test]
    fn test_press_key_dispatch_with_flags() {
        let (engine, calls) = recording_engine();
        ToolKind::PressKey.run(
            &engine,
            br#"{"pid":7,"keyName":"Return","modifierFlags":["Cmd","shift"]}"#,
        );

        let calls = calls.lock();
        let (action, _) = &calls[0];
        assert_eq!(
            *action,
            ActionRequest::Input(InputAction::Press {
                key_name: "Return".to_owned(),
                flags: ModifierFlags::COMMAND | ModifierFlags::SHIFT,
            })
        );
    }

    #[test]
    fn test_refresh_dispatch() {
        let (engine, calls) = recording_engine();
        ToolKind::RefreshTraversal.run(&engine, br#"{"pid":99}"#);

        let calls = calls.lock();
        let (action, options) = &calls[0];
        assert_eq!(*action, ActionRequest::TraverseOnly);
        assert_eq!(options.pid_for_traversal, Some(99));
    }

    #[test]
    fn test_missing_field_is_decode_error_without_engine_call() {
        let (engine, calls) = recording_engine();
        let out = ToolKind::Click.run(&engine, br#"{"pid":123,"x":10.5}"#);
        assert_eq!(
            out,
            "{\"error\": \"Invalid arguments: expected 'pid', 'x', and 'y' fields\"}"
        );
        assert!(calls.lock().is_empty());
    }

    #[test]
    fn test_wrong_type_is_decode_error() {
        let (engine, calls) = recording_engine();
        let out = ToolKind::RefreshTraversal.run(&engine, br#"{"pid":"not-a-number"}"#);
        assert_eq!(
            out,
            "{\"error\": \"Invalid arguments: expected 'pid' field\"}"
        );
        assert!(calls.lock().is_empty());
    }

    #[test]
    fn test_invalid_utf8_is_decode_error() {
        let (engine, calls) = recording_engine();
        let out = ToolKind::OpenApplication.run(&engine, b"{\"identifier\":\"\xff\xfe\"}");
        assert!(out.starts_with("{\"error\": \"Invalid arguments"));
        assert!(calls.lock().is_empty());
    }

    #[test]
    fn test_unknown_extra_fields_ignored() {
        let (engine, calls) = recording_engine();
        ToolKind::RefreshTraversal.run(&engine, br#"{"pid":1,"unexpected":"field"}"#);
        assert_eq!(calls.lock().len(), 1);
    }

    #[test]
    fn test_registry_has_all_five_tools() {
        let registry = ToolRegistry::new().unwrap();
        assert_eq!(registry.len(), 5);
        for tool in ToolKind::ALL {
            assert_eq!(registry.get(tool.id()), Some(tool));
        }
        assert_eq!(registry.get("nonexistent"), None);
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let err = ToolRegistry::from_tools(&[ToolKind::Click, ToolKind::Click]).unwrap_err();
        assert!(matches!(err, PluginError::DuplicateTool(id) if id == "click_and_traverse"));
    }
}
