//! The capability manifest the host reads before invoking anything.
//!
//! Static and versioned: the document depends only on the plugin build,
//! never on runtime state.  Tool entries carry a JSON-Schema `parameters`
//! object so hosts can validate payloads up front.

use serde::Serialize;
use serde_json::{json, Value};

use crate::codec::encode_result;
use crate::tools::ToolKind;

pub const PLUGIN_ID: &str = "axplug.ui-automation";
pub const PLUGIN_VERSION: &str = "0.1.0";
pub const PLUGIN_DESCRIPTION: &str = "Control desktop applications via accessibility APIs - \
     click, type, press keys, and traverse UI elements";

#[derive(Serialize)]
pub struct Manifest {
    pub plugin_id: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub capabilities: Capabilities,
}

#[derive(Serialize)]
pub struct Capabilities {
    pub tools: Vec<ToolManifest>,
}

#[derive(Serialize)]
pub struct ToolManifest {
    pub id: &'static str,
    pub description: &'static str,
    pub parameters: Value,
    pub requirements: Vec<&'static str>,
    pub permission_policy: &'static str,
}

const PID_DESCRIPTION: &str = "The Process ID (PID) of the target application";
const ONLY_VISIBLE_DESCRIPTION: &str =
    "If true, only return elements with valid position and size. Defaults to false.";

fn only_visible_property() -> Value {
    json!({
        "type": "boolean",
        "description": ONLY_VISIBLE_DESCRIPTION,
    })
}

fn pid_property(description: &str) -> Value {
    json!({
        "type": "integer",
        "description": description,
    })
}

fn tool_entry(tool: ToolKind) -> ToolManifest {
    let (description, parameters) = match tool {
        ToolKind::OpenApplication => (
            "Opens or activates a specified application and then traverses its \
             accessibility tree. Returns the UI element hierarchy.",
            json!({
                "type": "object",
                "properties": {
                    "identifier": {
                        "type": "string",
                        "description": "The application's name (e.g., 'Calculator'), \
                             bundle ID (e.g., 'com.apple.calculator'), or file path",
                    },
                    "onlyVisibleElements": only_visible_property(),
                },
                "required": ["identifier"],
            }),
        ),
        ToolKind::Click => (
            "Simulates a mouse click at specific coordinates within the window of the \
             target application and then traverses its accessibility tree.",
            json!({
                "type": "object",
                "properties": {
                    "pid": pid_property(PID_DESCRIPTION),
                    "x": {
                        "type": "number",
                        "description": "The X-coordinate for the click (screen coordinates)",
                    },
                    "y": {
                        "type": "number",
                        "description": "The Y-coordinate for the click (screen coordinates)",
                    },
                    "onlyVisibleElements": only_visible_property(),
                },
                "required": ["pid", "x", "y"],
            }),
        ),
        ToolKind::Type => (
            "Simulates typing text into the target application and then traverses its \
             accessibility tree.",
            json!({
                "type": "object",
                "properties": {
                    "pid": pid_property(PID_DESCRIPTION),
                    "text": {
                        "type": "string",
                        "description": "The text to be typed",
                    },
                    "onlyVisibleElements": only_visible_property(),
                },
                "required": ["pid", "text"],
            }),
        ),
        ToolKind::PressKey => (
            "Simulates pressing a specific keyboard key with optional modifier keys, \
             then traverses the accessibility tree.",
            json!({
                "type": "object",
                "properties": {
                    "pid": pid_property(PID_DESCRIPTION),
                    "keyName": {
                        "type": "string",
                        "description": "The name of the key (e.g., 'Return', 'Escape', \
                             'Tab', 'ArrowUp', 'Delete', 'a', 'B'). Case-sensitive for letters.",
                    },
                    "modifierFlags": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Optional modifier keys: CapsLock, Shift, Control, \
                             Option, Command, Function, NumericPad, Help",
                    },
                    "onlyVisibleElements": only_visible_property(),
                },
                "required": ["pid", "keyName"],
            }),
        ),
        ToolKind::RefreshTraversal => (
            "Only performs the accessibility tree traversal for the specified \
             application. Useful for getting the current UI state without performing \
             an action.",
            json!({
                "type": "object",
                "properties": {
                    "pid": pid_property("The Process ID (PID) of the application to traverse"),
                    "onlyVisibleElements": only_visible_property(),
                },
                "required": ["pid"],
            }),
        ),
    };

    ToolManifest {
        id: tool.id(),
        description,
        parameters,
        requirements: vec!["accessibility"],
        permission_policy: "ask",
    }
}

/// Assemble the full manifest document.
pub fn manifest() -> Manifest {
    Manifest {
        plugin_id: PLUGIN_ID,
        version: PLUGIN_VERSION,
        description: PLUGIN_DESCRIPTION,
        capabilities: Capabilities {
            tools: ToolKind::ALL.iter().map(|&t| tool_entry(t)).collect(),
        },
    }
}

/// The manifest serialized the same way results are (pretty, sorted keys).
pub fn manifest_json() -> String {
    encode_result(&manifest())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
