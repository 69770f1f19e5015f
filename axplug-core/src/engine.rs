//! The automation-engine interface the plugin consumes.
//!
//! The engine that actually opens applications, synthesizes input, and
//! walks accessibility trees lives outside this crate.  The core only
//! assembles an [`ActionRequest`] plus [`ActionOptions`], hands them to
//! [`AutomationEngine::perform_action`] on the engine's own thread (see
//! [`crate::bridge`]), and serializes whatever comes back.
//!
//! Engine-level failures are content *inside* the [`ActionResult`], not
//! Rust errors -- the core passes them through verbatim.

use crate::flags::ModifierFlags;

/// One UI action to perform, exactly one variant per invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionRequest {
    /// Open or activate an application by name, bundle id, or path.
    Open { identifier: String },
    /// Synthesize an input event.
    Input(InputAction),
    /// No input action; only traverse the target's UI tree.
    TraverseOnly,
}

/// Input event kinds for [`ActionRequest::Input`].
#[derive(Debug, Clone, PartialEq)]
pub enum InputAction {
    Click { x: f64, y: f64 },
    Type { text: String },
    Press { key_name: String, flags: ModifierFlags },
}

/// Options forwarded opaquely to the engine alongside every action.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ActionOptions {
    /// Traverse the UI tree after the action completes.  Every tool in
    /// this plugin sets this.
    pub traverse_after: bool,
    /// Drop elements without valid geometry from the traversal.
    pub only_visible_elements: bool,
    /// Visual feedback for synthesized actions.  Always off here.
    pub show_animation: bool,
    /// Process to traverse.  Required by every tool except
    /// open-application, where the engine resolves the target itself.
    pub pid_for_traversal: Option<i32>,
}

/// Opaque engine result.  The core's only obligation is faithful
/// serialization; any engine failure detail is carried inside.
pub type ActionResult = serde_json::Value;

/// The single interface the plugin consumes from the automation engine.
///
/// Implementations are constructed *on* the engine worker thread and stay
/// there for their whole life (UI-affine APIs tend to demand this), so the
/// trait requires neither `Send` nor `Sync`.
pub trait AutomationEngine {
    fn perform_action(&mut self, action: ActionRequest, options: ActionOptions) -> ActionResult;
}

/// Placeholder engine wired by `init` when no platform engine is linked.
///
/// Reports unavailability inside the [`ActionResult`], keeping the
/// boundary contract intact: decode, dispatch, and serialization all
/// behave normally, and the host sees a well-formed result document.
pub struct UnavailableEngine;

impl AutomationEngine for UnavailableEngine {
    fn perform_action(&mut self, action: ActionRequest, _options: ActionOptions) -> ActionResult {
        log::warn!("no automation engine linked; rejecting {action:?}");
        serde_json::json!({
            "primary_action_error": "no automation engine is available in this build",
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
