//! C ABI plugin surface for axplug -- loadable by ctypes, C#, or any FFI
//! consumer.
//!
//! The host loads the library, calls [`axplug_plugin_entry`] to obtain the
//! function-pointer table, and drives the plugin exclusively through it:
//!
//! - `init` -> opaque context (null on failure); any number of independent
//!   contexts may exist at once
//! - `get_manifest` / `invoke` -> heap-allocated C strings owned by the
//!   caller, released via `free_string`
//! - `destroy` -> releases a context exactly once
//!
//! The table's field order and signatures are the versioned ABI contract;
//! any change requires a version bump.  The plugin never frees memory it
//! did not allocate, and `invoke` returns null only for null-pointer
//! misuse -- every domain-level failure is an owned
//! `{"error": "..."}` document.

use std::ffi::{c_char, c_void, CStr, CString};
use std::ptr;

use axplug_core::codec::encode_error;
use axplug_core::context::PluginContext;

/// The exported plugin function table.
///
/// Field order is part of the ABI.  All pointers are non-null; the table
/// is built statically at load time and never mutated.
#[repr(C)]
pub struct PluginApi {
    pub free_string: unsafe extern "C" fn(ptr: *mut c_char),
    pub init: extern "C" fn() -> *mut c_void,
    pub destroy: unsafe extern "C" fn(ctx: *mut c_void),
    pub get_manifest: unsafe extern "C" fn(ctx: *mut c_void) -> *mut c_char,
    pub invoke: unsafe extern "C" fn(
        ctx: *mut c_void,
        capability_type: *const c_char,
        capability_id: *const c_char,
        payload_json: *const c_char,
    ) -> *mut c_char,
}

static PLUGIN_API: PluginApi = PluginApi {
    free_string: axplug_free_string,
    init: axplug_init,
    destroy: axplug_destroy,
    get_manifest: axplug_get_manifest,
    invoke: axplug_invoke,
};

/// Entry point: the single symbol a host needs to resolve.
#[no_mangle]
pub extern "C" fn axplug_plugin_entry() -> *const PluginApi {
    &PLUGIN_API
}

/// Hand a Rust string to the caller as an owned C string.
///
/// A result with an interior NUL cannot cross as-is; it degrades to an
/// error document rather than a null return.
fn into_owned_c_string(s: String) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => match CString::new(encode_error("result contained an interior NUL byte")) {
            Ok(cstr) => cstr.into_raw(),
            // The fallback document contains no NUL; this arm is dead.
            Err(_) => ptr::null_mut(),
        },
    }
}

/// Free a string previously returned by `get_manifest` or `invoke`.
///
/// # Safety
///
/// `ptr` must be a pointer returned by this plugin or null.  Freeing any
/// other pointer, or freeing twice, is undefined.
#[no_mangle]
pub unsafe extern "C" fn axplug_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(unsafe { CString::from_raw(ptr) });
    }
}

/// Create a new plugin context.
///
/// Returns null if construction fails (registry validation or worker
/// spawn).  Each returned context is independent and must be released
/// exactly once via `destroy`.
#[no_mangle]
pub extern "C" fn axplug_init() -> *mut c_void {
    match PluginContext::new() {
        Ok(ctx) => Box::into_raw(Box::new(ctx)).cast(),
        Err(e) => {
            log::error!("plugin init failed: {e}");
            ptr::null_mut()
        }
    }
}

/// Destroy a context created by `init`.
///
/// # Safety
///
/// `ctx` must be a pointer returned by `init` that has not already been
/// destroyed, or null (no-op).  No `invoke` may be in flight on it.
#[no_mangle]
pub unsafe extern "C" fn axplug_destroy(ctx: *mut c_void) {
    if !ctx.is_null() {
        drop(unsafe { Box::from_raw(ctx.cast::<PluginContext>()) });
    }
}

/// Return the capability manifest as an owned C string.
///
/// The manifest depends only on the plugin build, so the context is not
/// inspected.  Caller frees with `free_string`.
///
/// # Safety
///
/// `ctx` must be a live context pointer or null.
#[no_mangle]
pub unsafe extern "C" fn axplug_get_manifest(_ctx: *mut c_void) -> *mut c_char {
    into_owned_c_string(axplug_core::manifest::manifest_json())
}

/// Invoke a capability by `(type, id)` with a JSON payload.
///
/// Returns null if any argument is null (caller-contract violation);
/// otherwise always an owned JSON document the caller frees with
/// `free_string`.
///
/// # Safety
///
/// `ctx` must be a live context pointer; the three string arguments must
/// be valid NUL-terminated strings or null.
#[no_mangle]
pub unsafe extern "C" fn axplug_invoke(
    ctx: *mut c_void,
    capability_type: *const c_char,
    capability_id: *const c_char,
    payload_json: *const c_char,
) -> *mut c_char {
    if ctx.is_null() || capability_type.is_null() || capability_id.is_null() || payload_json.is_null()
    {
        return ptr::null_mut();
    }

    let context = unsafe { &*ctx.cast::<PluginContext>() };
    let capability_type = unsafe { CStr::from_ptr(capability_type) }.to_string_lossy();
    let capability_id = unsafe { CStr::from_ptr(capability_id) }.to_string_lossy();
    // Raw bytes: payload UTF-8 validation belongs to the argument decoder.
    let payload = unsafe { CStr::from_ptr(payload_json) }.to_bytes();

    into_owned_c_string(context.invoke(&capability_type, &capability_id, payload))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
