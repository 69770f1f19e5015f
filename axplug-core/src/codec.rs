//! Total JSON encoding for everything that crosses the plugin boundary.
//!
//! Both functions here must never fail: a host that called `invoke` always
//! gets a JSON document back, so an encoding failure degrades to an error
//! document instead of propagating.
//!
//! Result documents are pretty-printed with sorted keys and forward slashes
//! left unescaped, so output is deterministic for a given value.

use serde::Serialize;

/// Serialize a result value to a deterministic JSON string.
///
/// The value is first converted to a [`serde_json::Value`], whose object
/// maps iterate in key order, then pretty-printed.  `serde_json` never
/// escapes `/`, so slashes pass through verbatim.
///
/// On serialization failure this returns an error document via
/// [`encode_error`]; it never panics and never returns invalid JSON.
pub fn encode_result<T: Serialize>(value: &T) -> String {
    let value = match serde_json::to_value(value) {
        Ok(v) => v,
        Err(e) => return encode_error(&format!("Failed to serialize result: {e}")),
    };
    match serde_json::to_string_pretty(&value) {
        Ok(json) => json,
        Err(e) => encode_error(&format!("Failed to serialize result: {e}")),
    }
}

/// Build the fixed `{"error": "<message>"}` document.
///
/// Escapes backslash, double quote, and newline in `message`.  Always
/// succeeds -- this is the fallback for every other failure path.
pub fn encode_error(message: &str) -> String {
    let escaped = message
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n");
    format!("{{\"error\": \"{escaped}\"}}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
