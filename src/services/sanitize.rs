//! JSON-safe snapshots of caller data
//!
//! Anything placed in a record goes through here first so that the record
//! owns a finite, serializable copy that later mutation of the caller's
//! value cannot reach.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt::{Debug, Display};

use super::bounded::Bounded;

/// Nesting deeper than this is cut off
pub const MAX_DEPTH: usize = 64;

/// Replaces values nested deeper than [`MAX_DEPTH`]
pub const TRUNCATED: &str = "[Truncated]";

/// Take a bounded, serializable copy of any `Serialize` value
///
/// Depth is counted while serializing, so self-referential values stop at
/// [`MAX_DEPTH`] with a [`TRUNCATED`] marker. Serialization failures
/// (non-string map keys, failing `Serialize` impls) become a marker string
/// instead of an error.
pub fn safe_clone<T: Serialize + ?Sized>(value: &T) -> Value {
    match serde_json::to_value(Bounded::new(value, MAX_DEPTH)) {
        Ok(value) => value,
        Err(e) => Value::String(format!("[Unserializable: {e}]")),
    }
}

/// Remove every `stack` key at any depth, including inside arrays
pub fn strip_stack(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.remove("stack");
            map.values_mut().for_each(strip_stack);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_stack),
        _ => {}
    }
}

/// Snapshot an error as `{ "message": .., "stack": .. }`
///
/// `message` is the `Display` text; `stack` is the `Debug` report, which
/// for `anyhow::Error` includes the cause chain and any captured backtrace.
pub fn error_payload<E: Display + Debug + ?Sized>(error: &E) -> Value {
    let mut map = Map::new();
    map.insert("message".to_string(), Value::String(error.to_string()));
    map.insert("stack".to_string(), Value::String(format!("{error:?}")));
    Value::Object(map)
}
