//! Shape checks for REST bodies and streamed events.
//!
//! These run on raw JSON before anything is decoded, stored or broadcast.

use serde_json::Value;

/// Streamed event types accepted from clients
const WS_MESSAGE_TYPES: [&str; 2] = ["message", "typing"];

/// True iff `data` is an object with non-empty string `user` and `message`.
pub fn validate_message(data: &Value) -> bool {
    let Some(object) = data.as_object() else {
        return false;
    };
    is_non_empty_string(object.get("user")) && is_non_empty_string(object.get("message"))
}

/// True iff `data` is a well-formed `message` or `typing` event.
pub fn validate_ws_message(data: &Value) -> bool {
    let Some(object) = data.as_object() else {
        return false;
    };
    let Some(kind) = object.get("type").and_then(Value::as_str) else {
        return false;
    };
    if !WS_MESSAGE_TYPES.contains(&kind) {
        return false;
    }

    let payload = object.get("data").unwrap_or(&Value::Null);
    match kind {
        "message" => validate_message(payload),
        "typing" => validate_typing(payload),
        _ => false,
    }
}

fn validate_typing(data: &Value) -> bool {
    let Some(object) = data.as_object() else {
        return false;
    };
    is_non_empty_string(object.get("user")) && object.get("isTyping").is_some_and(Value::is_boolean)
}

fn is_non_empty_string(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_str)
        .is_some_and(|s| !s.is_empty())
}
