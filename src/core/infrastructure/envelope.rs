//! The response envelope convention shared by every BMC endpoint.
//!
//! Every endpoint wraps its real payload one level deep: a top-level
//! object with a single array-valued key (`result` on current firmware,
//! `response` on legacy firmware) whose first element is the payload.
//! This module is the only place that knows about the wrapper.

use crate::core::domain::error::{BmcError, BmcResult};
use serde_json::Value;

/// Extracts the payload from a raw response body.
///
/// Accepts either wrapper key regardless of which protocol flavor the
/// session is configured for. The payload itself is either a JSON
/// object (structured endpoints) or a bare string (`"ok"`/error text
/// from set endpoints); anything else is a protocol violation.
pub(crate) fn unwrap(raw: Value) -> BmcResult<Value> {
    let object = raw
        .as_object()
        .ok_or_else(|| BmcError::Protocol("response is not a JSON object".to_string()))?;

    let wrapper = object
        .get("result")
        .or_else(|| object.get("response"))
        .ok_or_else(|| {
            BmcError::Protocol("response has neither 'result' nor 'response' key".to_string())
        })?;

    let elements = wrapper
        .as_array()
        .ok_or_else(|| BmcError::Protocol("response wrapper is not an array".to_string()))?;

    let payload = elements
        .first()
        .ok_or_else(|| BmcError::Protocol("response wrapper array is empty".to_string()))?;

    if !payload.is_object() && !payload.is_string() {
        return Err(BmcError::Protocol(
            "response payload is neither an object nor a string".to_string(),
        ));
    }

    Ok(payload.clone())
}

/// Whether an unwrapped set-endpoint payload signals success.
///
/// Endpoints answer in one of two shapes: the bare string `"ok"` or an
/// object carrying `{"result": "ok"}`. Comparison is case-insensitive
/// in both shapes. Callers never see the raw string, only this verdict.
pub(crate) fn is_ok(payload: &Value) -> bool {
    match payload {
        Value::String(text) => text.eq_ignore_ascii_case("ok"),
        Value::Object(map) => map
            .get("result")
            .and_then(Value::as_str)
            .is_some_and(|text| text.eq_ignore_ascii_case("ok")),
        _ => false,
    }
}
