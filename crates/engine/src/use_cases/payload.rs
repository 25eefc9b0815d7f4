//! Helpers for the strict-JSON payloads returned by the text-generation
//! service.
//!
//! Providers wrap JSON in prose or code fences often enough that we extract
//! the outermost object before parsing. A payload that is not valid JSON is
//! fatal to the request; individual fields are read leniently and fall back
//! to defaults at the call site.

use serde_json::Value;

/// Slice out the outermost `{...}` object from a completion.
fn extract_json_object(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    (end > start).then(|| &content[start..=end])
}

/// Parse the JSON object embedded in a completion.
///
/// Returns a description of the problem when no object is present or the
/// object does not parse; callers treat that as fatal.
pub(crate) fn parse_json_object(content: &str) -> Result<Value, String> {
    let Some(json) = extract_json_object(content) else {
        return Err("completion contained no JSON object".to_string());
    };
    serde_json::from_str(json).map_err(|e| e.to_string())
}

/// Non-blank string field, trimmed of surrounding whitespace.
pub(crate) fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Integer field; accepts floats by rounding, saturates into i32 range.
pub(crate) fn int_field(value: &Value, key: &str) -> Option<i32> {
    let field = value.get(key)?;
    field
        .as_i64()
        .or_else(|| field.as_f64().map(|f| f.round() as i64))
        .map(|n| n.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
}
