// * Panel reply envelope: `{ "success": ..., "msg": ..., "obj": ... }`
// * Shared by login, inbound list and the report formatter

use serde_json::Value;

// * `success` is exactly boolean true
pub fn success_is_true(body: &Value) -> bool {
    matches!(body.get("success"), Some(Value::Bool(true)))
}

// * `success` is present and JSON-truthy
pub fn success_is_truthy(body: &Value) -> bool {
    body.get("success").is_some_and(is_truthy)
}

pub fn message(body: &Value) -> Option<&str> {
    body.get("msg").and_then(Value::as_str).filter(|m| !m.is_empty())
}

// * false, null, 0, "" and empty containers are falsy
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
