//! Turns backend error bodies into one user-facing message.
//!
//! The backend reports failures in one of several shapes:
//!
//! - `{"detail": "..."}`
//! - `{"detail": [{"loc": [...], "msg": "...", "type": "..."}, ...]}` (field validation)
//! - `{"detail": {...}}`
//! - `{"message": "..."}`
//!
//! [`normalize_error`] checks them in that order and falls back to a
//! status-coded message for anything else.

mod labels;
mod rules;

pub use labels::field_label;
pub use rules::ValidationRule;

use serde::Deserialize;
use serde_json::{Map, Value};

/// One entry of a field-validation error list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldError {
    /// Path to the offending field, e.g. `["body", "username"]`.
    pub loc: Vec<Value>,
    /// Raw validator message.
    pub msg: String,
    /// Validator-defined category, e.g. `string_too_short`.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub ctx: Option<Map<String, Value>>,
}

impl FieldError {
    /// The last segment of `loc`, which names the field itself.
    pub fn field(&self) -> Option<String> {
        self.loc.last().map(|segment| match segment {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    pub fn rule(&self) -> ValidationRule {
        ValidationRule::resolve(self.kind.as_deref(), &self.msg, self.ctx.as_ref())
    }

    /// Renders the entry as `"<label> <phrase>"`, or `"<label>: <msg>"` when no rule matches.
    pub fn describe(&self) -> String {
        let field = self.field().unwrap_or_default();
        let label = field_label(&field);

        match (label.is_empty(), self.rule().phrase()) {
            (false, Some(phrase)) => format!("{} {}", label, phrase),
            (false, None) => format!("{}: {}", label, self.msg),
            (true, Some(phrase)) => phrase,
            (true, None) => self.msg.clone(),
        }
    }
}

/// Produces the message for a failed response body with the given HTTP status.
pub fn normalize_error(body: &Value, status: u16) -> String {
    match body.get("detail") {
        Some(Value::String(detail)) => return detail.clone(),
        Some(Value::Array(entries)) if !entries.is_empty() => {
            return describe_field_errors(entries);
        }
        Some(Value::Array(_)) | Some(Value::Null) | None => {}
        Some(other) => return other.to_string(),
    }

    match body.get("message") {
        Some(Value::String(message)) => message.clone(),
        Some(Value::Null) | None => format!("request failed ({})", status),
        Some(other) => other.to_string(),
    }
}

fn describe_field_errors(entries: &[Value]) -> String {
    entries
        .iter()
        .map(|entry| match FieldError::deserialize(entry) {
            Ok(field_error) => field_error.describe(),
            Err(_) => entry.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
