//! Validator-error categories and the phrases shown for them.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

static MIN_LENGTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)at least (\d+) character").expect("valid regex"));
static MAX_LENGTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)at most (\d+) character").expect("valid regex"));

/// A known category of field validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationRule {
    /// String shorter than the allowed minimum, with the minimum when known.
    MinLength(Option<u64>),
    /// String longer than the allowed maximum, with the maximum when known.
    MaxLength(Option<u64>),
    /// Malformed email address.
    Email,
    /// Value is not an integer.
    Integer,
    /// Value is not a number.
    Number,
    /// Required field was not supplied.
    Required,
    /// Value must exceed a lower bound, with the bound when known.
    GreaterThan(Option<String>),
    /// Nothing in the rule table matched.
    Unrecognized,
}

impl ValidationRule {
    /// Resolves the rule for one field error.
    ///
    /// The structured `kind` decides when it is one the table knows. Otherwise
    /// the free-form message is matched against substrings, in table order.
    pub fn resolve(kind: Option<&str>, msg: &str, ctx: Option<&Map<String, Value>>) -> Self {
        kind.and_then(|kind| Self::from_kind(kind, msg, ctx))
            .unwrap_or_else(|| Self::from_message(msg))
    }

    fn from_kind(kind: &str, msg: &str, ctx: Option<&Map<String, Value>>) -> Option<Self> {
        let rule = match kind {
            "string_too_short" => Self::MinLength(
                capture_number(&MIN_LENGTH, msg).or_else(|| ctx_number(ctx, "min_length")),
            ),
            "string_too_long" => Self::MaxLength(
                capture_number(&MAX_LENGTH, msg).or_else(|| ctx_number(ctx, "max_length")),
            ),
            "int_parsing" | "int_type" | "int_from_float" => Self::Integer,
            "float_parsing" | "float_type" => Self::Number,
            "missing" => Self::Required,
            "greater_than" => Self::GreaterThan(ctx_text(ctx, "gt")),
            "value_error" if msg.to_lowercase().contains("email") => Self::Email,
            _ => return None,
        };
        Some(rule)
    }

    fn from_message(msg: &str) -> Self {
        if let Some(min) = capture_number(&MIN_LENGTH, msg) {
            return Self::MinLength(Some(min));
        }
        if let Some(max) = capture_number(&MAX_LENGTH, msg) {
            return Self::MaxLength(Some(max));
        }

        let lower = msg.to_lowercase();
        if lower.contains("email") {
            Self::Email
        } else if lower.contains("valid integer") {
            Self::Integer
        } else if lower.contains("valid number") {
            Self::Number
        } else if lower.contains("field required") {
            Self::Required
        } else {
            Self::Unrecognized
        }
    }

    /// The phrase appended to the field label, or `None` for [`ValidationRule::Unrecognized`].
    pub fn phrase(&self) -> Option<String> {
        let phrase = match self {
            Self::MinLength(Some(min)) => format!("length must be at least {} characters", min),
            Self::MinLength(None) => "is too short".to_string(),
            Self::MaxLength(Some(max)) => format!("length must be at most {} characters", max),
            Self::MaxLength(None) => "is too long".to_string(),
            Self::Email => "has an invalid format".to_string(),
            Self::Integer => "must be an integer".to_string(),
            Self::Number => "must be a number".to_string(),
            Self::Required => "must not be empty".to_string(),
            Self::GreaterThan(Some(bound)) => format!("must be greater than {}", bound),
            Self::GreaterThan(None) => "is below the allowed minimum".to_string(),
            Self::Unrecognized => return None,
        };
        Some(phrase)
    }
}

fn capture_number(pattern: &Regex, msg: &str) -> Option<u64> {
    pattern
        .captures(msg)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn ctx_number(ctx: Option<&Map<String, Value>>, key: &str) -> Option<u64> {
    ctx.and_then(|ctx| ctx.get(key)).and_then(Value::as_u64)
}

fn ctx_text(ctx: Option<&Map<String, Value>>, key: &str) -> Option<String> {
    match ctx.and_then(|ctx| ctx.get(key))? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("ctx must be an object"),
        }
    }

    #[test]
    fn test_resolve_too_short_captures_minimum() {
        let rule = ValidationRule::resolve(
            Some("string_too_short"),
            "String should have at least 3 characters",
            None,
        );
        assert_eq!(rule, ValidationRule::MinLength(Some(3)));
        assert_eq!(
            rule.phrase().as_deref(),
            Some("length must be at least 3 characters")
        );
    }

    #[test]
    fn test_resolve_too_long_captures_maximum() {
        let rule = ValidationRule::resolve(
            Some("string_too_long"),
            "String should have at most 50 characters",
            None,
        );
        assert_eq!(rule, ValidationRule::MaxLength(Some(50)));
        assert_eq!(
            rule.phrase().as_deref(),
            Some("length must be at most 50 characters")
        );
    }

    #[test]
    fn test_resolve_too_short_uses_ctx_when_message_has_no_number() {
        let ctx = ctx(json!({"min_length": 6}));
        let rule = ValidationRule::resolve(Some("string_too_short"), "too short", Some(&ctx));
        assert_eq!(rule, ValidationRule::MinLength(Some(6)));
    }

    #[test]
    fn test_resolve_too_short_without_any_number() {
        let rule = ValidationRule::resolve(Some("string_too_short"), "too short", None);
        assert_eq!(rule, ValidationRule::MinLength(None));
        assert_eq!(rule.phrase().as_deref(), Some("is too short"));
    }

    #[test]
    fn test_resolve_kind_table() {
        assert_eq!(
            ValidationRule::resolve(Some("int_parsing"), "whatever", None),
            ValidationRule::Integer
        );
        assert_eq!(
            ValidationRule::resolve(Some("float_parsing"), "whatever", None),
            ValidationRule::Number
        );
        assert_eq!(
            ValidationRule::resolve(Some("missing"), "Field required", None),
            ValidationRule::Required
        );
    }

    #[test]
    fn test_resolve_greater_than_reads_bound_from_ctx() {
        let ctx = ctx(json!({"gt": 0}));
        let rule = ValidationRule::resolve(
            Some("greater_than"),
            "Input should be greater than 0",
            Some(&ctx),
        );
        assert_eq!(rule, ValidationRule::GreaterThan(Some("0".to_string())));
        assert_eq!(rule.phrase().as_deref(), Some("must be greater than 0"));
    }

    #[test]
    fn test_resolve_value_error_email() {
        let rule = ValidationRule::resolve(
            Some("value_error"),
            "value is not a valid email address: An email address must have an @-sign.",
            None,
        );
        assert_eq!(rule, ValidationRule::Email);
        assert_eq!(rule.phrase().as_deref(), Some("has an invalid format"));
    }

    #[test]
    fn test_kind_takes_precedence_over_message() {
        // The message mentions email, but the structured kind says integer.
        let rule = ValidationRule::resolve(Some("int_parsing"), "email must be an int", None);
        assert_eq!(rule, ValidationRule::Integer);
    }

    #[test]
    fn test_unknown_kind_falls_back_to_message() {
        let rule = ValidationRule::resolve(
            Some("custom_check"),
            "ensure this value has at least 2 characters",
            None,
        );
        assert_eq!(rule, ValidationRule::MinLength(Some(2)));
    }

    #[test]
    fn test_message_rules_without_kind() {
        assert_eq!(
            ValidationRule::resolve(None, "Input should be a valid integer", None),
            ValidationRule::Integer
        );
        assert_eq!(
            ValidationRule::resolve(None, "Input should be a valid number", None),
            ValidationRule::Number
        );
        assert_eq!(
            ValidationRule::resolve(None, "field required", None),
            ValidationRule::Required
        );
        assert_eq!(
            ValidationRule::resolve(None, "not a valid Email", None),
            ValidationRule::Email
        );
        assert_eq!(
            ValidationRule::resolve(None, "ensure this value has AT MOST 8 characters", None),
            ValidationRule::MaxLength(Some(8))
        );
    }

    #[test]
    fn test_unrecognized_has_no_phrase() {
        let rule = ValidationRule::resolve(None, "something odd happened", None);
        assert_eq!(rule, ValidationRule::Unrecognized);
        assert_eq!(rule.phrase(), None);
    }
}
