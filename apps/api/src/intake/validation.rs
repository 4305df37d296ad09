use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::errors::AppError;

/// Fields every application must carry, checked in this order.
pub const REQUIRED_FIELDS: &[&str] = &[
    "category",
    "office",
    "position",
    "firstName",
    "lastName",
    "email",
    "phone",
    "whyTrembach",
];

pub const INVALID_EMAIL_MESSAGE: &str = "Invalid email address";

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
    })
}

/// Validates the raw request body.
///
/// Fails fast: the first missing required field is reported, then the email
/// shape is checked. A body that is not a JSON object has no fields at all
/// and fails on the first required one.
pub fn validate_application(body: &Value) -> Result<(), AppError> {
    if let Some(field) = first_missing_field(body) {
        return Err(AppError::Validation(format!(
            "Missing required field: {field}"
        )));
    }

    let email = body.get("email").map(scalar_text).unwrap_or_default();
    if !is_valid_email(&email) {
        return Err(AppError::Validation(INVALID_EMAIL_MESSAGE.to_string()));
    }

    Ok(())
}

pub fn first_missing_field(body: &Value) -> Option<&'static str> {
    REQUIRED_FIELDS
        .iter()
        .copied()
        .find(|field| !body.get(field).is_some_and(is_truthy))
}

pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

/// Form semantics for "present": `null`, `false`, `0` and `""` all count as missing.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
