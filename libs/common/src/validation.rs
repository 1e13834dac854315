//! Input validation primitives shared by every service
//!
//! Validators collect every failure as a [`FieldError`] keyed by the dotted
//! path of the offending input so a form can attach messages to inputs.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::OnceLock;
use thiserror::Error;

/// A single failed rule, attached to a dotted input path like `services.0.name`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

/// Every rule that failed for one payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[serde(transparent)]
#[error("validation failed on {} field(s)", .errors.len())]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a payload with exactly one failure
    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(path, message);
        errors
    }

    pub fn add(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            path: path.into(),
            message: message.into(),
        });
    }

    /// Record the outcome of a `Result<(), String>` style rule
    pub fn check(&mut self, path: impl Into<String>, outcome: Result<(), String>) {
        if let Err(message) = outcome {
            self.add(path, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Whether any failure was recorded for `path`
    pub fn has(&self, path: &str) -> bool {
        self.errors.iter().any(|e| e.path == path)
    }

    /// Return `value` when nothing failed, otherwise the collected errors
    pub fn finish<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// Trim a string and treat blank input as absent
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Serde helper: `""`, `"   "` and `null` all deserialize to `None`
pub fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(normalize_optional(value))
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Please use a valid email".to_string());
    }

    Ok(())
}

/// Reject values longer than `max` characters, the width of their column
pub fn validate_max_chars(value: &str, max: usize) -> Result<(), String> {
    if value.chars().count() > max {
        return Err(format!("Must be at most {max} characters"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Form {
        #[serde(default, deserialize_with = "blank_as_none")]
        phone: Option<String>,
    }

    #[test]
    fn test_blank_strings_become_absent() {
        for raw in [r#"{"phone": ""}"#, r#"{"phone": "   "}"#, r#"{"phone": null}"#, "{}"] {
            let form: Form = serde_json::from_str(raw).unwrap();
            assert_eq!(form.phone, None, "input {raw}");
        }

        let form: Form = serde_json::from_str(r#"{"phone": " +1 555 0100 "}"#).unwrap();
        assert_eq!(form.phone.as_deref(), Some("+1 555 0100"));
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("alex@x.com").is_ok());
        assert!(validate_email("first.last+tag@sub.example.org").is_ok());
        assert_eq!(validate_email("").unwrap_err(), "Email is required");
        assert!(validate_email("alex@").is_err());
        assert!(validate_email("alex.example.com").is_err());
        assert!(validate_email(&format!("{}@x.com", "a".repeat(260))).is_err());
    }

    #[test]
    fn test_validate_max_chars() {
        assert!(validate_max_chars("", 3).is_ok());
        assert!(validate_max_chars("ééé", 3).is_ok());
        assert_eq!(
            validate_max_chars("abcd", 3).unwrap_err(),
            "Must be at most 3 characters"
        );
    }

    #[test]
    fn test_errors_collect_every_failure() {
        let mut errors = ValidationErrors::new();
        errors.check("email", validate_email("nope"));
        errors.check("ownerEmail", validate_email("owner@x.com"));
        errors.add("fullName", "Full name is required");

        assert!(errors.has("email"));
        assert!(errors.has("fullName"));
        assert!(!errors.has("ownerEmail"));
        assert_eq!(errors.to_string(), "validation failed on 2 field(s)");

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json[0]["path"], "email");
        assert_eq!(json[1]["message"], "Full name is required");
    }

    #[test]
    fn test_finish() {
        assert_eq!(ValidationErrors::new().finish(5), Ok(5));
        assert!(ValidationErrors::single("x", "bad").finish(5).is_err());
    }
}
