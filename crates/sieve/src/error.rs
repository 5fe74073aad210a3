//! Validation error types and handling

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Which length bound a value violated
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LengthBound {
    Exact,
    Min,
    Max,
}

/// Category of a validation failure
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// The key is missing from the record and the rule requires it
    RequiredFieldMissing,
    /// One of the `length`, `min_length` or `max_length` constraints failed
    LengthMismatch(LengthBound),
    /// The value is not a string and cannot be coerced to one
    TypeMismatch,
    /// The value does not match the configured pattern
    PatternMismatch,
    /// The value is not a member of the allow-list
    NotInAllowedList,
    /// Raised by a custom field evaluator
    Custom,
}

impl ValidationErrorKind {
    /// Error code for programmatic handling
    pub fn code(&self) -> &'static str {
        match self {
            ValidationErrorKind::RequiredFieldMissing => "required",
            ValidationErrorKind::LengthMismatch(LengthBound::Exact) => "length_exact",
            ValidationErrorKind::LengthMismatch(LengthBound::Min) => "length_min",
            ValidationErrorKind::LengthMismatch(LengthBound::Max) => "length_max",
            ValidationErrorKind::TypeMismatch => "invalid_type",
            ValidationErrorKind::PatternMismatch => "pattern_mismatch",
            ValidationErrorKind::NotInAllowedList => "not_in_list",
            ValidationErrorKind::Custom => "custom",
        }
    }
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The single error surfaced by a failed validation run.
///
/// `Display` prints only the human-readable message, e.g.
/// `"id length must be greater than or equal to 3 characters"`. The field name,
/// kind and rule parameters travel alongside it for callers that need structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// Human-readable error message
    pub message: String,
    /// What kind of check failed
    pub kind: ValidationErrorKind,
    /// Rule parameters relevant to the failure
    pub context: Option<serde_json::Value>,
}

impl ValidationError {
    /// Create a new validation error of the given kind
    pub fn new(
        field: impl Into<String>,
        kind: ValidationErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            kind,
            context: None,
        }
    }

    /// `"<field> is required"`
    pub fn required(field: &str) -> Self {
        Self::new(
            field,
            ValidationErrorKind::RequiredFieldMissing,
            format!("{} is required", field),
        )
    }

    /// `"<field> must be a string"`
    pub fn not_a_string(field: &str) -> Self {
        Self::new(
            field,
            ValidationErrorKind::TypeMismatch,
            format!("{} must be a string", field),
        )
    }

    /// Length violation with the bound-specific message template
    pub fn length(field: &str, bound: LengthBound, limit: usize, actual: usize) -> Self {
        let message = match bound {
            LengthBound::Exact => format!("{} length must be {} characters", field, limit),
            LengthBound::Min => format!(
                "{} length must be greater than or equal to {} characters",
                field, limit
            ),
            LengthBound::Max => format!(
                "{} length must be less than or equal to {} characters",
                field, limit
            ),
        };
        let key = match bound {
            LengthBound::Exact => "length",
            LengthBound::Min => "min_length",
            LengthBound::Max => "max_length",
        };

        let mut params = serde_json::Map::new();
        params.insert(key.to_string(), serde_json::Value::from(limit));
        params.insert("actual".to_string(), serde_json::Value::from(actual));

        Self::new(field, ValidationErrorKind::LengthMismatch(bound), message)
            .context(serde_json::Value::Object(params))
    }

    /// Pattern mismatch, using `custom_message` when the rule configures one
    pub fn pattern(field: &str, pattern: &str, custom_message: Option<&str>) -> Self {
        let message = custom_message
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} must be in a valid format", field));

        Self::new(field, ValidationErrorKind::PatternMismatch, message)
            .context(serde_json::json!({ "pattern": pattern }))
    }

    /// `"<field> isn't into the list."`
    pub fn not_included(field: &str, allowed: &[String]) -> Self {
        Self::new(
            field,
            ValidationErrorKind::NotInAllowedList,
            format!("{} isn't into the list.", field),
        )
        .context(serde_json::json!({ "included": allowed }))
    }

    /// Error raised by a custom evaluator
    pub fn custom(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, ValidationErrorKind::Custom, message)
    }

    /// Set additional context
    pub fn context(mut self, context: serde_json::Value) -> Self {
        self.context = Some(context);
        self
    }

    /// Replace the message, keeping field, kind and context
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Error code for programmatic handling
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Convert to a JSON-serializable format for API responses
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.code(),
                "field": self.field,
                "message": self.message,
                "context": self.context,
            }
        })
    }
}
