//! Closure-backed field evaluators for field types that live outside this crate

use crate::error::{ValidationError, ValidationResult};
use crate::traits::FieldEvaluator;
use serde_json::Value;
use std::sync::Arc;

/// Type alias for evaluation closures
pub type EvaluateFn =
    Arc<dyn Fn(&str, Option<&Value>) -> ValidationResult<Option<Value>> + Send + Sync>;

/// Custom rule that delegates evaluation to a user-defined function
#[derive(Clone)]
pub struct CustomRule {
    /// Name/identifier for this custom rule
    pub name: String,
    evaluator: EvaluateFn,
    /// Replaces the message of any error the closure returns
    pub message: Option<String>,
}

impl CustomRule {
    /// Create a new custom rule from a function
    pub fn new<F>(name: impl Into<String>, evaluator: F) -> Self
    where
        F: Fn(&str, Option<&Value>) -> ValidationResult<Option<Value>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            evaluator: Arc::new(evaluator),
            message: None,
        }
    }

    /// Wrap an existing evaluator implementation
    pub fn from_evaluator(name: impl Into<String>, evaluator: Arc<dyn FieldEvaluator>) -> Self {
        Self::new(name, move |field, value| evaluator.evaluate(field, value))
    }

    /// Set custom error message
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Get the rule name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for CustomRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomRule")
            .field("name", &self.name)
            .field("message", &self.message)
            .finish()
    }
}

impl FieldEvaluator for CustomRule {
    fn evaluate(&self, field: &str, value: Option<&Value>) -> ValidationResult<Option<Value>> {
        (self.evaluator)(field, value).map_err(|error| match self.message {
            Some(ref message) => error.with_message(message.clone()),
            None => error,
        })
    }

    fn rule_name(&self) -> &'static str {
        "custom"
    }

    fn parameters(&self) -> Option<Value> {
        let mut params = serde_json::Map::new();

        params.insert("name".to_string(), Value::String(self.name.clone()));

        if let Some(ref message) = self.message {
            params.insert("message".to_string(), Value::String(message.clone()));
        }

        Some(Value::Object(params))
    }
}

/// Helper constructors for common custom field types
impl CustomRule {
    /// Pass the value through untouched, keeping absent keys absent
    pub fn passthrough(name: impl Into<String>) -> Self {
        Self::new(name, |_field, value| Ok(value.cloned()))
    }

    /// Accept booleans only, rejecting everything else present
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, |field, value| match value {
            None | Some(Value::Null) | Some(Value::Bool(_)) => Ok(value.cloned()),
            Some(_) => Err(ValidationError::custom(
                field,
                format!("{} must be a boolean", field),
            )),
        })
    }
}
