//! Core evaluation trait for field types

use crate::error::ValidationResult;
use serde_json::Value;

/// Contract every field type implements.
///
/// `value` is `None` when the key is missing from the record and
/// `Some(&Value::Null)` when it is present but nil. On success the evaluator
/// returns the value to store under `field` in the output record, or `None`
/// to leave the key out.
pub trait FieldEvaluator: Send + Sync {
    /// Validate and transform a single field value
    fn evaluate(&self, field: &str, value: Option<&Value>) -> ValidationResult<Option<Value>>;

    /// Get the rule name/type
    fn rule_name(&self) -> &'static str;

    /// Get rule parameters/configuration as JSON
    fn parameters(&self) -> Option<Value> {
        None
    }
}
