//! Rule variants and the schema that maps field names to them

use crate::error::ValidationResult;
use crate::evaluators::{CustomRule, StringRule};
use crate::traits::FieldEvaluator;
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;

/// Per-field policy. One variant per supported field type.
#[derive(Debug, Clone)]
pub enum Rule {
    String(StringRule),
    Custom(CustomRule),
}

impl Rule {
    /// A string rule with no constraints
    pub fn string() -> Self {
        Rule::String(StringRule::new())
    }

    /// A custom rule backed by a closure
    pub fn custom<F>(name: impl Into<String>, evaluator: F) -> Self
    where
        F: Fn(&str, Option<&Value>) -> ValidationResult<Option<Value>> + Send + Sync + 'static,
    {
        Rule::Custom(CustomRule::new(name, evaluator))
    }

    /// A custom rule backed by an existing evaluator implementation
    pub fn evaluator(name: impl Into<String>, evaluator: Arc<dyn FieldEvaluator>) -> Self {
        Rule::Custom(CustomRule::from_evaluator(name, evaluator))
    }

    /// The evaluator this rule dispatches to
    pub fn as_evaluator(&self) -> &dyn FieldEvaluator {
        match self {
            Rule::String(rule) => rule,
            Rule::Custom(rule) => rule,
        }
    }
}

impl FieldEvaluator for Rule {
    fn evaluate(&self, field: &str, value: Option<&Value>) -> ValidationResult<Option<Value>> {
        self.as_evaluator().evaluate(field, value)
    }

    fn rule_name(&self) -> &'static str {
        self.as_evaluator().rule_name()
    }

    fn parameters(&self) -> Option<Value> {
        self.as_evaluator().parameters()
    }
}

impl From<StringRule> for Rule {
    fn from(rule: StringRule) -> Self {
        Rule::String(rule)
    }
}

impl From<CustomRule> for Rule {
    fn from(rule: CustomRule) -> Self {
        Rule::Custom(rule)
    }
}

/// Ordered mapping from field name to [`Rule`]. Fields are evaluated in
/// declaration order; redeclaring a field replaces its rule in place.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: IndexMap<String, Rule>,
}

impl Schema {
    /// Create a new empty schema
    pub fn new() -> Self {
        Self {
            fields: IndexMap::new(),
        }
    }

    /// Declare a field
    pub fn field(mut self, field: impl Into<String>, rule: impl Into<Rule>) -> Self {
        self.fields.insert(field.into(), rule.into());
        self
    }

    /// Declare a required string field with optional length bounds
    pub fn required_string(
        self,
        field: impl Into<String>,
        min_length: Option<usize>,
        max_length: Option<usize>,
    ) -> Self {
        let mut rule = StringRule::new().required();
        rule.min_length = min_length;
        rule.max_length = max_length;
        self.field(field, rule)
    }

    /// Declare a string field that must be one of the allowed values
    pub fn one_of<I, S>(self, field: impl Into<String>, allowed_values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.field(field, StringRule::new().included(allowed_values))
    }

    /// Get the rule for a specific field
    pub fn get(&self, field: &str) -> Option<&Rule> {
        self.fields.get(field)
    }

    /// Iterate fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.fields.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    /// Check whether a field is declared
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Get all field names that have rules, in declaration order
    pub fn validated_fields(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Describe every field's rule as JSON
    pub fn describe(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(name, rule)| {
                    let mut entry = serde_json::Map::new();
                    entry.insert("rule".to_string(), Value::String(rule.rule_name().to_string()));
                    if let Some(params) = rule.parameters() {
                        entry.insert("parameters".to_string(), params);
                    }
                    (name.clone(), Value::Object(entry))
                })
                .collect(),
        )
    }
}
