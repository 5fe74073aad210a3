//! Schema validator: runs every declared field through its rule and builds
//! the output record.

use crate::config::{UnknownFieldPolicy, ValidatorConfig};
use crate::error::ValidationResult;
use crate::rules::Schema;
use crate::traits::FieldEvaluator;
use serde_json::Value;
use std::collections::HashMap;

/// Mapping from field name to a dynamically-typed value
pub type Record = HashMap<String, Value>;

/// Validates records against a schema.
///
/// Fields are evaluated in declaration order and the first failing field
/// aborts the run; no partial record is returned. The input record is never
/// modified, each call builds a fresh output.
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    schema: Schema,
    config: ValidatorConfig,
}

impl SchemaValidator {
    /// Creates a validator with the default configuration
    pub fn new(schema: Schema) -> Self {
        Self::with_config(schema, ValidatorConfig::default())
    }

    pub fn with_config(schema: Schema, config: ValidatorConfig) -> Self {
        Self { schema, config }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validates a record, returning the transformed copy or the first error.
    pub fn validate(&self, record: &Record) -> ValidationResult<Record> {
        tracing::debug!(
            "Validating record with {} field(s) against {} rule(s)",
            record.len(),
            self.schema.len()
        );

        let mut output = self.seed_output(record);

        for (field, rule) in self.schema.fields() {
            tracing::trace!("Evaluating field '{}' with {} rule", field, rule.rule_name());

            match rule.evaluate(field, record.get(field)) {
                Ok(Some(value)) => {
                    output.insert(field.to_string(), value);
                }
                Ok(None) => {}
                Err(error) => {
                    tracing::debug!("Field '{}' failed validation: {}", field, error.code());
                    return Err(error);
                }
            }
        }

        tracing::debug!("Record validated, {} field(s) in output", output.len());
        Ok(output)
    }

    /// Starting point for the output: unknown keys per policy, schema keys
    /// are filled in by their rules.
    fn seed_output(&self, record: &Record) -> Record {
        match *self.config.get_unknown_fields() {
            UnknownFieldPolicy::PassThrough => record
                .iter()
                .filter(|(key, _)| !self.schema.contains(key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
            UnknownFieldPolicy::Drop => {
                for key in record.keys().filter(|key| !self.schema.contains(key)) {
                    tracing::trace!("Dropping undeclared field '{}'", key);
                }
                Record::with_capacity(self.schema.len())
            }
        }
    }
}

/// Validates `record` against `schema` with the default configuration.
pub fn validate(schema: &Schema, record: &Record) -> ValidationResult<Record> {
    SchemaValidator::new(schema.clone()).validate(record)
}
