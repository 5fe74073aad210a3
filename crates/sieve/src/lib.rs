//! # sieve
//!
//! Declarative record validation. A [`Schema`] maps field names to [`Rule`]s;
//! [`SchemaValidator`] checks a record against it and returns either a
//! transformed copy or the first error encountered.

pub mod config;
pub mod error;
pub mod evaluators;
pub mod rules;
pub mod traits;
pub mod validator;

// Re-exports for easy access
pub use config::{UnknownFieldPolicy, ValidatorConfig};
pub use error::{LengthBound, ValidationError, ValidationErrorKind, ValidationResult};
pub use rules::{Rule, Schema};
pub use traits::FieldEvaluator;
pub use validator::{validate, Record, SchemaValidator};

// Built-in evaluators
pub use evaluators::{
    custom::CustomRule,
    string::{PatternRule, ReplacePattern, ReplaceRule, StringRule},
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_imports() {
        let _error = ValidationError::required("field");
        let schema = Schema::new().field("field", StringRule::new());
        let _validator = SchemaValidator::new(schema);
        let _config = ValidatorConfig::default();
    }
}
