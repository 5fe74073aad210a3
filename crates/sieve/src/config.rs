//! Validator configuration and builder

use serde::{Deserialize, Serialize};
use service_builder::builder;

/// What happens to record keys the schema does not declare
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownFieldPolicy {
    /// Copy them into the output unchanged
    #[default]
    PassThrough,
    /// Leave them out of the output
    Drop,
}

/// Configuration for [`crate::SchemaValidator`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[builder]
pub struct ValidatorConfig {
    /// Handling of keys that have no rule
    #[builder(default, getter)]
    pub unknown_fields: UnknownFieldPolicy,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            unknown_fields: UnknownFieldPolicy::PassThrough,
        }
    }
}

// Add convenience methods to the generated builder
impl ValidatorConfigBuilder {
    pub fn pass_through_unknown(self) -> Self {
        self.unknown_fields(UnknownFieldPolicy::PassThrough)
    }

    pub fn drop_unknown(self) -> Self {
        self.unknown_fields(UnknownFieldPolicy::Drop)
    }

    pub fn build_config(self) -> ValidatorConfig {
        self.build_with_defaults().unwrap_or_default()
    }
}
