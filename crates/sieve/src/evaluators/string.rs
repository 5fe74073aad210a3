//! String field rule: coercion, length, pattern and allow-list checks,
//! followed by the trim and replace transforms.

use crate::error::{LengthBound, ValidationError, ValidationResult};
use crate::traits::FieldEvaluator;
use regex::{NoExpand, Regex};
use serde_json::Value;

/// Regular expression check with an optional message override
#[derive(Debug, Clone)]
pub struct PatternRule {
    /// Compiled pattern, matched anywhere in the value unless anchored
    pub pattern: Regex,
    /// Replaces the default `"<field> must be in a valid format"` message
    pub error_message: Option<String>,
}

impl PatternRule {
    /// Compile a new pattern rule
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self::from_regex(Regex::new(pattern)?))
    }

    /// Create a pattern rule from an existing Regex
    pub fn from_regex(pattern: Regex) -> Self {
        Self {
            pattern,
            error_message: None,
        }
    }

    /// Set custom error message
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// What a [`ReplaceRule`] searches for
#[derive(Debug, Clone)]
pub enum ReplacePattern {
    Regex(Regex),
    Literal(String),
}

impl ReplacePattern {
    pub fn as_str(&self) -> &str {
        match self {
            ReplacePattern::Regex(regex) => regex.as_str(),
            ReplacePattern::Literal(literal) => literal,
        }
    }
}

/// Substitution applied to the value once every check has passed
#[derive(Debug, Clone)]
pub struct ReplaceRule {
    pub pattern: ReplacePattern,
    /// Inserted verbatim; `$1` style group references are not expanded
    pub replacement: String,
    /// Replace every occurrence (default) or only the first one
    pub global: bool,
}

impl ReplaceRule {
    /// Replace a literal substring
    pub fn literal(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: ReplacePattern::Literal(pattern.into()),
            replacement: replacement.into(),
            global: true,
        }
    }

    /// Replace matches of a regular expression
    pub fn regex(pattern: &str, replacement: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self::from_regex(Regex::new(pattern)?, replacement))
    }

    /// Replace matches of an existing Regex
    pub fn from_regex(pattern: Regex, replacement: impl Into<String>) -> Self {
        Self {
            pattern: ReplacePattern::Regex(pattern),
            replacement: replacement.into(),
            global: true,
        }
    }

    /// Set whether every occurrence is replaced
    pub fn global(mut self, global: bool) -> Self {
        self.global = global;
        self
    }

    /// Replace only the first, leftmost occurrence
    pub fn first_only(self) -> Self {
        self.global(false)
    }

    /// Apply the substitution to `text`
    pub fn apply(&self, text: &str) -> String {
        let replacement = self.replacement.as_str();
        match (&self.pattern, self.global) {
            (ReplacePattern::Literal(literal), true) => text.replace(literal.as_str(), replacement),
            (ReplacePattern::Literal(literal), false) => {
                text.replacen(literal.as_str(), replacement, 1)
            }
            (ReplacePattern::Regex(regex), true) => {
                regex.replace_all(text, NoExpand(replacement)).into_owned()
            }
            (ReplacePattern::Regex(regex), false) => {
                regex.replace(text, NoExpand(replacement)).into_owned()
            }
        }
    }
}

/// Validation and transformation policy for a string field
#[derive(Debug, Clone, Default)]
pub struct StringRule {
    /// A missing key is an error. A present nil is not.
    pub required: bool,
    /// Minimum length (inclusive)
    pub min_length: Option<usize>,
    /// Maximum length (inclusive)
    pub max_length: Option<usize>,
    /// Exact length required
    pub length: Option<usize>,
    pub pattern: Option<PatternRule>,
    pub replace: Option<ReplaceRule>,
    /// Allow-list, compared with exact string equality
    pub included: Option<Vec<String>>,
    /// Strip leading and trailing whitespace
    pub trim: bool,
}

impl StringRule {
    /// Create a rule with no constraints
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the key mandatory
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set minimum length constraint
    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Set maximum length constraint
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Set exact length requirement
    pub fn length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    /// Set length range (min and max)
    pub fn length_range(self, min: usize, max: usize) -> Self {
        self.min_length(min).max_length(max)
    }

    /// Attach a pattern check
    pub fn pattern(mut self, pattern: PatternRule) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Compile `pattern` and attach it with the default message
    pub fn matches(self, pattern: &str) -> Result<Self, regex::Error> {
        Ok(self.pattern(PatternRule::new(pattern)?))
    }

    /// Attach a substitution
    pub fn replace(mut self, replace: ReplaceRule) -> Self {
        self.replace = Some(replace);
        self
    }

    /// Restrict the value to a fixed set of strings
    pub fn included<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.included = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Strip surrounding whitespace from the output
    pub fn trim(mut self) -> Self {
        self.trim = true;
        self
    }

    /// A missing value can only satisfy the length checks when no positive
    /// threshold is configured.
    fn has_positive_length_threshold(&self) -> bool {
        self.length.map_or(false, |n| n > 0) || self.min_length.map_or(false, |n| n > 0)
    }

    /// Turn the raw value into a string, or `None` for nil
    fn coerce(&self, field: &str, value: &Value) -> ValidationResult<Option<String>> {
        match value {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s.clone())),
            Value::Bool(b) => Ok(Some(b.to_string())),
            Value::Number(n) => Ok(Some(n.to_string())),
            Value::Array(_) | Value::Object(_) => Err(ValidationError::not_a_string(field)),
        }
    }

    fn check_length(&self, field: &str, value: Option<&str>) -> ValidationResult<()> {
        let actual = value.map_or(0, |s| s.chars().count());

        if let Some(exact) = self.length {
            if actual != exact {
                return Err(ValidationError::length(field, LengthBound::Exact, exact, actual));
            }
        }

        if let Some(min) = self.min_length {
            if actual < min {
                return Err(ValidationError::length(field, LengthBound::Min, min, actual));
            }
        }

        if let Some(max) = self.max_length {
            if actual > max {
                return Err(ValidationError::length(field, LengthBound::Max, max, actual));
            }
        }

        Ok(())
    }

    fn check_pattern(&self, field: &str, value: Option<&str>) -> ValidationResult<()> {
        let Some(rule) = &self.pattern else {
            return Ok(());
        };

        match value {
            Some(text) if rule.is_match(text) => Ok(()),
            _ => Err(ValidationError::pattern(
                field,
                rule.pattern.as_str(),
                rule.error_message.as_deref(),
            )),
        }
    }

    fn check_included(&self, field: &str, value: Option<&str>) -> ValidationResult<()> {
        let Some(allowed) = &self.included else {
            return Ok(());
        };

        match value {
            Some(text) if allowed.iter().any(|candidate| candidate == text) => Ok(()),
            _ => Err(ValidationError::not_included(field, allowed)),
        }
    }

    /// Trim, then replace. Only reached once every check has passed.
    fn transform(&self, mut text: String) -> String {
        if self.trim {
            text = text.trim().to_string();
        }
        if let Some(ref replace) = self.replace {
            text = replace.apply(&text);
        }
        text
    }
}

impl FieldEvaluator for StringRule {
    fn evaluate(&self, field: &str, value: Option<&Value>) -> ValidationResult<Option<Value>> {
        let value = match value {
            None if self.required => return Err(ValidationError::required(field)),
            None if !self.has_positive_length_threshold() => return Ok(None),
            None => None,
            Some(raw) => self.coerce(field, raw)?,
        };

        self.check_length(field, value.as_deref())?;
        self.check_pattern(field, value.as_deref())?;
        self.check_included(field, value.as_deref())?;

        Ok(Some(match value {
            Some(text) => Value::String(self.transform(text)),
            None => Value::Null,
        }))
    }

    fn rule_name(&self) -> &'static str {
        "string"
    }

    fn parameters(&self) -> Option<Value> {
        let mut params = serde_json::Map::new();

        params.insert("required".to_string(), Value::Bool(self.required));
        if let Some(min) = self.min_length {
            params.insert("min_length".to_string(), Value::from(min));
        }
        if let Some(max) = self.max_length {
            params.insert("max_length".to_string(), Value::from(max));
        }
        if let Some(length) = self.length {
            params.insert("length".to_string(), Value::from(length));
        }
        if let Some(ref pattern) = self.pattern {
            params.insert(
                "pattern".to_string(),
                serde_json::json!({
                    "pattern": pattern.pattern.as_str(),
                    "error_message": pattern.error_message,
                }),
            );
        }
        if let Some(ref replace) = self.replace {
            let kind = match replace.pattern {
                ReplacePattern::Regex(_) => "regex",
                ReplacePattern::Literal(_) => "literal",
            };
            params.insert(
                "replace".to_string(),
                serde_json::json!({
                    "pattern": replace.pattern.as_str(),
                    "kind": kind,
                    "replacement": replace.replacement,
                    "global": replace.global,
                }),
            );
        }
        if let Some(ref included) = self.included {
            params.insert("included".to_string(), serde_json::json!(included));
        }
        params.insert("trim".to_string(), Value::Bool(self.trim));

        Some(Value::Object(params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationErrorKind;
    use serde_json::json;

    fn eval(rule: &StringRule, value: Value) -> ValidationResult<Option<Value>> {
        rule.evaluate("field", Some(&value))
    }

    fn message(result: ValidationResult<Option<Value>>) -> String {
        result.unwrap_err().to_string()
    }

    #[test]
    fn test_absent_optional_field_stays_absent() {
        let rule = StringRule::new().max_length(3).trim();
        assert_eq!(rule.evaluate("nickname", None).unwrap(), None);
    }

    #[test]
    fn test_absent_required_field() {
        let rule = StringRule::new().required();
        let error = rule.evaluate("email", None).unwrap_err();
        assert_eq!(error.to_string(), "email is required");
        assert_eq!(error.kind, ValidationErrorKind::RequiredFieldMissing);
    }

    #[test]
    fn test_required_accepts_present_nil() {
        let rule = StringRule::new().required();
        assert_eq!(eval(&rule, Value::Null).unwrap(), Some(Value::Null));
    }

    #[test]
    fn test_absent_with_positive_min_length_fails() {
        let rule = StringRule::new().min_length(2);
        let error = rule.evaluate("id", None).unwrap_err();
        assert_eq!(
            error.to_string(),
            "id length must be greater than or equal to 2 characters"
        );
    }

    #[test]
    fn test_absent_with_zero_thresholds_passes() {
        let rule = StringRule::new().min_length(0).length(0);
        assert_eq!(rule.evaluate("id", None).unwrap(), None);
    }

    #[test]
    fn test_coercion() {
        let rule = StringRule::new();
        assert_eq!(eval(&rule, json!(true)).unwrap(), Some(json!("true")));
        assert_eq!(eval(&rule, json!(false)).unwrap(), Some(json!("false")));
        assert_eq!(eval(&rule, json!(1)).unwrap(), Some(json!("1")));
        assert_eq!(eval(&rule, json!(-42)).unwrap(), Some(json!("-42")));
        assert_eq!(eval(&rule, json!(2.5)).unwrap(), Some(json!("2.5")));
    }

    #[test]
    fn test_coerced_value_is_length_checked() {
        let rule = StringRule::new().max_length(3);
        assert!(eval(&rule, json!(123)).is_ok());
        assert_eq!(
            message(eval(&rule, json!(1234))),
            "field length must be less than or equal to 3 characters"
        );
        assert!(eval(&rule, json!(false)).is_err());
    }

    #[test]
    fn test_non_scalar_is_type_mismatch() {
        let rule = StringRule::new();
        let error = eval(&rule, json!(["1"])).unwrap_err();
        assert_eq!(error.to_string(), "field must be a string");
        assert_eq!(error.code(), "invalid_type");

        assert!(eval(&rule, json!({ "a": 1 })).is_err());
    }

    #[test]
    fn test_exact_length() {
        let rule = StringRule::new().length(4);
        assert!(eval(&rule, json!("test")).is_ok());
        assert_eq!(
            message(eval(&rule, json!("hi"))),
            "field length must be 4 characters"
        );
        assert_eq!(
            message(eval(&rule, Value::Null)),
            "field length must be 4 characters"
        );
    }

    #[test]
    fn test_zero_length_accepts_only_nil_and_empty() {
        let rule = StringRule::new().length(0);
        assert_eq!(eval(&rule, Value::Null).unwrap(), Some(Value::Null));
        assert_eq!(eval(&rule, json!("")).unwrap(), Some(json!("")));
        for value in ["a", " ", "abc"] {
            assert_eq!(
                message(eval(&rule, json!(value))),
                "field length must be 0 characters"
            );
        }
    }

    #[test]
    fn test_min_length() {
        let rule = StringRule::new().min_length(3);
        assert!(eval(&rule, json!("bob")).is_ok());
        assert!(eval(&rule, json!("alice")).is_ok());
        assert_eq!(
            message(eval(&rule, json!("hi"))),
            "field length must be greater than or equal to 3 characters"
        );
        assert!(eval(&rule, Value::Null).is_err());

        let zero = StringRule::new().min_length(0);
        assert_eq!(eval(&zero, Value::Null).unwrap(), Some(Value::Null));
    }

    #[test]
    fn test_max_length() {
        let rule = StringRule::new().max_length(5);
        assert!(eval(&rule, json!("hello")).is_ok());
        assert!(eval(&rule, Value::Null).is_ok());
        assert_eq!(
            message(eval(&rule, json!("hello world"))),
            "field length must be less than or equal to 5 characters"
        );
    }

    #[test]
    fn test_length_checks_run_in_fixed_order() {
        let rule = StringRule::new().length(4).min_length(6).max_length(2);
        let error = eval(&rule, json!("abc")).unwrap_err();
        assert_eq!(error.code(), "length_exact");

        let rule = StringRule::new().min_length(6).max_length(2);
        let error = eval(&rule, json!("abc")).unwrap_err();
        assert_eq!(error.code(), "length_min");
    }

    #[test]
    fn test_length_counts_characters() {
        let rule = StringRule::new().max_length(4);
        assert!(eval(&rule, json!("café")).is_ok());
        assert!(eval(&rule, json!("🦀🚀✨")).is_ok());
        assert!(eval(&rule, json!("🦀🚀✨🎉🔥")).is_err());
    }

    #[test]
    fn test_pattern() {
        let rule = StringRule::new().matches(r"^[a-z]+$").unwrap();
        assert!(eval(&rule, json!("hello")).is_ok());
        assert_eq!(
            message(eval(&rule, json!("hello123"))),
            "field must be in a valid format"
        );
    }

    #[test]
    fn test_pattern_is_unanchored() {
        let rule = StringRule::new().matches(r"\d").unwrap();
        assert!(eval(&rule, json!("abc1def")).is_ok());
        assert!(eval(&rule, json!("abcdef")).is_err());
    }

    #[test]
    fn test_pattern_custom_message_and_nil() {
        let rule = StringRule::new().pattern(
            PatternRule::new(r"^[A-Z]+$")
                .unwrap()
                .message("Must be all uppercase letters"),
        );
        assert_eq!(
            message(eval(&rule, json!("hello"))),
            "Must be all uppercase letters"
        );
        assert_eq!(
            message(eval(&rule, Value::Null)),
            "Must be all uppercase letters"
        );
    }

    #[test]
    fn test_pattern_checks_coerced_value() {
        let rule = StringRule::new().matches(r"^\d+$").unwrap();
        assert_eq!(eval(&rule, json!(2024)).unwrap(), Some(json!("2024")));
        assert!(eval(&rule, json!(true)).is_err());
    }

    #[test]
    fn test_invalid_pattern_is_construction_error() {
        assert!(StringRule::new().matches(r"([a-z]").is_err());
        assert!(ReplaceRule::regex(r"[", "x").is_err());
    }

    #[test]
    fn test_included() {
        let rule = StringRule::new().included(["carlos", "benit", "ruben"]);
        assert_eq!(eval(&rule, json!("benit")).unwrap(), Some(json!("benit")));
        assert_eq!(
            message(eval(&rule, json!("maria"))),
            "field isn't into the list."
        );
        assert_eq!(
            message(eval(&rule, Value::Null)),
            "field isn't into the list."
        );
        assert!(eval(&rule, json!("Carlos")).is_err());
    }

    #[test]
    fn test_included_checks_coerced_value() {
        let rule = StringRule::new().included(["true", "false"]);
        assert_eq!(eval(&rule, json!(true)).unwrap(), Some(json!("true")));
    }

    #[test]
    fn test_trim() {
        let rule = StringRule::new().trim();
        assert_eq!(eval(&rule, json!("  padded \n")).unwrap(), Some(json!("padded")));
        assert_eq!(eval(&rule, Value::Null).unwrap(), Some(Value::Null));
    }

    #[test]
    fn test_trim_runs_after_checks() {
        let rule = StringRule::new().max_length(3).trim();
        assert!(eval(&rule, json!(" ab ")).is_err());
        assert_eq!(eval(&rule, json!(" a ")).unwrap(), Some(json!("a")));
    }

    #[test]
    fn test_replace_regex_first_only() {
        let rule = StringRule::new().replace(ReplaceRule::regex(r"[0-9]", "X").unwrap().first_only());
        assert_eq!(eval(&rule, json!("user123")).unwrap(), Some(json!("userX23")));
    }

    #[test]
    fn test_replace_regex_global_by_default() {
        let rule = StringRule::new().replace(ReplaceRule::regex(r"[0-9]", "X").unwrap());
        assert_eq!(eval(&rule, json!("user123")).unwrap(), Some(json!("userXXX")));
    }

    #[test]
    fn test_replace_literal() {
        let global = StringRule::new().replace(ReplaceRule::literal("-", ""));
        assert_eq!(eval(&global, json!("555-123-4567")).unwrap(), Some(json!("5551234567")));

        let first = StringRule::new().replace(ReplaceRule::literal("a.", "b.").global(false));
        assert_eq!(eval(&first, json!("a.a.a.")).unwrap(), Some(json!("b.a.a.")));
    }

    #[test]
    fn test_replace_literal_is_not_a_regex() {
        let rule = StringRule::new().replace(ReplaceRule::literal(".", "!"));
        assert_eq!(eval(&rule, json!("a.b")).unwrap(), Some(json!("a!b")));
    }

    #[test]
    fn test_replacement_is_not_expanded() {
        let rule = StringRule::new().replace(ReplaceRule::regex(r"(\d+)", "$1$").unwrap());
        assert_eq!(eval(&rule, json!("cost 10")).unwrap(), Some(json!("cost $1$")));
    }

    #[test]
    fn test_replace_after_trim() {
        let rule = StringRule::new()
            .trim()
            .replace(ReplaceRule::regex(r"^\s*x", "y").unwrap());
        assert_eq!(eval(&rule, json!("   xz")).unwrap(), Some(json!("yz")));
    }

    #[test]
    fn test_replace_skips_nil() {
        let rule = StringRule::new().replace(ReplaceRule::literal("a", "b"));
        assert_eq!(eval(&rule, Value::Null).unwrap(), Some(Value::Null));
    }

    #[test]
    fn test_failing_value_fails_before_transforms() {
        let rule = StringRule::new()
            .included(["admin"])
            .trim()
            .replace(ReplaceRule::literal("a", "b"));
        assert_eq!(
            message(eval(&rule, json!(" admin "))),
            "field isn't into the list."
        );
    }

    #[test]
    fn test_rule_is_not_mutated_by_evaluation() {
        let rule = StringRule::new().trim().replace(ReplaceRule::literal("o", "0"));
        let before = rule.parameters();
        eval(&rule, json!(" foo ")).unwrap();
        assert_eq!(rule.parameters(), before);
    }

    #[test]
    fn test_parameters() {
        let rule = StringRule::new()
            .required()
            .length_range(2, 10)
            .included(["a", "b"])
            .replace(ReplaceRule::literal("x", "y").first_only());

        assert_eq!(rule.rule_name(), "string");
        let params = rule.parameters().unwrap();
        assert_eq!(params["required"], json!(true));
        assert_eq!(params["min_length"], json!(2));
        assert_eq!(params["max_length"], json!(10));
        assert_eq!(params["included"], json!(["a", "b"]));
        assert_eq!(params["replace"]["kind"], json!("literal"));
        assert_eq!(params["replace"]["global"], json!(false));
        assert_eq!(params["trim"], json!(false));
        assert!(params.get("length").is_none());
    }
}
