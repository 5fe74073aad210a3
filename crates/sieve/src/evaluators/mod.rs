//! Built-in field evaluators

pub mod custom;
pub mod string;

pub use custom::CustomRule;
pub use string::{PatternRule, ReplacePattern, ReplaceRule, StringRule};
