//! Reusable string constraints attached to declared attributes.
//!
//! Validators are stateless and only see present values: an unset attribute
//! is never handed to a validator.

use std::fmt;

use regex::Regex;

/// A pure predicate over a string attribute value.
pub trait Validator: Send + Sync + fmt::Debug {
    /// Plain-text description, used in JSON schemas.
    fn description(&self) -> String;

    /// Markdown description, used in rendered documentation.
    fn markdown_description(&self) -> String;

    /// Checks `value`, returning the violation detail on failure.
    fn validate(&self, value: &str) -> Result<(), String>;
}

/// Value must equal one of a fixed, ordered set of strings.
#[derive(Debug, Clone)]
pub struct OneOf {
    allowed: &'static [&'static str],
}

impl OneOf {
    pub const fn new(allowed: &'static [&'static str]) -> Self {
        Self { allowed }
    }

    pub fn allowed(&self) -> &'static [&'static str] {
        self.allowed
    }
}

impl Validator for OneOf {
    fn description(&self) -> String {
        format!("must be one of: {}", self.allowed.join(", "))
    }

    fn markdown_description(&self) -> String {
        format!("must be one of: `{}`", self.allowed.join("`, `"))
    }

    fn validate(&self, value: &str) -> Result<(), String> {
        if self.allowed.contains(&value) {
            Ok(())
        } else {
            Err(self.description())
        }
    }
}

/// Value must match a regular expression in full.
///
/// Patterns are expected to be anchored; the match is not anchored implicitly.
#[derive(Debug, Clone)]
pub struct MatchesRegex {
    regex: &'static Regex,
}

impl MatchesRegex {
    pub const fn new(regex: &'static Regex) -> Self {
        Self { regex }
    }
}

impl Validator for MatchesRegex {
    fn description(&self) -> String {
        format!("must match regexp: {}", self.regex.as_str())
    }

    fn markdown_description(&self) -> String {
        format!("must match regexp: `{}`", self.regex.as_str())
    }

    fn validate(&self, value: &str) -> Result<(), String> {
        if self.regex.is_match(value) {
            Ok(())
        } else {
            Err(self.description())
        }
    }
}
