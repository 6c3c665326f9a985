//! Declarative field validation.
//!
//! A [`Schema`] is an ordered list of fields, each with an ordered list of
//! [`Rule`]s. Validating a field reports the message of the first rule that
//! fails; validating a form reports every failing field in schema order.

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;
use regex::Regex;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Raw, untyped form input keyed by field name.
///
/// Values may hold passwords, so they are wiped on drop and on overwrite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    values: HashMap<String, String>,
}

impl FormValues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        if let Some(mut previous) = self.values.insert(name.to_string(), value.into()) {
            previous.zeroize();
        }
    }

    /// Raw value of a field; missing fields read as empty.
    #[must_use]
    pub fn get(&self, name: &str) -> &str {
        self.values.get(name).map_or("", String::as_str)
    }

    /// Parse a field that the schema has already accepted as a number.
    #[must_use]
    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).trim().parse().ok()
    }
}

impl Zeroize for FormValues {
    fn zeroize(&mut self) {
        for value in self.values.values_mut() {
            value.zeroize();
        }
        self.values.clear();
    }
}

impl Drop for FormValues {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for FormValues {}

/// Field name → first failing message, in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: IndexMap<&'static str, String>,
}

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    pub fn remove(&mut self, field: &str) {
        self.errors.shift_remove(field);
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.errors.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self
            .errors
            .iter()
            .map(|(field, msg)| format!("{field}: {msg}"))
            .collect();
        f.write_str(&joined.join("; "))
    }
}

/// A single validation rule. Every variant carries its user-facing message.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Value must be non-empty. Whitespace counts as content.
    Required(&'static str),
    /// Value must parse as a number (type error, not a range error).
    Number(&'static str),
    /// Parsed number must be > 0.
    Positive(&'static str),
    /// Parsed number must have no fractional part.
    Integer(&'static str),
    /// Parsed number must be >= bound.
    Min(f64, &'static str),
    /// Parsed number must be <= bound.
    Max(f64, &'static str),
    /// Length in characters must be >= bound.
    MinLength(usize, &'static str),
    /// Value must match the regex.
    Pattern(Regex, &'static str),
    /// Value must be one of the listed options.
    OneOf(&'static [&'static str], &'static str),
    /// Value must equal another field's value.
    EqualsField(&'static str, &'static str),
    /// Value must be the literal `"true"` (checkbox accepted).
    Checked(&'static str),
}

impl Rule {
    /// Build a [`Rule::Pattern`] from a literal pattern.
    ///
    /// # Panics
    /// Panics if `pattern` is not a valid regex. Only call with literals.
    #[must_use]
    pub fn pattern(pattern: &str, message: &'static str) -> Self {
        Self::Pattern(Regex::new(pattern).expect("Valid regex"), message)
    }

    fn check(&self, raw: &str, values: &FormValues) -> Result<(), &'static str> {
        let trimmed = raw.trim();
        let number = || trimmed.parse::<f64>().ok().filter(|n| n.is_finite());

        let ok = match self {
            Self::Required(_) => !raw.is_empty(),
            Self::Number(_) => number().is_some(),
            Self::Positive(_) => number().map_or(true, |n| n > 0.0),
            Self::Integer(_) => number().map_or(true, |n| n.fract() == 0.0),
            Self::Min(bound, _) => number().map_or(true, |n| n >= *bound),
            Self::Max(bound, _) => number().map_or(true, |n| n <= *bound),
            Self::MinLength(len, _) => raw.chars().count() >= *len,
            Self::Pattern(re, _) => re.is_match(raw),
            Self::OneOf(options, _) => options.contains(&trimmed),
            Self::EqualsField(other, _) => raw == values.get(other),
            Self::Checked(_) => trimmed == "true",
        };

        if ok {
            Ok(())
        } else {
            Err(self.message())
        }
    }

    fn message(&self) -> &'static str {
        match self {
            Self::Required(m)
            | Self::Number(m)
            | Self::Positive(m)
            | Self::Integer(m)
            | Self::Min(_, m)
            | Self::Max(_, m)
            | Self::MinLength(_, m)
            | Self::Pattern(_, m)
            | Self::OneOf(_, m)
            | Self::EqualsField(_, m)
            | Self::Checked(m) => m,
        }
    }
}

/// One field's declaration.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub rules: Vec<Rule>,
}

impl FieldSpec {
    fn check(&self, values: &FormValues) -> Option<&'static str> {
        let raw = values.get(self.name);

        // Optional fields skip their remaining rules when blank.
        let required = self.rules.iter().any(|r| matches!(r, Rule::Required(_) | Rule::Checked(_)));
        if !required && raw.trim().is_empty() {
            return None;
        }

        self.rules.iter().find_map(|rule| rule.check(raw, values).err())
    }
}

/// Ordered collection of field declarations.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field declaration.
    #[must_use]
    pub fn field(mut self, name: &'static str, rules: Vec<Rule>) -> Self {
        self.fields.push(FieldSpec { name, rules });
        self
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    /// Validate a single field. Unknown fields validate as `None`.
    #[must_use]
    pub fn validate_field(&self, name: &str, values: &FormValues) -> Option<&'static str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .and_then(|f| f.check(values))
    }

    /// Validate every field.
    ///
    /// # Errors
    /// Returns all failing fields in declaration order.
    pub fn validate(&self, values: &FormValues) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        for field in &self.fields {
            if let Some(msg) = field.check(values) {
                errors.insert(field.name, msg);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Loose email shape check: `local@domain.tld`, no whitespace.
pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        Schema::new()
            .field(
                "count",
                vec![
                    Rule::Required("Count is required"),
                    Rule::Number("Count must be a number"),
                    Rule::Integer("Count must be a whole number"),
                    Rule::Min(1.0, "Count must be at least 1"),
                    Rule::Max(10.0, "Count must be at most 10"),
                ],
            )
            .field("nickname", vec![Rule::MinLength(3, "Nickname is too short")])
            .field("secret", vec![Rule::Required("Secret is required")])
            .field(
                "confirm",
                vec![
                    Rule::Required("Please confirm"),
                    Rule::EqualsField("secret", "Must match"),
                ],
            )
    }

    #[test]
    fn test_first_failing_rule_wins() {
        let s = schema();
        let v = FormValues::new().with("count", "");
        assert_eq!(s.validate_field("count", &v), Some("Count is required"));

        let v = FormValues::new().with("count", "abc");
        assert_eq!(s.validate_field("count", &v), Some("Count must be a number"));

        let v = FormValues::new().with("count", "2.5");
        assert_eq!(s.validate_field("count", &v), Some("Count must be a whole number"));

        let v = FormValues::new().with("count", "11");
        assert_eq!(s.validate_field("count", &v), Some("Count must be at most 10"));

        let v = FormValues::new().with("count", " 7 ");
        assert_eq!(s.validate_field("count", &v), None);
    }

    #[test]
    fn test_form_values_wipe() {
        fn wiped_on_drop<T: ZeroizeOnDrop>() {}
        wiped_on_drop::<FormValues>();

        let mut v = FormValues::new().with("secret", "hunter22");
        v.set("secret", "hunter23");
        assert_eq!(v.get("secret"), "hunter23");

        v.zeroize();
        assert_eq!(v.get("secret"), "");
    }

    #[test]
    fn test_required_counts_whitespace_as_content() {
        let s = schema();
        let v = FormValues::new().with("secret", " ");
        assert_eq!(s.validate_field("secret", &v), None);
        let v = FormValues::new().with("secret", "");
        assert_eq!(s.validate_field("secret", &v), Some("Secret is required"));
    }

    #[test]
    fn test_optional_blank_field_skips_rules() {
        let s = schema();
        let v = FormValues::new();
        assert_eq!(s.validate_field("nickname", &v), None);

        let v = FormValues::new().with("nickname", "ab");
        assert_eq!(s.validate_field("nickname", &v), Some("Nickname is too short"));
    }

    #[test]
    fn test_cross_field_equality() {
        let s = schema();
        let v = FormValues::new().with("secret", "abc").with("confirm", "abd");
        assert_eq!(s.validate_field("confirm", &v), Some("Must match"));

        let v = FormValues::new().with("secret", "abc").with("confirm", "abc");
        assert_eq!(s.validate_field("confirm", &v), None);
    }

    #[test]
    fn test_validate_collects_in_order() {
        let s = schema();
        let errors = s.validate(&FormValues::new()).expect_err("Should fail");
        let names: Vec<&str> = errors.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["count", "secret", "confirm"]);
        assert!(errors.to_string().starts_with("count: Count is required"));
    }

    #[test]
    fn test_non_finite_numbers_rejected() {
        let s = schema();
        let v = FormValues::new().with("count", "NaN");
        assert_eq!(s.validate_field("count", &v), Some("Count must be a number"));
        let v = FormValues::new().with("count", "inf");
        assert_eq!(s.validate_field("count", &v), Some("Count must be a number"));
    }

    #[test]
    fn test_email_pattern() {
        let rule = Rule::pattern(EMAIL_PATTERN, "Please enter a valid email");
        let v = FormValues::new();
        assert!(rule.check("jane@example.com", &v).is_ok());
        assert!(rule.check("jane@example", &v).is_err());
        assert!(rule.check("jane doe@example.com", &v).is_err());
    }
}
