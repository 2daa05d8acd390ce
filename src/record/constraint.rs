//! Single-field validation rules
//!
//! A constraint inspects a candidate value and either accepts it or rejects
//! it with a reason. Constraints never mutate the value. A field composes
//! them as an ordered list; evaluation stops at the first rejection.
//!
//! Built-in rules:
//! - `TypeIs`: exact type match (no coercion, ints are not floats)
//! - `AtLeast` / `Positive`: numeric lower bound
//! - `MaxLength`: length limit for text and arrays
//! - `Pattern`: regular expression match for text

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::ConstraintKind;

/// Reason a constraint refused a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub kind: ConstraintKind,
    pub reason: String,
}

impl Rejection {
    pub fn new(kind: ConstraintKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }
}

/// A validation rule for one field.
///
/// Implementations must be stateless with respect to the checked value:
/// the same input always produces the same verdict.
pub trait Constraint: fmt::Debug + Send + Sync {
    /// Accepts or rejects `value`.
    fn check(&self, value: &Value) -> Result<(), Rejection>;

    /// Stable description of the rule, e.g. `type(int)`.
    ///
    /// Two constraints with equal descriptions are treated as the same rule
    /// when record type definitions are compared.
    fn describe(&self) -> String;
}

/// Value types a field can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// 64-bit integer
    Int,
    /// 64-bit floating point
    Float,
    /// UTF-8 text
    #[serde(alias = "string", alias = "str")]
    Text,
    /// Boolean
    Bool,
    /// Array of values
    Array,
    /// Nested object
    Object,
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Text => "text",
            FieldType::Bool => "bool",
            FieldType::Array => "array",
            FieldType::Object => "object",
        }
    }

    /// Returns true if `value` is exactly of this type.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            FieldType::Int => value.is_i64() || value.is_u64(),
            FieldType::Float => value.is_f64(),
            FieldType::Text => value.is_string(),
            FieldType::Bool => value.is_boolean(),
            FieldType::Array => value.is_array(),
            FieldType::Object => value.is_object(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Returns the type name of a value for error messages.
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "text",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Accepts only values of one type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeIs {
    expected: FieldType,
}

impl TypeIs {
    pub fn new(expected: FieldType) -> Self {
        Self { expected }
    }

    pub fn int() -> Self {
        Self::new(FieldType::Int)
    }

    pub fn float() -> Self {
        Self::new(FieldType::Float)
    }

    pub fn text() -> Self {
        Self::new(FieldType::Text)
    }

    pub fn bool() -> Self {
        Self::new(FieldType::Bool)
    }

    pub fn expected(&self) -> FieldType {
        self.expected
    }
}

impl Constraint for TypeIs {
    fn check(&self, value: &Value) -> Result<(), Rejection> {
        if self.expected.matches(value) {
            return Ok(());
        }
        Err(Rejection::new(
            ConstraintKind::Type,
            format!("expected {}, got {}", self.expected, value_type_name(value)),
        ))
    }

    fn describe(&self) -> String {
        format!("type({})", self.expected)
    }
}

/// Accepts numbers greater than or equal to a bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtLeast {
    bound: f64,
}

impl AtLeast {
    pub fn new(bound: f64) -> Self {
        Self { bound }
    }

    pub fn bound(&self) -> f64 {
        self.bound
    }
}

impl Constraint for AtLeast {
    fn check(&self, value: &Value) -> Result<(), Rejection> {
        let Some(n) = value.as_f64() else {
            return Err(Rejection::new(
                ConstraintKind::Range,
                format!(
                    "{} value is not comparable with {}",
                    value_type_name(value),
                    format_bound(self.bound)
                ),
            ));
        };

        // integers beyond 2^53 lose precision in the f64 view; for an integer
        // v, v >= bound exactly when v >= ceil(bound), and the cast saturates
        let integer = value.as_i64().map(i128::from).or_else(|| value.as_u64().map(i128::from));
        let below = match integer {
            Some(i) if self.bound.is_finite() => i < self.bound.ceil() as i128,
            _ => n < self.bound,
        };

        if below {
            return Err(Rejection::new(
                ConstraintKind::Range,
                format!("must be >= {}, got {}", format_bound(self.bound), value),
            ));
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("at_least({})", format_bound(self.bound))
    }
}

/// Accepts numbers `>= 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Positive;

impl Constraint for Positive {
    fn check(&self, value: &Value) -> Result<(), Rejection> {
        AtLeast::new(0.0).check(value)
    }

    fn describe(&self) -> String {
        "positive".to_string()
    }
}

/// Accepts text (counted in chars) or arrays no longer than `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxLength {
    max: usize,
}

impl MaxLength {
    pub fn new(max: usize) -> Self {
        Self { max }
    }
}

impl Constraint for MaxLength {
    fn check(&self, value: &Value) -> Result<(), Rejection> {
        let len = match value {
            Value::String(s) => s.chars().count(),
            Value::Array(items) => items.len(),
            other => {
                return Err(Rejection::new(
                    ConstraintKind::Length,
                    format!("{} value has no length", value_type_name(other)),
                ))
            }
        };

        if len > self.max {
            return Err(Rejection::new(
                ConstraintKind::Length,
                format!("length must be <= {}, got {}", self.max, len),
            ));
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("max_length({})", self.max)
    }
}

/// Accepts text matching a regular expression.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl Constraint for Pattern {
    fn check(&self, value: &Value) -> Result<(), Rejection> {
        let Some(text) = value.as_str() else {
            return Err(Rejection::new(
                ConstraintKind::Pattern,
                format!("expected text matching '{}', got {}", self.as_str(), value_type_name(value)),
            ));
        };

        if !self.regex.is_match(text) {
            return Err(Rejection::new(
                ConstraintKind::Pattern,
                format!("'{}' does not match '{}'", text, self.as_str()),
            ));
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("pattern({})", self.as_str())
    }
}

fn format_bound(bound: f64) -> String {
    if bound.fract() == 0.0 && bound.abs() < 1.0e15 {
        format!("{}", bound as i64)
    } else {
        format!("{}", bound)
    }
}
