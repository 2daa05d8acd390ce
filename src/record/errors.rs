//! Record error types
//!
//! Error codes:
//! - REC_BIND_FAILED (arguments do not fit the signature)
//! - REC_VALIDATION_FAILED (a constraint rejected a field write)
//! - REC_MISSING_FIELD (read or delete of an unset field)
//! - REC_UNKNOWN_FIELD (attribute not declared on the record type)
//! - REC_UNKNOWN_TYPE (record type not present in a registry)
//! - REC_REGISTRATION_FAILED (record type definition rejected)

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Family of the rule that rejected a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    /// Value is not of the expected type
    Type,
    /// Value is outside a numeric bound
    Range,
    /// Value is too long
    Length,
    /// Text does not match a pattern
    Pattern,
    /// User-supplied rule
    Custom,
}

impl ConstraintKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintKind::Type => "type",
            ConstraintKind::Range => "range",
            ConstraintKind::Length => "length",
            ConstraintKind::Pattern => "pattern",
            ConstraintKind::Custom => "custom",
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Argument binding failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("too many positional arguments: expected at most {expected}, got {given}")]
    TooManyPositional { expected: usize, given: usize },

    #[error("multiple values for argument '{0}'")]
    MultipleValues(String),

    #[error("got an unexpected keyword argument '{0}'")]
    UnexpectedKeyword(String),

    #[error("missing required argument(s): {}", .0.join(", "))]
    Missing(Vec<String>),
}

/// A constraint rejected a field write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field '{field}' rejected value ({kind}): {reason}")]
pub struct ValidationError {
    /// Field that was written
    pub field: String,
    /// Family of the violated rule
    pub kind: ConstraintKind,
    /// Human-readable failure reason
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, kind: ConstraintKind, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            reason: reason.into(),
        }
    }

    pub fn is_type_error(&self) -> bool {
        self.kind == ConstraintKind::Type
    }

    pub fn is_range_error(&self) -> bool {
        self.kind == ConstraintKind::Range
    }
}

/// Read or delete of a field that holds no value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field '{field}' has no value")]
pub struct MissingFieldError {
    pub field: String,
}

/// Record type definition failures, raised at definition time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("record type name must not be empty")]
    EmptyTypeName,

    #[error("record type '{0}' declares a field with an empty name")]
    EmptyFieldName(String),

    #[error("field '{field}' is declared twice in '{record}' with different constraints")]
    ConflictingField { record: String, field: String },

    #[error("invalid constraint on field '{field}': {reason}")]
    InvalidConstraint { field: String, reason: String },

    #[error("duplicate parameter '{0}' in signature")]
    DuplicateParameter(String),

    #[error("record type '{0}' is already defined")]
    AlreadyDefined(String),

    #[error("record type '{record}' extends unknown type '{base}'")]
    UnknownBase { record: String, base: String },
}

/// Crate-level record error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error(transparent)]
    Bind(#[from] BindError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    MissingField(#[from] MissingFieldError),

    #[error("'{record}' has no field '{field}'")]
    UnknownField { record: String, field: String },

    #[error("unknown record type '{0}'")]
    UnknownType(String),

    #[error(transparent)]
    Registration(#[from] RegistrationError),
}

impl RecordError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            RecordError::Bind(_) => "REC_BIND_FAILED",
            RecordError::Validation(_) => "REC_VALIDATION_FAILED",
            RecordError::MissingField(_) => "REC_MISSING_FIELD",
            RecordError::UnknownField { .. } => "REC_UNKNOWN_FIELD",
            RecordError::UnknownType(_) => "REC_UNKNOWN_TYPE",
            RecordError::Registration(_) => "REC_REGISTRATION_FAILED",
        }
    }

    /// Returns the validation failure, if this is one
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            RecordError::Validation(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the bind failure, if this is one
    pub fn as_bind(&self) -> Option<&BindError> {
        match self {
            RecordError::Bind(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type for record operations
pub type RecordResult<T> = Result<T, RecordError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let bind: RecordError = BindError::Missing(vec!["price".into()]).into();
        assert_eq!(bind.code(), "REC_BIND_FAILED");

        let validation: RecordError =
            ValidationError::new("shares", ConstraintKind::Range, "must be >= 0").into();
        assert_eq!(validation.code(), "REC_VALIDATION_FAILED");

        let missing: RecordError = MissingFieldError { field: "price".into() }.into();
        assert_eq!(missing.code(), "REC_MISSING_FIELD");

        let registration: RecordError = RegistrationError::EmptyTypeName.into();
        assert_eq!(registration.code(), "REC_REGISTRATION_FAILED");
    }

    #[test]
    fn test_missing_lists_every_name() {
        let err = BindError::Missing(vec!["shares".into(), "price".into()]);
        assert_eq!(err.to_string(), "missing required argument(s): shares, price");
    }

    #[test]
    fn test_validation_display_names_field_and_kind() {
        let err = ValidationError::new("shares", ConstraintKind::Type, "expected int, got text");
        let display = err.to_string();
        assert!(display.contains("shares"));
        assert!(display.contains("type"));
        assert!(display.contains("expected int"));
        assert!(err.is_type_error());
        assert!(!err.is_range_error());
    }

    #[test]
    fn test_accessors() {
        let err: RecordError = BindError::UnexpectedKeyword("qty".into()).into();
        assert!(err.as_bind().is_some());
        assert!(err.as_validation().is_none());
    }
}
