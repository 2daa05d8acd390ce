//! Schema file error types
//!
//! Error codes:
//! - SCHEMA_MALFORMED (file unreadable, invalid JSON, or invalid structure)
//! - SCHEMA_DUPLICATE (two documents declare the same record type)
//! - SCHEMA_UNKNOWN_BASE (`extends` names no known record type)
//! - SCHEMA_CYCLE (`extends` chain loops back on itself)
//! - SCHEMA_IMMUTABLE (schema file already exists on disk)
//! - SCHEMA_REGISTRATION_FAILED (record type definition rejected)

use thiserror::Error;

use crate::record::RegistrationError;

/// Schema loading errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("malformed schema '{path}': {reason}")]
    Malformed { path: String, reason: String },

    #[error("record type '{0}' is declared by more than one schema document")]
    Duplicate(String),

    #[error("schema '{schema}' extends unknown record type '{base}'")]
    UnknownBase { schema: String, base: String },

    #[error("schema '{0}' is part of an inheritance cycle")]
    Cycle(String),

    #[error("schema file for '{0}' already exists")]
    Immutable(String),

    #[error(transparent)]
    Registration(#[from] RegistrationError),
}

impl SchemaError {
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::Malformed { .. } => "SCHEMA_MALFORMED",
            SchemaError::Duplicate(_) => "SCHEMA_DUPLICATE",
            SchemaError::UnknownBase { .. } => "SCHEMA_UNKNOWN_BASE",
            SchemaError::Cycle(_) => "SCHEMA_CYCLE",
            SchemaError::Immutable(_) => "SCHEMA_IMMUTABLE",
            SchemaError::Registration(_) => "SCHEMA_REGISTRATION_FAILED",
        }
    }
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchemaError::malformed("a.json", "bad").code(), "SCHEMA_MALFORMED");
        assert_eq!(SchemaError::Duplicate("Stock".into()).code(), "SCHEMA_DUPLICATE");
        assert_eq!(SchemaError::Cycle("A".into()).code(), "SCHEMA_CYCLE");
        assert_eq!(SchemaError::Immutable("A".into()).code(), "SCHEMA_IMMUTABLE");
    }

    #[test]
    fn test_registration_errors_convert() {
        let err: SchemaError = RegistrationError::AlreadyDefined("Stock".into()).into();
        assert_eq!(err.code(), "SCHEMA_REGISTRATION_FAILED");
        assert!(err.to_string().contains("Stock"));
    }

    #[test]
    fn test_malformed_display_includes_path() {
        let err = SchemaError::malformed("schemas/stock.json", "Invalid JSON");
        let display = err.to_string();
        assert!(display.contains("schemas/stock.json"));
        assert!(display.contains("Invalid JSON"));
    }
}
