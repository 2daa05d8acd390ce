//! Schema document definitions
//!
//! A schema document is the JSON form of a record type declaration:
//!
//! ```json
//! {
//!   "name": "Stock",
//!   "fields": [
//!     {"name": "name", "constraints": [{"kind": "type", "expected": "text"}]},
//!     {"name": "shares", "constraints": [{"kind": "type", "expected": "int"}, {"kind": "positive"}]}
//!   ]
//! }
//! ```
//!
//! Field order in the document is declaration order.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::record::{
    AtLeast, Constraint, Field, FieldType, MaxLength, Pattern, Positive, RecordType,
    RecordTypeBuilder, TypeIs,
};

/// Serializable form of a built-in constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConstraintSpec {
    /// Exact type match
    Type { expected: FieldType },
    /// Number >= 0
    Positive,
    /// Number >= bound
    AtLeast { bound: f64 },
    /// Text or array length <= max
    MaxLength { max: usize },
    /// Text matching a regular expression
    Pattern { regex: String },
}

impl ConstraintSpec {
    /// Builds the runtime constraint.
    pub fn build(&self) -> Result<Arc<dyn Constraint>, String> {
        let constraint: Arc<dyn Constraint> = match self {
            ConstraintSpec::Type { expected } => Arc::new(TypeIs::new(*expected)),
            ConstraintSpec::Positive => Arc::new(Positive),
            ConstraintSpec::AtLeast { bound } => {
                if !bound.is_finite() {
                    return Err(format!("bound must be finite, got {}", bound));
                }
                Arc::new(AtLeast::new(*bound))
            }
            ConstraintSpec::MaxLength { max } => Arc::new(MaxLength::new(*max)),
            ConstraintSpec::Pattern { regex } => Arc::new(
                Pattern::new(regex).map_err(|e| format!("invalid pattern '{}': {}", regex, e))?,
            ),
        };
        Ok(constraint)
    }
}

/// One field declaration in a schema document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDoc {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<ConstraintSpec>,
}

impl FieldDoc {
    pub fn new(name: impl Into<String>, constraints: Vec<ConstraintSpec>) -> Self {
        Self {
            name: name.into(),
            constraints,
        }
    }

    /// Builds an unnamed field descriptor; registration names it.
    pub fn to_field(&self) -> Result<Field, String> {
        self.constraints
            .iter()
            .try_fold(Field::new(), |field, spec| Ok(field.with_shared(spec.build()?)))
    }
}

fn is_type_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// JSON declaration of a record type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    /// Record type name
    pub name: String,
    /// Record type this one extends
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Field declarations in declaration order
    #[serde(default)]
    pub fields: Vec<FieldDoc>,
}

impl SchemaDocument {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDoc>) -> Self {
        Self {
            name: name.into(),
            extends: None,
            description: None,
            fields,
        }
    }

    pub fn extending(mut self, base: impl Into<String>) -> Self {
        self.extends = Some(base.into());
        self
    }

    /// Validates the document structure itself (not a record)
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("schema must have a non-empty 'name'".into());
        }

        // the name doubles as the file stem in the schema directory
        if !is_type_name(&self.name) {
            return Err(format!(
                "schema name {:?} must start with a letter or '_' and contain only letters, digits or '_'",
                self.name
            ));
        }

        if let Some(field) = self.fields.iter().find(|f| f.name.trim().is_empty()) {
            return Err(format!(
                "field names must be non-empty (found {:?})",
                field.name
            ));
        }

        if self.extends.as_deref() == Some(self.name.as_str()) {
            return Err(format!("schema '{}' cannot extend itself", self.name));
        }

        Ok(())
    }

    /// Turns the document into a record type builder.
    pub fn to_builder(&self, base: Option<&Arc<RecordType>>) -> Result<RecordTypeBuilder, String> {
        self.validate_structure()?;

        let mut builder = RecordType::builder(self.name.clone());
        if let Some(base) = base {
            builder = builder.extends(base);
        }
        for doc in &self.fields {
            builder = builder.field(doc.name.clone(), doc.to_field()?);
        }
        Ok(builder)
    }
}
