//! Field descriptors
//!
//! A `Field` mediates every read, write and delete of one named slot on a
//! record. Values live in the record's own field map; the descriptor only
//! holds the slot name and the ordered constraint chain.
//!
//! Writes are all-or-nothing: the stored value changes only after every
//! constraint has accepted the candidate.

use std::sync::Arc;

use serde_json::Value;

use super::constraint::Constraint;
use super::errors::{MissingFieldError, ValidationError};
use super::instance::Record;

/// Descriptor for one declared field.
///
/// Usually created unnamed; registration assigns the name under which the
/// field was declared. Cloning is cheap, constraints are shared.
#[derive(Debug, Clone, Default)]
pub struct Field {
    name: Option<String>,
    constraints: Vec<Arc<dyn Constraint>>,
}

impl Field {
    /// Creates an unnamed, unconstrained field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a field with an explicit slot name.
    ///
    /// Registration keeps an explicit name even if the field is declared
    /// under a different key.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            constraints: Vec::new(),
        }
    }

    /// Appends a constraint. Constraints run in the order they are added.
    pub fn with<C: Constraint + 'static>(mut self, constraint: C) -> Self {
        self.constraints.push(Arc::new(constraint));
        self
    }

    /// Appends an already shared constraint.
    pub fn with_shared(mut self, constraint: Arc<dyn Constraint>) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Returns the slot name, `None` before registration.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn constraints(&self) -> &[Arc<dyn Constraint>] {
        &self.constraints
    }

    /// Descriptions of the constraint chain, in evaluation order.
    pub fn rules(&self) -> Vec<String> {
        self.constraints.iter().map(|c| c.describe()).collect()
    }

    /// Runs the constraint chain against `value` without storing it.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        for constraint in &self.constraints {
            constraint
                .check(value)
                .map_err(|r| ValidationError::new(self.key(), r.kind, r.reason))?;
        }
        Ok(())
    }

    /// Reads this field from `record`.
    pub fn get<'r>(&self, record: &'r Record) -> Result<&'r Value, MissingFieldError> {
        record.slots().get(self.key()).ok_or_else(|| self.missing())
    }

    /// Validates and stores `value` on `record`.
    pub fn set(&self, record: &mut Record, value: Value) -> Result<(), ValidationError> {
        self.validate(&value)?;
        record.slots_mut().insert(self.key().to_string(), value);
        Ok(())
    }

    /// Removes this field's value from `record`, returning it.
    pub fn delete(&self, record: &mut Record) -> Result<Value, MissingFieldError> {
        record.slots_mut().remove(self.key()).ok_or_else(|| self.missing())
    }

    /// Assigns `name` unless the field already carries one.
    pub(crate) fn assign_name(&mut self, name: &str) {
        if self.name.is_none() {
            self.name = Some(name.to_string());
        }
    }

    /// Replaces this field's constraints with `other`'s, keeping the name.
    pub(crate) fn override_with(&mut self, other: Field) {
        self.constraints = other.constraints;
    }

    pub(crate) fn same_rules(&self, other: &Field) -> bool {
        self.rules() == other.rules()
    }

    pub(crate) fn key(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    fn missing(&self) -> MissingFieldError {
        MissingFieldError {
            field: self.key().to_string(),
        }
    }
}
