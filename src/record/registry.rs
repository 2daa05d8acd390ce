//! Record type registration
//!
//! `RecordTypeBuilder::define` is the registration step for a record type.
//! It runs once per type, before any instance exists, and:
//!
//! 1. collects inherited fields first (in the base's order), then the type's
//!    own declarations in source order; a redeclared inherited name replaces
//!    that field's constraints but keeps its original position
//! 2. names every unnamed descriptor after the key it was declared under
//! 3. synthesizes the constructor `Signature`
//! 4. freezes fields and signature into an immutable `RecordType`
//!
//! Two own declarations that resolve to the same name are tolerated only if
//! their constraint chains are identical; otherwise definition fails.
//!
//! A `Registry` holds defined types by name and refuses to redefine one.

use std::sync::Arc;

use indexmap::IndexMap;

use super::arguments::Arguments;
use super::errors::{RecordError, RecordResult, RegistrationError};
use super::field::Field;
use super::instance::Record;
use super::signature::Signature;
use crate::observability::{log_event_with_fields, Event};

/// Immutable schema of one record type.
#[derive(Debug)]
pub struct RecordType {
    name: String,
    base: Option<String>,
    fields: IndexMap<String, Field>,
    signature: Signature,
}

impl RecordType {
    /// Starts declaring a record type.
    pub fn builder(name: impl Into<String>) -> RecordTypeBuilder {
        RecordTypeBuilder {
            name: name.into(),
            base: None,
            declarations: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the type this one extends, if any.
    pub fn base_name(&self) -> Option<&str> {
        self.base.as_deref()
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Looks up a field, failing with `UnknownField`.
    pub fn require_field(&self, name: &str) -> RecordResult<&Field> {
        self.fields.get(name).ok_or_else(|| RecordError::UnknownField {
            record: self.name.clone(),
            field: name.to_string(),
        })
    }

    /// Constructs an instance of this type.
    pub fn construct(self: &Arc<Self>, args: Arguments) -> RecordResult<Record> {
        Record::construct(self, args)
    }
}

/// Collects declarations for a record type until `define` is called.
#[derive(Debug)]
pub struct RecordTypeBuilder {
    name: String,
    base: Option<Arc<RecordType>>,
    declarations: Vec<(String, Field)>,
}

impl RecordTypeBuilder {
    /// Inherits every field of `base`.
    pub fn extends(mut self, base: &Arc<RecordType>) -> Self {
        self.base = Some(Arc::clone(base));
        self
    }

    /// Declares a field under `key`.
    pub fn field(mut self, key: impl Into<String>, field: Field) -> Self {
        self.declarations.push((key.into(), field));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Finalizes the type. Consumes the builder, so it runs once.
    pub fn define(self) -> Result<Arc<RecordType>, RegistrationError> {
        if self.name.trim().is_empty() {
            return Err(RegistrationError::EmptyTypeName);
        }

        let mut own: IndexMap<String, Field> = IndexMap::new();
        for (key, mut field) in self.declarations {
            field.assign_name(&key);
            let name = field.key().to_string();
            if name.trim().is_empty() {
                return Err(RegistrationError::EmptyFieldName(self.name));
            }

            if let Some(existing) = own.get(&name) {
                if existing.same_rules(&field) {
                    continue;
                }
                return Err(RegistrationError::ConflictingField {
                    record: self.name,
                    field: name,
                });
            }
            own.insert(name, field);
        }

        let mut fields: IndexMap<String, Field> = match &self.base {
            Some(base) => base.fields.clone(),
            None => IndexMap::new(),
        };
        for (name, field) in own {
            if let Some(inherited) = fields.get_mut(&name) {
                inherited.override_with(field);
            } else {
                fields.insert(name, field);
            }
        }

        let signature = Signature::new(fields.keys().cloned())?;

        Ok(Arc::new(RecordType {
            name: self.name,
            base: self.base.map(|b| b.name.clone()),
            fields,
            signature,
        }))
    }
}

/// Named collection of defined record types.
///
/// Types are write-once: defining a name twice fails with `AlreadyDefined`.
#[derive(Debug, Default)]
pub struct Registry {
    types: IndexMap<String, Arc<RecordType>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs registration for `builder` and stores the result.
    pub fn define(&mut self, builder: RecordTypeBuilder) -> Result<Arc<RecordType>, RegistrationError> {
        if self.types.contains_key(builder.name()) {
            return Err(RegistrationError::AlreadyDefined(builder.name().to_string()));
        }

        let record_type = builder.define()?;
        let signature = record_type.signature().to_string();
        log_event_with_fields(
            Event::SchemaRegistered,
            &[("record_type", record_type.name()), ("signature", signature.as_str())],
        );

        self.types
            .insert(record_type.name().to_string(), Arc::clone(&record_type));
        Ok(record_type)
    }

    /// Starts a builder that extends the registered type `base`.
    pub fn builder_extending(
        &self,
        name: impl Into<String>,
        base: &str,
    ) -> Result<RecordTypeBuilder, RegistrationError> {
        let name = name.into();
        let base_type = self.types.get(base).ok_or_else(|| RegistrationError::UnknownBase {
            record: name.clone(),
            base: base.to_string(),
        })?;
        Ok(RecordType::builder(name).extends(base_type))
    }

    pub fn get(&self, name: &str) -> Option<&Arc<RecordType>> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Constructs an instance of the registered type `name`.
    pub fn construct(&self, name: &str, args: Arguments) -> RecordResult<Record> {
        let record_type = self
            .types
            .get(name)
            .ok_or_else(|| RecordError::UnknownType(name.to_string()))?;
        Record::construct(record_type, args)
    }

    /// Registered types in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<RecordType>> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
