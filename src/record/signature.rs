//! Constructor signatures
//!
//! A `Signature` is the ordered list of parameter names synthesized for a
//! record type. Every parameter is required and may be passed positionally
//! or by keyword. Binding is deterministic:
//!
//! 1. more positional values than parameters fails
//! 2. positional values fill the earliest parameters, in order
//! 3. keywords are examined in supply order; a name already filled or not
//!    declared fails
//! 4. any parameter left without a value fails, all such names reported
//!
//! The bound result lists values in parameter order regardless of the order
//! they were supplied in.

use std::fmt;

use serde_json::Value;

use super::arguments::Arguments;
use super::errors::{BindError, RegistrationError};

/// How a parameter may be supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    PositionalOrKeyword,
}

/// One named parameter of a signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    name: String,
    kind: ParameterKind,
}

impl Parameter {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ParameterKind {
        self.kind
    }
}

/// Ordered, immutable call contract for a record constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    params: Vec<Parameter>,
}

impl Signature {
    /// Builds a signature from field names in declaration order.
    pub fn new<I, S>(names: I) -> Result<Self, RegistrationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut params: Vec<Parameter> = Vec::new();
        for name in names {
            let name = name.into();
            if params.iter().any(|p| p.name == name) {
                return Err(RegistrationError::DuplicateParameter(name));
            }
            params.push(Parameter {
                name,
                kind: ParameterKind::PositionalOrKeyword,
            });
        }
        Ok(Self { params })
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.params
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|p| p.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Returns the index of parameter `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|p| p.name == name)
    }

    /// Binds `args` against this signature.
    pub fn bind(&self, args: Arguments) -> Result<BoundArguments, BindError> {
        let (positional, keywords) = args.into_parts();

        if positional.len() > self.params.len() {
            return Err(BindError::TooManyPositional {
                expected: self.params.len(),
                given: positional.len(),
            });
        }

        let mut slots: Vec<Option<Value>> = vec![None; self.params.len()];
        for (slot, value) in slots.iter_mut().zip(positional) {
            *slot = Some(value);
        }

        for (name, value) in keywords {
            let Some(index) = self.position(&name) else {
                return Err(BindError::UnexpectedKeyword(name));
            };
            if slots[index].is_some() {
                return Err(BindError::MultipleValues(name));
            }
            slots[index] = Some(value);
        }

        let missing: Vec<String> = self
            .params
            .iter()
            .zip(&slots)
            .filter(|(_, slot)| slot.is_none())
            .map(|(p, _)| p.name.clone())
            .collect();
        if !missing.is_empty() {
            return Err(BindError::Missing(missing));
        }

        let arguments = self
            .params
            .iter()
            .zip(slots)
            .filter_map(|(p, slot)| slot.map(|value| (p.name.clone(), value)))
            .collect();

        Ok(BoundArguments { arguments })
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param.name)?;
        }
        write!(f, ")")
    }
}

/// Result of a successful bind, in parameter order.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundArguments {
    arguments: Vec<(String, Value)>,
}

impl BoundArguments {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.arguments.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.arguments.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }
}

impl IntoIterator for BoundArguments {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.arguments.into_iter()
    }
}
