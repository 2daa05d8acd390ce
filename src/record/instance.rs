//! Record instances
//!
//! A `Record` owns its field map exclusively. Every access goes through the
//! field's descriptor on the record type; nothing writes the map directly.
//!
//! Construction binds arguments against the type's signature, then writes
//! each value through its descriptor in declaration order into a fresh map.
//! The first failing write aborts construction, so no partially filled
//! record ever reaches the caller.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use super::arguments::Arguments;
use super::errors::{RecordError, RecordResult};
use super::registry::RecordType;

/// An instance of a record type.
#[derive(Debug, Clone)]
pub struct Record {
    record_type: Arc<RecordType>,
    slots: HashMap<String, Value>,
}

impl Record {
    /// Binds `args` and writes every field through its descriptor.
    pub fn construct(record_type: &Arc<RecordType>, args: Arguments) -> RecordResult<Self> {
        let bound = record_type.signature().bind(args)?;

        let mut record = Record {
            record_type: Arc::clone(record_type),
            slots: HashMap::with_capacity(bound.len()),
        };
        for (name, value) in bound {
            let field = record_type.require_field(&name)?;
            field.set(&mut record, value)?;
        }

        Ok(record)
    }

    pub fn record_type(&self) -> &Arc<RecordType> {
        &self.record_type
    }

    pub fn type_name(&self) -> &str {
        self.record_type.name()
    }

    /// Reads field `name`.
    pub fn get(&self, name: &str) -> RecordResult<&Value> {
        let field = self.record_type.require_field(name)?;
        Ok(field.get(self)?)
    }

    /// Validates and writes field `name`. A rejected value leaves the
    /// previous value in place.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> RecordResult<()> {
        let record_type = Arc::clone(&self.record_type);
        let field = record_type.require_field(name)?;
        field.set(self, value.into())?;
        Ok(())
    }

    /// Removes field `name`, returning its value.
    pub fn delete(&mut self, name: &str) -> RecordResult<Value> {
        let record_type = Arc::clone(&self.record_type);
        let field = record_type.require_field(name)?;
        Ok(field.delete(self)?)
    }

    /// Returns true if field `name` currently holds a value.
    pub fn is_set(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Set fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.record_type
            .field_names()
            .filter_map(|name| self.slots.get_key_value(name))
            .map(|(k, v)| (k.as_str(), v))
    }

    /// Field map as a JSON object, in declaration order.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        Value::Object(map)
    }

    pub(crate) fn slots(&self) -> &HashMap<String, Value> {
        &self.slots
    }

    pub(crate) fn slots_mut(&mut self) -> &mut HashMap<String, Value> {
        &mut self.slots
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.type_name() == other.type_name() && self.slots == other.slots
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.type_name())?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        write!(f, ")")
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.slots.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        record.to_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use crate::record::constraint::{Positive, TypeIs};
    use crate::record::field::Field;
    use serde_json::json;

    fn stock() -> Arc<RecordType> {
        RecordType::builder("Stock")
            .field("name", Field::new().with(TypeIs::text()))
            .field("shares", Field::new().with(TypeIs::int()).with(Positive))
            .field("price", Field::new().with(TypeIs::float()).with(Positive))
            .define()
            .unwrap()
    }

    #[test]
    fn test_display_in_declaration_order() {
        let s = stock().construct(args![price = 91.1, shares = 50, name = "ACME"]).unwrap();
        assert_eq!(s.to_string(), r#"Stock(name="ACME", shares=50, price=91.1)"#);
    }

    #[test]
    fn test_json_preserves_declaration_order() {
        let s = stock().construct(args!["ACME", 50, 91.1]).unwrap();
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, r#"{"name":"ACME","shares":50,"price":91.1}"#);
        assert_eq!(s.to_json(), json!({"name": "ACME", "shares": 50, "price": 91.1}));
    }

    #[test]
    fn test_unknown_attribute() {
        let mut s = stock().construct(args!["ACME", 50, 91.1]).unwrap();
        assert_eq!(s.get("volume").unwrap_err().code(), "REC_UNKNOWN_FIELD");
        assert_eq!(s.set("volume", 1).unwrap_err().code(), "REC_UNKNOWN_FIELD");
        assert_eq!(s.delete("volume").unwrap_err().code(), "REC_UNKNOWN_FIELD");
    }

    #[test]
    fn test_set_validates() {
        let mut s = stock().construct(args!["ACME", 50, 91.1]).unwrap();
        s.set("shares", 75).unwrap();
        assert_eq!(s.get("shares").unwrap(), &json!(75));

        let err = s.set("shares", -1).unwrap_err();
        assert!(err.as_validation().unwrap().is_range_error());
        assert_eq!(s.get("shares").unwrap(), &json!(75));
    }

    #[test]
    fn test_delete_and_reset() {
        let mut s = stock().construct(args!["ACME", 50, 91.1]).unwrap();
        assert_eq!(s.delete("price").unwrap(), json!(91.1));
        assert!(!s.is_set("price"));
        assert_eq!(s.get("price").unwrap_err().code(), "REC_MISSING_FIELD");
        assert_eq!(s.delete("price").unwrap_err().code(), "REC_MISSING_FIELD");
        assert_eq!(s.to_string(), r#"Stock(name="ACME", shares=50)"#);

        s.set("price", 12.5).unwrap();
        assert_eq!(s.get("price").unwrap(), &json!(12.5));
    }

    #[test]
    fn test_equality_is_type_and_fields() {
        let ty = stock();
        let a = ty.construct(args!["ACME", 50, 91.1]).unwrap();
        let b = ty.construct(args![shares = 50, price = 91.1, name = "ACME"]).unwrap();
        let c = ty.construct(args!["ACME", 51, 91.1]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_instances_do_not_share_state() {
        let ty = stock();
        let mut a = ty.construct(args!["ACME", 50, 91.1]).unwrap();
        let b = ty.construct(args!["ACME", 50, 91.1]).unwrap();
        a.set("shares", 1).unwrap();
        assert_eq!(b.get("shares").unwrap(), &json!(50));
    }
}
