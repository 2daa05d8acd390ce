//! Declarative record types
//!
//! A record type declares named fields, each guarded by an ordered list of
//! constraints. Defining the type synthesizes its constructor signature;
//! constructing an instance binds positional and keyword arguments against
//! that signature and writes every value through its field descriptor.
//!
//! # Invariants
//!
//! - Declaration order is constructor parameter order
//! - Record types are immutable once defined
//! - Constraints run in declared order; the first rejection wins
//! - A field write is all-or-nothing
//! - Construction either sets every field or returns no record
//!
//! # Usage
//!
//! ```ignore
//! use recordkit::{args, Field, Positive, RecordType, TypeIs};
//!
//! let stock = RecordType::builder("Stock")
//!     .field("name", Field::new().with(TypeIs::text()))
//!     .field("shares", Field::new().with(TypeIs::int()).with(Positive))
//!     .field("price", Field::new().with(TypeIs::float()).with(Positive))
//!     .define()?;
//!
//! let s = stock.construct(args!["ACME", 50, price = 91.1])?;
//! assert_eq!(s.get("shares")?, &serde_json::json!(50));
//! ```

mod arguments;
mod constraint;
mod errors;
mod field;
mod instance;
mod registry;
mod signature;

pub use arguments::Arguments;
pub use constraint::{
    value_type_name, AtLeast, Constraint, FieldType, MaxLength, Pattern, Positive, Rejection, TypeIs,
};
pub use errors::{
    BindError, ConstraintKind, MissingFieldError, RecordError, RecordResult, RegistrationError,
    ValidationError,
};
pub use field::Field;
pub use instance::Record;
pub use registry::{RecordType, RecordTypeBuilder, Registry};
pub use signature::{BoundArguments, Parameter, ParameterKind, Signature};
