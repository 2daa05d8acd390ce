//! recordkit - declarative record types with validated fields
//!
//! A record type declares ordered fields, each guarded by a chain of
//! constraints. Defining the type synthesizes its constructor signature;
//! constructing an instance binds positional and keyword arguments against
//! that signature and writes every value through its field.
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
//! let record = stock.construct(args!["ACME", 50, price = 91.1])?;
//! ```

pub mod cli;
pub mod market;
pub mod observability;
pub mod record;
pub mod schema;

pub use record::{
    Arguments, AtLeast, BindError, Constraint, ConstraintKind, Field, FieldType, MaxLength,
    MissingFieldError, Pattern, Positive, Record, RecordError, RecordResult, RecordType,
    RecordTypeBuilder, Registry, RegistrationError, Signature, TypeIs, ValidationError,
};
