//! Schema files for record types
//!
//! Record types can be declared in JSON documents instead of code. The
//! loader reads a directory of documents and defines each one in a
//! `Registry`, resolving `extends` so bases are always defined first.
//!
//! # Design Principles
//!
//! - Document field order is constructor parameter order
//! - Loading is all-or-nothing per document
//! - Schema files are never overwritten
//! - Deterministic load order (file name)

mod errors;
mod loader;
mod types;

pub use errors::{SchemaError, SchemaResult};
pub use loader::SchemaLoader;
pub use types::{ConstraintSpec, FieldDoc, SchemaDocument};
