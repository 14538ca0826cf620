//! Schema description for databag records
//!
//! A schema is an ordered list of fields, each with an external key
//! (alias), a type, a required flag and an optional default. Schemas are
//! built once per record type and never mutated; the codec borrows them.
//!
//! # Design Principles
//!
//! - Declaration order is encode order
//! - Aliases are unique within a schema
//! - Undeclared keys are ignored on read
//! - Null is a value, absence is not

mod errors;
mod loader;
mod types;
pub mod validator;

pub use errors::{SchemaError, SchemaResult, ValidationDetails};
pub use loader::{compare_versions, SchemaRegistry};
pub use types::{EncodeMode, FieldSpec, FieldType, Schema, SchemaBuilder};
