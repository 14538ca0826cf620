//! Compiled record types
//!
//! A record type implements [`DatabagModel`] by pointing at its schema. Its
//! serde field names must be the schema's field names (not aliases); the
//! codec handles aliasing.
//!
//! ```ignore
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Person {
//!     name: String,
//!     age: i64,
//! }
//!
//! impl DatabagModel for Person {
//!     fn schema() -> &'static Schema {
//!         static SCHEMA: OnceLock<Schema> = OnceLock::new();
//!         SCHEMA.get_or_init(|| {
//!             Schema::builder("person")
//!                 .field(FieldSpec::required("name", FieldType::String))
//!                 .field(FieldSpec::with_default("age", FieldType::Int, 0))
//!                 .build()
//!                 .expect("person schema")
//!         })
//!     }
//! }
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use super::bag::{Databag, RawBag};
use super::decode::decode_model;
use super::encode::{encode_model, encode_model_into};
use super::errors::CodecResult;
use crate::schema::{validator, FieldSpec, FieldType, Schema};

/// A record type with a static schema
pub trait DatabagModel: Serialize + DeserializeOwned {
    /// The schema describing this type. Built once, never mutated.
    fn schema() -> &'static Schema;

    /// Load this model from a databag.
    fn load<B: Databag + ?Sized>(databag: &B) -> CodecResult<Self> {
        decode_model(databag)
    }

    /// Write this model to a fresh databag.
    fn dump(&self) -> RawBag {
        encode_model(self)
    }

    /// Write this model to `databag`, clearing it first if `clear`.
    fn dump_into<B: Databag + ?Sized>(&self, databag: &mut B, clear: bool) {
        encode_model_into(self, databag, clear)
    }

    /// Field values keyed by field name, checked against the schema.
    ///
    /// A `None` in an optional field that does not accept null means the
    /// field is absent, so it is not written.
    ///
    /// # Panics
    ///
    /// If the type does not serialize to a JSON object, or its values do
    /// not satisfy the schema. Either is a broken model definition.
    fn to_values(&self) -> Map<String, Value> {
        let schema = Self::schema();
        let mut values = match serde_json::to_value(self) {
            Ok(Value::Object(values)) => values,
            Ok(other) => panic!(
                "databag model '{}' must serialize to a JSON object, got {}",
                schema.name, other
            ),
            Err(e) => panic!(
                "databag model '{}' is not JSON-serializable: {}",
                schema.name, e
            ),
        };

        for field in &schema.fields {
            if absent_when_null(field) && values.get(&field.name) == Some(&Value::Null) {
                values.remove(&field.name);
            }
        }

        let external = validator::to_external_fields(&schema.fields, &values);
        match validator::validate_fields(&schema.fields, &external, "") {
            Ok(values) => values,
            Err(details) => panic!(
                "databag model '{}' does not satisfy its schema: {}",
                schema.name, details
            ),
        }
    }
}

fn absent_when_null(field: &FieldSpec) -> bool {
    !field.required
        && field.default.is_none()
        && !matches!(field.field_type, FieldType::Nullable { .. } | FieldType::Any)
}
