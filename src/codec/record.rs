//! Dynamic records
//!
//! A [`Record`] pairs a schema with validated, name-keyed values. It is the
//! record type for schemas known only at runtime (e.g. loaded from disk);
//! compiled record types implement [`DatabagModel`](super::DatabagModel)
//! instead.

use std::sync::Arc;

use serde_json::{Map, Value};

use super::bag::{Databag, RawBag};
use super::decode::decode;
use super::encode::{encode, encode_into};
use super::errors::{CodecResult, DataValidationError};
use super::Codec;
use crate::schema::{validator, EncodeMode, Schema};

/// Validated, immutable record of a runtime schema
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    schema: Arc<Schema>,
    values: Map<String, Value>,
}

impl Record {
    /// Builds a record from name-keyed values.
    ///
    /// Values go through the same checks as a decoded databag, so absent
    /// optional fields take their defaults and unknown names are dropped.
    ///
    /// # Errors
    ///
    /// `Invalid` if the values do not satisfy the schema. The error's
    /// databag is the one these values would have encoded to.
    pub fn new(schema: Arc<Schema>, values: Map<String, Value>) -> CodecResult<Self> {
        let external = validator::to_external_fields(&schema.fields, &values);

        match validator::validate_fields(&schema.fields, &external, "") {
            Ok(validated) => Ok(Self::from_validated(schema, validated)),
            Err(details) => {
                let key = schema.key_for_path(&details.field).map(str::to_string);
                let databag = external
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_string()))
                    .collect();
                Err(DataValidationError::invalid(key, details, databag))
            }
        }
    }

    pub(crate) fn from_validated(schema: Arc<Schema>, values: Map<String, Value>) -> Self {
        Self { schema, values }
    }

    /// Decodes a record from a databag. See [`decode`].
    pub fn load<B: Databag + ?Sized>(schema: &Arc<Schema>, databag: &B) -> CodecResult<Self> {
        decode(schema, databag)
    }

    /// Encodes into a fresh databag using the schema's encode mode.
    pub fn dump(&self) -> RawBag {
        encode(self)
    }

    /// Encodes into a fresh databag using `mode`.
    pub fn dump_with_mode(&self, mode: EncodeMode) -> RawBag {
        Codec::new(&self.schema)
            .with_mode(mode)
            .encode_to_bag(&self.values)
    }

    /// Encodes into a caller-owned databag, clearing it first if `clear`.
    pub fn dump_into<B: Databag + ?Sized>(&self, databag: &mut B, clear: bool) {
        encode_into(self, databag, clear)
    }

    /// Value of the field called `name`
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// All values, keyed by field name
    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn into_values(self) -> Map<String, Value> {
        self.values
    }

    /// Values as a single JSON object keyed by field name
    pub fn to_json(&self) -> Value {
        Value::Object(self.values.clone())
    }
}
