//! Databag codec
//!
//! Converts between schema-described records and flat string -> string
//! databags whose values are JSON documents.
//!
//! # Design Principles
//!
//! - Stateless: each call borrows its schema and bag, nothing else
//! - Decode reads only keys the schema declares; others are ignored
//! - Decode fails as a whole; there is no partial record
//! - Malformed (not JSON) and invalid (schema rejects) are distinct kinds
//! - Encode into a caller's bag clears it first unless told otherwise
//! - `decode(encode(r)) == r`
//!
//! The destination bag is mutated exclusively for the duration of one
//! encode call. Callers sharing a bag across threads serialize access.

mod bag;
mod decode;
mod encode;
mod errors;
mod model;
mod record;

pub use bag::{render, Databag, RawBag};
pub use decode::{decode, decode_model};
pub use encode::{encode, encode_into, encode_model, encode_model_into};
pub use errors::{CodecResult, DataValidationError, ErrorKind};
pub use model::DatabagModel;
pub use record::Record;

use crate::schema::{EncodeMode, Schema};

/// Codec bound to one schema.
///
/// The encode mode comes from the schema unless overridden.
#[derive(Debug, Clone, Copy)]
pub struct Codec<'a> {
    schema: &'a Schema,
    mode: EncodeMode,
}

impl<'a> Codec<'a> {
    /// Creates a codec for `schema` using the schema's own encode mode.
    pub fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            mode: schema.encode_mode,
        }
    }

    /// Overrides the encode mode.
    pub fn with_mode(mut self, mode: EncodeMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn mode(&self) -> EncodeMode {
        self.mode
    }
}
