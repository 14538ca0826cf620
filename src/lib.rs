//! databag - typed codec between records and flat string-keyed databags
//!
//! A databag is a string -> string map whose values are JSON documents.
//! This crate turns schema-described records into databags and back:
//!
//! - [`schema`]: field specs, aliases, defaults, validation
//! - [`codec`]: decode/encode and the malformed/invalid error taxonomy
//! - [`observability`]: structured JSON logging
//! - [`cli`]: command-line tooling around the codec

pub mod cli;
pub mod codec;
pub mod observability;
pub mod schema;

pub use codec::{
    decode, decode_model, encode, encode_into, Codec, CodecResult, DataValidationError, Databag,
    DatabagModel, ErrorKind, RawBag, Record,
};
pub use schema::{EncodeMode, FieldSpec, FieldType, Schema, SchemaError, SchemaRegistry};
