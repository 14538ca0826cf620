//! Record -> databag
//!
//! Encode never fails: it only sees records that already passed
//! validation. Values are written in schema order, keyed by alias, each
//! as compact JSON.

use serde_json::{Map, Value};

use super::bag::{Databag, RawBag};
use super::model::DatabagModel;
use super::record::Record;
use super::Codec;
use crate::observability::{log_event_with_fields, Event};
use crate::schema::{validator, EncodeMode, FieldSpec};

impl<'a> Codec<'a> {
    /// Writes name-keyed `values` into `databag`.
    ///
    /// With `clear`, a non-empty destination is emptied first so no key
    /// from a previous record survives. Without it, keys this record does
    /// not write are left alone.
    pub fn encode_values<B: Databag + ?Sized>(
        &self,
        values: &Map<String, Value>,
        databag: &mut B,
        clear: bool,
    ) {
        if clear && databag.entry_count() > 0 {
            let erased = databag.entry_count().to_string();
            databag.erase_all();
            log_event_with_fields(
                Event::EncodeCleared,
                &[("schema", self.schema.name.as_str()), ("erased", erased.as_str())],
            );
        }

        let mut written = 0usize;
        for field in &self.schema.fields {
            let value = match values.get(&field.name) {
                Some(value) => value,
                None => continue,
            };

            if self.omits(field, value) {
                continue;
            }

            let external = validator::to_external(value, &field.field_type);
            databag.store(field.key().to_string(), external.to_string());
            written += 1;
        }

        log_event_with_fields(
            Event::EncodeComplete,
            &[
                ("mode", self.mode.as_str()),
                ("schema", self.schema.name.as_str()),
                ("written", written.to_string().as_str()),
            ],
        );
    }

    /// Writes name-keyed `values` into a fresh databag.
    pub fn encode_to_bag(&self, values: &Map<String, Value>) -> RawBag {
        let mut databag = RawBag::new();
        self.encode_values(values, &mut databag, false);
        databag
    }

    /// Sparse mode leaves out a value equal to the field's default.
    ///
    /// Both sides are compared in normalized form, so `0` in a float field
    /// equals a `0.0` default and a nested object equals a default that
    /// only differs by nested defaults.
    fn omits(&self, field: &FieldSpec, value: &Value) -> bool {
        if self.mode == EncodeMode::Exhaustive {
            return false;
        }
        let default = match validator::default_value(field, &field.name) {
            Ok(Some(default)) => default,
            _ => return false,
        };
        let external = validator::to_external(value, &field.field_type);
        validator::validate_value(&external, &field.field_type, &field.name)
            .map_or(false, |normalized| normalized == default)
    }
}

/// Encodes a record into a fresh databag.
pub fn encode(record: &Record) -> RawBag {
    Codec::new(record.schema()).encode_to_bag(record.values())
}

/// Encodes a record into a caller-owned databag.
pub fn encode_into<B: Databag + ?Sized>(record: &Record, databag: &mut B, clear: bool) {
    Codec::new(record.schema()).encode_values(record.values(), databag, clear);
}

/// Encodes a typed model into a fresh databag.
pub fn encode_model<T: DatabagModel>(model: &T) -> RawBag {
    Codec::new(T::schema()).encode_to_bag(&model.to_values())
}

/// Encodes a typed model into a caller-owned databag.
pub fn encode_model_into<T, B>(model: &T, databag: &mut B, clear: bool)
where
    T: DatabagModel,
    B: Databag + ?Sized,
{
    Codec::new(T::schema()).encode_values(&model.to_values(), databag, clear);
}
