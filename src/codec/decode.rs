//! Databag -> record
//!
//! 1. Keep only keys that are some field's alias
//! 2. Parse each kept value as JSON; the first failure is MALFORMED
//! 3. Validate the alias-keyed object and re-key it by field name;
//!    failure is INVALID
//!
//! Keys are visited in schema order so the reported key is deterministic.

use std::sync::Arc;

use serde_json::{Map, Value};

use super::bag::{render, Databag};
use super::errors::{CodecResult, DataValidationError};
use super::model::DatabagModel;
use super::record::Record;
use super::Codec;
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::schema::{validator, Schema, ValidationDetails};

impl<'a> Codec<'a> {
    /// Decodes a databag into name-keyed, validated values.
    ///
    /// # Errors
    ///
    /// - `Malformed` if a schema key holds a value that is not JSON
    /// - `Invalid` if the JSON values fail the schema
    pub fn decode_values<B: Databag + ?Sized>(
        &self,
        databag: &B,
    ) -> CodecResult<Map<String, Value>> {
        let mut data = Map::new();

        for field in &self.schema.fields {
            let key = field.key();
            let raw = match databag.lookup(key) {
                Some(raw) => raw,
                None => continue,
            };

            match serde_json::from_str::<Value>(raw) {
                Ok(value) => {
                    data.insert(key.to_string(), value);
                }
                Err(e) => {
                    let err = DataValidationError::malformed(key, databag.snapshot(), e);
                    self.log_failure(Event::DecodeMalformed, &err);
                    return Err(err);
                }
            }
        }

        let values = validator::validate_fields(&self.schema.fields, &data, "").map_err(|details| {
            let key = self.schema.key_for_path(&details.field).map(str::to_string);
            let err = DataValidationError::invalid(key, details, databag.snapshot());
            self.log_failure(Event::DecodeInvalid, &err);
            err
        })?;

        log_event_with_fields(
            Event::DecodeComplete,
            &[
                ("schema", self.schema.name.as_str()),
                ("fields", values.len().to_string().as_str()),
            ],
        );

        Ok(values)
    }

    fn log_failure(&self, event: Event, err: &DataValidationError) {
        // rendering the bag is the expensive part; skip it when filtered
        if !Logger::enabled(event.severity()) {
            return;
        }
        let databag = render(err.databag());
        let mut fields: Vec<(&str, &str)> = vec![
            ("schema", self.schema.name.as_str()),
            ("databag", databag.as_str()),
        ];
        if let Some(key) = err.key() {
            fields.push(("key", key));
        }
        let reason = err.details().map(ToString::to_string);
        if let Some(reason) = &reason {
            fields.push(("reason", reason.as_str()));
        }
        log_event_with_fields(event, &fields);
    }
}

/// Decodes a databag into a dynamic [`Record`] of `schema`.
pub fn decode<B: Databag + ?Sized>(schema: &Arc<Schema>, databag: &B) -> CodecResult<Record> {
    let values = Codec::new(schema).decode_values(databag)?;
    Ok(Record::from_validated(Arc::clone(schema), values))
}

/// Decodes a databag into a typed model.
///
/// A value the schema accepts but the model type cannot hold is INVALID.
pub fn decode_model<T, B>(databag: &B) -> CodecResult<T>
where
    T: DatabagModel,
    B: Databag + ?Sized,
{
    let codec = Codec::new(T::schema());
    let values = codec.decode_values(databag)?;

    serde_json::from_value(Value::Object(values)).map_err(|e| {
        let details =
            ValidationDetails::new("$record", "value matching the record type", e.to_string());
        let err = DataValidationError::invalid(None, details, databag.snapshot());
        codec.log_failure(Event::DecodeInvalid, &err);
        err
    })
}
