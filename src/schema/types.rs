//! Schema type definitions
//!
//! Supported types:
//! - string: UTF-8 string
//! - int: 64-bit integer (never a float)
//! - bool: Boolean
//! - float: any JSON number
//! - object: nested record with its own ordered field list
//! - array: homogeneous array with element type
//! - map: string-keyed dictionary with value type
//! - nullable: explicit null or a value of the inner type
//! - literal: one of a fixed set of JSON values
//! - any: any JSON value, null included

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{SchemaError, SchemaResult};
use super::validator;

/// Supported field types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// 64-bit integer
    Int,
    /// Boolean
    Bool,
    /// 64-bit floating point
    Float,
    /// Nested object; keys inside it are aliases too
    Object {
        /// Nested field definitions, in declaration order
        fields: Vec<FieldSpec>,
    },
    /// Homogeneous array with single element type
    Array {
        /// Element type (boxed to allow recursive types)
        element_type: Box<FieldType>,
    },
    /// String-keyed dictionary
    Map {
        /// Type of every value in the map
        value_type: Box<FieldType>,
    },
    /// Explicit null or a value of `inner`
    Nullable {
        inner: Box<FieldType>,
    },
    /// Value must equal one of `values`
    Literal {
        values: Vec<Value>,
    },
    /// Anything
    Any,
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Int => "int",
            FieldType::Bool => "bool",
            FieldType::Float => "float",
            FieldType::Object { .. } => "object",
            FieldType::Array { .. } => "array",
            FieldType::Map { .. } => "map",
            FieldType::Nullable { .. } => "nullable",
            FieldType::Literal { .. } => "literal",
            FieldType::Any => "any",
        }
    }

    /// Array of `element_type`
    pub fn array_of(element_type: FieldType) -> Self {
        FieldType::Array {
            element_type: Box::new(element_type),
        }
    }

    /// Map of string to `value_type`
    pub fn map_of(value_type: FieldType) -> Self {
        FieldType::Map {
            value_type: Box::new(value_type),
        }
    }

    /// Null or `inner`
    pub fn nullable(inner: FieldType) -> Self {
        FieldType::Nullable {
            inner: Box::new(inner),
        }
    }

    /// One of the given values
    pub fn literal<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        FieldType::Literal {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Nested object
    pub fn object(fields: Vec<FieldSpec>) -> Self {
        FieldType::Object { fields }
    }
}

/// How the encoder treats fields whose value equals their default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodeMode {
    /// Every field is written
    Exhaustive,
    /// Fields equal to their declared default are left out
    #[default]
    Sparse,
}

impl EncodeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EncodeMode::Exhaustive => "exhaustive",
            EncodeMode::Sparse => "sparse",
        }
    }
}

impl std::str::FromStr for EncodeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exhaustive" => Ok(EncodeMode::Exhaustive),
            "sparse" => Ok(EncodeMode::Sparse),
            other => Err(format!(
                "unknown encode mode '{}', expected 'sparse' or 'exhaustive'",
                other
            )),
        }
    }
}

/// A single record field.
///
/// `alias` is the key used in the databag. When unset it is the field name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name inside the record
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    alias: Option<String>,
    /// Field data type
    #[serde(flatten)]
    pub field_type: FieldType,
    /// Whether the field must be present in the databag
    #[serde(default)]
    pub required: bool,
    /// Value used when an optional field is absent
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<Value>,
}

// `"default": null` is a null default, not a missing one.
fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl FieldSpec {
    /// Create a required field
    pub fn required(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            alias: None,
            field_type,
            required: true,
            default: None,
        }
    }

    /// Create an optional field without a default
    pub fn optional(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            alias: None,
            field_type,
            required: false,
            default: None,
        }
    }

    /// Create an optional field that falls back to `default`
    pub fn with_default(
        name: impl Into<String>,
        field_type: FieldType,
        default: impl Into<Value>,
    ) -> Self {
        Self {
            name: name.into(),
            alias: None,
            field_type,
            required: false,
            default: Some(default.into()),
        }
    }

    /// Set the external key
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// The databag key for this field
    pub fn key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// Complete, ordered description of a record type.
///
/// Immutable once built; the codec only ever borrows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Schema identifier
    pub name: String,
    /// Schema version
    #[serde(default = "default_version")]
    pub version: String,
    /// Default-omission policy for this record type
    #[serde(default)]
    pub encode_mode: EncodeMode,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Field definitions, in declaration order
    pub fields: Vec<FieldSpec>,
}

fn default_version() -> String {
    "1".to_string()
}

impl Schema {
    /// Start building a schema
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            schema: Schema {
                name: name.into(),
                version: default_version(),
                encode_mode: EncodeMode::default(),
                description: None,
                fields: Vec::new(),
            },
        }
    }

    /// Returns the unique key for this schema (name, version)
    pub fn key(&self) -> (&str, &str) {
        (&self.name, &self.version)
    }

    /// Field whose databag key is `alias`
    pub fn field_by_alias(&self, alias: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.key() == alias)
    }

    /// Field called `name`
    pub fn field_by_name(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Databag key of the top-level field a validation path points into
    /// (`"s3.bucket"` and `"roles[1]"` resolve through `s3` and `roles`).
    pub fn key_for_path(&self, path: &str) -> Option<&str> {
        let top = path.split(['.', '[']).next().unwrap_or(path);
        self.field_by_name(top).map(FieldSpec::key)
    }

    /// Databag keys, in field order
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(FieldSpec::key)
    }

    /// Validates the schema structure itself (not a record)
    pub fn validate_structure(&self) -> SchemaResult<()> {
        if self.name.trim().is_empty() {
            return Err(SchemaError::EmptySchemaName);
        }
        validate_field_list(&self.fields, "")
    }
}

fn validate_field_list(fields: &[FieldSpec], path: &str) -> SchemaResult<()> {
    let mut names = HashSet::new();
    let mut aliases: Vec<(&str, &str)> = Vec::with_capacity(fields.len());

    for (i, field) in fields.iter().enumerate() {
        let field_path = validator::make_path(path, &field.name);

        if field.name.is_empty() || field.key().is_empty() {
            return Err(SchemaError::EmptyFieldName(validator::make_path(
                path,
                &format!("#{}", i),
            )));
        }

        if !names.insert(field.name.as_str()) {
            return Err(SchemaError::DuplicateName(field_path));
        }

        if let Some((_, first)) = aliases.iter().find(|(alias, _)| *alias == field.key()) {
            return Err(SchemaError::DuplicateAlias {
                alias: field.key().to_string(),
                first: first.to_string(),
                second: field.name.clone(),
            });
        }
        aliases.push((field.key(), field.name.as_str()));

        if field.required && field.default.is_some() {
            return Err(SchemaError::RequiredWithDefault(field_path));
        }

        validate_type_structure(&field.field_type, &field_path)?;

        // defaults are stored name-keyed, like decoded values
        validator::default_value(field, &field_path).map_err(|details| {
            SchemaError::InvalidDefault {
                field: field_path.clone(),
                reason: details.to_string(),
            }
        })?;
    }

    Ok(())
}

fn validate_type_structure(field_type: &FieldType, path: &str) -> SchemaResult<()> {
    match field_type {
        FieldType::Object { fields } => validate_field_list(fields, path),
        FieldType::Array { element_type } => validate_type_structure(element_type, path),
        FieldType::Map { value_type } => validate_type_structure(value_type, path),
        FieldType::Nullable { inner } => validate_type_structure(inner, path),
        FieldType::Literal { values } if values.is_empty() => {
            Err(SchemaError::EmptyLiteral(path.to_string()))
        }
        _ => Ok(()),
    }
}

/// Builder for [`Schema`]
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.schema.version = version.into();
        self
    }

    pub fn encode_mode(mut self, mode: EncodeMode) -> Self {
        self.schema.encode_mode = mode;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.schema.description = Some(description.into());
        self
    }

    /// Append a field; declaration order is encode order
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.schema.fields.push(field);
        self
    }

    /// Finish, rejecting structurally invalid schemas
    pub fn build(self) -> SchemaResult<Schema> {
        self.schema.validate_structure()?;
        Ok(self.schema)
    }
}
