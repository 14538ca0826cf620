//! Schema definition errors
//!
//! These are raised while a schema is being built, registered or loaded.
//! They never occur while decoding or encoding a databag: a schema that
//! fails here is never handed to the codec.

use std::fmt;

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors in a schema's own structure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Schema name is empty
    #[error("schema name must not be empty")]
    EmptySchemaName,

    /// Field name or alias is empty
    #[error("field {0} has an empty name or alias")]
    EmptyFieldName(String),

    /// Two fields share a name
    #[error("duplicate field name '{0}'")]
    DuplicateName(String),

    /// Two fields share an external key
    #[error("duplicate alias '{alias}' (fields '{first}' and '{second}')")]
    DuplicateAlias {
        alias: String,
        first: String,
        second: String,
    },

    /// A required field also declares a default
    #[error("field '{0}' is required and cannot declare a default")]
    RequiredWithDefault(String),

    /// A default value does not satisfy its own field type
    #[error("default for field '{field}' is invalid: {reason}")]
    InvalidDefault { field: String, reason: String },

    /// A literal type lists no allowed values
    #[error("field '{0}' declares a literal type with no values")]
    EmptyLiteral(String),

    /// Schema (name, version) already registered
    #[error("schema '{name}' version '{version}' is immutable")]
    Immutable { name: String, version: String },

    /// Schema file could not be read or parsed
    #[error("malformed schema at {source_name}: {reason}")]
    Malformed { source_name: String, reason: String },
}

impl SchemaError {
    /// Create a malformed schema error
    pub fn malformed(source_name: impl Into<String>, reason: impl fmt::Display) -> Self {
        SchemaError::Malformed {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::Immutable { .. } => "DATABAG_SCHEMA_IMMUTABLE",
            SchemaError::Malformed { .. } => "DATABAG_SCHEMA_MALFORMED",
            _ => "DATABAG_SCHEMA_INVALID",
        }
    }
}

/// Why a value failed validation against its field type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDetails {
    /// Field path (e.g., "s3.bucket", "roles[1]")
    pub field: String,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
}

impl ValidationDetails {
    pub fn new(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::new(field, "field to be present", "missing")
    }

    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::new(field, expected, actual)
    }

    pub fn null_value(field: impl Into<String>) -> Self {
        Self::new(field, "non-null value", "null")
    }

    pub fn not_allowed(
        field: impl Into<String>,
        allowed: &[serde_json::Value],
        actual: &serde_json::Value,
    ) -> Self {
        let allowed: Vec<String> = allowed.iter().map(|v| v.to_string()).collect();
        Self::new(field, format!("one of [{}]", allowed.join(", ")), actual.to_string())
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field '{}': expected {}, got {}", self.field, self.expected, self.actual)
    }
}
