//! CLI-specific error types

use std::fmt;
use std::io;

use crate::codec::DataValidationError;
use crate::schema::SchemaError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout/files)
    IoError,
    /// Input is not the expected JSON shape
    InputError,
    /// Schema could not be loaded
    SchemaError,
    /// Schema name/version not registered
    UnknownSchema,
    /// Databag or record failed validation
    ValidationFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "DATABAG_CLI_CONFIG_ERROR",
            Self::IoError => "DATABAG_CLI_IO_ERROR",
            Self::InputError => "DATABAG_CLI_INPUT_ERROR",
            Self::SchemaError => "DATABAG_CLI_SCHEMA_ERROR",
            Self::UnknownSchema => "DATABAG_CLI_UNKNOWN_SCHEMA",
            Self::ValidationFailed => "DATABAG_CLI_VALIDATION_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn input_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InputError, msg)
    }

    pub fn unknown_schema(name: &str, version: Option<&str>) -> Self {
        let message = match version {
            Some(v) => format!("Schema '{}' version '{}' not found", name, v),
            None => format!("Schema '{}' not found", name),
        };
        Self::new(CliErrorCode::UnknownSchema, message)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::input_error(format!("JSON error: {}", e))
    }
}

impl From<SchemaError> for CliError {
    fn from(e: SchemaError) -> Self {
        Self::new(CliErrorCode::SchemaError, e.to_string())
    }
}

impl From<DataValidationError> for CliError {
    fn from(e: DataValidationError) -> Self {
        Self::new(CliErrorCode::ValidationFailed, e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
