//! Databag decode errors
//!
//! One error type with two causes:
//! - DATABAG_MALFORMED: a value is not JSON at all (broken producer)
//! - DATABAG_INVALID: JSON, but the schema rejects it (broken producer, or
//!   one that has not finished writing yet)
//!
//! Both carry the full databag for diagnostics.

use std::fmt;

use super::bag::{render, RawBag};
use crate::schema::ValidationDetails;

/// Which way a databag failed to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A value was not valid JSON
    Malformed,
    /// Values were JSON but failed required/type/constraint checks
    Invalid,
}

impl ErrorKind {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Malformed => "DATABAG_MALFORMED",
            ErrorKind::Invalid => "DATABAG_INVALID",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Malformed => "malformed",
            ErrorKind::Invalid => "invalid",
        }
    }

    /// Invalid data is expected while a peer is still publishing.
    pub fn is_transient(&self) -> bool {
        matches!(self, ErrorKind::Invalid)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Raised when databag validation fails
#[derive(Debug)]
pub struct DataValidationError {
    kind: ErrorKind,
    message: String,
    /// Databag key at fault, if known
    key: Option<String>,
    details: Option<ValidationDetails>,
    databag: RawBag,
    source: Option<serde_json::Error>,
}

impl DataValidationError {
    /// A value under `key` is not JSON
    pub fn malformed(key: impl Into<String>, databag: RawBag, source: serde_json::Error) -> Self {
        Self {
            kind: ErrorKind::Malformed,
            message: format!("invalid databag contents: expecting json. {}", render(&databag)),
            key: Some(key.into()),
            details: None,
            databag,
            source: Some(source),
        }
    }

    /// The decoded values do not satisfy the schema
    pub fn invalid(key: Option<String>, details: ValidationDetails, databag: RawBag) -> Self {
        Self {
            kind: ErrorKind::Invalid,
            message: format!("failed to validate databag: {}", render(&databag)),
            key,
            details: Some(details),
            databag,
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The databag key at fault, if known
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Validation details, for invalid databags
    pub fn details(&self) -> Option<&ValidationDetails> {
        self.details.as_ref()
    }

    /// The databag as it was when decoding failed
    pub fn databag(&self) -> &RawBag {
        &self.databag
    }

    pub fn is_malformed(&self) -> bool {
        self.kind == ErrorKind::Malformed
    }

    pub fn is_invalid(&self) -> bool {
        self.kind == ErrorKind::Invalid
    }

    /// See [`ErrorKind::is_transient`]
    pub fn is_transient(&self) -> bool {
        self.kind.is_transient()
    }
}

impl fmt::Display for DataValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind.code(), self.message)?;
        if let Some(key) = &self.key {
            write!(f, " [key '{}']", key)?;
        }
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for DataValidationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for codec operations
pub type CodecResult<T> = Result<T, DataValidationError>;
