//! Observable events
//!
//! Every log line the crate writes names one of these events.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded
    ConfigLoaded,
    /// Schemas loaded
    SchemasLoaded,

    // Decode
    /// A databag value was not JSON
    DecodeMalformed,
    /// A databag was JSON but did not satisfy the schema
    DecodeInvalid,
    /// A databag decoded into a record
    DecodeComplete,

    // Encode
    /// A destination databag was cleared before writing
    EncodeCleared,
    /// A record was written to a databag
    EncodeComplete,
}

impl Event {
    /// Returns the event name as it appears in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemasLoaded => "SCHEMAS_LOADED",
            Event::DecodeMalformed => "DATABAG_MALFORMED",
            Event::DecodeInvalid => "DATABAG_INVALID",
            Event::DecodeComplete => "DATABAG_DECODED",
            Event::EncodeCleared => "DATABAG_CLEARED",
            Event::EncodeComplete => "DATABAG_ENCODED",
        }
    }

    /// Severity this event is logged at.
    ///
    /// An invalid databag is usually a peer that has not finished writing,
    /// so it stays at TRACE.
    pub fn severity(&self) -> Severity {
        match self {
            Event::DecodeMalformed => Severity::Error,
            Event::ConfigLoaded | Event::SchemasLoaded => Severity::Info,
            Event::DecodeInvalid
            | Event::DecodeComplete
            | Event::EncodeCleared
            | Event::EncodeComplete => Severity::Trace,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
