//! Observability for the databag codec
//!
//! Structured JSON logging only. The codec keeps no counters or other
//! process-wide state; each decode/encode call logs and returns.
//!
//! # Usage
//!
//! ```ignore
//! use databag::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::SchemasLoaded, &[("count", "3")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log an event with fields at its own severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
