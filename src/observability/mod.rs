//! Observability subsystem for minisql
//!
//! Structured JSON logging of statement lifecycle events. Logging is
//! read-only and has no effect on query results.
//!
//! # Usage
//!
//! ```ignore
//! use minisql::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::PlanSelected, &[("path", "SCAN")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
