//! Observability subsystem for relexec
//!
//! - Structured logging (JSON lines)
//! - Execution counters
//! - Typed lifecycle events
//!
//! # Principles
//!
//! 1. Observability is read-only and never changes execution results
//! 2. No async or background threads
//! 3. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use relexec::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::QueryExecuted, &[("rows", "42")]);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log a lifecycle event at its own severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a lifecycle event with fields at its own severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        log_event(Event::OperatorOpen);
        log_event(Event::OperatorClose);
    }

    #[test]
    fn test_log_event_with_fields() {
        log_event_with_fields(Event::PageFetch, &[("page", "0"), ("table", "1")]);
    }
}
