//! Observable events for relexec
//!
//! Events are explicit and typed. Each maps to one stable name.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded and validated
    ConfigLoaded,
    /// A table file was loaded into the page store
    TableLoaded,

    // Query lifecycle
    /// Operator tree received
    QueryReceived,
    /// Operator tree drained successfully
    QueryExecuted,
    /// Operator tree failed
    QueryFailed,

    // Operator lifecycle
    /// An operator transitioned Closed -> Open
    OperatorOpen,
    /// An operator transitioned Open -> Closed
    OperatorClose,
    /// A scan requested a page from storage
    PageFetch,
    /// An aggregator reduced its groups
    AggregateFinalized,
}

impl Event {
    /// Returns the event name
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::TableLoaded => "TABLE_LOADED",
            Event::QueryReceived => "QUERY_RECEIVED",
            Event::QueryExecuted => "QUERY_EXECUTED",
            Event::QueryFailed => "QUERY_FAILED",
            Event::OperatorOpen => "OPERATOR_OPEN",
            Event::OperatorClose => "OPERATOR_CLOSE",
            Event::PageFetch => "PAGE_FETCH",
            Event::AggregateFinalized => "AGGREGATE_FINALIZED",
        }
    }

    /// Severity this event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::ConfigLoaded
            | Event::TableLoaded
            | Event::QueryReceived
            | Event::QueryExecuted => Severity::Info,
            Event::QueryFailed => Severity::Error,
            Event::OperatorOpen
            | Event::OperatorClose
            | Event::PageFetch
            | Event::AggregateFinalized => Severity::Trace,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
