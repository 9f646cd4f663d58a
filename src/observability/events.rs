//! Observable events of the query client
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Client configuration accepted
    ClientInitialized,

    // Query execution
    /// Query descriptor handed to the transport
    QueryDispatch,
    /// Records returned and rehydrated
    QueryComplete,
    /// Transport or rehydration failure
    QueryFailed,

    // Collections
    /// `each` iteratee failed; remaining elements skipped
    EachAborted,
}

impl Event {
    /// Every event, in declaration order
    pub const ALL: [Event; 5] = [
        Event::ClientInitialized,
        Event::QueryDispatch,
        Event::QueryComplete,
        Event::QueryFailed,
        Event::EachAborted,
    ];

    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ClientInitialized => "CLIENT_INITIALIZED",
            Event::QueryDispatch => "QUERY_DISPATCH",
            Event::QueryComplete => "QUERY_COMPLETE",
            Event::QueryFailed => "QUERY_FAILED",
            Event::EachAborted => "EACH_ABORTED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::QueryFailed | Event::EachAborted => Severity::Error,
            Event::QueryDispatch => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
