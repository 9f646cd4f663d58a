//! # Query Errors
//!
//! Error types for query construction, execution and rehydration.

use thiserror::Error;

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Result type returned by transport collaborators
pub type TransportResult<T> = Result<T, TransportError>;

/// Failure reported by a transport collaborator.
///
/// The status is the HTTP status when the failure came from a server
/// response, `None` for network-level failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    /// HTTP status code, if any
    pub status: Option<u16>,
    /// Human-readable failure reason
    pub message: String,
}

impl TransportError {
    /// Create a network-level failure
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    /// Create a failure carrying a server status code
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }
}

/// Query errors
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    // ==================
    // Synchronous errors
    // ==================
    /// Transport not bound or client not configured
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    /// A found-in query-list entry did not hold exactly one selected key
    #[error("Malformed query list for `{operator}` at entry {index}: expected one selected key, found {keys}")]
    MalformedQueryList {
        operator: &'static str,
        index: usize,
        keys: usize,
    },

    /// Configuration document could not be parsed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ===================
    // Asynchronous errors
    // ===================
    /// Failure surfaced by the transport, passed through unchanged
    #[error("Transport failure: {0}")]
    Transport(#[from] TransportError),

    /// Returned record could not be rehydrated
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

impl QueryError {
    /// Create a missing configuration error
    pub fn missing_configuration(msg: impl Into<String>) -> Self {
        Self::MissingConfiguration(msg.into())
    }

    /// Create an invalid record error
    pub fn invalid_record(msg: impl Into<String>) -> Self {
        Self::InvalidRecord(msg.into())
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingConfiguration(_) => "MISSING_CONFIGURATION",
            Self::MalformedQueryList { .. } => "MALFORMED_QUERY_LIST",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Transport(_) => "TRANSPORT_FAILURE",
            Self::InvalidRecord(_) => "INVALID_RECORD",
        }
    }

    /// Returns the transport failure, if this error wraps one
    pub fn as_transport(&self) -> Option<&TransportError> {
        match self {
            Self::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidConfig(e.to_string())
    }
}
