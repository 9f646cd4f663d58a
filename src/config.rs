//! Client Configuration
//!
//! Connection settings for the remote object store and the minimum log
//! severity for one client. Transports read the connection settings when
//! they are built through [`Client::with_transport_from`](crate::Client::with_transport_from).

use serde::Deserialize;

use crate::error::{QueryError, QueryResult};
use crate::observability::Severity;

/// Client configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClientConfig {
    /// API key sent with every request (required)
    #[serde(default)]
    pub api_key: String,

    /// Base URL of the object store (default: "")
    #[serde(default)]
    pub base_url: String,

    /// Request timeout in milliseconds, transport default when unset
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Minimum severity of this client's query events (default: info)
    #[serde(default)]
    pub log_level: Severity,
}

impl ClientConfig {
    /// Create a config with the given API key and defaults elsewhere
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: String::new(),
            timeout_ms: None,
            log_level: Severity::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn with_log_level(mut self, level: Severity) -> Self {
        self.log_level = level;
        self
    }

    /// Parse a JSON configuration document
    pub fn from_json_str(json: &str) -> QueryResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Fails when no API key is set
    pub fn validate(&self) -> QueryResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(QueryError::missing_configuration("API Key must be set"));
        }
        Ok(())
    }

    /// Full URL for a class route
    pub fn endpoint(&self, route: &str) -> String {
        join_endpoint(&self.base_url, route)
    }
}

/// Join a base URL and a route with exactly one `/`.
///
/// An empty base leaves the route relative.
pub fn join_endpoint(base_url: &str, route: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let route = route.trim_start_matches('/');
    if base.is_empty() {
        return route.to_string();
    }
    format!("{}/{}", base, route)
}
