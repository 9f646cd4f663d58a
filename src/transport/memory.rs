//! In-memory transport
//!
//! Replies with queued responses in order and records every request it
//! receives, resolved against its base URL. An empty queue answers with no
//! records.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use serde_json::Value;

use super::{Transport, TransportFuture};
use crate::config::{join_endpoint, ClientConfig};
use crate::error::{TransportError, TransportResult};
use crate::query::QueryDescriptor;

/// One request seen by a [`MemoryTransport`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub route: String,
    /// `route` joined onto the transport's base URL
    pub url: String,
    pub params: QueryDescriptor,
}

/// Transport that never leaves the process
#[derive(Debug, Default)]
pub struct MemoryTransport {
    base_url: String,
    timeout_ms: Option<u64>,
    responses: Mutex<VecDeque<TransportResult<Vec<Value>>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the base URL and timeout from a client configuration
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout_ms: config.timeout_ms,
            ..Self::default()
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout_ms(&self) -> Option<u64> {
        self.timeout_ms
    }

    /// Queue a successful response
    pub fn respond_with(&self, records: Vec<Value>) -> &Self {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Ok(records));
        self
    }

    /// Queue a failure
    pub fn fail_with(&self, error: TransportError) -> &Self {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Err(error));
        self
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Transport for MemoryTransport {
    fn find<'a>(&'a self, route: &'a str, params: &'a QueryDescriptor) -> TransportFuture<'a> {
        Box::pin(async move {
            self.requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(RecordedRequest {
                    route: route.to_string(),
                    url: join_endpoint(&self.base_url, route),
                    params: params.clone(),
                });

            self.responses
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        })
    }
}
