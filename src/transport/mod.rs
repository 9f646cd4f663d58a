//! # Transport Boundary
//!
//! The executor talks to the server only through [`Transport`]. HTTP
//! clients, sessions and retries live behind this trait, outside the crate.

mod memory;

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;

use crate::error::TransportResult;
use crate::query::QueryDescriptor;

pub use memory::{MemoryTransport, RecordedRequest};

/// Future returned by [`Transport::find`]
pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = TransportResult<Vec<Value>>> + Send + 'a>>;

/// Transport collaborator
pub trait Transport: Send + Sync {
    /// Fetch the raw records matching `params` from `route`.
    ///
    /// Failures are reported through the returned future, never by
    /// panicking.
    fn find<'a>(&'a self, route: &'a str, params: &'a QueryDescriptor) -> TransportFuture<'a>;
}
