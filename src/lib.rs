//! objquery - query construction and result rehydration for a remote object store
//!
//! Queries are built locally, snapshotted into a declarative descriptor,
//! sent through an injected [`transport::Transport`] and the returned
//! records are rehydrated into typed objects held by a
//! [`collection::ResultCollection`].

pub mod client;
pub mod collection;
pub mod config;
pub mod error;
pub mod executor;
pub mod object;
pub mod observability;
pub mod query;
pub mod transport;

pub use client::Client;
pub use collection::ResultCollection;
pub use config::ClientConfig;
pub use error::{QueryError, QueryResult, TransportError, TransportResult};
pub use executor::QueryExecutor;
pub use object::{ClassRegistry, DomainObject, HasClassName, Hydratable};
pub use query::{entry, Operator, Query, QueryDescriptor};
pub use transport::{MemoryTransport, Transport};
