//! Query Executor
//!
//! Turns a [`Query`](crate::query::Query) into a transport call and the
//! returned records into a [`ResultCollection`](crate::collection::ResultCollection).
//!
//! # Execution Flow (strict order)
//!
//! 1. Check a transport is bound (synchronous, before any future exists)
//! 2. Snapshot the query into a descriptor and resolve its route
//! 3. Await the transport
//! 4. Rehydrate each record through the class registry
//! 5. Wrap the objects, in returned order, in a collection

mod executor;

pub use executor::{QueryExecutor, QueryFuture};
