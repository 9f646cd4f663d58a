//! # Domain Objects
//!
//! Rehydration of returned records into typed instances. Per-class types
//! implement [`HasClassName`] and [`Hydratable`]; a [`ClassRegistry`]
//! picks the factory by class name.

mod domain;
mod registry;
mod traits;

pub use domain::{DomainObject, CREATED_AT_KEY, UPDATED_AT_KEY};
pub use registry::{ClassRegistry, Factory};
pub use traits::{HasClassName, Hydratable};
