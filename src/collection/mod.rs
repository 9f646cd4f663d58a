//! # Result Collections
//!
//! Local filtering, sorting, mapping and JSON projection over the objects
//! a query returned.

mod collection;
mod sorter;

pub use collection::ResultCollection;
pub use sorter::{FieldSorter, SortKey};
