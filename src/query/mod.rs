//! # Query Construction
//!
//! Accumulates predicates, sort directives and pagination into a
//! declarative descriptor that a transport can send as-is.
//!
//! Sub-queries (the found-in family) are snapshotted at the moment they
//! are attached, never referenced live.

mod builder;
mod constraint;
mod descriptor;
mod operator;
mod predicate;
mod sort;
mod subquery;

pub use builder::Query;
pub use constraint::{ConstraintSet, FieldConstraints};
pub use descriptor::{class_route, QueryDescriptor, USER_CLASS};
pub use operator::Operator;
pub use predicate::{split_json_key, JsonPredicate, Predicate, JSON_PATH_SEPARATOR};
pub use sort::{is_reserved_field, FieldList, SortDirection, SortDirective, RESERVED_FIELDS};
pub use subquery::{entry, QueryListEntry, SubQueryDescriptor};
