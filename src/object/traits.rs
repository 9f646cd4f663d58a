//! Capability traits for rehydrated objects

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::QueryResult;

/// Types that carry a server-side class name
pub trait HasClassName {
    /// The class name, if this instance has one assigned
    fn class_name(&self) -> Option<&str>;

    fn set_class_name(&mut self, class_name: &str);
}

/// Types that can be built from a returned record.
///
/// The bookkeeping keys `id`, `createdAt` and `updatedAt` are read through
/// dedicated accessors; everything else goes through [`Hydratable::get`].
pub trait Hydratable: HasClassName + Sized {
    /// Construct from a record's id and its remaining keys
    fn hydrate(id: String, attributes: Map<String, Value>) -> QueryResult<Self>;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    /// Read one attribute
    fn get(&self, key: &str) -> Option<&Value>;

    /// All attributes
    fn attributes(&self) -> &Map<String, Value>;

    fn created_at(&self) -> Option<DateTime<Utc>>;

    fn updated_at(&self) -> Option<DateTime<Utc>>;

    /// Project to a fresh plain record with attributes at top level and no
    /// internal bookkeeping. Must not modify `self`.
    fn to_record(&self) -> Map<String, Value>;
}
