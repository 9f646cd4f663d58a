//! Field ordering for local collection sorts
//!
//! Each side of a comparison is resolved to a [`SortKey`] first. Reserved
//! fields read the object's typed accessors; every other field is read
//! through the attribute accessor.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::object::Hydratable;

/// One object's value for a sort field.
///
/// Keys of different kinds order by declaration: an absent field first,
/// then `null`, booleans, numbers, text, timestamps, and finally
/// composite values, which never order among themselves.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey<'a> {
    Absent,
    Null,
    Bool(bool),
    Number(f64),
    Text(&'a str),
    Timestamp(DateTime<Utc>),
    Composite,
}

impl<'a> SortKey<'a> {
    /// Resolve `field` on `object`
    pub fn resolve<T: Hydratable>(field: &str, object: &'a T) -> Self {
        match field {
            "id" => SortKey::Text(object.id()),
            "createdAt" => object.created_at().map_or(SortKey::Absent, SortKey::Timestamp),
            "updatedAt" => object.updated_at().map_or(SortKey::Absent, SortKey::Timestamp),
            _ => object.get(field).map_or(SortKey::Absent, SortKey::from_value),
        }
    }

    pub fn from_value(value: &'a Value) -> Self {
        match value {
            Value::Null => SortKey::Null,
            Value::Bool(b) => SortKey::Bool(*b),
            Value::Number(n) => n.as_f64().map_or(SortKey::Null, SortKey::Number),
            Value::String(s) => SortKey::Text(s),
            Value::Array(_) | Value::Object(_) => SortKey::Composite,
        }
    }

    fn kind(&self) -> u8 {
        match self {
            SortKey::Absent => 0,
            SortKey::Null => 1,
            SortKey::Bool(_) => 2,
            SortKey::Number(_) => 3,
            SortKey::Text(_) => 4,
            SortKey::Timestamp(_) => 5,
            SortKey::Composite => 6,
        }
    }

    /// Total ascending order over keys
    pub fn order(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Bool(a), SortKey::Bool(b)) => a.cmp(b),
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Timestamp(a), SortKey::Timestamp(b)) => a.cmp(b),
            _ => self.kind().cmp(&other.kind()),
        }
    }
}

/// Compares objects by one field
pub struct FieldSorter;

impl FieldSorter {
    /// Ascending comparison of `a` and `b` on `field`.
    pub fn compare<T: Hydratable>(field: &str, a: &T, b: &T) -> Ordering {
        SortKey::resolve(field, a).order(&SortKey::resolve(field, b))
    }
}
