//! Immutable wrapper over rehydrated objects
//!
//! Derived operations (`match_attributes`, `filter`, `sort_by`, ...) return
//! a new collection; the receiver is never modified.

use std::cmp::Ordering;
use std::fmt::Display;

use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde_json::{Map, Value};

use super::sorter::FieldSorter;
use crate::object::Hydratable;
use crate::observability::{Event, Logger};

/// Ordered, read-only set of query results
#[derive(Debug, Clone, PartialEq)]
pub struct ResultCollection<T> {
    items: Vec<T>,
}

impl<T> ResultCollection<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    /// Consume the collection, keeping only its first element
    pub fn into_first(self) -> Option<T> {
        self.items.into_iter().next()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Call `iteratee` on each element in order.
    ///
    /// The first error stops the iteration; it is logged and not returned.
    pub fn each<E, F>(&self, mut iteratee: F)
    where
        E: Display,
        F: FnMut(&T) -> Result<(), E>,
    {
        for (index, item) in self.items.iter().enumerate() {
            if let Err(e) = iteratee(item) {
                let index = index.to_string();
                let reason = e.to_string();
                Logger::event(
                    Event::EachAborted,
                    &[("index", index.as_str()), ("reason", reason.as_str())],
                );
                break;
            }
        }
    }

    /// Transform every element into a plain vector
    pub fn map<U, F>(&self, iteratee: F) -> Vec<U>
    where
        F: FnMut(&T) -> U,
    {
        self.items.iter().map(iteratee).collect()
    }
}

impl<T: Clone> ResultCollection<T> {
    /// Keep elements for which `predicate` holds
    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&T) -> bool,
    {
        Self::new(self.items.iter().filter(|item| predicate(*item)).cloned().collect())
    }

    /// Like [`ResultCollection::filter`], but the first predicate error is
    /// returned to the caller unchanged.
    pub fn try_filter<E, F>(&self, mut predicate: F) -> Result<Self, E>
    where
        F: FnMut(&T) -> Result<bool, E>,
    {
        let mut kept = Vec::new();
        for item in &self.items {
            if predicate(item)? {
                kept.push(item.clone());
            }
        }
        Ok(Self::new(kept))
    }

    /// Order by an arbitrary comparator, ascending
    pub fn sort_with<F>(&self, compare: F) -> Self
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let mut items = self.items.clone();
        items.sort_by(compare);
        Self::new(items)
    }

    /// Ascending order by `compare`, then reversed
    pub fn sort_with_descending<F>(&self, compare: F) -> Self
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let mut sorted = self.sort_with(compare);
        sorted.items.reverse();
        sorted
    }

    /// Shallow copy of the elements
    pub fn to_list(&self) -> Vec<T> {
        self.items.clone()
    }
}

impl<T: Hydratable + Clone> ResultCollection<T> {
    /// Keep elements whose attributes equal every entry of `properties`
    pub fn match_attributes(&self, properties: &Map<String, Value>) -> Self {
        self.filter(|item| {
            properties
                .iter()
                .all(|(key, expected)| item.get(key) == Some(expected))
        })
    }

    /// Ascending order by a field.
    ///
    /// `id`, `createdAt` and `updatedAt` compare directly; other names are
    /// read as attributes.
    pub fn sort_by(&self, field: &str) -> Self {
        self.sort_with(|a, b| FieldSorter::compare(field, a, b))
    }

    /// Ascending order by a field, then reversed
    pub fn sort_by_descending(&self, field: &str) -> Self {
        self.sort_with_descending(|a, b| FieldSorter::compare(field, a, b))
    }
}

impl<T: Hydratable> ResultCollection<T> {
    /// Project each element to a plain record without bookkeeping fields
    pub fn to_json(&self) -> Vec<Map<String, Value>> {
        self.items.iter().map(Hydratable::to_record).collect()
    }
}

impl<T: Hydratable> Serialize for ResultCollection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.items.len()))?;
        for item in &self.items {
            seq.serialize_element(&item.to_record())?;
        }
        seq.end()
    }
}

impl<T> Default for ResultCollection<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> From<Vec<T>> for ResultCollection<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

impl<T> FromIterator<T> for ResultCollection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<T> IntoIterator for ResultCollection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a ResultCollection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
