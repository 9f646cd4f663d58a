//! # Class Registry
//!
//! Resolves a class name to the factory that builds its instances.
//! Unregistered classes fall back to [`Hydratable::hydrate`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::traits::Hydratable;
use crate::error::{QueryError, QueryResult};

/// Builds an instance from a record's id and attributes
pub type Factory<T> = Arc<dyn Fn(String, Map<String, Value>) -> QueryResult<T> + Send + Sync>;

/// Per-class hydration factories
pub struct ClassRegistry<T> {
    factories: HashMap<String, Factory<T>>,
}

impl<T: Hydratable> ClassRegistry<T> {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Install the factory for `class_name`, replacing any previous one
    pub fn register<F>(&mut self, class_name: impl Into<String>, factory: F)
    where
        F: Fn(String, Map<String, Value>) -> QueryResult<T> + Send + Sync + 'static,
    {
        self.factories.insert(class_name.into(), Arc::new(factory));
    }

    pub fn is_registered(&self, class_name: &str) -> bool {
        self.factories.contains_key(class_name)
    }

    /// Build an instance of `class_name` from one raw record.
    ///
    /// The class name defaults to `class_name` when the factory left it
    /// unset; the id is always taken from the record. Only a record that is
    /// not a JSON object is rejected: a missing or `null` id becomes an
    /// empty id, and other scalar ids are stringified.
    pub fn rehydrate(&self, class_name: &str, record: Value) -> QueryResult<T> {
        let mut attributes = match record {
            Value::Object(map) => map,
            other => {
                return Err(QueryError::invalid_record(format!(
                    "expected object, found {}",
                    other
                )))
            }
        };

        let id = match attributes.remove("id") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(id)) => id,
            Some(other) => other.to_string(),
        };

        let mut object = match self.factories.get(class_name) {
            Some(factory) => factory(id.clone(), attributes)?,
            None => T::hydrate(id.clone(), attributes)?,
        };

        if object.class_name().is_none() {
            object.set_class_name(class_name);
        }
        object.set_id(id);

        Ok(object)
    }
}

impl<T: Hydratable> Default for ClassRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for ClassRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            factories: self.factories.clone(),
        }
    }
}

impl<T> fmt::Debug for ClassRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut classes: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        classes.sort_unstable();
        f.debug_struct("ClassRegistry")
            .field("classes", &classes)
            .finish()
    }
}
