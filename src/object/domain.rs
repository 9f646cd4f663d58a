//! # Domain Object
//!
//! Default rehydrated record: class name, id, timestamps and a free-form
//! attribute map.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use super::traits::{HasClassName, Hydratable};
use crate::error::QueryResult;

/// Raw record key holding the creation timestamp
pub const CREATED_AT_KEY: &str = "created_at";

/// Raw record key holding the last-update timestamp
pub const UPDATED_AT_KEY: &str = "updated_at";

/// A rehydrated object of any class
#[derive(Debug, Clone, PartialEq)]
pub struct DomainObject {
    class_name: Option<String>,
    id: String,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    attributes: Map<String, Value>,
    is_new: bool,
    is_dirty: bool,
}

/// Move a timestamp out of the attributes when it parses as RFC 3339.
///
/// Anything else stays in the attributes untouched; `null` is dropped.
fn take_timestamp(attributes: &mut Map<String, Value>, key: &str) -> Option<DateTime<Utc>> {
    let parsed = match attributes.get(key)? {
        Value::Null => None,
        Value::String(raw) => match DateTime::parse_from_rfc3339(raw) {
            Ok(ts) => Some(ts.with_timezone(&Utc)),
            Err(_) => return None,
        },
        _ => return None,
    };
    attributes.remove(key);
    parsed
}

impl DomainObject {
    /// True until the object has been saved; rehydrated objects are not new
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// True when local attributes differ from the server's copy
    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }
}

impl HasClassName for DomainObject {
    fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    fn set_class_name(&mut self, class_name: &str) {
        self.class_name = Some(class_name.to_string());
    }
}

impl Hydratable for DomainObject {
    fn hydrate(id: String, mut attributes: Map<String, Value>) -> QueryResult<Self> {
        let created_at = take_timestamp(&mut attributes, CREATED_AT_KEY);
        let updated_at = take_timestamp(&mut attributes, UPDATED_AT_KEY);

        Ok(Self {
            class_name: None,
            id,
            created_at,
            updated_at,
            attributes,
            is_new: false,
            is_dirty: false,
        })
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    fn to_record(&self) -> Map<String, Value> {
        let mut record = Map::new();
        record.insert("id".to_string(), Value::String(self.id.clone()));
        if let Some(ts) = self.created_at {
            record.insert(
                "createdAt".to_string(),
                Value::String(ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            );
        }
        if let Some(ts) = self.updated_at {
            record.insert(
                "updatedAt".to_string(),
                Value::String(ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            );
        }
        for (key, value) in &self.attributes {
            record.insert(key.clone(), value.clone());
        }
        record
    }
}
